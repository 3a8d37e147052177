//! 图片写入服务 - 业务能力层
//!
//! 只负责"把一张图片写到输出目录"，不关心流程

use std::path::PathBuf;
use tokio::fs;
use tracing::debug;

use crate::error::WriteError;
use crate::models::artifact::{artifact_file_name, GeneratedImage};

/// 图片写入服务
///
/// 文件名固定为 `image_{行号}.png`，重复运行会直接覆盖旧文件。
#[derive(Debug, Clone)]
pub struct ArtifactWriter {
    output_dir: PathBuf,
}

impl ArtifactWriter {
    pub fn with_dir(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    /// 写入第 `index` 行的图片
    pub async fn write(&self, index: usize, bytes: Vec<u8>) -> Result<GeneratedImage, WriteError> {
        fs::create_dir_all(&self.output_dir)
            .await
            .map_err(|source| WriteError {
                path: self.output_dir.display().to_string(),
                source,
            })?;

        let local_path = self.output_dir.join(artifact_file_name(index));
        debug!("写入图片: {} ({} 字节)", local_path.display(), bytes.len());

        fs::write(&local_path, &bytes)
            .await
            .map_err(|source| WriteError {
                path: local_path.display().to_string(),
                source,
            })?;

        Ok(GeneratedImage {
            index,
            local_path,
            bytes,
        })
    }
}
