//! 打包服务 - 业务能力层
//!
//! 在内存中把所有成功生成的图片打成 zip

use std::io::{Cursor, Write};
use tracing::info;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::error::PackageError;
use crate::models::artifact::GeneratedImage;
use crate::models::batch::BatchResult;

/// 默认压缩包名称
pub const DEFAULT_PROJECT_NAME: &str = "generated_images";

/// 打包结果
#[derive(Debug, Clone)]
pub struct Package {
    /// 压缩包文件名（含 `.zip`）
    pub file_name: String,
    /// 压缩包内容
    pub zip_bytes: Vec<u8>,
    /// 包含的图片数量
    pub image_count: usize,
}

/// 打包一批结果
///
/// 没有任何成功的图片时返回 `PackageError::NoArtifacts`。
pub fn package_batch(result: &BatchResult, project_name: &str) -> Result<Package, PackageError> {
    if !result.has_artifacts() {
        return Err(PackageError::NoArtifacts);
    }

    let zip_bytes = build_zip(&result.successes)?;
    let file_name = zip_file_name(project_name);

    info!(
        "📦 打包完成: {} ({} 张图片, {} 字节)",
        file_name,
        result.successes.len(),
        zip_bytes.len()
    );

    Ok(Package {
        file_name,
        zip_bytes,
        image_count: result.successes.len(),
    })
}

/// 在内存中生成 zip，每张图片使用固定文件名
pub fn build_zip(images: &[GeneratedImage]) -> Result<Vec<u8>, PackageError> {
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    for image in images {
        zip.start_file(image.file_name(), options)?;
        zip.write_all(&image.bytes)?;
    }

    Ok(zip.finish()?.into_inner())
}

/// 压缩包文件名
pub fn zip_file_name(project_name: &str) -> String {
    let name = project_name.trim();
    let name = if name.is_empty() {
        DEFAULT_PROJECT_NAME
    } else {
        name
    };
    if name.to_lowercase().ends_with(".zip") {
        name.to_string()
    } else {
        format!("{}.zip", name)
    }
}
