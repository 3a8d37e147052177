//! 运行日志 - 业务能力层
//!
//! 只追加不修改，每行一条：行号、提示词、结果、时间。
//! 导出为 CSV，可作为邮件附件。

use serde::Serialize;
use std::path::Path;
use tracing::debug;

use crate::error::PackageError;
use crate::models::batch::{RowFailure, RowOutcome};

/// 日志附件文件名
pub const LOG_FILE_NAME: &str = "upload_log.csv";

/// 单条日志
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LogEntry {
    pub index: usize,
    pub prompt: String,
    pub outcome: String,
    pub timestamp: String,
}

/// 运行日志
#[derive(Debug, Clone, Default)]
pub struct RunLog {
    entries: Vec<LogEntry>,
}

impl RunLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// 记录一行的最终结果
    pub fn record(&mut self, prompt: &str, outcome: &RowOutcome) {
        let text = match outcome {
            RowOutcome::Succeeded(image) => format!("成功: {}", image.file_name()),
            RowOutcome::Failed(RowFailure { stage, reason, .. }) => {
                format!("失败 ({}): {}", stage, reason)
            }
        };
        self.append(outcome.index(), prompt, text);
    }

    fn append(&mut self, index: usize, prompt: &str, outcome: String) {
        let entry = LogEntry {
            index,
            prompt: prompt.to_string(),
            outcome,
            timestamp: chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
        };
        debug!("日志: 行 {} | {}", entry.index, entry.outcome);
        self.entries.push(entry);
    }

    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// 导出为 CSV
    pub fn to_csv_bytes(&self) -> Result<Vec<u8>, PackageError> {
        let mut writer = csv::Writer::from_writer(Vec::new());
        for entry in &self.entries {
            writer.serialize(entry)?;
        }
        writer.into_inner().map_err(|e| PackageError::Io(e.into_error()))
    }

    /// 保存到文件
    pub async fn save(&self, path: &Path) -> Result<(), PackageError> {
        let bytes = self.to_csv_bytes()?;
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(path, bytes).await?;
        Ok(())
    }
}
