//! 批处理结果

use std::fmt;

use crate::models::artifact::GeneratedImage;

/// 单行处理阶段
///
/// 状态流转：`Pending → Composing → Generating → Writing`，
/// 最终落在成功或失败（记录失败时所在阶段）。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowStage {
    /// 等待处理
    Pending,
    /// 合成提示词
    Composing,
    /// 调用生成服务
    Generating,
    /// 写入文件
    Writing,
}

impl fmt::Display for RowStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RowStage::Pending => "等待",
            RowStage::Composing => "合成提示词",
            RowStage::Generating => "生成图片",
            RowStage::Writing => "写入文件",
        };
        f.write_str(name)
    }
}

/// 单行失败记录
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowFailure {
    /// 行号（从1开始）
    pub index: usize,
    /// 原始提示词
    pub prompt: String,
    /// 失败时所在阶段
    pub stage: RowStage,
    /// 失败原因
    pub reason: String,
}

/// 单行处理结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowOutcome {
    Succeeded(GeneratedImage),
    Failed(RowFailure),
}

impl RowOutcome {
    pub fn index(&self) -> usize {
        match self {
            RowOutcome::Succeeded(image) => image.index,
            RowOutcome::Failed(failure) => failure.index,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, RowOutcome::Succeeded(_))
    }
}

/// 整批处理结果
///
/// 成功与失败都按行号顺序保存，两者数量之和等于 `total`。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchResult {
    pub total: usize,
    pub successes: Vec<GeneratedImage>,
    pub failures: Vec<RowFailure>,
}

impl BatchResult {
    pub fn new(total: usize) -> Self {
        Self {
            total,
            ..Default::default()
        }
    }

    /// 记录一行的最终结果
    pub fn push(&mut self, outcome: RowOutcome) {
        match outcome {
            RowOutcome::Succeeded(image) => self.successes.push(image),
            RowOutcome::Failed(failure) => self.failures.push(failure),
        }
    }

    pub fn success_count(&self) -> usize {
        self.successes.len()
    }

    pub fn failure_count(&self) -> usize {
        self.failures.len()
    }

    /// 已经处理完的行数
    pub fn processed(&self) -> usize {
        self.successes.len() + self.failures.len()
    }

    /// 是否有可打包的图片
    pub fn has_artifacts(&self) -> bool {
        !self.successes.is_empty()
    }

    /// 按行号查找失败记录
    pub fn failure(&self, index: usize) -> Option<&RowFailure> {
        self.failures.iter().find(|f| f.index == index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn image(index: usize) -> GeneratedImage {
        GeneratedImage {
            index,
            local_path: PathBuf::from(format!("out/image_{}.png", index)),
            bytes: vec![index as u8],
        }
    }

    #[test]
    fn test_push_keeps_counts_consistent() {
        let mut result = BatchResult::new(3);
        result.push(RowOutcome::Succeeded(image(1)));
        result.push(RowOutcome::Failed(RowFailure {
            index: 2,
            prompt: "a dog".to_string(),
            stage: RowStage::Generating,
            reason: "boom".to_string(),
        }));
        result.push(RowOutcome::Succeeded(image(3)));

        assert_eq!(result.processed(), result.total);
        assert_eq!(result.success_count(), 2);
        assert_eq!(result.failure_count(), 1);
        assert_eq!(result.failure(2).map(|f| f.prompt.as_str()), Some("a dog"));
        assert!(result.failure(1).is_none());
        assert!(result.has_artifacts());
    }

    #[test]
    fn test_outcome_index() {
        assert_eq!(RowOutcome::Succeeded(image(4)).index(), 4);
        assert!(!RowOutcome::Failed(RowFailure {
            index: 5,
            prompt: String::new(),
            stage: RowStage::Writing,
            reason: String::new(),
        })
        .is_success());
    }
}
