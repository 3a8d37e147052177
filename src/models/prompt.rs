//! 提示词数据结构

use serde::{Deserialize, Serialize};

use crate::models::catalog::SizeCatalog;

/// 表格中的一行提示词
///
/// 由加载器创建，`style`/`size` 已经填入默认值。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptRecord {
    /// 提示词
    pub prompt: String,
    /// 风格
    pub style: String,
    /// 尺寸标签或 `WxH` 尺寸
    pub size: String,
}

impl PromptRecord {
    pub fn new(
        prompt: impl Into<String>,
        style: impl Into<String>,
        size: impl Into<String>,
    ) -> Self {
        Self {
            prompt: prompt.into(),
            style: style.into(),
            size: size.into(),
        }
    }
}

/// 用户选择的全局默认值
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptDefaults {
    /// 默认风格
    pub style: String,
    /// 默认尺寸标签
    pub size_label: String,
}

impl PromptDefaults {
    pub fn new(style: impl Into<String>, size_label: impl Into<String>) -> Self {
        Self {
            style: style.into(),
            size_label: size_label.into(),
        }
    }

    /// 默认尺寸标签对应的像素尺寸
    ///
    /// 标签不在目录中时原样返回。
    pub fn size_dimensions(&self, sizes: &SizeCatalog) -> String {
        sizes
            .dimensions(&self.size_label)
            .unwrap_or(self.size_label.trim())
            .to_string()
    }
}

/// 最终发送给生成服务的请求
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedRequest {
    /// 合成后的提示词
    pub final_prompt: String,
    /// `WxH` 尺寸
    pub size: String,
}
