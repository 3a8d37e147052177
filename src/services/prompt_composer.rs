//! 提示词合成服务 - 业务能力层
//!
//! 只负责"把一行记录变成最终请求"，无副作用，可重复调用。

use tracing::warn;

use crate::models::catalog::{is_dimension_string, SizeCatalog};
use crate::models::prompt::{PromptRecord, ResolvedRequest};

/// 合成最终请求
///
/// - 尺寸：命中标签时替换为 `WxH`，否则原样透传（标签优先）
/// - 提示词：风格不在提示词中（忽略大小写）时追加 `", {style}"`；
///   提示词为空时保持为空，交给生成阶段报错
pub fn compose_request(
    record: &PromptRecord,
    default_style: &str,
    sizes: &SizeCatalog,
) -> ResolvedRequest {
    let prompt = record.prompt.trim();
    let style = match record.style.trim() {
        "" => default_style.trim(),
        style => style,
    };

    let final_prompt = if prompt.is_empty() {
        String::new()
    } else {
        merge_style(prompt, style)
    };

    ResolvedRequest {
        final_prompt,
        size: resolve_size(&record.size, sizes),
    }
}

/// 尺寸解析：标签 → `WxH`，未知字符串原样返回
pub fn resolve_size(size: &str, sizes: &SizeCatalog) -> String {
    let size = size.trim();
    sizes.dimensions(size).unwrap_or(size).to_string()
}

/// 追加风格，已包含时不重复
pub fn merge_style(prompt: &str, style: &str) -> String {
    if prompt.to_lowercase().contains(&style.to_lowercase()) {
        prompt.to_string()
    } else {
        format!("{}, {}", prompt, style)
    }
}

/// 提示词合成器
///
/// 持有默认风格与尺寸目录，供流程层逐行调用。
#[derive(Debug, Clone)]
pub struct PromptComposer {
    default_style: String,
    sizes: SizeCatalog,
}

impl PromptComposer {
    pub fn new(default_style: impl Into<String>, sizes: SizeCatalog) -> Self {
        Self {
            default_style: default_style.into(),
            sizes,
        }
    }

    pub fn compose(&self, record: &PromptRecord) -> ResolvedRequest {
        let request = compose_request(record, &self.default_style, &self.sizes);
        if !is_dimension_string(&request.size) {
            warn!(
                "⚠️ 尺寸 '{}' 既不是已知标签也不是 WxH 格式，将原样提交",
                request.size
            );
        }
        request
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> SizeCatalog {
        SizeCatalog::builtin()
    }

    #[test]
    fn test_red_fox_scenario() {
        let record = PromptRecord::new("a red fox", "cartoon", "1024x1024");
        let request = compose_request(&record, "cartoon", &catalog());
        assert_eq!(
            request,
            ResolvedRequest {
                final_prompt: "a red fox, cartoon".to_string(),
                size: "1024x1024".to_string(),
            }
        );
    }

    #[test]
    fn test_style_not_duplicated() {
        let record = PromptRecord::new("a cat, cinematic shot", "cinematic", "Square (1:1)");
        let request = compose_request(&record, "cartoon", &catalog());
        assert_eq!(request.final_prompt, "a cat, cinematic shot");
        assert_eq!(request.final_prompt.matches("cinematic").count(), 1);
    }

    #[test]
    fn test_style_check_ignores_case() {
        assert_eq!(merge_style("A CINEMATIC view", "cinematic"), "A CINEMATIC view");
        assert_eq!(merge_style("a view", "Oil Painting"), "a view, Oil Painting");
    }

    #[test]
    fn test_size_label_resolution() {
        let sizes = catalog();
        assert_eq!(resolve_size("Square (1:1)", &sizes), "1024x1024");
        assert_eq!(resolve_size(" Landscape (16:9) ", &sizes), "1792x1024");
        assert_eq!(resolve_size("512x512", &sizes), "512x512");
        assert_eq!(resolve_size("huge", &sizes), "huge");
    }

    #[test]
    fn test_label_lookup_takes_precedence() {
        let mut sizes = catalog();
        sizes.insert("512x512", "256x256");
        assert_eq!(resolve_size("512x512", &sizes), "256x256");
    }

    #[test]
    fn test_empty_record_style_uses_default() {
        let record = PromptRecord::new("a boat", "  ", "Portrait (9:16)");
        let request = compose_request(&record, "anime", &catalog());
        assert_eq!(request.final_prompt, "a boat, anime");
        assert_eq!(request.size, "1024x1792");
    }

    #[test]
    fn test_empty_prompt_stays_empty() {
        let record = PromptRecord::new("   ", "anime", "Square (1:1)");
        let request = compose_request(&record, "anime", &catalog());
        assert_eq!(request.final_prompt, "");
        assert_eq!(request.size, "1024x1024");
    }

    #[test]
    fn test_compose_is_idempotent() {
        let composer = PromptComposer::new("ghibli", catalog());
        let record = PromptRecord::new("  a castle in the sky ", "ghibli", "Square (1:1)");
        let first = composer.compose(&record);
        let second = composer.compose(&record);
        assert_eq!(first, second);
        assert_eq!(first.final_prompt, "a castle in the sky, ghibli");
    }
}
