//! 风格与尺寸目录
//!
//! 内置的可选风格列表，以及尺寸标签到像素尺寸（`WxH`）的映射表。

use phf::phf_ordered_map;
use regex::Regex;
use std::collections::BTreeMap;
use std::sync::LazyLock;

/// 可选风格
pub const AVAILABLE_STYLES: &[&str] = &[
    "cinematic",
    "realistic",
    "cartoon",
    "oil painting",
    "photograph",
    "digital art",
    "anime",
    "disney",
    "metro",
    "ghibli",
    "illustration",
];

/// 内置尺寸标签（按显示顺序）
pub static AVAILABLE_SIZES: phf::OrderedMap<&'static str, &'static str> = phf_ordered_map! {
    "Square (1:1)" => "1024x1024",
    "Portrait (9:16)" => "1024x1792",
    "Landscape (16:9)" => "1792x1024",
};

static DIMENSION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+x\d+$").expect("尺寸正则表达式无效"));

/// 是否为已知风格（忽略大小写）
pub fn is_known_style(style: &str) -> bool {
    let style = style.trim();
    AVAILABLE_STYLES.iter().any(|s| s.eq_ignore_ascii_case(style))
}

/// 是否为 `WxH` 形式的尺寸字符串
pub fn is_dimension_string(size: &str) -> bool {
    DIMENSION_RE.is_match(size.trim())
}

/// 尺寸目录
///
/// 保持插入顺序；同名标签后写入的覆盖先写入的。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SizeCatalog {
    entries: Vec<(String, String)>,
}

impl SizeCatalog {
    /// 内置的三种尺寸
    pub fn builtin() -> Self {
        Self {
            entries: AVAILABLE_SIZES
                .entries()
                .map(|(label, dims)| (label.to_string(), dims.to_string()))
                .collect(),
        }
    }

    /// 内置尺寸加上配置文件中的自定义标签
    pub fn with_extra(extra: &BTreeMap<String, String>) -> Self {
        let mut catalog = Self::builtin();
        for (label, dims) in extra {
            catalog.insert(label, dims);
        }
        catalog
    }

    /// 添加或覆盖一个标签
    pub fn insert(&mut self, label: &str, dims: &str) {
        let label = label.trim().to_string();
        let dims = dims.trim().to_string();
        match self.entries.iter_mut().find(|(l, _)| *l == label) {
            Some(entry) => entry.1 = dims,
            None => self.entries.push((label, dims)),
        }
    }

    /// 查找标签对应的尺寸
    pub fn dimensions(&self, label: &str) -> Option<&str> {
        let label = label.trim();
        self.entries
            .iter()
            .find(|(l, _)| l == label)
            .map(|(_, d)| d.as_str())
    }

    /// 所有标签
    pub fn labels(&self) -> Vec<String> {
        self.entries.iter().map(|(l, _)| l.clone()).collect()
    }
}

impl Default for SizeCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_sizes() {
        let catalog = SizeCatalog::builtin();
        assert_eq!(catalog.dimensions("Square (1:1)"), Some("1024x1024"));
        assert_eq!(catalog.dimensions("Portrait (9:16)"), Some("1024x1792"));
        assert_eq!(catalog.dimensions(" Landscape (16:9) "), Some("1792x1024"));
        assert_eq!(catalog.dimensions("512x512"), None);
        assert_eq!(
            catalog.labels(),
            vec!["Square (1:1)", "Portrait (9:16)", "Landscape (16:9)"]
        );
    }

    #[test]
    fn test_extra_sizes_override_and_append() {
        let mut extra = BTreeMap::new();
        extra.insert("Square (1:1)".to_string(), "512x512".to_string());
        extra.insert("Tiny".to_string(), "256x256".to_string());

        let catalog = SizeCatalog::with_extra(&extra);
        assert_eq!(catalog.dimensions("Square (1:1)"), Some("512x512"));
        assert_eq!(catalog.dimensions("Tiny"), Some("256x256"));
        assert_eq!(catalog.labels().len(), 4);
    }

    #[test]
    fn test_style_and_dimension_checks() {
        assert!(is_known_style("Cinematic"));
        assert!(is_known_style("oil painting"));
        assert!(!is_known_style("vaporwave"));

        assert!(is_dimension_string("1024x1024"));
        assert!(is_dimension_string(" 512x512 "));
        assert!(!is_dimension_string("Square (1:1)"));
        assert!(!is_dimension_string("1024 x 1024"));
    }
}
