use crate::error::LoadError;
use crate::models::catalog::SizeCatalog;
use crate::models::prompt::{PromptDefaults, PromptRecord};
use calamine::{open_workbook_auto, Data, Reader};
use std::path::Path;
use tracing::{debug, info};

const PROMPT_COLUMN: &str = "Prompt";
const STYLE_COLUMN: &str = "Style";
const SIZE_COLUMN: &str = "Size";

/// 从表格文件（xlsx/xls/ods）的第一个工作表加载提示词
///
/// 第一行为表头，之后每一行对应一个 `PromptRecord`。
pub fn load_prompt_table(
    path: &Path,
    defaults: &PromptDefaults,
    sizes: &SizeCatalog,
) -> Result<Vec<PromptRecord>, LoadError> {
    let path_str = path.display().to_string();
    info!("正在加载表格: {}", path_str);

    let mut workbook = open_workbook_auto(path).map_err(|source| LoadError::Open {
        path: path_str.clone(),
        source,
    })?;

    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| LoadError::NoWorksheet {
            path: path_str.clone(),
        })?
        .map_err(|source| LoadError::Open {
            path: path_str.clone(),
            source,
        })?;

    let rows: Vec<Vec<String>> = range
        .rows()
        .map(|row| row.iter().map(cell_to_string).collect())
        .collect();

    debug!("工作表共 {} 行（含表头）", rows.len());

    parse_rows(&rows, defaults, sizes)
}

/// 把字符串单元格转换为提示词记录
///
/// - 表头去空白并首字母大写后匹配
/// - 缺少 `Prompt` 列时整个表格无效
/// - `Style`/`Size` 为空时使用默认值（默认尺寸转换为 `WxH`）
/// - 提示词为空的行（包括整行空白）保留，由生成阶段报错，行号不变
pub fn parse_rows(
    rows: &[Vec<String>],
    defaults: &PromptDefaults,
    sizes: &SizeCatalog,
) -> Result<Vec<PromptRecord>, LoadError> {
    let Some((header, body)) = rows.split_first() else {
        return Err(LoadError::MissingColumn { found: Vec::new() });
    };

    let columns: Vec<String> = header.iter().map(|h| normalize_header(h)).collect();
    let column_index = |name: &str| columns.iter().position(|c| c == name);

    let prompt_col = column_index(PROMPT_COLUMN).ok_or_else(|| LoadError::MissingColumn {
        found: columns.iter().filter(|c| !c.is_empty()).cloned().collect(),
    })?;
    let style_col = column_index(STYLE_COLUMN);
    let size_col = column_index(SIZE_COLUMN);

    let default_size = defaults.size_dimensions(sizes);

    let records = body
        .iter()
        .map(|row| {
            let prompt = cell_at(row, Some(prompt_col)).unwrap_or_default();
            let style = cell_at(row, style_col).unwrap_or_else(|| defaults.style.clone());
            let size = cell_at(row, size_col).unwrap_or_else(|| default_size.clone());
            PromptRecord::new(prompt, style, size)
        })
        .collect();

    Ok(records)
}

/// 表头规范化：去空白，首字母大写，其余小写
pub fn normalize_header(header: &str) -> String {
    let mut chars = header.trim().chars();
    match chars.next() {
        Some(first) => {
            let rest = chars.as_str().to_lowercase();
            first.to_uppercase().chain(rest.chars()).collect()
        }
        None => String::new(),
    }
}

/// 取出非空单元格（已去空白）
fn cell_at(row: &[String], col: Option<usize>) -> Option<String> {
    col.and_then(|c| row.get(c))
        .map(|value| value.trim())
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

fn cell_to_string(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(cells: &[&str]) -> Vec<String> {
        cells.iter().map(|c| c.to_string()).collect()
    }

    fn defaults() -> PromptDefaults {
        PromptDefaults::new("cartoon", "Square (1:1)")
    }

    #[test]
    fn test_normalize_header() {
        assert_eq!(normalize_header("  PROMPT "), "Prompt");
        assert_eq!(normalize_header("style"), "Style");
        assert_eq!(normalize_header("sIZE"), "Size");
        assert_eq!(normalize_header("   "), "");
    }

    #[test]
    fn test_missing_prompt_column_is_fatal() {
        let rows = vec![row(&["Style", "Size"]), row(&["cinematic", "512x512"])];
        let err = parse_rows(&rows, &defaults(), &SizeCatalog::builtin()).unwrap_err();
        match err {
            LoadError::MissingColumn { found } => {
                assert_eq!(found, vec!["Style".to_string(), "Size".to_string()]);
            }
            other => panic!("意外的错误: {}", other),
        }
    }

    #[test]
    fn test_empty_table_is_missing_column() {
        let err = parse_rows(&[], &defaults(), &SizeCatalog::builtin()).unwrap_err();
        assert!(matches!(err, LoadError::MissingColumn { .. }));
    }

    #[test]
    fn test_defaults_fill_missing_columns() {
        let rows = vec![row(&[" prompt "]), row(&["a red fox"])];
        let records = parse_rows(&rows, &defaults(), &SizeCatalog::builtin()).unwrap();
        assert_eq!(
            records,
            vec![PromptRecord::new("a red fox", "cartoon", "1024x1024")]
        );
    }

    #[test]
    fn test_defaults_fill_empty_cells_only() {
        let rows = vec![
            row(&["Prompt", "STYLE", "size"]),
            row(&["a cat", "anime", "Portrait (9:16)"]),
            row(&["a dog", "", "  "]),
            row(&["a bird", "ghibli"]),
        ];
        let records = parse_rows(&rows, &defaults(), &SizeCatalog::builtin()).unwrap();
        assert_eq!(records.len(), 3);
        assert_eq!(records[0], PromptRecord::new("a cat", "anime", "Portrait (9:16)"));
        assert_eq!(records[1], PromptRecord::new("a dog", "cartoon", "1024x1024"));
        assert_eq!(records[2], PromptRecord::new("a bird", "ghibli", "1024x1024"));
    }

    #[test]
    fn test_empty_prompt_rows_are_kept() {
        let rows = vec![
            row(&["Prompt", "Style"]),
            row(&["  ", "anime"]),
            row(&["", ""]),
            row(&["a tree", ""]),
        ];
        let records = parse_rows(&rows, &defaults(), &SizeCatalog::builtin()).unwrap();
        assert_eq!(records.len(), 3);
        assert_eq!(records[0], PromptRecord::new("", "anime", "1024x1024"));
        assert_eq!(records[1], PromptRecord::new("", "cartoon", "1024x1024"));
        assert_eq!(records[2].prompt, "a tree");
    }

    #[test]
    fn test_load_missing_file_fails() {
        let result = load_prompt_table(
            Path::new("does/not/exist.xlsx"),
            &defaults(),
            &SizeCatalog::builtin(),
        );
        assert!(matches!(result, Err(LoadError::Open { .. })));
    }

    fn fixture(name: &str) -> std::path::PathBuf {
        Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("tests")
            .join("fixtures")
            .join(name)
    }

    #[test]
    fn test_load_xlsx_workbook() {
        // 表头大小写混杂，数字/布尔单元格，第 4 行整行空白
        let records = load_prompt_table(
            &fixture("prompts.xlsx"),
            &defaults(),
            &SizeCatalog::builtin(),
        )
        .unwrap();

        assert_eq!(
            records,
            vec![
                PromptRecord::new("a red fox", "anime", "Landscape (16:9)"),
                PromptRecord::new("42", "cartoon", "512x512"),
                PromptRecord::new("", "cartoon", "1024x1024"),
                PromptRecord::new("true", "cartoon", "1024x1024"),
            ]
        );
    }

    #[test]
    fn test_workbook_without_sheets() {
        let result = load_prompt_table(
            &fixture("no_sheets.xlsx"),
            &defaults(),
            &SizeCatalog::builtin(),
        );
        assert!(matches!(result, Err(LoadError::NoWorksheet { .. })));
    }

    #[test]
    fn test_cell_to_string() {
        assert_eq!(cell_to_string(&Data::Empty), "");
        assert_eq!(cell_to_string(&Data::String("a fox".to_string())), "a fox");
        assert_eq!(cell_to_string(&Data::Float(42.0)), "42");
        assert_eq!(cell_to_string(&Data::Int(7)), "7");
        assert_eq!(cell_to_string(&Data::Bool(true)), "true");
    }
}
