pub mod sheet_loader;

pub use sheet_loader::{load_prompt_table, normalize_header, parse_rows};
