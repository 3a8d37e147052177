pub mod artifact;
pub mod batch;
pub mod catalog;
pub mod loaders;
pub mod prompt;

pub use artifact::{artifact_file_name, GeneratedImage};
pub use batch::{BatchResult, RowFailure, RowOutcome, RowStage};
pub use catalog::{SizeCatalog, AVAILABLE_SIZES, AVAILABLE_STYLES};
pub use loaders::{load_prompt_table, parse_rows};
pub use prompt::{PromptDefaults, PromptRecord, ResolvedRequest};
