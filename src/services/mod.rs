pub mod artifact_writer;
pub mod delivery_service;
pub mod packager;
pub mod prompt_composer;
pub mod run_log;

pub use artifact_writer::ArtifactWriter;
pub use delivery_service::{
    parse_recipients, DeliveryReport, DeliveryService, EmailJob, MailTransport, RecipientOutcome,
};
pub use packager::{package_batch, Package};
pub use prompt_composer::{compose_request, PromptComposer};
pub use run_log::{RunLog, LOG_FILE_NAME};
