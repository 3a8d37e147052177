pub mod image_client;
pub mod mail_client;

pub use image_client::{ImageClient, ImageGenerator};
pub use mail_client::SmtpMailer;
