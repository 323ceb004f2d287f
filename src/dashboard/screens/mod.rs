//! Dashboard pages

pub mod api_config;
pub mod records;
pub mod templates;

pub use api_config::ApiConfigScreen;
pub use records::{RecordDetail, RecordsScreen};
pub use templates::TemplatesScreen;
