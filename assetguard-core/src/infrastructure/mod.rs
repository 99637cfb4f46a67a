// assetguard-core/src/infrastructure/mod.rs

pub mod adapters;
pub mod compiler;
pub mod config;
pub mod error;
pub mod fs;
pub mod reporting;

pub use adapters::DuckDbSource;
pub use config::load_project_config;
pub use reporting::{CsvExecutionLog, JsonReportExporter};
