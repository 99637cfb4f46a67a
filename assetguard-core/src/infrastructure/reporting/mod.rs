pub mod csv_log;
pub mod json;

pub use csv_log::CsvExecutionLog;
pub use json::JsonReportExporter;
