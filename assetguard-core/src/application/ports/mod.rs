pub mod exporter;

pub use exporter::ReportExporter;
