// assetguard-core/src/application/mod.rs

pub mod engine;
pub mod pipeline;
pub mod ports;
pub mod reporting;

// --- RE-EXPORTS (FACADE PATTERN) ---
// Lets the CLI write `use assetguard_core::application::{CheckEngine, run_verification};`
// without knowing the file layout.

pub use engine::CheckEngine;
pub use pipeline::{check_source_contract, export_report, run_verification};
pub use ports::ReportExporter;
pub use reporting::{
    FINDING_COLUMNS, SUMMARY_COLUMNS, VerificationReport, enrich, findings_to_table, summarize,
};
