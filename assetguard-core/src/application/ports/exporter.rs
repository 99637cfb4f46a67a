use std::path::Path;

use crate::application::reporting::VerificationReport;
use crate::error::AssetGuardError;

/// Writes a finished report somewhere durable (JSON file, spreadsheet...).
pub trait ReportExporter: Send + Sync {
    fn export(&self, report: &VerificationReport, path: &Path) -> Result<(), AssetGuardError>;
}
