// assetguard-core/src/infrastructure/reporting/csv_log.rs

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::AssetGuardError;
use crate::infrastructure::error::InfrastructureError;
use crate::ports::execution::{ExecutionEvent, ExecutionSink};

pub const LOG_HEADER: &str = "DateTime,CheckID,ItemsReturned";
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Append-only CSV audit trail with one row per executed check.
#[derive(Debug, Clone)]
pub struct CsvExecutionLog {
    path: PathBuf,
}

fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

impl CsvExecutionLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn append(&self, event: &ExecutionEvent) -> Result<(), InfrastructureError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        // The header goes in only when this call creates the file.
        let fresh = !self.path.exists();
        let mut file = OpenOptions::new().create(true).append(true).open(&self.path)?;
        let mut line = String::new();
        if fresh {
            line.push_str(LOG_HEADER);
            line.push('\n');
        }
        line.push_str(&format!(
            "{},{},{}\n",
            event.executed_at.format(TIMESTAMP_FORMAT),
            csv_field(&event.check_id),
            event.findings_count
        ));
        file.write_all(line.as_bytes())?;
        Ok(())
    }
}

impl ExecutionSink for CsvExecutionLog {
    fn record(&mut self, event: &ExecutionEvent) -> Result<(), AssetGuardError> {
        self.append(event)?;
        debug!(path = ?self.path, check_id = %event.check_id, "Execution logged");
        Ok(())
    }
}
