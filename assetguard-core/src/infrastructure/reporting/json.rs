// assetguard-core/src/infrastructure/reporting/json.rs

use serde_json::{Map, Value as Json, json};
use std::path::Path;

use crate::application::ports::ReportExporter;
use crate::application::reporting::VerificationReport;
use crate::domain::table::{Table, Value};
use crate::error::AssetGuardError;
use crate::infrastructure::error::InfrastructureError;
use crate::infrastructure::fs::atomic_write;

/// Writes `{"Findings": [...], "Summary": [...]}`, one object per table row.
#[derive(Debug, Default, Clone, Copy)]
pub struct JsonReportExporter;

fn cell_to_json(value: &Value) -> Json {
    match value {
        v if v.is_null() => Json::Null,
        Value::Integer(i) => json!(i),
        Value::Float(x) => json!(x),
        Value::Boolean(b) => json!(b),
        other => Json::String(other.to_string()),
    }
}

/// Rows of `table` as JSON objects keyed by column name.
pub fn table_to_json(table: &Table) -> Vec<Json> {
    table
        .rows()
        .map(|row| {
            let object: Map<String, Json> = table
                .column_names()
                .into_iter()
                .zip(row.values())
                .map(|(name, value)| (name.to_string(), cell_to_json(value)))
                .collect();
            Json::Object(object)
        })
        .collect()
}

impl JsonReportExporter {
    pub fn document(report: &VerificationReport) -> Json {
        // The summary section stays empty on a clean run.
        let summary = if report.findings.is_empty() {
            Vec::new()
        } else {
            table_to_json(&report.summary)
        };
        json!({
            "Findings": table_to_json(&report.output),
            "Summary": summary,
        })
    }
}

impl ReportExporter for JsonReportExporter {
    fn export(&self, report: &VerificationReport, path: &Path) -> Result<(), AssetGuardError> {
        let body = serde_json::to_string_pretty(&Self::document(report))
            .map_err(InfrastructureError::JsonError)?;
        atomic_write(path, body)?;
        Ok(())
    }
}
