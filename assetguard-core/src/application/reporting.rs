// assetguard-core/src/application/reporting.rs

use serde::Serialize;
use std::collections::{BTreeMap, HashMap, HashSet};
use tracing::{debug, instrument};

use crate::domain::error::DomainError;
pub use crate::domain::finding::FINDING_COLUMNS;
use crate::domain::finding::{Finding, Severity};
use crate::domain::table::{Table, Value};
use crate::ports::execution::ExecutionEvent;

pub const SUMMARY_COLUMNS: [&str; 3] = ["check_id", "severity", "count"];

/// Everything a run produced, ready for display or export.
#[derive(Debug, Clone, Serialize)]
pub struct VerificationReport {
    pub findings: Vec<Finding>,
    /// Findings joined onto the reference attributes of their subjects.
    #[serde(skip)]
    pub output: Table,
    #[serde(skip)]
    pub summary: Table,
    pub executions: Vec<ExecutionEvent>,
}

impl VerificationReport {
    pub fn has_errors(&self) -> bool {
        self.findings
            .iter()
            .any(|f| f.severity() == Severity::Error)
    }
}

/// Flattens findings into a table with the [`FINDING_COLUMNS`] header.
pub fn findings_to_table(findings: &[Finding]) -> Table {
    let mut columns: Vec<(String, Vec<Value>)> = FINDING_COLUMNS
        .iter()
        .map(|name| (name.to_string(), Vec::with_capacity(findings.len())))
        .collect();

    for f in findings {
        let cells = [
            Value::from(f.subject_id()),
            Value::from(f.check_id()),
            Value::from(f.severity().as_str()),
            Value::from(f.message()),
            Value::from(f.field()),
            Value::from(f.current_value()),
            Value::from(f.expected()),
        ];
        for ((_, values), cell) in columns.iter_mut().zip(cells) {
            values.push(cell);
        }
    }

    // The header is fixed and every column has the same length.
    Table::from_columns(columns).unwrap_or_default()
}

fn join_key(value: &Value) -> Option<String> {
    value.to_text().map(|s| s.trim().to_string())
}

/// Left-joins findings onto a reference table by subject id.
///
/// The output has `reference_columns` first, then every column of `findings`
/// unchanged, and exactly one row per finding. The reference table is deduplicated
/// on `id_column`, keeping the first occurrence. Findings with no matching subject
/// (dataset-level ones included) get nulls in the reference columns.
///
/// Reference columns must be distinct and must not reuse a findings column name.
#[instrument(skip_all, fields(findings = findings.row_count(), reference = reference.row_count()))]
pub fn enrich<S: AsRef<str>>(
    findings: &Table,
    reference: &Table,
    id_column: &str,
    reference_columns: &[S],
) -> Result<Table, DomainError> {
    let subjects = findings
        .column("subject_id")
        .ok_or_else(|| DomainError::MissingReportColumn("subject_id".to_string()))?;
    let mut seen: HashSet<&str> = HashSet::new();
    for name in reference_columns {
        let name = name.as_ref();
        if findings.has_column(name) || !seen.insert(name) {
            return Err(DomainError::ReferenceColumnClash(name.to_string()));
        }
    }
    let ids = reference
        .column(id_column)
        .ok_or_else(|| DomainError::MissingReferenceColumn(id_column.to_string()))?;
    let wanted = reference_columns
        .iter()
        .map(|name| {
            reference
                .column(name.as_ref())
                .ok_or_else(|| DomainError::MissingReferenceColumn(name.as_ref().to_string()))
        })
        .collect::<Result<Vec<_>, _>>()?;

    let mut index: HashMap<String, usize> = HashMap::new();
    for (row, value) in ids.values().iter().enumerate() {
        if let Some(key) = join_key(value) {
            index.entry(key).or_insert(row);
        }
    }
    debug!(distinct_ids = index.len(), "Reference table indexed");

    let matches: Vec<Option<usize>> = subjects
        .values()
        .iter()
        .map(|subject| join_key(subject).and_then(|key| index.get(&key).copied()))
        .collect();

    let mut columns: Vec<(String, Vec<Value>)> = Vec::with_capacity(wanted.len() + findings.columns().len());
    for column in wanted {
        let values = if column.name() == id_column {
            subjects
                .values()
                .iter()
                .zip(&matches)
                .map(|(subject, hit)| match hit {
                    Some(_) => subject.clone(),
                    None => Value::Null,
                })
                .collect()
        } else {
            matches
                .iter()
                .map(|hit| hit.map_or(Value::Null, |row| column.get(row).clone()))
                .collect()
        };
        columns.push((column.name().to_string(), values));
    }
    for column in findings.columns() {
        columns.push((column.name().to_string(), column.values().to_vec()));
    }

    Table::from_columns(columns)
}

/// Counts rows per (check id, severity), sorted by check id then severity.
pub fn summarize(table: &Table) -> Result<Table, DomainError> {
    for name in ["check_id", "severity"] {
        if !table.has_column(name) {
            return Err(DomainError::MissingReportColumn(name.to_string()));
        }
    }

    let mut groups: BTreeMap<(String, String), i64> = BTreeMap::new();
    for row in table.rows() {
        let key = (
            row.get("check_id").and_then(Value::to_text).unwrap_or_default(),
            row.get("severity").and_then(Value::to_text).unwrap_or_default(),
        );
        *groups.entry(key).or_insert(0) += 1;
    }

    let rows = groups
        .into_iter()
        .map(|((check_id, severity), count)| {
            vec![Value::from(check_id), Value::from(severity), Value::from(count)]
        })
        .collect();
    Table::from_rows(SUMMARY_COLUMNS, rows)
}
