// assetguard-core/src/domain/check/mod.rs
//
// The check abstraction shared by every rule in `domain::checks`.

pub mod params;
pub mod registry;

pub use params::CheckParams;
pub use registry::{CheckDescriptor, CheckFactory, CheckRegistry, discover};

use crate::domain::error::DomainError;
use crate::domain::finding::{Finding, Severity, UNKNOWN_SUBJECT};
use crate::domain::table::{Table, Tables, Value};

/// Identity of a check variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CheckMetadata {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub severity_default: Severity,
}

/// A validation rule over a set of named tables.
///
/// Missing tables or columns are reported as a single dataset-level [`Finding`] and
/// never as an `Err`. The error channel is for faults inside the check itself.
/// An empty vector means the data passed.
pub trait Check: Send + Sync {
    fn metadata(&self) -> &'static CheckMetadata;

    fn run(&self, tables: &Tables) -> Result<Vec<Finding>, DomainError>;

    fn id(&self) -> &'static str {
        self.metadata().id
    }
}

/// Looks up a required table, or builds the `Missing table` finding.
pub fn require_table<'t>(
    tables: &'t Tables,
    check_id: &str,
    name: &str,
) -> Result<&'t Table, Finding> {
    tables
        .get(name)
        .ok_or_else(|| Finding::dataset(check_id, format!("Missing table: {}", name), name))
}

/// One finding naming every missing column: `"{label}: A, B"`.
pub fn missing_columns(check_id: &str, label: &str, missing: &[&str]) -> Finding {
    Finding::dataset(
        check_id,
        format!("{}: {}", label, missing.join(", ")),
        missing.join(","),
    )
}

/// Subject id of a row from its identifier cell.
pub fn subject_of(value: Option<&Value>) -> String {
    value
        .and_then(Value::to_text)
        .map(|s| s.trim().to_string())
        .unwrap_or_else(|| UNKNOWN_SUBJECT.to_string())
}
