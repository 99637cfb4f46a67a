// assetguard-core/src/domain/finding.rs

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Subject id of findings that describe the dataset rather than a row.
pub const DATASET_SUBJECT: &str = "(DATASET)";

/// Subject id used when a row's identifier is itself null.
pub const UNKNOWN_SUBJECT: &str = "(UNKNOWN)";

/// Header of every findings table, in order.
pub const FINDING_COLUMNS: [&str; 7] = [
    "subject_id",
    "check_id",
    "severity",
    "message",
    "field",
    "current_value",
    "expected",
];

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash, Clone, Copy)]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    Error,
    Warn,
    Info,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Error => "ERROR",
            Severity::Warn => "WARN",
            Severity::Info => "INFO",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Severity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "ERROR" => Ok(Severity::Error),
            "WARN" | "WARNING" => Ok(Severity::Warn),
            "INFO" => Ok(Severity::Info),
            other => Err(format!("Unknown severity: {}", other)),
        }
    }
}

/// A single issue reported by a check.
///
/// Fields are read-only once built; the `with_*` methods consume the value and are
/// only meant for construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Finding {
    subject_id: String,
    check_id: String,
    severity: Severity,
    message: String,
    field: Option<String>,
    current_value: Option<String>,
    expected: Option<String>,
}

impl Finding {
    pub fn new(
        subject_id: impl Into<String>,
        check_id: impl Into<String>,
        severity: Severity,
        message: impl Into<String>,
    ) -> Self {
        Self {
            subject_id: subject_id.into(),
            check_id: check_id.into(),
            severity,
            message: message.into(),
            field: None,
            current_value: None,
            expected: None,
        }
    }

    /// A structural problem (missing table or column). Always `ERROR`.
    pub fn dataset(
        check_id: impl Into<String>,
        message: impl Into<String>,
        field: impl Into<String>,
    ) -> Self {
        Self::new(DATASET_SUBJECT, check_id, Severity::Error, message).with_field(field)
    }

    pub fn with_field(mut self, field: impl Into<String>) -> Self {
        self.field = Some(field.into());
        self
    }

    pub fn with_current_value(mut self, value: Option<String>) -> Self {
        self.current_value = value;
        self
    }

    pub fn with_expected(mut self, expected: impl Into<String>) -> Self {
        self.expected = Some(expected.into());
        self
    }

    pub fn subject_id(&self) -> &str {
        &self.subject_id
    }

    pub fn check_id(&self) -> &str {
        &self.check_id
    }

    pub fn severity(&self) -> Severity {
        self.severity
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn field(&self) -> Option<&str> {
        self.field.as_deref()
    }

    pub fn current_value(&self) -> Option<&str> {
        self.current_value.as_deref()
    }

    pub fn expected(&self) -> Option<&str> {
        self.expected.as_deref()
    }

    pub fn is_dataset_level(&self) -> bool {
        self.subject_id == DATASET_SUBJECT
    }
}
