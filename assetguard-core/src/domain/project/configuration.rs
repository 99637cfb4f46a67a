// assetguard-core/src/domain/project/configuration.rs

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use validator::{Validate, ValidationError};

use crate::domain::check::CheckParams;
use crate::domain::finding::FINDING_COLUMNS;

/// Where a table's rows come from. Exactly one of the two must be set.
#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct TableConfig {
    /// CSV file, relative to the project directory.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub csv: Option<String>,
    /// SQL template rendered with the project `vars`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, Clone, Validate)]
#[serde(rename_all = "kebab-case")]
pub struct ProjectConfig {
    #[validate(length(min = 1, message = "Project name cannot be empty"))]
    pub name: String,
    #[serde(default = "default_version")]
    pub version: String,

    /// DuckDB database file, or `:memory:`.
    #[serde(default = "default_database")]
    pub database: String,

    /// Every `*.csv` below this directory becomes a table named after its upper-cased stem.
    #[serde(default)]
    pub data_dir: Option<String>,

    #[validate(custom(function = "validate_table_sources"))]
    #[serde(default)]
    pub tables: BTreeMap<String, TableConfig>,

    #[serde(default)]
    pub vars: BTreeMap<String, serde_yaml::Value>,

    #[validate(length(min = 1))]
    #[serde(default = "default_primary_table")]
    pub primary_table: String,

    #[validate(length(min = 1))]
    #[serde(default = "default_identifier_column")]
    pub identifier_column: String,

    /// Columns the primary table must return before any check runs.
    #[serde(default = "default_contract_columns")]
    pub required_columns: Vec<String>,

    /// Primary-table columns joined onto findings in the report.
    #[validate(custom(function = "validate_reference_columns"))]
    #[serde(default = "default_contract_columns")]
    pub reference_columns: Vec<String>,

    /// Default check selection; empty runs everything.
    #[serde(default)]
    pub select: Vec<String>,

    #[serde(default)]
    pub checks: BTreeMap<String, CheckParams>,

    #[validate(length(min = 1))]
    #[serde(default = "default_execution_log")]
    pub execution_log: String,

    #[serde(default = "default_target_path")]
    pub target_path: String,
}

impl ProjectConfig {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: default_version(),
            database: default_database(),
            data_dir: None,
            tables: BTreeMap::new(),
            vars: BTreeMap::new(),
            primary_table: default_primary_table(),
            identifier_column: default_identifier_column(),
            required_columns: default_contract_columns(),
            reference_columns: default_contract_columns(),
            select: Vec::new(),
            checks: BTreeMap::new(),
            execution_log: default_execution_log(),
            target_path: default_target_path(),
        }
    }
}

fn validate_table_sources(tables: &BTreeMap<String, TableConfig>) -> Result<(), ValidationError> {
    for (name, table) in tables {
        if name.trim().is_empty() {
            return Err(ValidationError::new("empty_table_name")
                .with_message("Table names cannot be empty".into()));
        }
        if table.csv.is_some() == table.query.is_some() {
            return Err(ValidationError::new("table_source").with_message(
                format!("Table '{}' needs exactly one of `csv` or `query`", name).into(),
            ));
        }
    }
    Ok(())
}

fn validate_reference_columns(columns: &[String]) -> Result<(), ValidationError> {
    for (i, name) in columns.iter().enumerate() {
        if FINDING_COLUMNS.contains(&name.as_str()) {
            return Err(ValidationError::new("reference_column").with_message(
                format!("Reference column '{}' shadows a findings column", name).into(),
            ));
        }
        if columns[..i].contains(name) {
            return Err(ValidationError::new("reference_column")
                .with_message(format!("Reference column '{}' is listed twice", name).into()));
        }
    }
    Ok(())
}

fn default_version() -> String {
    "0.1.0".to_string()
}
fn default_database() -> String {
    ":memory:".to_string()
}
fn default_primary_table() -> String {
    "ASSETS".to_string()
}
fn default_identifier_column() -> String {
    "UNITID".to_string()
}
fn default_contract_columns() -> Vec<String> {
    vec!["UNITID".into(), "UNITNO".into(), "STREET".into()]
}
fn default_execution_log() -> String {
    "checks.csv".to_string()
}
fn default_target_path() -> String {
    "target".to_string()
}
