// assetguard-core/src/infrastructure/error.rs

use miette::Diagnostic;
use thiserror::Error;

#[derive(Error, Debug, Diagnostic)]
pub enum DatabaseError {
    #[error("DuckDB Engine Error: {0}")]
    #[diagnostic(
        code(assetguard::infra::database::duckdb),
        help("An error occurred inside the SQL engine.")
    )]
    DuckDB(#[from] duckdb::Error),

    #[error("Database connection lock poisoned")]
    #[diagnostic(code(assetguard::infra::database::lock))]
    Poisoned,
}

#[derive(Error, Debug, Diagnostic)]
pub enum InfrastructureError {
    // --- DATABASE (Abstracted) ---
    #[error(transparent)]
    #[diagnostic(transparent)]
    Database(#[from] DatabaseError),

    // --- FILESYSTEM (IO) ---
    #[error("File System Error: {0}")]
    #[diagnostic(
        code(assetguard::infra::io),
        help("Check file permissions or path validity.")
    )]
    Io(#[from] std::io::Error),

    // --- CONFIG / YAML ---
    #[error("YAML Parsing Error: {0}")]
    #[diagnostic(
        code(assetguard::infra::yaml),
        help("Check your YAML syntax (indentation, types).")
    )]
    YamlError(#[from] serde_yaml::Error),

    #[error("JSON Error: {0}")]
    #[diagnostic(code(assetguard::infra::json))]
    JsonError(#[from] serde_json::Error),

    #[error("Configuration Error: {0}")]
    #[diagnostic(code(assetguard::infra::config))]
    ConfigError(String),

    #[error("Project configuration not found at '{0}'")]
    #[diagnostic(code(assetguard::infra::config_missing))]
    ConfigNotFound(String),

    // --- TEMPLATING ---
    #[error("Template Rendering Error: {0}")]
    #[diagnostic(
        code(assetguard::infra::template),
        help("Check your Jinja syntax ({{ ... }}) and the `vars:` section.")
    )]
    TemplateError(#[from] minijinja::Error),

    // --- SQL ---
    #[error("SQL Parsing Error in '{table}': {message}")]
    #[diagnostic(code(assetguard::infra::sql_parse))]
    SqlParse { table: String, message: String },

    #[error("Query for '{table}' is not a read-only SELECT")]
    #[diagnostic(
        code(assetguard::infra::sql_readonly),
        help("Source queries may only read data; use a single SELECT statement.")
    )]
    UnsafeQuery { table: String },

    #[error("Unknown table '{0}'")]
    #[diagnostic(code(assetguard::infra::unknown_table))]
    UnknownTable(String),
}

// Manual implementation for shortcuts (e.g. `?` operator on duckdb calls)
impl From<duckdb::Error> for InfrastructureError {
    fn from(err: duckdb::Error) -> Self {
        InfrastructureError::Database(DatabaseError::DuckDB(err))
    }
}
