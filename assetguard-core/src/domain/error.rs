// assetguard-core/src/domain/error.rs

use miette::Diagnostic;
use thiserror::Error;

#[derive(Error, Debug, Diagnostic)]
pub enum DomainError {
    #[error("Duplicate check id '{0}' in registry")]
    #[diagnostic(
        code(assetguard::domain::duplicate_check),
        help("Every check variant must declare a unique check_id.")
    )]
    DuplicateCheck(String),

    #[error("Invalid configuration for check '{check_id}': {message}")]
    #[diagnostic(
        code(assetguard::domain::check_config),
        help("Check the `checks:` section of your project file.")
    )]
    InvalidCheckConfig { check_id: String, message: String },

    #[error("{table} source must return column '{column}'")]
    #[diagnostic(
        code(assetguard::domain::source_contract),
        help("Add the column to the table's query or CSV file.")
    )]
    SourceContract { table: String, column: String },

    #[error("Primary table '{0}' was not loaded")]
    #[diagnostic(code(assetguard::domain::primary_table))]
    MissingPrimaryTable(String),

    #[error("Reference column '{0}' not found")]
    #[diagnostic(code(assetguard::domain::reference_column))]
    MissingReferenceColumn(String),

    #[error("Reference column '{0}' is listed twice or shadows a findings column")]
    #[diagnostic(
        code(assetguard::domain::reference_column_clash),
        help("Reference columns must be distinct and must not reuse a findings column name such as 'severity'.")
    )]
    ReferenceColumnClash(String),

    #[error("Findings table has no '{0}' column")]
    #[diagnostic(
        code(assetguard::domain::report_column),
        help("Pass a table built by `findings_to_table` or `enrich`.")
    )]
    MissingReportColumn(String),

    #[error("Column '{column}' has {actual} values, expected {expected}")]
    #[diagnostic(code(assetguard::domain::table_shape))]
    RaggedTable {
        column: String,
        expected: usize,
        actual: usize,
    },

    #[error("Duplicate column '{0}'")]
    #[diagnostic(code(assetguard::domain::table_shape))]
    DuplicateColumn(String),

    #[error("Row has {actual} values, table has {expected} columns")]
    #[diagnostic(code(assetguard::domain::table_shape))]
    RowArity { expected: usize, actual: usize },

    #[error("Evaluation failed: {0}")]
    #[diagnostic(code(assetguard::domain::evaluation))]
    Evaluation(String),
}
