// assetguard-core/src/infrastructure/compiler/sql_guard.rs

use sqlparser::ast::Statement;
use sqlparser::dialect::GenericDialect;
use sqlparser::parser::Parser;
use tracing::debug;

use crate::infrastructure::error::InfrastructureError;

/// Accepts exactly one query statement (SELECT, WITH ... SELECT, set operations).
pub fn ensure_read_only(table: &str, sql: &str) -> Result<(), InfrastructureError> {
    let statements =
        Parser::parse_sql(&GenericDialect {}, sql).map_err(|e| InfrastructureError::SqlParse {
            table: table.to_string(),
            message: e.to_string(),
        })?;

    match statements.as_slice() {
        [Statement::Query(_)] => {
            debug!(table = %table, "Source query accepted");
            Ok(())
        }
        _ => Err(InfrastructureError::UnsafeQuery {
            table: table.to_string(),
        }),
    }
}
