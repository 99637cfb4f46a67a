// assetguard-core/src/ports/source.rs

// What the verification core needs from a data source, without knowing how the
// rows are fetched (DuckDB views, CSV files, an in-memory fixture...).

use async_trait::async_trait;
use tracing::{debug, instrument};

use crate::domain::table::{Table, Tables};
use crate::error::AssetGuardError;
use crate::infrastructure::error::InfrastructureError;

#[async_trait]
pub trait TableSource: Send + Sync {
    /// Names of the tables this source can provide.
    async fn table_names(&self) -> Result<Vec<String>, AssetGuardError>;

    /// Materializes one table.
    async fn load_table(&self, name: &str) -> Result<Table, AssetGuardError>;
}

/// Loads every table the source exposes into a fresh [`Tables`].
#[instrument(skip(source))]
pub async fn load_tables(source: &dyn TableSource) -> Result<Tables, AssetGuardError> {
    let mut tables = Tables::new();
    for name in source.table_names().await? {
        let table = source.load_table(&name).await?;
        debug!(
            table = %name,
            rows = table.row_count(),
            cols = table.columns().len(),
            "Table loaded"
        );
        tables.insert(name, table);
    }
    Ok(tables)
}

// In-memory source, handy for tests and embedding.
#[async_trait]
impl TableSource for Tables {
    async fn table_names(&self) -> Result<Vec<String>, AssetGuardError> {
        Ok(self.names().map(str::to_string).collect())
    }

    async fn load_table(&self, name: &str) -> Result<Table, AssetGuardError> {
        self.get(name)
            .cloned()
            .ok_or_else(|| InfrastructureError::UnknownTable(name.to_string()).into())
    }
}
