// assetguard-core/src/infrastructure/adapters/duckdb.rs

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate};
use duckdb::types::{TimeUnit, Value as DuckValue};
use duckdb::{Config, Connection};
use std::collections::BTreeSet;
use std::path::Path;
use std::sync::{Arc, Mutex};
use tracing::{debug, info, instrument};

use crate::domain::project::ProjectConfig;
use crate::domain::table::{Table, Value};
use crate::error::AssetGuardError;
use crate::infrastructure::compiler::{QueryRenderer, ensure_read_only};
use crate::infrastructure::config::discover_csv_tables;
use crate::infrastructure::error::{DatabaseError, InfrastructureError};
use crate::ports::source::TableSource;

// Days from 0001-01-01 (CE day 1) to 1970-01-01.
const UNIX_EPOCH_CE_DAYS: i32 = 719_163;

/// Serves each registered table as a DuckDB view.
pub struct DuckDbSource {
    conn: Arc<Mutex<Connection>>,
    tables: BTreeSet<String>,
}

fn quote_identifier(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

fn quote_literal(text: &str) -> String {
    format!("'{}'", text.replace('\'', "''"))
}

impl DuckDbSource {
    pub fn open(db_path: &str) -> Result<Self, InfrastructureError> {
        let config = Config::default();
        let conn = if db_path == ":memory:" {
            Connection::open_in_memory_with_flags(config)?
        } else {
            Connection::open_with_flags(db_path, config)?
        };
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
            tables: BTreeSet::new(),
        })
    }

    /// Opens the project database and registers data-dir files, then the `tables` entries.
    ///
    /// Explicit entries replace data-dir tables of the same name.
    #[instrument(skip_all, fields(project = %config.name))]
    pub fn from_project(project_dir: &Path, config: &ProjectConfig) -> Result<Self, InfrastructureError> {
        let mut source = if config.database == ":memory:" {
            Self::open(&config.database)?
        } else {
            Self::open(&project_dir.join(&config.database).to_string_lossy())?
        };

        if let Some(data_dir) = &config.data_dir {
            for (name, path) in discover_csv_tables(&project_dir.join(data_dir))? {
                source.register_csv(&name, &path)?;
            }
        }

        let renderer = QueryRenderer::new(&config.vars);
        for (name, table) in &config.tables {
            match (&table.csv, &table.query) {
                (Some(csv), None) => source.register_csv(name, &project_dir.join(csv))?,
                (None, Some(template)) => {
                    let sql = renderer.render(template)?;
                    ensure_read_only(name, &sql)?;
                    source.register_query(name, &sql)?;
                }
                _ => {
                    return Err(InfrastructureError::ConfigError(format!(
                        "Table '{}' needs exactly one of `csv` or `query`",
                        name
                    )));
                }
            }
        }

        info!(tables = source.tables.len(), "Sources registered");
        Ok(source)
    }

    fn execute(&self, sql: &str) -> Result<(), InfrastructureError> {
        let conn = self.conn.lock().map_err(|_| DatabaseError::Poisoned)?;
        conn.execute_batch(sql)?;
        Ok(())
    }

    pub fn register_csv(&mut self, name: &str, path: &Path) -> Result<(), InfrastructureError> {
        if !path.is_file() {
            return Err(InfrastructureError::ConfigError(format!(
                "CSV file for table '{}' not found at {:?}",
                name, path
            )));
        }
        // Text only: type sniffing would turn ids like `007` into integers.
        let sql = format!(
            "CREATE OR REPLACE VIEW {} AS SELECT * FROM read_csv_auto({}, header = true, all_varchar = true)",
            quote_identifier(name),
            quote_literal(&path.to_string_lossy())
        );
        self.execute(&sql)?;
        debug!(table = %name, path = ?path, "CSV view registered");
        self.tables.insert(name.to_string());
        Ok(())
    }

    /// `sql` must already be rendered and checked read-only.
    pub fn register_query(&mut self, name: &str, sql: &str) -> Result<(), InfrastructureError> {
        let sql = sql.trim().trim_end_matches(';');
        self.execute(&format!(
            "CREATE OR REPLACE VIEW {} AS {}",
            quote_identifier(name),
            sql
        ))?;
        debug!(table = %name, "Query view registered");
        self.tables.insert(name.to_string());
        Ok(())
    }
}

fn convert(value: DuckValue) -> Value {
    match value {
        DuckValue::Null => Value::Null,
        DuckValue::Boolean(b) => Value::Boolean(b),
        DuckValue::TinyInt(i) => Value::Integer(i64::from(i)),
        DuckValue::SmallInt(i) => Value::Integer(i64::from(i)),
        DuckValue::Int(i) => Value::Integer(i64::from(i)),
        DuckValue::BigInt(i) => Value::Integer(i),
        DuckValue::UTinyInt(i) => Value::Integer(i64::from(i)),
        DuckValue::USmallInt(i) => Value::Integer(i64::from(i)),
        DuckValue::UInt(i) => Value::Integer(i64::from(i)),
        DuckValue::UBigInt(i) => i64::try_from(i).map_or(Value::Float(i as f64), Value::Integer),
        DuckValue::HugeInt(i) => i64::try_from(i).map_or(Value::Text(i.to_string()), Value::Integer),
        DuckValue::Float(x) => Value::Float(f64::from(x)),
        DuckValue::Double(x) => Value::Float(x),
        DuckValue::Text(s) => Value::Text(s),
        DuckValue::Enum(s) => Value::Text(s),
        DuckValue::Date32(days) => days
            .checked_add(UNIX_EPOCH_CE_DAYS)
            .and_then(NaiveDate::from_num_days_from_ce_opt)
            .map_or(Value::Null, Value::Date),
        DuckValue::Timestamp(unit, raw) => {
            let micros = match unit {
                TimeUnit::Second => raw.saturating_mul(1_000_000),
                TimeUnit::Millisecond => raw.saturating_mul(1_000),
                TimeUnit::Microsecond => raw,
                TimeUnit::Nanosecond => raw / 1_000,
            };
            DateTime::from_timestamp_micros(micros)
                .map_or(Value::Null, |dt| Value::Timestamp(dt.naive_utc()))
        }
        other => Value::Text(format!("{:?}", other)),
    }
}

fn read_view(conn: &Mutex<Connection>, name: &str) -> Result<Table, AssetGuardError> {
    let conn = conn
        .lock()
        .map_err(|_| InfrastructureError::from(DatabaseError::Poisoned))?;

    let columns = fetch_column_names(&conn, name).map_err(InfrastructureError::from)?;
    let rows = fetch_rows(&conn, name, columns.len()).map_err(InfrastructureError::from)?;
    Ok(Table::from_rows(columns, rows)?)
}

fn fetch_column_names(conn: &Connection, name: &str) -> Result<Vec<String>, duckdb::Error> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({})", quote_literal(name)))?;
    let names = stmt.query_map([], |row| row.get::<_, String>("name"))?;
    names.collect()
}

fn fetch_rows(conn: &Connection, name: &str, width: usize) -> Result<Vec<Vec<Value>>, duckdb::Error> {
    let mut stmt = conn.prepare(&format!("SELECT * FROM {}", quote_identifier(name)))?;
    let mut rows = stmt.query([])?;
    let mut out = Vec::new();
    while let Some(row) = rows.next()? {
        let mut values = Vec::with_capacity(width);
        for i in 0..width {
            values.push(convert(row.get::<_, DuckValue>(i)?));
        }
        out.push(values);
    }
    Ok(out)
}

#[async_trait]
impl TableSource for DuckDbSource {
    async fn table_names(&self) -> Result<Vec<String>, AssetGuardError> {
        Ok(self.tables.iter().cloned().collect())
    }

    async fn load_table(&self, name: &str) -> Result<Table, AssetGuardError> {
        if !self.tables.contains(name) {
            return Err(InfrastructureError::UnknownTable(name.to_string()).into());
        }
        let conn = Arc::clone(&self.conn);
        let view = name.to_string();
        tokio::task::spawn_blocking(move || read_view(&conn, &view))
            .await
            .map_err(|e| AssetGuardError::InternalError(format!("DuckDB read task failed: {}", e)))?
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::domain::check::Check;
    use crate::domain::checks::ServiceOwnRequiresLinkCheck;
    use crate::domain::project::TableConfig;
    use crate::ports::source::load_tables;
    use anyhow::Result;
    use std::fs;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_csv_view_is_materialized_as_text() -> Result<()> {
        let dir = tempdir()?;
        let csv = dir.path().join("assets.csv");
        fs::write(
            &csv,
            "UNITID,UNITNO,STREET,INSTALLDATE,RATING\nU1,A-001,Main St,2020-01-01,11\nU2,,King St,2035-06-30,33\n",
        )?;

        let mut source = DuckDbSource::open(":memory:")?;
        source.register_csv("ASSETS", &csv)?;
        assert_eq!(source.table_names().await?, vec!["ASSETS"]);

        let table = source.load_table("ASSETS").await?;
        assert_eq!(
            table.column_names(),
            vec!["UNITID", "UNITNO", "STREET", "INSTALLDATE", "RATING"]
        );
        assert_eq!(table.row_count(), 2);

        let rows: Vec<_> = table.rows().collect();
        assert_eq!(rows[0].get("UNITID"), Some(&Value::from("U1")));
        assert!(rows[1].get("UNITNO").unwrap().is_blank());
        assert_eq!(
            rows[1].get("INSTALLDATE").unwrap().to_date(),
            NaiveDate::from_ymd_opt(2035, 6, 30)
        );
        assert_eq!(rows[0].get("RATING"), Some(&Value::from("11")));
        Ok(())
    }

    #[tokio::test]
    async fn test_zero_padded_ids_keep_their_text() -> Result<()> {
        let dir = tempdir()?;
        let assets = dir.path().join("assets.csv");
        let cablenod = dir.path().join("cablenod.csv");
        fs::write(&assets, "UNITID,SERVICEOWN\n007,PL UG\n012,PL UG\n")?;
        fs::write(&cablenod, "LINK_ID\n007\nX9\n")?;

        let mut source = DuckDbSource::open(":memory:")?;
        source.register_csv("ASSETS", &assets)?;
        source.register_csv("CABLENOD", &cablenod)?;
        let tables = load_tables(&source).await?;

        let ids: Vec<_> = tables.get("ASSETS").unwrap().rows().map(|r| r.get("UNITID").cloned()).collect();
        assert_eq!(ids, vec![Some(Value::from("007")), Some(Value::from("012"))]);

        let check = ServiceOwnRequiresLinkCheck::default();
        let findings = check.run(&tables)?;
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].subject_id(), "012");
        Ok(())
    }

    #[tokio::test]
    async fn test_project_query_tables_are_rendered() -> Result<()> {
        let dir = tempdir()?;
        fs::create_dir_all(dir.path().join("data"))?;
        fs::write(
            dir.path().join("data").join("assets.csv"),
            "UNITID,SERVICEOWN\nU1,PL UG\nU2,DNO\nU3,PL UG\n",
        )?;

        let mut config = ProjectConfig::new("p");
        config.data_dir = Some("data".into());
        config
            .vars
            .insert("owner".into(), serde_yaml::Value::String("PL UG".into()));
        config.tables.insert(
            "PLUG_ASSETS".into(),
            TableConfig {
                csv: None,
                query: Some("SELECT UNITID FROM ASSETS WHERE SERVICEOWN = '{{ owner }}'".into()),
            },
        );

        let source = DuckDbSource::from_project(dir.path(), &config)?;
        let tables = load_tables(&source).await?;
        assert_eq!(tables.names().collect::<Vec<_>>(), vec!["ASSETS", "PLUG_ASSETS"]);
        assert_eq!(tables.get("PLUG_ASSETS").unwrap().row_count(), 2);
        Ok(())
    }

    #[test]
    fn test_mutating_query_is_refused() {
        let dir = tempdir().unwrap();
        let mut config = ProjectConfig::new("p");
        config.tables.insert(
            "ASSETS".into(),
            TableConfig {
                csv: None,
                query: Some("DROP TABLE anything".into()),
            },
        );
        let res = DuckDbSource::from_project(dir.path(), &config);
        assert!(matches!(res, Err(InfrastructureError::UnsafeQuery { .. })));
    }

    #[tokio::test]
    async fn test_unknown_table() -> Result<()> {
        let source = DuckDbSource::open(":memory:")?;
        let res = source.load_table("ASSETS").await;
        assert!(matches!(
            res,
            Err(AssetGuardError::Infrastructure(InfrastructureError::UnknownTable(_)))
        ));
        Ok(())
    }

    #[test]
    fn test_missing_csv_file() -> Result<()> {
        let mut source = DuckDbSource::open(":memory:")?;
        let res = source.register_csv("ASSETS", Path::new("/nope/assets.csv"));
        assert!(matches!(res, Err(InfrastructureError::ConfigError(_))));
        Ok(())
    }

    #[test]
    fn test_date_conversion() {
        assert_eq!(
            convert(DuckValue::Date32(0)),
            Value::Date(NaiveDate::from_ymd_opt(1970, 1, 1).unwrap())
        );
        assert_eq!(convert(DuckValue::Int(7)), Value::Integer(7));
        assert_eq!(convert(DuckValue::Null), Value::Null);
    }
}
