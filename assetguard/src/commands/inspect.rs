// assetguard/src/commands/inspect.rs
//
// USE CASE: Inspect a table as the checks will see it (columns + sample rows).

use anyhow::Context;
use std::path::PathBuf;

use assetguard_core::infrastructure::{DuckDbSource, load_project_config};
use assetguard_core::ports::TableSource;

use super::grid;

pub async fn execute(project_dir: PathBuf, table: String, limit: usize) -> anyhow::Result<()> {
    let config = load_project_config(&project_dir).with_context(|| {
        format!("Failed to load project configuration from {:?}", project_dir)
    })?;
    let source = DuckDbSource::from_project(&project_dir, &config)
        .context("Failed to register project tables")?;

    let known = source.table_names().await?;
    if !known.contains(&table) {
        anyhow::bail!(
            "❌ Table '{}' not found. Available: {}",
            table,
            known.join(", ")
        );
    }

    let loaded = source.load_table(&table).await?;
    println!("\n🔍 Inspecting Table: '{}'", table);
    println!("   Columns: [{}]", loaded.column_names().join(", "));
    println!("   Rows: {} (showing up to {})", loaded.row_count(), limit);
    println!("{}", grid(&loaded, limit));
    Ok(())
}
