// assetguard-core/src/infrastructure/config/data_dir.rs

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::infrastructure::error::InfrastructureError;

/// Table name for a data file: its upper-cased stem (`data/cablenod.csv` -> `CABLENOD`).
pub fn table_name_for(path: &Path) -> Option<String> {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().trim().to_uppercase())
        .filter(|name| !name.is_empty())
}

/// Every `*.csv` file below `data_dir`, keyed by table name.
///
/// Files are visited in path order; when two files map to the same name the first
/// one is kept.
pub fn discover_csv_tables(data_dir: &Path) -> Result<BTreeMap<String, PathBuf>, InfrastructureError> {
    if !data_dir.is_dir() {
        return Err(InfrastructureError::ConfigError(format!(
            "Data directory {:?} does not exist",
            data_dir
        )));
    }

    let mut found = BTreeMap::new();
    let walker = WalkDir::new(data_dir).follow_links(true).sort_by_file_name();
    for entry in walker {
        let entry = entry.map_err(|e| {
            warn!(error = %e, "Data directory walk failed");
            InfrastructureError::Io(e.into())
        })?;
        let path = entry.path();
        let is_csv = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));
        if !path.is_file() || !is_csv {
            continue;
        }
        let Some(name) = table_name_for(path) else {
            continue;
        };
        if let Some(kept) = found.get(&name) {
            warn!(table = %name, kept = ?kept, ignored = ?path, "Two data files map to the same table");
            continue;
        }
        debug!(table = %name, path = ?path, "Data file discovered");
        found.insert(name, path.to_path_buf());
    }
    Ok(found)
}
