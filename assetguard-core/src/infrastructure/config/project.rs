// assetguard-core/src/infrastructure/config/project.rs

use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, instrument, warn};
use validator::Validate;

use crate::domain::project::ProjectConfig;
use crate::infrastructure::error::InfrastructureError;

pub const CONFIG_FILE_NAMES: [&str; 2] = ["assetguard.yaml", "assetguard.yml"];

const ENV_DATABASE: &str = "ASSETGUARD_DATABASE";
const ENV_EXECUTION_LOG: &str = "ASSETGUARD_EXECUTION_LOG";
const ENV_TARGET_PATH: &str = "ASSETGUARD_TARGET_PATH";

/// Reads, overrides and validates the project file found in `project_dir`.
#[instrument]
pub fn load_project_config(project_dir: &Path) -> Result<ProjectConfig, InfrastructureError> {
    // 1. Discovery
    let config_path = find_config_file(project_dir)?;
    info!(path = ?config_path, "Loading project file");

    // 2. Base YAML
    let content = fs::read_to_string(&config_path)?;
    let mut config: ProjectConfig = serde_yaml::from_str(&content)?;

    // 3. Environment layer, e.g. ASSETGUARD_TARGET_PATH=/tmp/out assetguard run
    apply_overrides(&mut config, |key| std::env::var(key).ok());

    // 4. Validation runs last so overrides are checked too
    config
        .validate()
        .map_err(|e| InfrastructureError::ConfigError(format!("{}: {}", config_path.display(), e)))?;

    Ok(config)
}

fn find_config_file(root: &Path) -> Result<PathBuf, InfrastructureError> {
    CONFIG_FILE_NAMES
        .iter()
        .map(|name| root.join(name))
        .find(|p| p.is_file())
        .ok_or_else(|| {
            InfrastructureError::ConfigNotFound(format!(
                "{} (looked for {})",
                root.display(),
                CONFIG_FILE_NAMES.join(", ")
            ))
        })
}

fn apply_overrides<F>(config: &mut ProjectConfig, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    let targets: [(&str, &mut String); 3] = [
        (ENV_DATABASE, &mut config.database),
        (ENV_EXECUTION_LOG, &mut config.execution_log),
        (ENV_TARGET_PATH, &mut config.target_path),
    ];
    for (key, slot) in targets {
        if let Some(value) = lookup(key) {
            warn!(variable = key, old = %slot, new = %value, "Overriding project setting from environment");
            *slot = value;
        }
    }
}
