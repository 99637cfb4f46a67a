pub mod data_dir;
pub mod project;

pub use crate::domain::project::{ProjectConfig, TableConfig};
pub use data_dir::discover_csv_tables;
pub use project::{CONFIG_FILE_NAMES, load_project_config};
