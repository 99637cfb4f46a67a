// assetguard/src/cli.rs
//
// Single source of truth for all CLI definitions (Clap structs).

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "assetguard")]
#[command(about = "Rule-based verification of asset inventory records", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// 📋 Lists the built-in checks
    Checks,

    /// 🚀 Loads the project data, runs the checks and reports findings
    Run(RunArgs),

    /// 🔍 Shows the columns and first rows of a loaded table
    Inspect {
        /// Project directory
        #[arg(long, env = "ASSETGUARD_PROJECT_DIR", default_value = ".")]
        project_dir: PathBuf,

        /// Table name to inspect
        #[arg(long, short)]
        table: String,

        /// Number of sample rows to display
        #[arg(long, default_value = "5")]
        limit: usize,
    },
}

#[derive(Args, Debug)]
pub struct RunArgs {
    /// Project directory
    #[arg(long, env = "ASSETGUARD_PROJECT_DIR", default_value = ".")]
    pub project_dir: PathBuf,

    /// Check id to run (repeatable). Defaults to the project's `select`, then to every check
    #[arg(long, short)]
    pub select: Vec<String>,

    /// JSON report path (default: <target-path>/findings.json)
    #[arg(long, short)]
    pub output: Option<PathBuf>,

    /// Skip the JSON report
    #[arg(long)]
    pub no_export: bool,

    /// Exit with an error if any ERROR finding is reported
    #[arg(long)]
    pub strict: bool,

    /// Maximum number of finding rows printed
    #[arg(long, default_value = "50")]
    pub limit: usize,
}
