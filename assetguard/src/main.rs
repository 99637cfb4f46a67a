// assetguard/src/main.rs

use clap::Parser;

mod cli;
mod commands;

use cli::{Cli, Commands};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // RUST_LOG=debug assetguard run ... for per-check details
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Checks => commands::checks::execute()?,
        Commands::Run(args) => commands::run::execute(args).await?,
        Commands::Inspect {
            project_dir,
            table,
            limit,
        } => commands::inspect::execute(project_dir, table, limit).await?,
    }

    Ok(())
}
