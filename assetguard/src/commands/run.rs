// assetguard/src/commands/run.rs
//
// USE CASE: Verify the project data.

use anyhow::Context;
use std::time::Instant;
use tracing::info;

use assetguard_core::application::{CheckEngine, export_report, run_verification};
use assetguard_core::infrastructure::{
    CsvExecutionLog, DuckDbSource, JsonReportExporter, load_project_config,
};

use super::{fail, grid};
use crate::cli::RunArgs;

pub async fn execute(args: RunArgs) -> anyhow::Result<()> {
    let start = Instant::now();
    let project_dir = &args.project_dir;

    // A. Load the Config (Infra)
    println!("⚙️  Loading configuration...");
    let config = load_project_config(project_dir).with_context(|| {
        format!("Failed to load project configuration from {:?}", project_dir)
    })?;
    println!("   Project: {} (v{})", config.name, config.version);

    // B. Wire the adapters
    let engine = CheckEngine::discover()?.with_settings(config.checks.clone());
    let source = DuckDbSource::from_project(project_dir, &config)
        .with_context(|| format!("Failed to open database '{}'", config.database))?;
    let mut log = CsvExecutionLog::new(project_dir.join(&config.execution_log));
    info!(log = ?log.path(), selected = ?args.select, "Starting verification");

    // C. Run (Application Layer)
    let report = match run_verification(&source, &engine, &config, &args.select, &mut log).await {
        Ok(report) => report,
        Err(e) => fail(e),
    };

    // D. Display
    if report.findings.is_empty() {
        println!("\n✅ No findings.");
    } else {
        println!("\n🧾 Findings ({}):", report.findings.len());
        println!("{}", grid(&report.output, args.limit));
        if report.findings.len() > args.limit {
            println!("   ... {} more rows", report.findings.len() - args.limit);
        }
        println!("\n📊 Summary:");
        println!("{}", grid(&report.summary, usize::MAX));
    }

    // E. Export
    if !args.no_export {
        let path = args.output.clone().unwrap_or_else(|| {
            project_dir.join(&config.target_path).join("findings.json")
        });
        if let Err(e) = export_report(&JsonReportExporter, &report, &path) {
            fail(e);
        }
        println!("\n📝 Report written to {}", path.display());
    }

    println!(
        "\n✨ {} checks run in {:.2?}",
        report.executions.len(),
        start.elapsed()
    );

    if args.strict && report.has_errors() {
        eprintln!("❌ ERROR findings present (--strict)");
        std::process::exit(1);
    }
    Ok(())
}
