// assetguard-core/src/application/pipeline.rs

use std::path::Path;
use std::time::Instant;
use tracing::{info, instrument};

use crate::application::engine::CheckEngine;
use crate::application::ports::ReportExporter;
use crate::application::reporting::{VerificationReport, enrich, findings_to_table, summarize};
use crate::domain::error::DomainError;
use crate::domain::finding::Finding;
use crate::domain::project::ProjectConfig;
use crate::domain::table::Tables;
use crate::error::{AssetGuardError, RunStage};
use crate::ports::execution::{ExecutionEvent, ExecutionSink, TeeSink};
use crate::ports::source::{TableSource, load_tables};

/// The primary table must exist and return every contract column.
pub fn check_source_contract(tables: &Tables, config: &ProjectConfig) -> Result<(), DomainError> {
    let primary = tables
        .get(&config.primary_table)
        .ok_or_else(|| DomainError::MissingPrimaryTable(config.primary_table.clone()))?;

    let mut contract = config.required_columns.clone();
    if !contract.contains(&config.identifier_column) {
        contract.insert(0, config.identifier_column.clone());
    }
    if let Some(column) = primary.missing_columns(&contract).first() {
        return Err(DomainError::SourceContract {
            table: config.primary_table.clone(),
            column: column.to_string(),
        });
    }
    Ok(())
}

/// Load, check and report, each stage labelled on failure.
///
/// `selected` overrides the project's default selection when non-empty. Every
/// executed check is recorded both in the returned report and in `sink`.
#[instrument(skip_all, fields(project = %config.name))]
pub async fn run_verification(
    source: &dyn TableSource,
    engine: &CheckEngine,
    config: &ProjectConfig,
    selected: &[String],
    sink: &mut dyn ExecutionSink,
) -> Result<VerificationReport, AssetGuardError> {
    let start = Instant::now();

    // 1. LOAD
    let tables = load_tables(source)
        .await
        .map_err(|e| AssetGuardError::at_stage(RunStage::Load, e))?;
    check_source_contract(&tables, config).map_err(|e| AssetGuardError::at_stage(RunStage::Load, e))?;
    info!(tables = tables.len(), "Source loaded");

    // 2. CHECK
    let selection = if selected.is_empty() { &config.select[..] } else { selected };
    let mut executions: Vec<ExecutionEvent> = Vec::new();
    let findings = {
        let mut tee = TeeSink::new(vec![&mut executions as &mut dyn ExecutionSink, sink]);
        engine
            .run(&tables, selection, &mut tee)
            .map_err(|e| AssetGuardError::at_stage(RunStage::Check, e))?
    };
    info!(
        checks = executions.len(),
        findings = findings.len(),
        "Checks complete"
    );

    // 3. REPORT
    let report = build_report(&tables, config, findings, executions)
        .map_err(|e| AssetGuardError::at_stage(RunStage::Report, e))?;
    info!(
        rows = report.output.row_count(),
        groups = report.summary.row_count(),
        "Verification finished in {:.2?}",
        start.elapsed()
    );
    Ok(report)
}

fn build_report(
    tables: &Tables,
    config: &ProjectConfig,
    findings: Vec<Finding>,
    executions: Vec<ExecutionEvent>,
) -> Result<VerificationReport, DomainError> {
    let primary = tables
        .get(&config.primary_table)
        .ok_or_else(|| DomainError::MissingPrimaryTable(config.primary_table.clone()))?;
    let output = enrich(
        &findings_to_table(&findings),
        primary,
        &config.identifier_column,
        &config.reference_columns,
    )?;
    let summary = summarize(&output)?;
    Ok(VerificationReport {
        findings,
        output,
        summary,
        executions,
    })
}

/// Runs an exporter, labelling failures with the export stage.
#[instrument(skip(exporter, report))]
pub fn export_report(
    exporter: &dyn ReportExporter,
    report: &VerificationReport,
    path: &Path,
) -> Result<(), AssetGuardError> {
    exporter
        .export(report, path)
        .map_err(|e| AssetGuardError::at_stage(RunStage::Export, e))?;
    info!(path = %path.display(), "Report exported");
    Ok(())
}
