// assetguard-core/src/application/engine.rs

use std::collections::BTreeMap;
use std::time::Instant;
use tracing::{debug, error, info, instrument, warn};

use crate::domain::check::{Check, CheckParams, CheckRegistry, discover};
use crate::domain::error::DomainError;
use crate::domain::finding::Finding;
use crate::domain::table::Tables;
use crate::error::AssetGuardError;
use crate::ports::execution::{ExecutionEvent, ExecutionSink};

/// Runs selected checks from a registry against a set of tables.
#[derive(Debug)]
pub struct CheckEngine {
    registry: CheckRegistry,
    settings: BTreeMap<String, CheckParams>,
}

impl CheckEngine {
    /// Engine over every built-in check, with default configuration.
    pub fn discover() -> Result<Self, DomainError> {
        Ok(Self::with_registry(discover()?))
    }

    pub fn with_registry(registry: CheckRegistry) -> Self {
        Self {
            registry,
            settings: BTreeMap::new(),
        }
    }

    /// Per-check construction overrides, keyed by check id.
    pub fn with_settings(mut self, settings: BTreeMap<String, CheckParams>) -> Self {
        self.settings = settings;
        self
    }

    pub fn registry(&self) -> &CheckRegistry {
        &self.registry
    }

    /// Builds the checks to run. An empty selection means all of them, in registry
    /// order; ids the registry does not know are skipped.
    fn plan(&self, selected: &[String]) -> Result<Vec<Box<dyn Check>>, DomainError> {
        let default_params = CheckParams::default();
        let ids: Vec<&str> = if selected.is_empty() {
            self.registry.ids().collect()
        } else {
            selected.iter().map(String::as_str).collect()
        };

        let mut plan = Vec::with_capacity(ids.len());
        for id in ids {
            let Some(descriptor) = self.registry.get(id) else {
                debug!(check_id = %id, "Unknown check id, skipping");
                continue;
            };
            let params = self.settings.get(id).unwrap_or(&default_params);
            plan.push(descriptor.build(params)?);
        }
        Ok(plan)
    }

    /// Runs the selected checks and concatenates their findings in invocation order.
    ///
    /// Exactly one event per executed check is sent to `sink`, after the check
    /// completes. A check fault stops the run; events for the checks that already
    /// ran have been recorded.
    #[instrument(skip_all, fields(tables = tables.len(), selected = selected.len()))]
    pub fn run(
        &self,
        tables: &Tables,
        selected: &[String],
        sink: &mut dyn ExecutionSink,
    ) -> Result<Vec<Finding>, AssetGuardError> {
        let plan = self.plan(selected)?;
        info!(checks = plan.len(), "Running checks");

        let mut findings = Vec::new();
        for check in plan {
            let start = Instant::now();
            let produced = check.run(tables).map_err(|source| {
                error!(check_id = %check.id(), "Check failed after {:.2?}: {}", start.elapsed(), source);
                AssetGuardError::CheckFault {
                    check_id: check.id().to_string(),
                    source,
                }
            })?;

            if produced.iter().any(Finding::is_dataset_level) {
                warn!(check_id = %check.id(), "Dataset-level problem reported");
            }
            debug!(
                check_id = %check.id(),
                findings = produced.len(),
                "Check finished in {:.2?}",
                start.elapsed()
            );

            sink.record(&ExecutionEvent::now(check.id(), produced.len()))?;
            findings.extend(produced);
        }
        Ok(findings)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::domain::check::{CheckDescriptor, CheckMetadata};
    use crate::domain::checks::fixtures::{assets_base, assets_only, cablenod_missing_u2, text_table};
    use crate::domain::finding::Severity;

    fn ids(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_runs_specific_check_on_valid_row() {
        let engine = CheckEngine::discover().unwrap();
        let tables = assets_only(text_table(&[
            ("UNITID", vec![Some("U1")]),
            ("UNITNO", vec![Some("A1")]),
            ("STREET", vec![Some("X")]),
            ("SERVICEOWN", vec![Some("DNO")]),
            ("INSTALLDATE", vec![Some("2020-01-01")]),
        ]));
        let mut events: Vec<ExecutionEvent> = Vec::new();
        let out = engine
            .run(&tables, &ids(&["MANDATORY_FIELDS"]), &mut events)
            .unwrap();
        assert!(out.is_empty());
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].check_id, "MANDATORY_FIELDS");
        assert_eq!(events[0].findings_count, 0);
    }

    #[test]
    fn test_unknown_ids_are_skipped() {
        let engine = CheckEngine::discover().unwrap();
        let tables = assets_only(assets_base());
        let mut events: Vec<ExecutionEvent> = Vec::new();
        let out = engine
            .run(&tables, &ids(&["NOPE", "UNITNO_FORMAT", "ALSO_NOPE"]), &mut events)
            .unwrap();
        assert!(out.is_empty());
        let recorded: Vec<_> = events.iter().map(|e| e.check_id.as_str()).collect();
        assert_eq!(recorded, vec!["UNITNO_FORMAT"]);
    }

    #[test]
    fn test_empty_selection_runs_everything_in_registry_order() {
        let engine = CheckEngine::discover().unwrap();
        let tables = assets_only(assets_base()).with("CABLENOD", cablenod_missing_u2());
        let mut events: Vec<ExecutionEvent> = Vec::new();
        let out = engine.run(&tables, &[], &mut events).unwrap();

        let recorded: Vec<_> = events.iter().map(|e| e.check_id.clone()).collect();
        let registered: Vec<_> = engine.registry().ids().map(str::to_string).collect();
        assert_eq!(recorded, registered);
        assert_eq!(events.iter().map(|e| e.findings_count).sum::<usize>(), out.len());
        assert!(
            out.iter()
                .any(|f| f.check_id() == "SERVICEOWN_PLUG_REQUIRES_CABLENOD" && f.subject_id() == "U2")
        );
    }

    #[test]
    fn test_findings_follow_selection_order() {
        let engine = CheckEngine::discover().unwrap();
        let mut events: Vec<ExecutionEvent> = Vec::new();
        let out = engine
            .run(
                &Tables::new(),
                &ids(&["UNITNO_FORMAT", "MANDATORY_FIELDS"]),
                &mut events,
            )
            .unwrap();
        let order: Vec<_> = out.iter().map(|f| f.check_id()).collect();
        assert_eq!(order, vec!["UNITNO_FORMAT", "MANDATORY_FIELDS"]);
        assert!(out.iter().all(|f| f.severity() == Severity::Error));
    }

    #[test]
    fn test_settings_override_construction() {
        let mut settings = BTreeMap::new();
        settings.insert(
            "MANDATORY_FIELDS".to_string(),
            CheckParams::new().set("table", "UNITS"),
        );
        let engine = CheckEngine::discover().unwrap().with_settings(settings);
        let mut events: Vec<ExecutionEvent> = Vec::new();
        let out = engine
            .run(&assets_only(assets_base()), &ids(&["MANDATORY_FIELDS"]), &mut events)
            .unwrap();
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].message(), "Missing table: UNITS");
    }

    #[test]
    fn test_invalid_settings_fail_before_any_check_runs() {
        let mut settings = BTreeMap::new();
        settings.insert(
            "UNITNO_FORMAT".to_string(),
            CheckParams::new().set("pattern", "(unclosed"),
        );
        let engine = CheckEngine::discover().unwrap().with_settings(settings);
        let mut events: Vec<ExecutionEvent> = Vec::new();
        let res = engine.run(
            &Tables::new(),
            &ids(&["MANDATORY_FIELDS", "UNITNO_FORMAT"]),
            &mut events,
        );
        assert!(matches!(
            res,
            Err(AssetGuardError::Domain(DomainError::InvalidCheckConfig { .. }))
        ));
        assert!(events.is_empty());
    }

    // --- FAULT PROPAGATION ---

    const BROKEN: CheckMetadata = CheckMetadata {
        id: "BROKEN",
        name: "Always faults",
        description: "",
        severity_default: Severity::Error,
    };

    struct Broken;

    impl Check for Broken {
        fn metadata(&self) -> &'static CheckMetadata {
            &BROKEN
        }

        fn run(&self, _tables: &Tables) -> Result<Vec<Finding>, DomainError> {
            Err(DomainError::Evaluation("type coercion failed".into()))
        }
    }

    fn build_broken(_: &CheckParams) -> Result<Box<dyn Check>, DomainError> {
        Ok(Box::new(Broken))
    }

    #[test]
    fn test_fault_propagates_and_earlier_events_remain() {
        let mut registry = discover().unwrap();
        registry
            .register(CheckDescriptor {
                metadata: &BROKEN,
                factory: build_broken,
            })
            .unwrap();
        let engine = CheckEngine::with_registry(registry);

        let mut events: Vec<ExecutionEvent> = Vec::new();
        let res = engine.run(
            &Tables::new(),
            &ids(&["MANDATORY_FIELDS", "BROKEN", "UNITNO_FORMAT"]),
            &mut events,
        );
        assert!(matches!(
            res,
            Err(AssetGuardError::CheckFault { ref check_id, .. }) if check_id == "BROKEN"
        ));
        let recorded: Vec<_> = events.iter().map(|e| e.check_id.as_str()).collect();
        assert_eq!(recorded, vec!["MANDATORY_FIELDS"]);
        assert_eq!(events[0].findings_count, 1);
    }
}
