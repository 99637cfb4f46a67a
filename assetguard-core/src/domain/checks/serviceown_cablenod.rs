// assetguard-core/src/domain/checks/serviceown_cablenod.rs

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::domain::check::{
    Check, CheckDescriptor, CheckMetadata, CheckParams, missing_columns, require_table,
};
use crate::domain::error::DomainError;
use crate::domain::finding::{Finding, Severity, UNKNOWN_SUBJECT};
use crate::domain::table::{Tables, Value};

const METADATA: CheckMetadata = CheckMetadata {
    id: "SERVICEOWN_PLUG_REQUIRES_CABLENOD",
    name: "SERVICEOWN 'PL UG' has CABLENOD link(s)",
    description: "For units with SERVICEOWN='PL UG', require at least one CABLENOD row where LINK_ID == UNITID.",
    severity_default: Severity::Error,
};

pub const DESCRIPTOR: CheckDescriptor = CheckDescriptor {
    metadata: &METADATA,
    factory: build,
};

fn build(params: &CheckParams) -> Result<Box<dyn Check>, DomainError> {
    Ok(Box::new(params.bind::<ServiceOwnRequiresLinkCheck>(METADATA.id)?))
}

/// Cross-table existence rule: every primary row whose condition column equals the
/// target value needs at least one row in the link table pointing back at its id.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct ServiceOwnRequiresLinkCheck {
    pub table: String,
    pub link_table: String,
    pub id_column: String,
    pub condition_column: String,
    pub link_column: String,
    pub target_value: String,
}

impl Default for ServiceOwnRequiresLinkCheck {
    fn default() -> Self {
        Self {
            table: "ASSETS".to_string(),
            link_table: "CABLENOD".to_string(),
            id_column: "UNITID".to_string(),
            condition_column: "SERVICEOWN".to_string(),
            link_column: "LINK_ID".to_string(),
            target_value: "PL UG".to_string(),
        }
    }
}

// Full case folding: `ß` and `SS` compare equal.
fn fold(s: &str) -> String {
    s.to_uppercase().to_lowercase()
}

fn normalized(value: Option<&Value>) -> Option<String> {
    value.and_then(Value::to_text).map(|s| s.trim().to_string())
}

impl Check for ServiceOwnRequiresLinkCheck {
    fn metadata(&self) -> &'static CheckMetadata {
        &METADATA
    }

    fn run(&self, tables: &Tables) -> Result<Vec<Finding>, DomainError> {
        // Precondition order: primary table, link table, primary columns, link column.
        let primary = match require_table(tables, METADATA.id, &self.table) {
            Ok(t) => t,
            Err(finding) => return Ok(vec![finding]),
        };
        let links = match require_table(tables, METADATA.id, &self.link_table) {
            Ok(t) => t,
            Err(finding) => return Ok(vec![finding]),
        };
        let needed = [self.id_column.as_str(), self.condition_column.as_str()];
        let missing = primary.missing_columns(&needed);
        if !missing.is_empty() {
            let label = format!("Missing {} column(s)", self.table.to_lowercase());
            return Ok(vec![missing_columns(METADATA.id, &label, &missing)]);
        }
        if !links.has_column(&self.link_column) {
            return Ok(vec![Finding::dataset(
                METADATA.id,
                format!("Missing column in {}: {}", self.link_table, self.link_column),
                self.link_column.clone(),
            )]);
        }

        let target = fold(self.target_value.trim());
        let matching: Vec<_> = primary
            .rows()
            .filter(|row| {
                normalized(row.get(&self.condition_column))
                    .is_some_and(|v| fold(&v) == target)
            })
            .collect();
        if matching.is_empty() {
            return Ok(Vec::new());
        }

        let linked: HashSet<String> = links
            .rows()
            .filter_map(|row| normalized(row.get(&self.link_column)))
            .collect();

        let message = format!(
            "{} is '{}' but no {} row with {} == {}.",
            self.condition_column, self.target_value, self.link_table, self.link_column, self.id_column
        );
        let expected = format!("At least 1 matching {} record", self.link_table);

        let findings = matching
            .into_iter()
            .filter_map(|row| {
                let id = normalized(row.get(&self.id_column));
                match id {
                    Some(ref id) if linked.contains(id) => None,
                    _ => Some(
                        Finding::new(
                            id.unwrap_or_else(|| UNKNOWN_SUBJECT.to_string()),
                            METADATA.id,
                            METADATA.severity_default,
                            message.clone(),
                        )
                        .with_field(self.condition_column.clone())
                        .with_current_value(Some(self.target_value.clone()))
                        .with_expected(expected.clone()),
                    ),
                }
            })
            .collect();
        Ok(findings)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::domain::checks::fixtures::{
        assets_base, assets_only, cablenod_missing_u2, cablenod_ok, text_table,
    };
    use crate::domain::finding::DATASET_SUBJECT;

    #[test]
    fn test_missing_primary_table_reported_first() {
        let tables = Tables::new();
        let findings = ServiceOwnRequiresLinkCheck::default().run(&tables).unwrap();
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].subject_id(), DATASET_SUBJECT);
        assert_eq!(findings[0].severity(), Severity::Error);
        assert!(findings[0].message().contains("Missing table: ASSETS"));
    }

    #[test]
    fn test_missing_link_table_returns_dataset_error() {
        let findings = ServiceOwnRequiresLinkCheck::default()
            .run(&assets_only(assets_base()))
            .unwrap();
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].subject_id(), DATASET_SUBJECT);
        assert!(findings[0].message().contains("Missing table: CABLENOD"));
    }

    #[test]
    fn test_missing_primary_columns_before_link_column() {
        let tables = assets_only(text_table(&[("UNITID", vec![Some("U1")])]))
            .with("CABLENOD", text_table(&[("WRONG", vec![Some("U1")])]));
        let findings = ServiceOwnRequiresLinkCheck::default().run(&tables).unwrap();
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].message(), "Missing assets column(s): SERVICEOWN");
        assert_eq!(findings[0].field(), Some("SERVICEOWN"));
    }

    #[test]
    fn test_missing_link_column_returns_dataset_error() {
        let tables = assets_only(assets_base())
            .with("CABLENOD", text_table(&[("WRONG", vec![Some("U1")])]));
        let findings = ServiceOwnRequiresLinkCheck::default().run(&tables).unwrap();
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].subject_id(), DATASET_SUBJECT);
        assert!(findings[0].message().contains("Missing column in CABLENOD: LINK_ID"));
    }

    #[test]
    fn test_all_linked_no_findings() {
        let tables = assets_only(assets_base()).with("CABLENOD", cablenod_ok());
        assert!(ServiceOwnRequiresLinkCheck::default().run(&tables).unwrap().is_empty());
    }

    #[test]
    fn test_missing_u2_flags_one() {
        let tables = assets_only(assets_base()).with("CABLENOD", cablenod_missing_u2());
        let findings = ServiceOwnRequiresLinkCheck::default().run(&tables).unwrap();
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].subject_id(), "U2");
        assert!(findings.iter().all(|f| f.message().contains("LINK_ID == UNITID")));
        assert_eq!(findings[0].current_value(), Some("PL UG"));
    }

    #[test]
    fn test_condition_match_ignores_case_and_whitespace() {
        let tables = assets_only(text_table(&[
            ("UNITID", vec![Some(" U1 "), Some("U2"), Some("U3")]),
            ("SERVICEOWN", vec![Some("  pl ug"), Some("PL UG "), Some("PLUG")]),
        ]))
        .with("CABLENOD", text_table(&[("LINK_ID", vec![Some("U1 "), None])]));
        let findings = ServiceOwnRequiresLinkCheck::default().run(&tables).unwrap();
        let subjects: Vec<_> = findings.iter().map(|f| f.subject_id()).collect();
        assert_eq!(subjects, vec!["U2"]);
    }

    #[test]
    fn test_condition_match_uses_full_case_folding() {
        let check = ServiceOwnRequiresLinkCheck {
            condition_column: "STREET".to_string(),
            target_value: "Straße".to_string(),
            ..ServiceOwnRequiresLinkCheck::default()
        };
        let tables = assets_only(text_table(&[
            ("UNITID", vec![Some("U1"), Some("U2"), Some("U3")]),
            ("STREET", vec![Some("STRASSE"), Some("strasse"), Some("Strase")]),
        ]))
        .with("CABLENOD", text_table(&[("LINK_ID", vec![Some("X")])]));
        let findings = check.run(&tables).unwrap();
        let subjects: Vec<_> = findings.iter().map(|f| f.subject_id()).collect();
        assert_eq!(subjects, vec!["U1", "U2"]);
    }

    #[test]
    fn test_run_is_idempotent() {
        let tables = assets_only(assets_base()).with("CABLENOD", cablenod_missing_u2());
        let check = ServiceOwnRequiresLinkCheck::default();
        let first = check.run(&tables).unwrap();
        assert_eq!(first.len(), 1);
        assert_eq!(first, check.run(&tables).unwrap());
    }

    #[test]
    fn test_no_matching_rows_short_circuits() {
        let tables = assets_only(text_table(&[
            ("UNITID", vec![Some("U1")]),
            ("SERVICEOWN", vec![None]),
        ]))
        .with("CABLENOD", text_table(&[("LINK_ID", Vec::new())]));
        assert!(ServiceOwnRequiresLinkCheck::default().run(&tables).unwrap().is_empty());
    }
}
