// assetguard-core/src/domain/checks/mandatory_fields.rs

use serde::{Deserialize, Serialize};

use crate::domain::check::{
    Check, CheckDescriptor, CheckMetadata, CheckParams, missing_columns, require_table, subject_of,
};
use crate::domain::error::DomainError;
use crate::domain::finding::{Finding, Severity};
use crate::domain::table::Tables;

const METADATA: CheckMetadata = CheckMetadata {
    id: "MANDATORY_FIELDS",
    name: "Mandatory fields present",
    description: "UNITID/UNITNO/STREET must exist and not be blank.",
    severity_default: Severity::Error,
};

pub const DESCRIPTOR: CheckDescriptor = CheckDescriptor {
    metadata: &METADATA,
    factory: build,
};

fn build(params: &CheckParams) -> Result<Box<dyn Check>, DomainError> {
    Ok(Box::new(params.bind::<MandatoryFieldsCheck>(METADATA.id)?))
}

/// Flags every (row, column) pair where a required column is null or blank.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct MandatoryFieldsCheck {
    pub table: String,
    pub id_column: String,
    pub required: Vec<String>,
}

impl Default for MandatoryFieldsCheck {
    fn default() -> Self {
        Self {
            table: "ASSETS".to_string(),
            id_column: "UNITID".to_string(),
            required: vec!["UNITID".into(), "UNITNO".into(), "STREET".into()],
        }
    }
}

impl Check for MandatoryFieldsCheck {
    fn metadata(&self) -> &'static CheckMetadata {
        &METADATA
    }

    fn run(&self, tables: &Tables) -> Result<Vec<Finding>, DomainError> {
        let table = match require_table(tables, METADATA.id, &self.table) {
            Ok(t) => t,
            Err(finding) => return Ok(vec![finding]),
        };

        let mut needed: Vec<&str> = self.required.iter().map(String::as_str).collect();
        if !needed.contains(&self.id_column.as_str()) {
            needed.push(&self.id_column);
        }
        let missing = table.missing_columns(&needed);
        if !missing.is_empty() {
            return Ok(vec![missing_columns(
                METADATA.id,
                "Missing required column(s)",
                &missing,
            )]);
        }

        let mut findings = Vec::new();
        for col in &self.required {
            for row in table.rows() {
                if row.get(col).is_none_or(|v| v.is_blank()) {
                    findings.push(
                        Finding::new(
                            subject_of(row.get(&self.id_column)),
                            METADATA.id,
                            METADATA.severity_default,
                            format!("Mandatory field '{}' is blank.", col),
                        )
                        .with_field(col.clone()),
                    );
                }
            }
        }
        Ok(findings)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::domain::checks::fixtures::{assets_only, text_table};
    use crate::domain::finding::{DATASET_SUBJECT, UNKNOWN_SUBJECT};
    use std::collections::HashSet;

    #[test]
    fn test_missing_table_returns_dataset_error() {
        let findings = MandatoryFieldsCheck::default().run(&Tables::new()).unwrap();
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].subject_id(), DATASET_SUBJECT);
        assert_eq!(findings[0].severity(), Severity::Error);
        assert!(findings[0].message().contains("Missing table: ASSETS"));
    }

    #[test]
    fn test_missing_columns_reported_together() {
        let tables = assets_only(text_table(&[("UNITID", vec![Some("U1")])]));
        let findings = MandatoryFieldsCheck::default().run(&tables).unwrap();
        assert_eq!(findings.len(), 1);
        assert_eq!(
            findings[0].message(),
            "Missing required column(s): UNITNO, STREET"
        );
        assert_eq!(findings[0].field(), Some("UNITNO,STREET"));
    }

    #[test]
    fn test_blank_values_flag_rows() {
        let tables = assets_only(text_table(&[
            ("UNITID", vec![Some("U1"), Some("U2"), Some("U3")]),
            ("UNITNO", vec![Some(""), Some("A2"), Some("A3")]),
            ("STREET", vec![Some("Main"), Some("   "), Some("Queen")]),
        ]));
        let findings = MandatoryFieldsCheck::default().run(&tables).unwrap();
        let subjects: HashSet<_> = findings.iter().map(|f| f.subject_id()).collect();
        assert_eq!(subjects, HashSet::from(["U1", "U2"]));
        assert_eq!(findings[0].field(), Some("UNITNO"));
        assert_eq!(findings[1].message(), "Mandatory field 'STREET' is blank.");
    }

    #[test]
    fn test_one_finding_per_blank_column() {
        let tables = assets_only(text_table(&[
            ("UNITID", vec![None]),
            ("UNITNO", vec![None]),
            ("STREET", vec![Some("")]),
        ]));
        let findings = MandatoryFieldsCheck::default().run(&tables).unwrap();
        assert_eq!(findings.len(), 3);
        assert!(findings.iter().all(|f| f.subject_id() == UNKNOWN_SUBJECT));
    }

    #[test]
    fn test_custom_required_columns() {
        let check: MandatoryFieldsCheck = CheckParams::new()
            .set("table", "UNITS")
            .set("required", vec!["LOCATION".to_string()])
            .bind("MANDATORY_FIELDS")
            .unwrap();
        let tables = Tables::new().with(
            "UNITS",
            text_table(&[
                ("UNITID", vec![Some("U1"), Some("U2")]),
                ("LOCATION", vec![Some("Depot"), None]),
            ]),
        );
        let findings = check.run(&tables).unwrap();
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].subject_id(), "U2");
        assert_eq!(findings[0].field(), Some("LOCATION"));
    }

    #[test]
    fn test_run_is_idempotent() {
        let tables = assets_only(text_table(&[
            ("UNITID", vec![Some("U1")]),
            ("UNITNO", vec![None]),
            ("STREET", vec![Some("")]),
        ]));
        let check = MandatoryFieldsCheck::default();
        assert_eq!(check.run(&tables).unwrap(), check.run(&tables).unwrap());
    }
}
