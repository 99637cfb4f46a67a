// assetguard-core/src/domain/checks/unitno_format.rs

use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};

use crate::domain::check::{
    Check, CheckDescriptor, CheckMetadata, CheckParams, missing_columns, require_table, subject_of,
};
use crate::domain::error::DomainError;
use crate::domain::finding::{Finding, Severity};
use crate::domain::table::{Tables, Value};

/// Letters, an optional single separator (space, hyphen or period), digits, optional trailing letters.
pub const DEFAULT_PATTERN: &str = r"^[A-Za-z]+[ .-]?\d+(?:[A-Za-z]+)?$";

const METADATA: CheckMetadata = CheckMetadata {
    id: "UNITNO_FORMAT",
    name: "UNITNO format",
    description: "Letters (1+) + optional separator + digits (1+) + optional trailing letters (1+).",
    severity_default: Severity::Error,
};

pub const DESCRIPTOR: CheckDescriptor = CheckDescriptor {
    metadata: &METADATA,
    factory: build,
};

fn build(params: &CheckParams) -> Result<Box<dyn Check>, DomainError> {
    let config = params.bind::<UnitNoFormatConfig>(METADATA.id)?;
    Ok(Box::new(UnitNoFormatCheck::new(config)?))
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct UnitNoFormatConfig {
    pub table: String,
    pub id_column: String,
    pub column: String,
    /// Must match the whole value. The pattern is always wrapped as `^(?:pattern)$`,
    /// so an unanchored custom pattern still has to cover the full string.
    pub pattern: String,
    pub ignore_case: bool,
}

impl Default for UnitNoFormatConfig {
    fn default() -> Self {
        Self {
            table: "ASSETS".to_string(),
            id_column: "UNITID".to_string(),
            column: "UNITNO".to_string(),
            pattern: DEFAULT_PATTERN.to_string(),
            ignore_case: true,
        }
    }
}

/// Flags rows whose value does not match the configured format from first to last character.
#[derive(Debug, Clone)]
pub struct UnitNoFormatCheck {
    config: UnitNoFormatConfig,
    regex: Regex,
}

impl UnitNoFormatCheck {
    pub fn new(config: UnitNoFormatConfig) -> Result<Self, DomainError> {
        let regex = RegexBuilder::new(&format!("^(?:{})$", config.pattern))
            .case_insensitive(config.ignore_case)
            .build()
            .map_err(|e| DomainError::InvalidCheckConfig {
                check_id: METADATA.id.to_string(),
                message: format!("invalid pattern: {}", e),
            })?;
        Ok(Self { config, regex })
    }

    pub fn config(&self) -> &UnitNoFormatConfig {
        &self.config
    }
}

impl Check for UnitNoFormatCheck {
    fn metadata(&self) -> &'static CheckMetadata {
        &METADATA
    }

    fn run(&self, tables: &Tables) -> Result<Vec<Finding>, DomainError> {
        let cfg = &self.config;
        let table = match require_table(tables, METADATA.id, &cfg.table) {
            Ok(t) => t,
            Err(finding) => return Ok(vec![finding]),
        };

        let needed = [cfg.id_column.as_str(), cfg.column.as_str()];
        let missing = table.missing_columns(&needed);
        if !missing.is_empty() {
            return Ok(vec![missing_columns(METADATA.id, "Missing column(s)", &missing)]);
        }

        let mut findings = Vec::new();
        for row in table.rows() {
            let value = row
                .get(&cfg.column)
                .and_then(Value::to_text)
                .map(|s| s.trim().to_string())
                .unwrap_or_default();
            if self.regex.is_match(&value) {
                continue;
            }
            findings.push(
                Finding::new(
                    subject_of(row.get(&cfg.id_column)),
                    METADATA.id,
                    METADATA.severity_default,
                    format!("{} format does not match expected pattern.", cfg.column),
                )
                .with_field(cfg.column.clone())
                .with_current_value((!value.is_empty()).then_some(value))
                .with_expected(cfg.pattern.clone()),
            );
        }
        Ok(findings)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::domain::checks::fixtures::{assets_base, assets_only, text_table};
    use crate::domain::finding::DATASET_SUBJECT;
    use crate::domain::table::Table;

    fn default_check() -> UnitNoFormatCheck {
        UnitNoFormatCheck::new(UnitNoFormatConfig::default()).unwrap()
    }

    fn findings_for(unitno: Option<&str>) -> Vec<Finding> {
        let tables = assets_only(text_table(&[
            ("UNITID", vec![Some("U1")]),
            ("UNITNO", vec![unitno]),
            ("STREET", vec![Some("X")]),
        ]));
        default_check().run(&tables).unwrap()
    }

    #[test]
    fn test_valid_values_pass() {
        for unitno in ["A1", "AB123", "A-001", "A.001", "A 001", "A12Z", "ab12", " A1 "] {
            assert!(findings_for(Some(unitno)).is_empty(), "{:?} should pass", unitno);
        }
    }

    #[test]
    fn test_invalid_values_flagged_once() {
        for unitno in [Some("123A"), Some("A_12"), Some("A--12"), Some(""), None] {
            assert_eq!(findings_for(unitno).len(), 1, "{:?} should be flagged", unitno);
        }
    }

    #[test]
    fn test_empty_value_has_no_current_value() {
        let findings = findings_for(None);
        assert_eq!(findings[0].current_value(), None);
        assert_eq!(findings[0].expected(), Some(DEFAULT_PATTERN));
    }

    #[test]
    fn test_flags_only_bad_rows() {
        let base = assets_base();
        let unitnos: Vec<Value> = ["A-001", "BAD_22", "A-003"].into_iter().map(Value::from).collect();
        let columns = base
            .columns()
            .iter()
            .map(|c| {
                let values = if c.name() == "UNITNO" { unitnos.clone() } else { c.values().to_vec() };
                (c.name().to_string(), values)
            });
        let tables = assets_only(Table::from_columns(columns).unwrap());

        let findings = default_check().run(&tables).unwrap();
        assert_eq!(findings.len(), 1);
        let f = &findings[0];
        assert_eq!(f.subject_id(), "U2");
        assert!(f.message().contains("UNITNO format"));
        assert_eq!(f.field(), Some("UNITNO"));
        assert_eq!(f.current_value(), Some("BAD_22"));
    }

    #[test]
    fn test_unanchored_custom_pattern_still_matches_full_value() {
        let check = UnitNoFormatCheck::new(UnitNoFormatConfig {
            pattern: r"[A-Z]+\d+".to_string(),
            ignore_case: false,
            ..UnitNoFormatConfig::default()
        })
        .unwrap();
        let tables = assets_only(text_table(&[
            ("UNITID", vec![Some("U1"), Some("U2"), Some("U3")]),
            ("UNITNO", vec![Some("AB12"), Some("AB12!"), Some("ab12")]),
        ]));
        let subjects: Vec<_> = check
            .run(&tables)
            .unwrap()
            .iter()
            .map(|f| f.subject_id().to_string())
            .collect();
        assert_eq!(subjects, vec!["U2", "U3"]);
    }

    #[test]
    fn test_invalid_pattern_is_config_error() {
        let params = CheckParams::new().set("pattern", "([A-Z");
        let res = DESCRIPTOR.build(&params);
        assert!(matches!(res, Err(DomainError::InvalidCheckConfig { .. })));
    }

    #[test]
    fn test_missing_table_returns_dataset_error() {
        let findings = default_check().run(&Tables::new()).unwrap();
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].subject_id(), DATASET_SUBJECT);
        assert_eq!(findings[0].severity(), Severity::Error);
        assert_eq!(findings[0].message(), "Missing table: ASSETS");
        assert_eq!(findings[0].field(), Some("ASSETS"));
    }

    #[test]
    fn test_run_is_idempotent() {
        let tables = assets_only(text_table(&[
            ("UNITID", vec![Some("U1"), Some("U2")]),
            ("UNITNO", vec![Some("A-001"), Some("??")]),
        ]));
        let check = default_check();
        let first = check.run(&tables).unwrap();
        assert_eq!(first.len(), 1);
        assert_eq!(first, check.run(&tables).unwrap());
    }

    #[test]
    fn test_missing_columns_returns_dataset_error() {
        let tables = assets_only(text_table(&[("STREET", vec![Some("X")])]));
        let findings = default_check().run(&tables).unwrap();
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].subject_id(), DATASET_SUBJECT);
        assert_eq!(findings[0].message(), "Missing column(s): UNITID, UNITNO");
    }
}
