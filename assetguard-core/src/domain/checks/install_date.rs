// assetguard-core/src/domain/checks/install_date.rs

use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::domain::check::{
    Check, CheckDescriptor, CheckMetadata, CheckParams, missing_columns, require_table, subject_of,
};
use crate::domain::error::DomainError;
use crate::domain::finding::{Finding, Severity};
use crate::domain::table::Tables;

const METADATA: CheckMetadata = CheckMetadata {
    id: "INSTALL_DATE_FUTURE",
    name: "Install date not in the future",
    description: "Flags assets with INSTALLDATE later than today.",
    severity_default: Severity::Warn,
};

pub const DESCRIPTOR: CheckDescriptor = CheckDescriptor {
    metadata: &METADATA,
    factory: build,
};

fn build(params: &CheckParams) -> Result<Box<dyn Check>, DomainError> {
    Ok(Box::new(params.bind::<InstallDateNotInFutureCheck>(METADATA.id)?))
}

/// Flags rows whose install date falls after today. Dates that do not parse are ignored.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct InstallDateNotInFutureCheck {
    pub table: String,
    pub id_column: String,
    pub date_column: String,
    /// Pins "today"; the local calendar day when unset.
    #[serde(skip)]
    pub reference_date: Option<NaiveDate>,
}

impl Default for InstallDateNotInFutureCheck {
    fn default() -> Self {
        Self {
            table: "ASSETS".to_string(),
            id_column: "UNITID".to_string(),
            date_column: "INSTALLDATE".to_string(),
            reference_date: None,
        }
    }
}

impl InstallDateNotInFutureCheck {
    pub fn with_reference_date(mut self, today: NaiveDate) -> Self {
        self.reference_date = Some(today);
        self
    }

    fn today(&self) -> NaiveDate {
        self.reference_date
            .unwrap_or_else(|| Local::now().date_naive())
    }
}

impl Check for InstallDateNotInFutureCheck {
    fn metadata(&self) -> &'static CheckMetadata {
        &METADATA
    }

    fn run(&self, tables: &Tables) -> Result<Vec<Finding>, DomainError> {
        let table = match require_table(tables, METADATA.id, &self.table) {
            Ok(t) => t,
            Err(finding) => return Ok(vec![finding]),
        };

        let needed = [self.date_column.as_str(), self.id_column.as_str()];
        let missing = table.missing_columns(&needed);
        match missing.as_slice() {
            [] => {}
            [single] => {
                return Ok(vec![Finding::dataset(
                    METADATA.id,
                    format!("Missing column: {}", single),
                    *single,
                )]);
            }
            several => {
                return Ok(vec![missing_columns(METADATA.id, "Missing columns", several)]);
            }
        }

        let today = self.today();
        let findings = table
            .rows()
            .filter_map(|row| {
                let raw = row.get(&self.date_column)?;
                let date = raw.to_date()?;
                (date > today).then(|| {
                    Finding::new(
                        subject_of(row.get(&self.id_column)),
                        METADATA.id,
                        METADATA.severity_default,
                        "Install date is in the future.",
                    )
                    .with_field(self.date_column.clone())
                    .with_current_value(raw.to_text())
                    .with_expected("<= today")
                })
            })
            .collect();
        Ok(findings)
    }
}
