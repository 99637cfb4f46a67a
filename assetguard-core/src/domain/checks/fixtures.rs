// Shared tables for rule-set tests.

#![allow(clippy::unwrap_used)]

use crate::domain::table::{Table, Tables, Value};

pub fn text_table(columns: &[(&str, Vec<Option<&str>>)]) -> Table {
    Table::from_columns(columns.iter().map(|(name, values)| {
        (
            name.to_string(),
            values.iter().map(|v| Value::from(*v)).collect(),
        )
    }))
    .unwrap()
}

/// U1 and U2 are 'PL UG' so both need a CABLENOD row; U3 does not.
pub fn assets_base() -> Table {
    text_table(&[
        ("UNITID", vec![Some("U1"), Some("U2"), Some("U3")]),
        ("UNITNO", vec![Some("A-001"), Some("A-002"), Some("A-003")]),
        ("STREET", vec![Some("Main St"), Some("King St"), Some("Queen St")]),
        ("SERVICEOWN", vec![Some("PL UG"), Some("PL UG"), Some("DNO")]),
        ("INSTALLDATE", vec![Some("2020-01-01"), Some("2035-01-01"), None]),
    ])
}

pub fn cablenod_ok() -> Table {
    text_table(&[("LINK_ID", vec![Some("U1"), Some("U2"), Some("U9")])])
}

pub fn cablenod_missing_u2() -> Table {
    text_table(&[("LINK_ID", vec![Some("U1"), Some("X")])])
}

pub fn assets_only(assets: Table) -> Tables {
    Tables::new().with("ASSETS", assets)
}
