// assetguard-core/src/domain/table.rs
//
// In-memory columnar tables. Sources materialize into these once per run and
// checks only ever read them.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use std::collections::BTreeMap;
use std::collections::HashSet;
use std::fmt;

use crate::domain::error::DomainError;

const DATE_FORMATS: [&str; 5] = ["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%d.%m.%Y", "%Y%m%d"];
const DATETIME_FORMATS: [&str; 3] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S%.f"];

static NULL_VALUE: Value = Value::Null;

/// A single cell.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    #[default]
    Null,
    Text(String),
    Integer(i64),
    Float(f64),
    Boolean(bool),
    Date(NaiveDate),
    Timestamp(NaiveDateTime),
}

impl Value {
    pub fn is_null(&self) -> bool {
        match self {
            Value::Null => true,
            Value::Float(f) => f.is_nan(),
            _ => false,
        }
    }

    /// Stringified value, `None` for null.
    pub fn to_text(&self) -> Option<String> {
        if self.is_null() {
            None
        } else {
            Some(self.to_string())
        }
    }

    /// Null, or text that is empty once trimmed.
    pub fn is_blank(&self) -> bool {
        match self {
            Value::Text(s) => s.trim().is_empty(),
            other => other.is_null(),
        }
    }

    /// Calendar date of the value. Unparsable input yields `None`.
    pub fn to_date(&self) -> Option<NaiveDate> {
        match self {
            Value::Date(d) => Some(*d),
            Value::Timestamp(ts) => Some(ts.date()),
            Value::Text(s) => parse_date(s.trim()),
            _ => None,
        }
    }
}

fn parse_date(raw: &str) -> Option<NaiveDate> {
    if raw.is_empty() {
        return None;
    }
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(raw, fmt).ok())
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
                .map(|ts| ts.date())
        })
        .or_else(|| {
            DateTime::parse_from_rfc3339(raw)
                .ok()
                .map(|dt| dt.date_naive())
        })
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => Ok(()),
            Value::Text(s) => f.write_str(s),
            Value::Integer(i) => write!(f, "{}", i),
            Value::Float(x) => write!(f, "{}", x),
            Value::Boolean(b) => write!(f, "{}", b),
            Value::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
            Value::Timestamp(ts) => write!(f, "{}", ts.format("%Y-%m-%d %H:%M:%S")),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Integer(i)
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Value::Float(x)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Boolean(b)
    }
}

impl From<NaiveDate> for Value {
    fn from(d: NaiveDate) -> Self {
        Value::Date(d)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(Value::Null)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    name: String,
    values: Vec<Value>,
}

impl Column {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn values(&self) -> &[Value] {
        &self.values
    }

    /// Value at `row`, null when out of range.
    pub fn get(&self, row: usize) -> &Value {
        self.values.get(row).unwrap_or(&NULL_VALUE)
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Table {
    columns: Vec<Column>,
    rows: usize,
}

impl Table {
    /// An empty table carrying only a header.
    pub fn with_columns<I, S>(names: I) -> Result<Self, DomainError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::from_columns(names.into_iter().map(|n| (n.into(), Vec::new())))
    }

    pub fn from_columns<I>(columns: I) -> Result<Self, DomainError>
    where
        I: IntoIterator<Item = (String, Vec<Value>)>,
    {
        let mut seen = HashSet::new();
        let mut out: Vec<Column> = Vec::new();
        let mut rows = None;

        for (name, values) in columns {
            if !seen.insert(name.clone()) {
                return Err(DomainError::DuplicateColumn(name));
            }
            let expected = *rows.get_or_insert(values.len());
            if values.len() != expected {
                return Err(DomainError::RaggedTable {
                    column: name,
                    expected,
                    actual: values.len(),
                });
            }
            out.push(Column { name, values });
        }

        Ok(Self {
            columns: out,
            rows: rows.unwrap_or(0),
        })
    }

    pub fn from_rows<I, S>(names: I, rows: Vec<Vec<Value>>) -> Result<Self, DomainError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut table = Self::with_columns(names)?;
        for row in rows {
            table.push_row(row)?;
        }
        Ok(table)
    }

    pub fn push_row(&mut self, row: Vec<Value>) -> Result<(), DomainError> {
        if row.len() != self.columns.len() {
            return Err(DomainError::RowArity {
                expected: self.columns.len(),
                actual: row.len(),
            });
        }
        for (column, value) in self.columns.iter_mut().zip(row) {
            column.values.push(value);
        }
        self.rows += 1;
        Ok(())
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column(name).is_some()
    }

    /// The entries of `required` that this table lacks, in the order given.
    pub fn missing_columns<'a, S: AsRef<str>>(&self, required: &'a [S]) -> Vec<&'a str> {
        let mut missing: Vec<&'a str> = Vec::new();
        for name in required.iter().map(AsRef::as_ref) {
            if !self.has_column(name) && !missing.contains(&name) {
                missing.push(name);
            }
        }
        missing
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    pub fn row_count(&self) -> usize {
        self.rows
    }

    pub fn is_empty(&self) -> bool {
        self.rows == 0
    }

    pub fn rows(&self) -> impl Iterator<Item = RowRef<'_>> {
        (0..self.rows).map(move |index| RowRef { table: self, index })
    }
}

/// Borrowed view of one row.
#[derive(Debug, Clone, Copy)]
pub struct RowRef<'t> {
    table: &'t Table,
    index: usize,
}

impl<'t> RowRef<'t> {
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn get(&self, column: &str) -> Option<&'t Value> {
        self.table.column(column).map(|c| c.get(self.index))
    }

    pub fn values(&self) -> impl Iterator<Item = &'t Value> + 't {
        let index = self.index;
        self.table.columns.iter().map(move |c| c.get(index))
    }
}

/// Named tables available to checks during a run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Tables {
    inner: BTreeMap<String, Table>,
}

impl Tables {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: impl Into<String>, table: Table) -> Self {
        self.insert(name, table);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, table: Table) -> Option<Table> {
        self.inner.insert(name.into(), table)
    }

    pub fn get(&self, name: &str) -> Option<&Table> {
        self.inner.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.inner.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.inner.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Table)> {
        self.inner.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

impl FromIterator<(String, Table)> for Tables {
    fn from_iter<T: IntoIterator<Item = (String, Table)>>(iter: T) -> Self {
        Self {
            inner: iter.into_iter().collect(),
        }
    }
}
