// assetguard-core/src/infrastructure/compiler/jinja.rs

// Turns a table's query template into plain SQL for DuckDB. Templates only see
// the project `vars`; referencing anything else is an error rather than an
// empty string.

use minijinja::{Environment, UndefinedBehavior, Value};
use std::collections::BTreeMap;

use crate::infrastructure::error::InfrastructureError;

pub struct QueryRenderer {
    env: Environment<'static>,
    vars: BTreeMap<String, serde_yaml::Value>,
}

/// `"name"`, with embedded double quotes doubled.
fn quote_identifier(name: String) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

fn sql_literal(value: &Value) -> String {
    match value.as_str() {
        Some(s) => format!("'{}'", s.replace('\'', "''")),
        None if value.is_none() || value.is_undefined() => "NULL".to_string(),
        None => value.to_string(),
    }
}

/// `['a', 1]` becomes `'a', 1`, ready for an `IN (...)` clause.
fn sql_list(values: Vec<Value>) -> String {
    values.iter().map(sql_literal).collect::<Vec<_>>().join(", ")
}

impl QueryRenderer {
    pub fn new(vars: &BTreeMap<String, serde_yaml::Value>) -> Self {
        let mut env = Environment::new();
        env.set_undefined_behavior(UndefinedBehavior::Strict);
        env.add_function("quote", quote_identifier);
        env.add_filter("sql_list", sql_list);
        Self {
            env,
            vars: vars.clone(),
        }
    }

    pub fn render(&self, template: &str) -> Result<String, InfrastructureError> {
        let sql = self.env.render_str(template, &self.vars)?;
        Ok(sql.trim().to_string())
    }
}

impl Default for QueryRenderer {
    fn default() -> Self {
        Self::new(&BTreeMap::new())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use anyhow::Result;

    fn vars() -> BTreeMap<String, serde_yaml::Value> {
        serde_yaml::from_str(
            r#"
region: NORTH
owners: ["PL UG", "O'Brien"]
min_year: 2000
"#,
        )
        .unwrap()
    }

    #[test]
    fn test_renders_vars() -> Result<()> {
        let renderer = QueryRenderer::new(&vars());
        let sql = renderer.render("SELECT * FROM assets WHERE region = '{{ region }}'")?;
        assert_eq!(sql, "SELECT * FROM assets WHERE region = 'NORTH'");
        Ok(())
    }

    #[test]
    fn test_sql_list_and_quote() -> Result<()> {
        let renderer = QueryRenderer::new(&vars());
        let sql = renderer.render(
            "SELECT * FROM {{ quote('raw assets') }} WHERE SERVICEOWN IN ({{ owners | sql_list }}) AND y >= {{ min_year }}",
        )?;
        assert_eq!(
            sql,
            "SELECT * FROM \"raw assets\" WHERE SERVICEOWN IN ('PL UG', 'O''Brien') AND y >= 2000"
        );
        Ok(())
    }

    #[test]
    fn test_undefined_variable_is_an_error() {
        let renderer = QueryRenderer::default();
        let res = renderer.render("SELECT * FROM {{ missing_table }}");
        assert!(matches!(res, Err(InfrastructureError::TemplateError(_))));
    }
}
