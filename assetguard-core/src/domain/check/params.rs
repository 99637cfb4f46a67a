// assetguard-core/src/domain/check/params.rs

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::domain::error::DomainError;

/// Construction-time overrides for one check, as written in the project file.
///
/// Keys are kebab-case field names of the check's configuration struct.
#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
#[serde(transparent)]
pub struct CheckParams(BTreeMap<String, serde_yaml::Value>);

impl CheckParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(mut self, key: impl Into<String>, value: impl Into<serde_yaml::Value>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Deserializes the params into a check configuration, defaults filling the gaps.
    pub fn bind<T>(&self, check_id: &str) -> Result<T, DomainError>
    where
        T: DeserializeOwned + Default,
    {
        if self.0.is_empty() {
            return Ok(T::default());
        }
        let mapping: serde_yaml::Mapping = self
            .0
            .iter()
            .map(|(k, v)| (serde_yaml::Value::String(k.clone()), v.clone()))
            .collect();
        serde_yaml::from_value(serde_yaml::Value::Mapping(mapping)).map_err(|e| {
            DomainError::InvalidCheckConfig {
                check_id: check_id.to_string(),
                message: e.to_string(),
            }
        })
    }
}
