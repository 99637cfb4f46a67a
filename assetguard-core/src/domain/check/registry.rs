// assetguard-core/src/domain/check/registry.rs

use std::collections::HashMap;

use super::{Check, CheckMetadata, CheckParams};
use crate::domain::checks;
use crate::domain::error::DomainError;

pub type CheckFactory = fn(&CheckParams) -> Result<Box<dyn Check>, DomainError>;

/// A check variant as seen by the registry: identity plus constructor.
#[derive(Clone, Copy)]
pub struct CheckDescriptor {
    pub metadata: &'static CheckMetadata,
    pub factory: CheckFactory,
}

impl CheckDescriptor {
    pub fn id(&self) -> &'static str {
        self.metadata.id
    }

    pub fn build(&self, params: &CheckParams) -> Result<Box<dyn Check>, DomainError> {
        (self.factory)(params)
    }
}

impl std::fmt::Debug for CheckDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CheckDescriptor")
            .field("metadata", self.metadata)
            .finish_non_exhaustive()
    }
}

/// Check variants indexed by id, in registration order.
#[derive(Debug, Default)]
pub struct CheckRegistry {
    entries: Vec<CheckDescriptor>,
    index: HashMap<&'static str, usize>,
}

impl CheckRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, descriptor: CheckDescriptor) -> Result<(), DomainError> {
        let id = descriptor.id();
        if self.index.contains_key(id) {
            return Err(DomainError::DuplicateCheck(id.to_string()));
        }
        self.index.insert(id, self.entries.len());
        self.entries.push(descriptor);
        Ok(())
    }

    pub fn get(&self, id: &str) -> Option<&CheckDescriptor> {
        self.index.get(id).map(|&i| &self.entries[i])
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    pub fn ids(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.iter().map(CheckDescriptor::id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &CheckDescriptor> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Registry of every check declared in the built-in rule set.
pub fn discover() -> Result<CheckRegistry, DomainError> {
    let mut registry = CheckRegistry::new();
    for descriptor in checks::BUILTIN {
        registry.register(*descriptor)?;
    }
    Ok(registry)
}
