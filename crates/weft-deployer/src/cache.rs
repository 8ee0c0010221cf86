//! Process-wide definition cache
//!
//! Cache publication is the last externally visible effect of a deploy and
//! happens strictly after transaction commit, so concurrent process-start
//! callers never observe definitions that are later rolled back.

use dashmap::DashMap;
use std::sync::Arc;
use weft_types::{DefinitionId, ProcessDefinition, ProcessModel};

/// A finished definition together with its parsed model, so process-start
/// paths get both from one lookup.
#[derive(Debug, Clone)]
pub struct CachedDefinition {
    pub definition: ProcessDefinition,
    pub model: ProcessModel,
}

/// Engine-wide cache of deployed definitions, keyed by definition id
#[derive(Debug, Default)]
pub struct DefinitionCache {
    entries: DashMap<DefinitionId, Arc<CachedDefinition>>,
}

impl DefinitionCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, entry: CachedDefinition) {
        self.entries
            .insert(entry.definition.id.clone(), Arc::new(entry));
    }

    pub fn get(&self, id: &DefinitionId) -> Option<Arc<CachedDefinition>> {
        self.entries.get(id).map(|entry| Arc::clone(entry.value()))
    }

    pub fn remove(&self, id: &DefinitionId) {
        self.entries.remove(id);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
