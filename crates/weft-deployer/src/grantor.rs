//! Authorization grant collaborator

use std::sync::Mutex;
use weft_types::{DefinitionId, ProcessDefinition, ProcessModel};

/// Applies start-authorization grants for a newly persisted definition,
/// based on the candidate starter users/groups its model declares. Grant
/// computation lives outside this workspace.
pub trait AuthorizationGrantor: Send + Sync {
    fn grant(&self, model: &ProcessModel, definition: &ProcessDefinition);
}

/// Grantor that applies nothing
#[derive(Debug, Default)]
pub struct NullGrantor;

impl AuthorizationGrantor for NullGrantor {
    fn grant(&self, _model: &ProcessModel, _definition: &ProcessDefinition) {}
}

/// Records which definitions were granted; used by tests
#[derive(Debug, Default)]
pub struct CollectingGrantor {
    granted: Mutex<Vec<DefinitionId>>,
}

impl CollectingGrantor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn granted(&self) -> Vec<DefinitionId> {
        self.granted.lock().map(|g| g.clone()).unwrap_or_default()
    }
}

impl AuthorizationGrantor for CollectingGrantor {
    fn grant(&self, _model: &ProcessModel, definition: &ProcessDefinition) {
        if let Ok(mut granted) = self.granted.lock() {
            granted.push(definition.id.clone());
        }
    }
}
