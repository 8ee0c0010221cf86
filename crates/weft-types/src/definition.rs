//! Process definition entity

use crate::{DefinitionId, DeploymentId, TenantId};
use serde::{Deserialize, Serialize};

/// Whether a definition currently accepts new process starts
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SuspensionState {
    #[default]
    Active,
    Suspended,
}

/// A versioned template describing a workflow graph.
///
/// Versioning identity is `(key, tenant_id)`: versions for one pair are
/// strictly increasing by 1 from 1, with no gaps or reuse. The `id` is
/// globally unique across the whole engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessDefinition {
    pub id: DefinitionId,
    pub key: String,
    pub version: i32,
    pub name: Option<String>,
    pub tenant_id: TenantId,
    pub deployment_id: DeploymentId,
    /// Name of the resource this definition was parsed from
    pub resource_name: Option<String>,
    /// Name of the diagram resource, if the deployment carries one
    pub diagram_resource_name: Option<String>,
    pub suspension_state: SuspensionState,
    pub category: Option<String>,
}

impl ProcessDefinition {
    /// A not-yet-deployed definition for the given key. Id, version and
    /// deployment values are filled in by the deployment pipeline.
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            id: DefinitionId::unassigned(),
            key: key.into(),
            version: 0,
            name: None,
            tenant_id: TenantId::default(),
            deployment_id: DeploymentId::new(""),
            resource_name: None,
            diagram_resource_name: None,
            suspension_state: SuspensionState::default(),
            category: None,
        }
    }

    /// The (key, tenant) pair used for versioning lookups
    pub fn natural_key(&self) -> (&str, &TenantId) {
        (&self.key, &self.tenant_id)
    }
}
