//! Engine lifecycle events
//!
//! For every successfully deployed new definition the engine emits
//! `EntityCreated` (after id/version assignment) followed by
//! `EntityInitialized` (after persistence and subscription reconciliation).
//! Consumers may rely on that order, and on created never firing without a
//! following initialized for a successful deploy.

use crate::{DefinitionId, TenantId};
use serde::{Deserialize, Serialize};

/// Payload common to definition lifecycle events
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DefinitionEventPayload {
    pub definition_id: DefinitionId,
    pub key: String,
    pub version: i32,
    pub tenant_id: TenantId,
}

/// A lifecycle event emitted by the engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum EngineEvent {
    EntityCreated(DefinitionEventPayload),
    EntityInitialized(DefinitionEventPayload),
}

impl EngineEvent {
    pub fn payload(&self) -> &DefinitionEventPayload {
        match self {
            Self::EntityCreated(payload) | Self::EntityInitialized(payload) => payload,
        }
    }
}
