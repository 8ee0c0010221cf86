//! Storage trait and transaction boundary

use crate::{StoreResult, WriteBatch};
use serde_json::Value;
use weft_types::{DefinitionId, DeploymentId, ProcessDefinition, Subscription, TenantId};

/// Read surface plus transaction factory of a storage backend.
///
/// Reads always observe the latest committed state. All writes go through
/// a [`Transaction`] carrying a [`WriteBatch`]; backends must apply a batch
/// atomically and perform the optimistic (key, tenant, version) check
/// inside commit.
pub trait EngineStorage: Send + Sync {
    /// Open a transaction for one unit of work
    fn begin(&self) -> Box<dyn Transaction>;

    /// Most recent persisted version for (key, tenant), if any
    fn latest_definition(
        &self,
        key: &str,
        tenant_id: &TenantId,
    ) -> StoreResult<Option<ProcessDefinition>>;

    /// Persisted definition addressed by its deployment plus key
    fn definition_by_deployment_and_key(
        &self,
        deployment_id: &DeploymentId,
        key: &str,
    ) -> StoreResult<Option<ProcessDefinition>>;

    /// Persisted definition by global id
    fn definition_by_id(&self, id: &DefinitionId) -> StoreResult<Option<ProcessDefinition>>;

    /// Active start-trigger subscriptions for a (key, tenant) scope
    fn active_subscriptions(
        &self,
        key: &str,
        tenant_id: &TenantId,
    ) -> StoreResult<Vec<Subscription>>;

    /// Localization override blob for a definition; an empty object when
    /// none has been saved yet
    fn localization(&self, definition_id: &DefinitionId) -> StoreResult<Value>;
}

/// One open unit of work against a backend.
///
/// Consuming `self` on both exits makes a transaction impossible to close
/// twice. A dropped transaction that was neither committed nor rolled back
/// counts as rolled back: it has written nothing.
pub trait Transaction: Send {
    /// Apply the batch atomically. A conflict leaves the backend untouched.
    fn commit(self: Box<Self>, batch: WriteBatch) -> StoreResult<()>;

    /// Discard the unit of work
    fn rollback(self: Box<Self>);
}
