//! Write-batch unit of work

use serde_json::Value;
use weft_types::{
    DefinitionId, Deployment, ProcessDefinition, Subscription, SubscriptionIdentity, TenantId,
};

/// A subscription to cancel, addressed by identity within its scope
#[derive(Debug, Clone, PartialEq)]
pub struct SubscriptionRemoval {
    pub process_key: String,
    pub tenant_id: TenantId,
    pub identity: SubscriptionIdentity,
}

/// All writes staged by one command, applied atomically at commit.
///
/// Order within each table is preserved; the backend applies removals
/// before additions so a re-declared trigger never transits through a
/// duplicate state.
#[derive(Debug, Clone, Default)]
pub struct WriteBatch {
    pub deployments: Vec<Deployment>,
    pub definitions: Vec<ProcessDefinition>,
    pub subscriptions_added: Vec<Subscription>,
    pub subscriptions_removed: Vec<SubscriptionRemoval>,
    pub localization_saves: Vec<(DefinitionId, Value)>,
}

impl WriteBatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.deployments.is_empty()
            && self.definitions.is_empty()
            && self.subscriptions_added.is_empty()
            && self.subscriptions_removed.is_empty()
            && self.localization_saves.is_empty()
    }

    /// Number of individual writes this batch will perform
    pub fn write_count(&self) -> usize {
        self.deployments.len()
            + self.definitions.len()
            + self.subscriptions_added.len()
            + self.subscriptions_removed.len()
            + self.localization_saves.len()
    }
}
