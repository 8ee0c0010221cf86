//! Persisted start-trigger subscriptions
//!
//! The latest version of a definition owns the active subscription set for
//! its (key, tenant) scope. Deploying a new version reconciles the set
//! against the declarations of the new model.

use crate::{DefinitionId, TenantId};
use serde::{Deserialize, Serialize};

/// Kind of start trigger a subscription represents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SubscriptionKind {
    Timer,
    Signal,
    Message,
}

/// The identity of a subscription for reconciliation purposes.
///
/// Two subscriptions with equal identity within one (key, tenant) scope are
/// the same trigger, regardless of which definition version created them.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SubscriptionIdentity {
    pub element_id: String,
    pub kind: SubscriptionKind,
    pub detail: String,
}

/// A persisted, active start-trigger subscription
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subscription {
    /// Definition version that declared (or last confirmed) this trigger
    pub definition_id: DefinitionId,
    pub process_key: String,
    pub tenant_id: TenantId,
    pub element_id: String,
    pub kind: SubscriptionKind,
    pub detail: String,
}

impl Subscription {
    pub fn identity(&self) -> SubscriptionIdentity {
        SubscriptionIdentity {
            element_id: self.element_id.clone(),
            kind: self.kind,
            detail: self.detail.clone(),
        }
    }
}
