//! In-memory storage backend
//!
//! DashMap tables plus a commit mutex: the mutex makes the optimistic
//! version check and the table writes one atomic section, which is the
//! whole transactional contract a single-process backend needs.

use crate::{EngineStorage, StoreError, StoreResult, Transaction, WriteBatch};
use dashmap::DashMap;
use serde_json::Value;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tracing::debug;
use weft_types::{DefinitionId, Deployment, DeploymentId, ProcessDefinition, Subscription, TenantId};

type ScopeKey = (String, String);

fn scope_key(key: &str, tenant_id: &TenantId) -> ScopeKey {
    (key.to_string(), tenant_id.as_str().to_string())
}

#[derive(Default)]
struct Tables {
    commit_lock: Mutex<()>,
    deployments: DashMap<DeploymentId, Deployment>,
    definitions: DashMap<DefinitionId, ProcessDefinition>,
    subscriptions: DashMap<ScopeKey, Vec<Subscription>>,
    localizations: DashMap<DefinitionId, Value>,
    writes: AtomicUsize,
    transactions: AtomicUsize,
}

/// In-memory reference backend
#[derive(Default)]
pub struct InMemoryStorage {
    tables: Arc<Tables>,
}

impl InMemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total individual writes applied by committed transactions.
    /// Diagnostic surface, mainly for tests asserting write-freedom.
    pub fn write_count(&self) -> usize {
        self.tables.writes.load(Ordering::SeqCst)
    }

    /// Number of transactions opened so far
    pub fn transaction_count(&self) -> usize {
        self.tables.transactions.load(Ordering::SeqCst)
    }

    pub fn definition_count(&self) -> usize {
        self.tables.definitions.len()
    }
}

impl EngineStorage for InMemoryStorage {
    fn begin(&self) -> Box<dyn Transaction> {
        self.tables.transactions.fetch_add(1, Ordering::SeqCst);
        Box::new(InMemoryTransaction {
            tables: Arc::clone(&self.tables),
        })
    }

    fn latest_definition(
        &self,
        key: &str,
        tenant_id: &TenantId,
    ) -> StoreResult<Option<ProcessDefinition>> {
        let mut latest: Option<ProcessDefinition> = None;
        for entry in self.tables.definitions.iter() {
            let definition = entry.value();
            if definition.key == key && &definition.tenant_id == tenant_id {
                match &latest {
                    Some(current) if current.version >= definition.version => {}
                    _ => latest = Some(definition.clone()),
                }
            }
        }
        Ok(latest)
    }

    fn definition_by_deployment_and_key(
        &self,
        deployment_id: &DeploymentId,
        key: &str,
    ) -> StoreResult<Option<ProcessDefinition>> {
        for entry in self.tables.definitions.iter() {
            let definition = entry.value();
            if &definition.deployment_id == deployment_id && definition.key == key {
                return Ok(Some(definition.clone()));
            }
        }
        Ok(None)
    }

    fn definition_by_id(&self, id: &DefinitionId) -> StoreResult<Option<ProcessDefinition>> {
        Ok(self.tables.definitions.get(id).map(|d| d.clone()))
    }

    fn active_subscriptions(
        &self,
        key: &str,
        tenant_id: &TenantId,
    ) -> StoreResult<Vec<Subscription>> {
        Ok(self
            .tables
            .subscriptions
            .get(&scope_key(key, tenant_id))
            .map(|subs| subs.clone())
            .unwrap_or_default())
    }

    fn localization(&self, definition_id: &DefinitionId) -> StoreResult<Value> {
        Ok(self
            .tables
            .localizations
            .get(definition_id)
            .map(|blob| blob.clone())
            .unwrap_or_else(|| Value::Object(serde_json::Map::new())))
    }
}

struct InMemoryTransaction {
    tables: Arc<Tables>,
}

impl Transaction for InMemoryTransaction {
    fn commit(self: Box<Self>, batch: WriteBatch) -> StoreResult<()> {
        let tables = &self.tables;
        let _guard = tables
            .commit_lock
            .lock()
            .map_err(|_| StoreError::Internal("commit lock poisoned".into()))?;

        // Optimistic check first: nothing is written when it fails.
        for definition in &batch.definitions {
            if tables.definitions.contains_key(&definition.id) {
                return Err(StoreError::Conflict(format!(
                    "definition id {} already exists",
                    definition.id
                )));
            }
            let clash = tables.definitions.iter().any(|entry| {
                let existing = entry.value();
                existing.key == definition.key
                    && existing.tenant_id == definition.tenant_id
                    && existing.version == definition.version
            });
            if clash {
                return Err(StoreError::Conflict(format!(
                    "version {} of ({}, {}) already persisted",
                    definition.version, definition.key, definition.tenant_id
                )));
            }
        }

        let mut writes = 0usize;

        for deployment in batch.deployments {
            tables.deployments.insert(deployment.id.clone(), deployment);
            writes += 1;
        }
        for definition in batch.definitions {
            tables
                .definitions
                .insert(definition.id.clone(), definition);
            writes += 1;
        }
        for removal in batch.subscriptions_removed {
            let scope = scope_key(&removal.process_key, &removal.tenant_id);
            if let Some(mut subs) = tables.subscriptions.get_mut(&scope) {
                subs.retain(|sub| sub.identity() != removal.identity);
            }
            writes += 1;
        }
        for subscription in batch.subscriptions_added {
            let scope = scope_key(&subscription.process_key, &subscription.tenant_id);
            let mut subs = tables.subscriptions.entry(scope).or_default();
            // Same identity means the same trigger: replace, never duplicate.
            subs.retain(|existing| existing.identity() != subscription.identity());
            subs.push(subscription);
            writes += 1;
        }
        for (definition_id, blob) in batch.localization_saves {
            tables.localizations.insert(definition_id, blob);
            writes += 1;
        }

        tables.writes.fetch_add(writes, Ordering::SeqCst);
        debug!(writes, "committed write batch");
        Ok(())
    }

    fn rollback(self: Box<Self>) {
        debug!("transaction rolled back");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use weft_types::SubscriptionKind;

    fn make_definition(key: &str, version: i32, id: &str) -> ProcessDefinition {
        let mut definition = ProcessDefinition::new(key);
        definition.version = version;
        definition.id = DefinitionId::new(id);
        definition.deployment_id = DeploymentId::new("deploy-1");
        definition
    }

    #[test]
    fn commit_applies_batch_and_counts_writes() {
        let storage = InMemoryStorage::new();
        let mut batch = WriteBatch::new();
        batch.deployments.push(Deployment::new(DeploymentId::new("deploy-1")));
        batch.definitions.push(make_definition("order", 1, "order:1:a"));

        storage.begin().commit(batch).unwrap();

        assert_eq!(storage.write_count(), 2);
        assert_eq!(storage.definition_count(), 1);
        let latest = storage
            .latest_definition("order", &TenantId::default())
            .unwrap()
            .unwrap();
        assert_eq!(latest.version, 1);
    }

    #[test]
    fn commit_rejects_duplicate_version_without_writing() {
        let storage = InMemoryStorage::new();
        let mut first = WriteBatch::new();
        first.definitions.push(make_definition("order", 1, "order:1:a"));
        storage.begin().commit(first).unwrap();

        let mut second = WriteBatch::new();
        second
            .deployments
            .push(Deployment::new(DeploymentId::new("deploy-2")));
        second.definitions.push(make_definition("order", 1, "order:1:b"));
        let err = storage.begin().commit(second).unwrap_err();

        assert!(matches!(err, StoreError::Conflict(_)));
        // The conflicting batch wrote nothing, deployment included.
        assert_eq!(storage.write_count(), 1);
        assert!(!storage
            .tables
            .deployments
            .contains_key(&DeploymentId::new("deploy-2")));
    }

    #[test]
    fn rollback_writes_nothing() {
        let storage = InMemoryStorage::new();
        let tx = storage.begin();
        tx.rollback();
        assert_eq!(storage.write_count(), 0);
    }

    #[test]
    fn latest_definition_picks_highest_version() {
        let storage = InMemoryStorage::new();
        let mut batch = WriteBatch::new();
        batch.definitions.push(make_definition("order", 1, "order:1:a"));
        batch.definitions.push(make_definition("other", 1, "other:1:c"));
        storage.begin().commit(batch).unwrap();
        let mut batch = WriteBatch::new();
        batch.definitions.push(make_definition("order", 2, "order:2:b"));
        storage.begin().commit(batch).unwrap();

        let latest = storage
            .latest_definition("order", &TenantId::default())
            .unwrap()
            .unwrap();
        assert_eq!(latest.version, 2);
        assert!(storage
            .latest_definition("missing", &TenantId::default())
            .unwrap()
            .is_none());
    }

    #[test]
    fn subscription_add_replaces_same_identity() {
        let storage = InMemoryStorage::new();
        let subscription = Subscription {
            definition_id: DefinitionId::new("order:1:a"),
            process_key: "order".into(),
            tenant_id: TenantId::default(),
            element_id: "start".into(),
            kind: SubscriptionKind::Timer,
            detail: "R/PT1H".into(),
        };

        let mut batch = WriteBatch::new();
        batch.subscriptions_added.push(subscription.clone());
        storage.begin().commit(batch).unwrap();

        let mut again = subscription.clone();
        again.definition_id = DefinitionId::new("order:2:b");
        let mut batch = WriteBatch::new();
        batch.subscriptions_added.push(again);
        storage.begin().commit(batch).unwrap();

        let active = storage
            .active_subscriptions("order", &TenantId::default())
            .unwrap();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].definition_id.as_str(), "order:2:b");
    }
}
