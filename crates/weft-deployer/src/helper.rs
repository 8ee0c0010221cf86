//! Stateless deployment domain operations

use std::collections::{HashMap, HashSet};
use weft_storage::{EngineStorage, SubscriptionRemoval, WriteBatch};
use weft_types::{
    DefinitionId, Deployment, EngineError, EngineResult, ProcessDefinition, ProcessModel,
    Subscription, SubscriptionIdentity,
};

/// Maximum length of a definition id; longer composite ids fall back to
/// the bare generated id.
pub const MAX_DEFINITION_ID_LENGTH: usize = 64;

/// Stateless helper operations shared by the deployment pipeline
#[derive(Debug, Default)]
pub struct DeploymentHelper;

impl DeploymentHelper {
    /// Precondition of every deploy: no two definitions in one deployment
    /// may share (key, tenant). All definitions of a deployment live in
    /// the deployment's tenant, so duplicate keys are exactly the
    /// collisions to reject - before anything is staged or persisted.
    pub fn verify_definitions_do_not_share_keys(
        &self,
        definitions: &[ProcessDefinition],
        deployment: &Deployment,
    ) -> EngineResult<()> {
        let mut seen = HashSet::new();
        for definition in definitions {
            if !seen.insert(definition.key.as_str()) {
                return Err(EngineError::Validation(format!(
                    "deployment contains two definitions with key '{}' in tenant '{}'",
                    definition.key, deployment.tenant_id
                )));
            }
        }
        Ok(())
    }

    /// Copy deployment-level values onto every definition
    pub fn copy_deployment_values(
        &self,
        deployment: &Deployment,
        definitions: &mut [ProcessDefinition],
    ) {
        for definition in definitions {
            definition.tenant_id = deployment.tenant_id.clone();
            definition.deployment_id = deployment.id.clone();
            if definition.category.is_none() {
                definition.category = deployment.category.clone();
            }
        }
    }

    /// Most recent persisted version sharing (key, tenant); absence means
    /// the definition is the first version.
    pub fn most_recent_version(
        &self,
        storage: &dyn EngineStorage,
        definition: &ProcessDefinition,
    ) -> EngineResult<Option<ProcessDefinition>> {
        Ok(storage.latest_definition(&definition.key, &definition.tenant_id)?)
    }

    /// Persisted counterpart of a definition within its own deployment,
    /// used to reconcile redeploys.
    pub fn persisted_definition(
        &self,
        storage: &dyn EngineStorage,
        definition: &ProcessDefinition,
    ) -> EngineResult<Option<ProcessDefinition>> {
        Ok(storage.definition_by_deployment_and_key(&definition.deployment_id, &definition.key)?)
    }

    /// Id for a newly versioned definition: `key:version:generated`, or
    /// the generated id alone when the composite exceeds
    /// [`MAX_DEFINITION_ID_LENGTH`]. Both forms are globally unique
    /// because the generated part is.
    pub fn new_definition_id(&self, key: &str, version: i32, generated: &str) -> DefinitionId {
        let composite = format!("{key}:{version}:{generated}");
        if composite.len() > MAX_DEFINITION_ID_LENGTH {
            DefinitionId::new(generated)
        } else {
            DefinitionId::new(composite)
        }
    }

    /// Reconcile the active subscription set of (key, tenant) with the
    /// declarations of the new definition's model: stage additions for
    /// newly declared triggers and removals for triggers the previous
    /// version had but the new model no longer declares. Idempotent with
    /// respect to what is already active - no duplicates, no orphans.
    pub fn reconcile_subscriptions(
        &self,
        storage: &dyn EngineStorage,
        batch: &mut WriteBatch,
        definition: &ProcessDefinition,
        previous: Option<&ProcessDefinition>,
        model: &ProcessModel,
    ) -> EngineResult<()> {
        let active = if previous.is_some() {
            storage.active_subscriptions(&definition.key, &definition.tenant_id)?
        } else {
            Vec::new()
        };
        let active_identities: HashSet<SubscriptionIdentity> =
            active.iter().map(Subscription::identity).collect();
        let declared_identities: HashSet<SubscriptionIdentity> = model
            .subscriptions
            .iter()
            .map(|decl| SubscriptionIdentity {
                element_id: decl.element_id.clone(),
                kind: decl.kind,
                detail: decl.detail.clone(),
            })
            .collect();

        for declaration in &model.subscriptions {
            let identity = SubscriptionIdentity {
                element_id: declaration.element_id.clone(),
                kind: declaration.kind,
                detail: declaration.detail.clone(),
            };
            if !active_identities.contains(&identity) {
                batch.subscriptions_added.push(Subscription {
                    definition_id: definition.id.clone(),
                    process_key: definition.key.clone(),
                    tenant_id: definition.tenant_id.clone(),
                    element_id: declaration.element_id.clone(),
                    kind: declaration.kind,
                    detail: declaration.detail.clone(),
                });
            }
        }
        for subscription in &active {
            if !declared_identities.contains(&subscription.identity()) {
                batch.subscriptions_removed.push(SubscriptionRemoval {
                    process_key: definition.key.clone(),
                    tenant_id: definition.tenant_id.clone(),
                    identity: subscription.identity(),
                });
            }
        }
        Ok(())
    }
}

/// Previous persisted version per definition, keyed by definition key
pub(crate) type PreviousVersions = HashMap<String, ProcessDefinition>;

#[cfg(test)]
mod tests {
    use super::*;
    use weft_storage::InMemoryStorage;
    use weft_types::{DeploymentId, SubscriptionDeclaration, SubscriptionKind, TenantId};

    fn make_deployment() -> Deployment {
        Deployment::new(DeploymentId::new("deploy-1"))
    }

    #[test]
    fn duplicate_keys_are_rejected() {
        let helper = DeploymentHelper;
        let definitions = vec![
            ProcessDefinition::new("order-process"),
            ProcessDefinition::new("order-process"),
        ];
        let err = helper
            .verify_definitions_do_not_share_keys(&definitions, &make_deployment())
            .unwrap_err();
        assert!(matches!(err, EngineError::Validation(_)));

        let distinct = vec![
            ProcessDefinition::new("order-process"),
            ProcessDefinition::new("billing-process"),
        ];
        helper
            .verify_definitions_do_not_share_keys(&distinct, &make_deployment())
            .unwrap();
    }

    #[test]
    fn deployment_values_are_copied_onto_definitions() {
        let helper = DeploymentHelper;
        let mut deployment = make_deployment();
        deployment.tenant_id = TenantId::new("t1");
        deployment.category = Some("sales".into());

        let mut definitions = vec![ProcessDefinition::new("order")];
        helper.copy_deployment_values(&deployment, &mut definitions);

        assert_eq!(definitions[0].tenant_id, TenantId::new("t1"));
        assert_eq!(definitions[0].deployment_id, deployment.id);
        assert_eq!(definitions[0].category.as_deref(), Some("sales"));
    }

    #[test]
    fn definition_id_falls_back_when_composite_is_too_long() {
        let helper = DeploymentHelper;
        let generated = "3f8e7a60-9d4b-4c21-a2f5-58a4b1c0d9e2";

        let short = helper.new_definition_id("order", 1, generated);
        assert_eq!(short.as_str(), format!("order:1:{generated}"));

        let long_key = "a".repeat(60);
        let fallback = helper.new_definition_id(&long_key, 1, generated);
        assert_eq!(fallback.as_str(), generated);
    }

    fn timer_declaration(element_id: &str, schedule: &str) -> SubscriptionDeclaration {
        SubscriptionDeclaration {
            element_id: element_id.into(),
            kind: SubscriptionKind::Timer,
            detail: schedule.into(),
        }
    }

    #[test]
    fn first_version_stages_all_declared_subscriptions() {
        let helper = DeploymentHelper;
        let storage = InMemoryStorage::new();
        let mut batch = WriteBatch::new();

        let mut definition = ProcessDefinition::new("order");
        definition.id = DefinitionId::new("order:1:a");
        let mut model = ProcessModel::new("order");
        model.subscriptions.push(timer_declaration("start", "R/PT1H"));

        helper
            .reconcile_subscriptions(&storage, &mut batch, &definition, None, &model)
            .unwrap();

        assert_eq!(batch.subscriptions_added.len(), 1);
        assert!(batch.subscriptions_removed.is_empty());
    }

    #[test]
    fn unchanged_declarations_stage_nothing() {
        let helper = DeploymentHelper;
        let storage = InMemoryStorage::new();

        // Version 1 made its timer active.
        let mut seed = WriteBatch::new();
        seed.subscriptions_added.push(Subscription {
            definition_id: DefinitionId::new("order:1:a"),
            process_key: "order".into(),
            tenant_id: TenantId::default(),
            element_id: "start".into(),
            kind: SubscriptionKind::Timer,
            detail: "R/PT1H".into(),
        });
        storage.begin().commit(seed).unwrap();

        let mut previous = ProcessDefinition::new("order");
        previous.id = DefinitionId::new("order:1:a");
        previous.version = 1;
        let mut definition = ProcessDefinition::new("order");
        definition.id = DefinitionId::new("order:2:b");
        definition.version = 2;
        let mut model = ProcessModel::new("order");
        model.subscriptions.push(timer_declaration("start", "R/PT1H"));

        let mut batch = WriteBatch::new();
        helper
            .reconcile_subscriptions(&storage, &mut batch, &definition, Some(&previous), &model)
            .unwrap();

        assert!(batch.subscriptions_added.is_empty());
        assert!(batch.subscriptions_removed.is_empty());
    }

    #[test]
    fn dropped_declarations_are_cancelled_and_new_ones_created() {
        let helper = DeploymentHelper;
        let storage = InMemoryStorage::new();

        let mut seed = WriteBatch::new();
        seed.subscriptions_added.push(Subscription {
            definition_id: DefinitionId::new("order:1:a"),
            process_key: "order".into(),
            tenant_id: TenantId::default(),
            element_id: "start".into(),
            kind: SubscriptionKind::Timer,
            detail: "R/PT1H".into(),
        });
        storage.begin().commit(seed).unwrap();

        let mut previous = ProcessDefinition::new("order");
        previous.id = DefinitionId::new("order:1:a");
        let mut definition = ProcessDefinition::new("order");
        definition.id = DefinitionId::new("order:2:b");
        let mut model = ProcessModel::new("order");
        model.subscriptions.push(SubscriptionDeclaration {
            element_id: "start".into(),
            kind: SubscriptionKind::Signal,
            detail: "order-placed".into(),
        });

        let mut batch = WriteBatch::new();
        helper
            .reconcile_subscriptions(&storage, &mut batch, &definition, Some(&previous), &model)
            .unwrap();

        assert_eq!(batch.subscriptions_added.len(), 1);
        assert_eq!(batch.subscriptions_added[0].kind, SubscriptionKind::Signal);
        assert_eq!(batch.subscriptions_removed.len(), 1);
        assert_eq!(
            batch.subscriptions_removed[0].identity.kind,
            SubscriptionKind::Timer
        );
    }
}
