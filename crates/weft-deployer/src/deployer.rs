//! Deployment orchestrator

use crate::helper::PreviousVersions;
use crate::{
    diagram_resource_name, AuthorizationGrantor, CachedDefinition, DefinitionCache,
    DeploymentHelper, DiagramHelper, DiagramRenderer, EngineSettings, IdGenerator,
    ParsedDeployment,
};
use std::sync::Arc;
use tracing::{debug, warn};
use weft_command::{CommandContext, EventDispatcher};
use weft_storage::EngineStorage;
use weft_types::{
    DefinitionEventPayload, EngineEvent, EngineResult, ProcessDefinition,
};

/// Sequences the deployment pipeline over a parsed deployment.
///
/// Stateless between calls; all mutation goes through the command context
/// it is handed, so the interceptor chain owns atomicity and retries.
pub struct DefinitionDeployer {
    storage: Arc<dyn EngineStorage>,
    dispatcher: Arc<dyn EventDispatcher>,
    id_generator: Arc<dyn IdGenerator>,
    grantor: Arc<dyn AuthorizationGrantor>,
    helper: DeploymentHelper,
    diagram_helper: DiagramHelper,
    cache: Arc<DefinitionCache>,
    settings: EngineSettings,
}

impl DefinitionDeployer {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        storage: Arc<dyn EngineStorage>,
        dispatcher: Arc<dyn EventDispatcher>,
        id_generator: Arc<dyn IdGenerator>,
        grantor: Arc<dyn AuthorizationGrantor>,
        renderer: Arc<dyn DiagramRenderer>,
        cache: Arc<DefinitionCache>,
        settings: EngineSettings,
    ) -> Self {
        Self {
            storage,
            dispatcher,
            id_generator,
            grantor,
            helper: DeploymentHelper,
            diagram_helper: DiagramHelper::new(renderer),
            cache,
            settings,
        }
    }

    /// Run the full deployment pipeline for one parsed deployment.
    ///
    /// Works on a clone of the aggregate, so a conflict retry re-executes
    /// from the pristine input. Returns the finalized definitions.
    pub fn deploy(
        &self,
        parsed: &ParsedDeployment,
        ctx: &mut CommandContext,
    ) -> EngineResult<Vec<ProcessDefinition>> {
        let mut working = parsed.clone();
        debug!(deployment = %working.deployment.id, "processing deployment");

        // Precondition: checked before anything is staged.
        self.helper
            .verify_definitions_do_not_share_keys(&working.definitions, &working.deployment)?;

        self.helper
            .copy_deployment_values(&working.deployment, &mut working.definitions);
        self.create_diagrams_if_needed(&mut working);
        self.set_diagram_names(&mut working);

        if working.deployment.is_new {
            ctx.batch_mut().deployments.push(working.deployment.clone());

            let previous = self.previous_versions(&working)?;
            // Checked once, before any event payload is built.
            let events_enabled = self.dispatcher.enabled();
            self.assign_versions_and_ids(&mut working, &previous, events_enabled, ctx);
            self.stage_definitions_and_grants(&working, ctx);
            self.reconcile_subscriptions(&working, &previous, ctx)?;
            self.record_initialized_events(&working, events_enabled, ctx);
        } else {
            self.align_with_persisted_versions(&mut working)?;
        }

        self.publish_to_cache(&working, ctx);
        self.merge_localization_overrides(&working, ctx)?;

        Ok(working.definitions)
    }

    /// Render and attach diagrams before diagram names are finalized, so
    /// the generated resources are found by the name resolution below.
    fn create_diagrams_if_needed(&self, working: &mut ParsedDeployment) {
        let ParsedDeployment {
            deployment,
            definitions,
            models,
        } = working;
        for definition in definitions.iter() {
            let Some(model) = models.get(&definition.key) else {
                continue;
            };
            if !self
                .diagram_helper
                .should_create_diagram(definition, deployment, model, &self.settings)
            {
                continue;
            }
            if let Some(resource) = self
                .diagram_helper
                .create_diagram(definition, model, deployment)
            {
                debug!(definition = %definition.key, resource = %resource.name, "generated diagram");
                deployment.add_resource(resource);
            }
        }
    }

    fn set_diagram_names(&self, working: &mut ParsedDeployment) {
        let ParsedDeployment {
            deployment,
            definitions,
            ..
        } = working;
        for definition in definitions.iter_mut() {
            definition.diagram_resource_name = definition
                .resource_name
                .as_deref()
                .and_then(|resource_name| {
                    diagram_resource_name(resource_name, &deployment.resources)
                });
        }
    }

    /// Most recent persisted version per definition key. A missing entry
    /// means the definition is its first version.
    fn previous_versions(&self, working: &ParsedDeployment) -> EngineResult<PreviousVersions> {
        let mut previous = PreviousVersions::new();
        for definition in &working.definitions {
            if let Some(existing) = self
                .helper
                .most_recent_version(self.storage.as_ref(), definition)?
            {
                previous.insert(definition.key.clone(), existing);
            }
        }
        Ok(previous)
    }

    fn assign_versions_and_ids(
        &self,
        working: &mut ParsedDeployment,
        previous: &PreviousVersions,
        events_enabled: bool,
        ctx: &mut CommandContext,
    ) {
        for definition in working.definitions.iter_mut() {
            definition.version = previous
                .get(&definition.key)
                .map(|latest| latest.version + 1)
                .unwrap_or(1);
            definition.id = self.helper.new_definition_id(
                &definition.key,
                definition.version,
                &self.id_generator.next_id(),
            );
            if events_enabled {
                ctx.record_event(EngineEvent::EntityCreated(payload(definition)));
            }
        }
    }

    fn stage_definitions_and_grants(&self, working: &ParsedDeployment, ctx: &mut CommandContext) {
        for definition in &working.definitions {
            ctx.batch_mut().definitions.push(definition.clone());
            if let Some(model) = working.models.get(&definition.key) {
                self.grantor.grant(model, definition);
            }
        }
    }

    fn reconcile_subscriptions(
        &self,
        working: &ParsedDeployment,
        previous: &PreviousVersions,
        ctx: &mut CommandContext,
    ) -> EngineResult<()> {
        for definition in &working.definitions {
            let Some(model) = working.models.get(&definition.key) else {
                continue;
            };
            self.helper.reconcile_subscriptions(
                self.storage.as_ref(),
                ctx.batch_mut(),
                definition,
                previous.get(&definition.key),
                model,
            )?;
        }
        Ok(())
    }

    fn record_initialized_events(
        &self,
        working: &ParsedDeployment,
        events_enabled: bool,
        ctx: &mut CommandContext,
    ) {
        if !events_enabled {
            return;
        }
        for definition in &working.definitions {
            ctx.record_event(EngineEvent::EntityInitialized(payload(definition)));
        }
    }

    /// Redeploy path: the persisted state wins; in-memory objects are
    /// reconciled to match storage, never the other way around. A
    /// definition with no persisted counterpart keeps its unassigned id
    /// and is excluded from cache and localization below.
    fn align_with_persisted_versions(&self, working: &mut ParsedDeployment) -> EngineResult<()> {
        for definition in working.definitions.iter_mut() {
            match self
                .helper
                .persisted_definition(self.storage.as_ref(), definition)?
            {
                Some(persisted) => {
                    definition.id = persisted.id;
                    definition.version = persisted.version;
                    definition.suspension_state = persisted.suspension_state;
                }
                None => {
                    warn!(
                        key = %definition.key,
                        deployment = %definition.deployment_id,
                        "no persisted definition found while rehydrating"
                    );
                }
            }
        }
        Ok(())
    }

    /// Register cache publication as a post-commit action: the cache is
    /// the barrier after which concurrent process-start callers observe
    /// the deployment, and it must never expose rolled-back definitions.
    fn publish_to_cache(&self, working: &ParsedDeployment, ctx: &mut CommandContext) {
        let entries: Vec<CachedDefinition> = working
            .definitions
            .iter()
            .filter(|definition| !definition.id.is_unassigned())
            .filter_map(|definition| {
                working.models.get(&definition.key).map(|model| CachedDefinition {
                    definition: definition.clone(),
                    model: model.clone(),
                })
            })
            .collect();
        let cache = Arc::clone(&self.cache);
        ctx.after_commit(move || {
            for entry in entries {
                cache.insert(entry);
            }
        });
    }

    fn merge_localization_overrides(
        &self,
        working: &ParsedDeployment,
        ctx: &mut CommandContext,
    ) -> EngineResult<()> {
        for definition in &working.definitions {
            if definition.id.is_unassigned() {
                continue;
            }
            let Some(model) = working.models.get(&definition.key) else {
                continue;
            };
            let mut blob = self.storage.localization(&definition.id)?;
            if crate::merge_localizations(model, &mut blob) {
                ctx.batch_mut()
                    .localization_saves
                    .push((definition.id.clone(), blob));
            }
        }
        Ok(())
    }
}

fn payload(definition: &ProcessDefinition) -> DefinitionEventPayload {
    DefinitionEventPayload {
        definition_id: definition.id.clone(),
        key: definition.key.clone(),
        version: definition.version,
        tenant_id: definition.tenant_id.clone(),
    }
}
