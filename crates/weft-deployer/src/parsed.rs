//! Parsed deployment aggregate
//!
//! Binds one deployment to its process definitions, each definition's
//! parsed model, and the deployment's resource set. Built once per deploy
//! call; the pipeline works on a clone per attempt, so a conflict retry
//! always starts from the pristine aggregate.

use crate::IdGenerator;
use std::collections::HashMap;
use weft_types::{Deployment, DeploymentId, ProcessDefinition, ProcessModel, Resource, TenantId};

/// Immutable aggregate of a deployment, its definitions and their models.
///
/// Read-only after construction, with one exception: the deployment's
/// resource set, which the pipeline extends with generated diagrams.
#[derive(Debug, Clone)]
pub struct ParsedDeployment {
    pub(crate) deployment: Deployment,
    pub(crate) definitions: Vec<ProcessDefinition>,
    pub(crate) models: HashMap<String, ProcessModel>,
}

impl ParsedDeployment {
    pub fn deployment(&self) -> &Deployment {
        &self.deployment
    }

    pub fn definitions(&self) -> &[ProcessDefinition] {
        &self.definitions
    }

    /// Parsed model for the definition with the given key
    pub fn model_for(&self, key: &str) -> Option<&ProcessModel> {
        self.models.get(key)
    }

    /// Rebuild the aggregate for an already-persisted deployment (e.g.
    /// restart rehydration). The pipeline will reconcile the in-memory
    /// definitions with storage instead of creating new versions.
    pub fn for_existing(
        mut deployment: Deployment,
        models: Vec<(ProcessModel, String)>,
    ) -> ParsedDeployment {
        deployment.is_new = false;

        let mut definitions = Vec::with_capacity(models.len());
        let mut model_map = HashMap::with_capacity(models.len());
        for (model, resource_name) in models {
            let mut definition = ProcessDefinition::new(&model.process_id);
            definition.name = model.name.clone();
            definition.resource_name = Some(resource_name);
            definitions.push(definition);
            model_map.insert(model.process_id.clone(), model);
        }

        ParsedDeployment {
            deployment,
            definitions,
            models: model_map,
        }
    }
}

/// Builds a [`ParsedDeployment`] from parsed models and raw resources.
///
/// Stands in for the upstream deployment-builder collaborator; the
/// pipeline consumes only the finished aggregate.
#[derive(Debug, Default)]
pub struct ParsedDeploymentBuilder {
    name: Option<String>,
    tenant_id: TenantId,
    category: Option<String>,
    entries: Vec<(ProcessModel, String, Vec<u8>)>,
}

impl ParsedDeploymentBuilder {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    pub fn tenant(mut self, tenant_id: TenantId) -> Self {
        self.tenant_id = tenant_id;
        self
    }

    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Add one parsed model together with the resource it came from
    pub fn add_model(
        mut self,
        model: ProcessModel,
        resource_name: impl Into<String>,
        bytes: Vec<u8>,
    ) -> Self {
        self.entries.push((model, resource_name.into(), bytes));
        self
    }

    /// Build a new deployment aggregate. The deployment id comes from the
    /// engine's id generator; `is_new` is set.
    pub fn build(self, id_generator: &dyn IdGenerator) -> ParsedDeployment {
        let mut deployment = Deployment::new(DeploymentId::new(id_generator.next_id()));
        deployment.name = self.name;
        deployment.tenant_id = self.tenant_id;
        deployment.category = self.category;

        let mut definitions = Vec::with_capacity(self.entries.len());
        let mut models = HashMap::with_capacity(self.entries.len());
        for (model, resource_name, bytes) in self.entries {
            deployment.add_resource(Resource::new(
                resource_name.clone(),
                bytes,
                deployment.id.clone(),
            ));
            let mut definition = ProcessDefinition::new(&model.process_id);
            definition.name = model.name.clone();
            definition.resource_name = Some(resource_name);
            definitions.push(definition);
            models.insert(model.process_id.clone(), model);
        }

        ParsedDeployment {
            deployment,
            definitions,
            models,
        }
    }
}
