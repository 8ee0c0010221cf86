//! Diagram rendering and resource-name resolution

use crate::EngineSettings;
use std::collections::BTreeMap;
use std::sync::Arc;
use weft_types::{Deployment, ProcessDefinition, ProcessModel, Resource};

/// Suffixes a diagram resource may carry, in resolution order
pub const DIAGRAM_SUFFIXES: [&str; 4] = ["png", "jpg", "gif", "svg"];

/// Renders a diagram image for a definition's model.
///
/// Rendering internals live outside this workspace; `None` means the
/// renderer cannot produce an image for this model.
pub trait DiagramRenderer: Send + Sync {
    fn render(&self, definition: &ProcessDefinition, model: &ProcessModel) -> Option<Vec<u8>>;
}

/// Renderer that never produces a diagram
#[derive(Debug, Default)]
pub struct NullRenderer;

impl DiagramRenderer for NullRenderer {
    fn render(&self, _definition: &ProcessDefinition, _model: &ProcessModel) -> Option<Vec<u8>> {
        None
    }
}

/// Find the diagram resource belonging to a definition's source resource.
///
/// Candidates are `<resource>.<suffix>` and `<stem>.<suffix>` for every
/// known suffix; the first name present in the deployment's resource set
/// wins.
pub fn diagram_resource_name(
    resource_name: &str,
    resources: &BTreeMap<String, Resource>,
) -> Option<String> {
    let stem = resource_name
        .rsplit_once('.')
        .map(|(stem, _)| stem)
        .unwrap_or(resource_name);
    for base in [resource_name, stem] {
        for suffix in DIAGRAM_SUFFIXES {
            let candidate = format!("{base}.{suffix}");
            if resources.contains_key(&candidate) {
                return Some(candidate);
            }
        }
    }
    None
}

/// Decides whether a definition needs a generated diagram and renders one
pub struct DiagramHelper {
    renderer: Arc<dyn DiagramRenderer>,
}

impl DiagramHelper {
    pub fn new(renderer: Arc<dyn DiagramRenderer>) -> Self {
        Self { renderer }
    }

    /// A diagram is generated only for new deployments, when the engine is
    /// configured for it, the model carries layout info, and no diagram
    /// resource exists yet for the definition.
    pub fn should_create_diagram(
        &self,
        definition: &ProcessDefinition,
        deployment: &Deployment,
        model: &ProcessModel,
        settings: &EngineSettings,
    ) -> bool {
        if !deployment.is_new || !settings.create_diagram_on_deploy || !model.has_graphical_info {
            return false;
        }
        match definition.resource_name.as_deref() {
            Some(resource_name) => {
                diagram_resource_name(resource_name, &deployment.resources).is_none()
            }
            None => false,
        }
    }

    /// Render a diagram and wrap it as a generated deployment resource
    pub fn create_diagram(
        &self,
        definition: &ProcessDefinition,
        model: &ProcessModel,
        deployment: &Deployment,
    ) -> Option<Resource> {
        let resource_name = definition.resource_name.as_deref()?;
        let bytes = self.renderer.render(definition, model)?;
        let mut resource = Resource::new(
            format!("{resource_name}.{}", DIAGRAM_SUFFIXES[0]),
            bytes,
            deployment.id.clone(),
        );
        resource.generated = true;
        Some(resource)
    }
}
