//! Engine settings consumed by the deployment pipeline

/// Deployment-related engine configuration
#[derive(Debug, Clone)]
pub struct EngineSettings {
    /// Generate a diagram for definitions that have graphical layout info
    /// but no diagram resource in their deployment
    pub create_diagram_on_deploy: bool,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            create_diagram_on_deploy: true,
        }
    }
}
