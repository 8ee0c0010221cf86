use crate::{DefinitionDeployer, ParsedDeployment};
use std::sync::Arc;
use weft_command::{Command, CommandContext};
use weft_types::{EngineResult, ProcessDefinition};

/// Command that runs the deployment pipeline inside the interceptor chain.
///
/// Holds the pristine parsed aggregate, so every retry attempt hands the
/// deployer the same input.
pub struct DeployCmd {
    deployer: Arc<DefinitionDeployer>,
    parsed: ParsedDeployment,
}

impl DeployCmd {
    pub fn new(deployer: Arc<DefinitionDeployer>, parsed: ParsedDeployment) -> Self {
        Self { deployer, parsed }
    }
}

impl Command for DeployCmd {
    type Output = Vec<ProcessDefinition>;

    fn name(&self) -> &str {
        "deploy"
    }

    fn execute(&self, ctx: &mut CommandContext) -> EngineResult<Self::Output> {
        self.deployer.deploy(&self.parsed, ctx)
    }
}
