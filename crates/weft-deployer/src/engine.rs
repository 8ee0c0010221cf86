//! Engine facade
//!
//! Wires storage, dispatcher, deployer and executor together. The builder
//! swaps any collaborator for a custom one; the defaults give a fully
//! working in-memory engine.

use crate::{
    AuthorizationGrantor, DefinitionCache, DefinitionDeployer, DeployCmd, DiagramRenderer,
    EngineSettings, IdGenerator, NullGrantor, NullRenderer, ParsedDeployment, UuidGenerator,
};
use std::sync::Arc;
use weft_command::{CommandExecutor, EventDispatcher, NullDispatcher};
use weft_storage::{EngineStorage, InMemoryStorage};
use weft_types::{EngineResult, ProcessDefinition};

pub struct ProcessEngine {
    storage: Arc<dyn EngineStorage>,
    executor: CommandExecutor,
    deployer: Arc<DefinitionDeployer>,
    cache: Arc<DefinitionCache>,
}

impl ProcessEngine {
    pub fn builder() -> ProcessEngineBuilder {
        ProcessEngineBuilder::default()
    }

    /// Deploy a parsed deployment through the full interceptor chain
    pub fn deploy(&self, parsed: ParsedDeployment) -> EngineResult<Vec<ProcessDefinition>> {
        let command = DeployCmd::new(Arc::clone(&self.deployer), parsed);
        self.executor.execute(&command)
    }

    pub fn storage(&self) -> &Arc<dyn EngineStorage> {
        &self.storage
    }

    pub fn cache(&self) -> &Arc<DefinitionCache> {
        &self.cache
    }

    pub fn executor(&self) -> &CommandExecutor {
        &self.executor
    }
}

pub struct ProcessEngineBuilder {
    storage: Option<Arc<dyn EngineStorage>>,
    dispatcher: Arc<dyn EventDispatcher>,
    renderer: Arc<dyn DiagramRenderer>,
    grantor: Arc<dyn AuthorizationGrantor>,
    id_generator: Arc<dyn IdGenerator>,
    settings: EngineSettings,
    retry_attempts: u32,
}

impl Default for ProcessEngineBuilder {
    fn default() -> Self {
        Self {
            storage: None,
            dispatcher: Arc::new(NullDispatcher),
            renderer: Arc::new(NullRenderer),
            grantor: Arc::new(NullGrantor),
            id_generator: Arc::new(UuidGenerator),
            settings: EngineSettings::default(),
            retry_attempts: CommandExecutor::DEFAULT_MAX_ATTEMPTS,
        }
    }
}

impl ProcessEngineBuilder {
    pub fn storage(mut self, storage: Arc<dyn EngineStorage>) -> Self {
        self.storage = Some(storage);
        self
    }

    pub fn dispatcher(mut self, dispatcher: Arc<dyn EventDispatcher>) -> Self {
        self.dispatcher = dispatcher;
        self
    }

    pub fn renderer(mut self, renderer: Arc<dyn DiagramRenderer>) -> Self {
        self.renderer = renderer;
        self
    }

    pub fn grantor(mut self, grantor: Arc<dyn AuthorizationGrantor>) -> Self {
        self.grantor = grantor;
        self
    }

    pub fn id_generator(mut self, id_generator: Arc<dyn IdGenerator>) -> Self {
        self.id_generator = id_generator;
        self
    }

    pub fn settings(mut self, settings: EngineSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn retry_attempts(mut self, attempts: u32) -> Self {
        self.retry_attempts = attempts;
        self
    }

    pub fn build(self) -> ProcessEngine {
        let storage = self
            .storage
            .unwrap_or_else(|| Arc::new(InMemoryStorage::new()));
        let cache = Arc::new(DefinitionCache::new());
        let deployer = Arc::new(DefinitionDeployer::new(
            Arc::clone(&storage),
            Arc::clone(&self.dispatcher),
            self.id_generator,
            self.grantor,
            self.renderer,
            Arc::clone(&cache),
            self.settings,
        ));
        let executor = CommandExecutor::with_retry_attempts(
            Arc::clone(&storage),
            self.dispatcher,
            self.retry_attempts,
        );
        ProcessEngine {
            storage,
            executor,
            deployer,
            cache,
        }
    }
}
