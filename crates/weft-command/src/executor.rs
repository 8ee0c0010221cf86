//! Command executor
//!
//! Owns the interceptor chain, assembled once at construction. Independent
//! callers may share one executor and submit commands concurrently; each
//! top-level submission gets its own context and transaction.

use crate::{
    Command, CommandConfig, CommandContext, CommandInterceptor, ContextInterceptor,
    EventDispatcher, Invocation, LogInterceptor, RetryInterceptor, TransactionInterceptor,
};
use std::sync::Arc;
use weft_storage::EngineStorage;
use weft_types::EngineResult;

type Chain = LogInterceptor<RetryInterceptor<TransactionInterceptor<ContextInterceptor>>>;

/// Entry point for every engine operation
pub struct CommandExecutor {
    default_config: CommandConfig,
    chain: Chain,
}

impl CommandExecutor {
    pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;

    pub fn new(storage: Arc<dyn EngineStorage>, dispatcher: Arc<dyn EventDispatcher>) -> Self {
        Self::with_retry_attempts(storage, dispatcher, Self::DEFAULT_MAX_ATTEMPTS)
    }

    pub fn with_retry_attempts(
        storage: Arc<dyn EngineStorage>,
        dispatcher: Arc<dyn EventDispatcher>,
        max_attempts: u32,
    ) -> Self {
        let chain = LogInterceptor::new(RetryInterceptor::new(
            TransactionInterceptor::new(ContextInterceptor::new(dispatcher), storage),
            max_attempts,
        ));
        Self {
            default_config: CommandConfig::new(),
            chain,
        }
    }

    /// Execute with the default config
    pub fn execute<C: Command>(&self, command: &C) -> EngineResult<C::Output> {
        self.execute_with(&self.default_config, command)
    }

    pub fn execute_with<C: Command>(
        &self,
        config: &CommandConfig,
        command: &C,
    ) -> EngineResult<C::Output> {
        self.chain.execute(config, command, Invocation::root())
    }

    /// Execute from inside another command. Per the config, the nested
    /// command either joins the caller's context or pushes an isolated one.
    pub fn execute_nested<C: Command>(
        &self,
        config: &CommandConfig,
        command: &C,
        caller: &mut CommandContext,
    ) -> EngineResult<C::Output> {
        self.chain.execute(config, command, Invocation::nested(caller))
    }
}
