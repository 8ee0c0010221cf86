//! Interceptor chain stages
//!
//! The chain is a statically composed nest of stage values, built once at
//! engine construction: each stage owns the next by value, so the order is
//! immutable and there are no runtime next-pointers to rewire.

use crate::{Command, CommandConfig, CommandContext, EventDispatcher};
use std::sync::Arc;
use tracing::{debug, error, warn};
use weft_storage::{EngineStorage, Transaction};
use weft_types::EngineResult;

/// What flows down the chain besides the command itself: the caller's
/// context for nested invocations, and the transaction opened by the
/// transaction stage for the context stage to own.
pub struct Invocation<'a> {
    pub caller: Option<&'a mut CommandContext>,
    pub transaction: Option<Box<dyn Transaction>>,
}

impl Invocation<'static> {
    /// Top-level invocation: no caller, no transaction yet
    pub fn root() -> Self {
        Self {
            caller: None,
            transaction: None,
        }
    }
}

impl<'a> Invocation<'a> {
    /// Invocation from inside another command's context
    pub fn nested(caller: &'a mut CommandContext) -> Self {
        Self {
            caller: Some(caller),
            transaction: None,
        }
    }
}

/// One stage of the chain. Stages either delegate to the next stage or
/// short-circuit deliberately.
pub trait CommandInterceptor: Send + Sync {
    fn execute<C: Command>(
        &self,
        config: &CommandConfig,
        command: &C,
        inv: Invocation<'_>,
    ) -> EngineResult<C::Output>;
}

/// Outermost stage: observes every command and every unhandled fault,
/// translated or not.
pub struct LogInterceptor<N> {
    next: N,
}

impl<N> LogInterceptor<N> {
    pub fn new(next: N) -> Self {
        Self { next }
    }
}

impl<N: CommandInterceptor> CommandInterceptor for LogInterceptor<N> {
    fn execute<C: Command>(
        &self,
        config: &CommandConfig,
        command: &C,
        inv: Invocation<'_>,
    ) -> EngineResult<C::Output> {
        debug!(command = command.name(), "executing command");
        let result = self.next.execute(config, command, inv);
        match &result {
            Ok(_) => debug!(command = command.name(), "command finished"),
            Err(err) => error!(command = command.name(), %err, "command failed"),
        }
        result
    }
}

/// Bounded retry on conflict. Every attempt is a full, independent
/// re-execution with a fresh transaction and context; non-retryable errors
/// propagate on first occurrence. Invocations that join their caller's
/// context are passed through without retry.
pub struct RetryInterceptor<N> {
    next: N,
    max_attempts: u32,
}

impl<N> RetryInterceptor<N> {
    pub fn new(next: N, max_attempts: u32) -> Self {
        Self {
            next,
            max_attempts: max_attempts.max(1),
        }
    }
}

impl<N: CommandInterceptor> CommandInterceptor for RetryInterceptor<N> {
    fn execute<C: Command>(
        &self,
        config: &CommandConfig,
        command: &C,
        inv: Invocation<'_>,
    ) -> EngineResult<C::Output> {
        let Invocation { mut caller, .. } = inv;

        // A command joining its caller's context shares that unit of work,
        // so a retry could never get the fresh context each attempt
        // requires. Errors propagate to the caller's own retry scope.
        if config.context_reuse_possible() && caller.is_some() {
            let joined = Invocation {
                caller,
                transaction: None,
            };
            return self.next.execute(config, command, joined);
        }

        let mut attempt = 1u32;
        loop {
            let reborrowed = Invocation {
                caller: caller.as_mut().map(|ctx| &mut **ctx),
                transaction: None,
            };
            match self.next.execute(config, command, reborrowed) {
                Err(err) if err.is_retryable() && attempt < self.max_attempts => {
                    warn!(
                        command = command.name(),
                        attempt,
                        max_attempts = self.max_attempts,
                        %err,
                        "conflict, retrying command"
                    );
                    attempt += 1;
                }
                result => return result,
            }
        }
    }
}

/// Opens a storage transaction when the config requires one, unless the
/// command is about to join its caller's context (which already owns the
/// transaction for this unit of work).
pub struct TransactionInterceptor<N> {
    next: N,
    storage: Arc<dyn EngineStorage>,
}

impl<N> TransactionInterceptor<N> {
    pub fn new(next: N, storage: Arc<dyn EngineStorage>) -> Self {
        Self { next, storage }
    }
}

impl<N: CommandInterceptor> CommandInterceptor for TransactionInterceptor<N> {
    fn execute<C: Command>(
        &self,
        config: &CommandConfig,
        command: &C,
        inv: Invocation<'_>,
    ) -> EngineResult<C::Output> {
        let Invocation { caller, .. } = inv;
        let joining = config.context_reuse_possible() && caller.is_some();
        let transaction = if config.transaction_required() && !joining {
            Some(self.storage.begin())
        } else {
            None
        };
        self.next.execute(
            config,
            command,
            Invocation {
                caller,
                transaction,
            },
        )
    }
}

/// Terminal stage: joins the caller's context or pushes a fresh one, runs
/// the command body, and closes exactly what it pushed - commit on success,
/// rollback on any failure.
pub struct ContextInterceptor {
    dispatcher: Arc<dyn EventDispatcher>,
}

impl ContextInterceptor {
    pub fn new(dispatcher: Arc<dyn EventDispatcher>) -> Self {
        Self { dispatcher }
    }
}

impl CommandInterceptor for ContextInterceptor {
    fn execute<C: Command>(
        &self,
        config: &CommandConfig,
        command: &C,
        inv: Invocation<'_>,
    ) -> EngineResult<C::Output> {
        let Invocation {
            caller,
            transaction,
        } = inv;

        match (config.context_reuse_possible(), caller) {
            (true, Some(ctx)) => {
                debug!(command = command.name(), context = %ctx.id(), "joining caller context");
                let result = command.execute(ctx);
                if result.is_err() {
                    ctx.mark_failed();
                }
                result
            }
            (_, caller) => {
                let parent_id = caller.map(|ctx| ctx.id());
                let mut ctx = CommandContext::new(transaction, parent_id);
                debug!(command = command.name(), context = %ctx.id(), "pushed new context");
                match command.execute(&mut ctx) {
                    Ok(value) => {
                        ctx.close(self.dispatcher.as_ref())?;
                        Ok(value)
                    }
                    Err(err) => {
                        ctx.mark_failed();
                        if let Err(close_err) = ctx.close(self.dispatcher.as_ref()) {
                            debug!(%close_err, "close after failure reported an error");
                        }
                        Err(err)
                    }
                }
            }
        }
    }
}
