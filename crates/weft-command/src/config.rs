//! Per-invocation command policy

/// Policy for one command invocation: whether it may join the caller's
/// context and whether it needs a transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandConfig {
    context_reuse_possible: bool,
    transaction_required: bool,
}

impl CommandConfig {
    /// Default policy: join an existing context when there is one,
    /// otherwise open a transaction of its own.
    pub fn new() -> Self {
        Self {
            context_reuse_possible: true,
            transaction_required: true,
        }
    }

    /// Always push a fresh context with its own transaction, even when
    /// invoked from inside another command.
    pub fn requires_new() -> Self {
        Self {
            context_reuse_possible: false,
            transaction_required: true,
        }
    }

    /// Read-only policy: no transaction, context still scoped normally
    pub fn transaction_not_required() -> Self {
        Self {
            context_reuse_possible: true,
            transaction_required: false,
        }
    }

    pub fn context_reuse_possible(&self) -> bool {
        self.context_reuse_possible
    }

    pub fn transaction_required(&self) -> bool {
        self.transaction_required
    }
}

impl Default for CommandConfig {
    fn default() -> Self {
        Self::new()
    }
}
