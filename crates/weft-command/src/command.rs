//! Command abstraction
//!
//! Commands are transient intent: they own all their input, may be
//! re-executed wholesale by the retry stage, and cross thread boundaries
//! between concurrent callers.

use crate::CommandContext;
use weft_types::EngineResult;

/// One engine operation, executed through the interceptor chain.
///
/// `execute` takes `&self` because the retry stage re-runs the same command
/// object; implementations must treat every invocation as a full,
/// independent re-execution and stage all their writes on the context.
pub trait Command: Send + Sync {
    type Output;

    /// Short name used by the logging stage
    fn name(&self) -> &str;

    fn execute(&self, ctx: &mut CommandContext) -> EngineResult<Self::Output>;
}
