//! Command pipeline for the Weft deployment core.
//!
//! Every engine operation runs as a [`Command`] submitted to the
//! [`CommandExecutor`]. The executor owns an immutable interceptor chain,
//! composed once at engine construction in the canonical order:
//!
//! ```text
//! logging -> retry-on-conflict -> transaction -> context -> command body
//! ```
//!
//! - The logging stage is outermost and observes every unhandled fault.
//! - The retry stage re-executes on [`EngineError::Conflict`] only, with a
//!   bounded attempt count; every attempt gets a fresh transaction and a
//!   fresh context.
//! - The transaction stage opens a storage transaction when the config
//!   asks for one and the command is not joining a caller's context.
//! - The context stage pushes a [`CommandContext`] (or joins the caller's,
//!   per [`CommandConfig`]), runs the body, and closes exactly what it
//!   pushed on every exit path: commit when the body succeeded and the
//!   failure flag is clear, rollback otherwise.
//!
//! There is no ambient "current context": the context is passed explicitly,
//! and nested invocations hand their context to
//! [`CommandExecutor::execute_nested`].
//!
//! [`EngineError::Conflict`]: weft_types::EngineError::Conflict

#![deny(unsafe_code)]

mod command;
mod config;
mod context;
mod dispatcher;
mod executor;
mod interceptor;

pub use command::*;
pub use config::*;
pub use context::*;
pub use dispatcher::*;
pub use executor::*;
pub use interceptor::*;
