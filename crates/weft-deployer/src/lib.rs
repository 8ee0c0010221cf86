//! Deployment pipeline for the Weft core.
//!
//! Turns a [`ParsedDeployment`] into persisted, versioned, cached process
//! definitions, or reconciles in-memory state with an already-persisted
//! outcome. The pipeline runs as a [`weft_command::Command`] through the
//! interceptor chain, so it gets transactions, conflict retries and a
//! scoped context for free.
//!
//! Deployment steps, in order:
//!
//! 1. Copy deployment-level values (tenant, deployment id, category) onto
//!    every definition.
//! 2. Generate missing diagrams when configured, adding them as deployment
//!    resources.
//! 3. Resolve each definition's diagram resource name.
//! 4. New deployments: compute the next version per (key, tenant), assign
//!    ids, buffer `EntityCreated` events.
//! 5. Stage definition inserts and apply authorization grants.
//! 6. Reconcile start-trigger subscriptions against the previous version.
//! 7. Buffer `EntityInitialized` events.
//! 8. Redeploys instead copy id, version and suspension state from the
//!    persisted definitions onto the in-memory objects.
//! 9. Publish definitions into the cache - strictly after commit, via a
//!    post-commit action.
//! 10. Merge localization overrides, saving the blob once if anything
//!     changed.
//!
//! A key collision fails the whole operation before anything is staged;
//! any later failure leaves the surrounding transaction uncommitted.

#![deny(unsafe_code)]

mod cache;
mod deploy_cmd;
mod deployer;
mod diagram;
mod engine;
mod grantor;
mod helper;
mod idgen;
mod localization;
mod parsed;
mod settings;

pub use cache::*;
pub use deploy_cmd::*;
pub use deployer::*;
pub use diagram::*;
pub use engine::*;
pub use grantor::*;
pub use helper::*;
pub use idgen::*;
pub use localization::*;
pub use parsed::*;
pub use settings::*;
