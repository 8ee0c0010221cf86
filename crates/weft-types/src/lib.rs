//! Domain types for the Weft deployment core.
//!
//! Weft turns parsed workflow deployments into versioned, persisted, cached
//! process definitions. This crate holds the data model shared by every
//! other layer:
//!
//! - **ProcessDefinition**: a versioned template describing a workflow graph.
//!   Versioning identity is (key, tenant); global identity is the id string.
//! - **Deployment**: the atomic unit introducing one or more definitions
//!   plus their resources together.
//! - **ProcessModel**: the parsed shape of one definition - flow elements,
//!   data objects, localization metadata, subscription declarations.
//! - **EngineEvent**: lifecycle events emitted per definition, in strict
//!   created-then-initialized order.
//! - **EngineError**: the error taxonomy every operation reports through.

#![deny(unsafe_code)]

mod definition;
mod deployment;
mod errors;
mod events;
mod ids;
mod model;
mod subscription;

pub use definition::*;
pub use deployment::*;
pub use errors::*;
pub use events::*;
pub use ids::*;
pub use model::*;
pub use subscription::*;
