//! Storage boundary for the Weft deployment core.
//!
//! Persistence follows a unit-of-work model: commands stage every write
//! into a [`WriteBatch`] and nothing touches the backend until the owning
//! transaction commits. Commit applies the whole batch atomically and is
//! where optimistic (key, tenant, version) conflicts are detected, so a
//! rolled-back or conflicted command leaves no trace.
//!
//! [`InMemoryStorage`] is the reference backend; SQL mapping lives outside
//! this workspace behind the same [`EngineStorage`] trait.

#![deny(unsafe_code)]

mod batch;
mod error;
mod memory;
mod store;

pub use batch::*;
pub use error::*;
pub use memory::*;
pub use store::*;
