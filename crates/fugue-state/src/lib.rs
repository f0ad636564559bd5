//! # fugue-state
//!
//! World-state management for the Fugue blockchain:
//!
//! - [`StateDB`]: storage trait with point-in-time snapshots and atomic commit
//! - [`MemoryStateDB`]: in-memory reference implementation
//! - [`Snapshot`]: immutable view, cheap to share across worker threads
//! - [`state_root`]: deterministic digest of the committed state

#![warn(missing_docs)]
#![warn(clippy::all)]

mod db;
mod error;
mod root;
mod snapshot;

pub use db::{MemoryStateDB, StateDB};
pub use error::StateError;
pub use root::state_root;
pub use snapshot::Snapshot;
