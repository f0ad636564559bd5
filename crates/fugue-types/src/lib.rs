//! # fugue-types
//!
//! Core types for the Fugue blockchain:
//!
//! - [`PriorityCode`]: deterministic transaction priority for Seamless Scheduling
//! - [`ReadWriteSet`]: storage accesses recorded during execution
//! - [`Transaction`]: signed transaction with sender recovery
//! - [`Block`]: ordered transaction batch with header metadata

#![warn(missing_docs)]
#![warn(clippy::all)]

mod block;
mod error;
mod priority;
mod rw_set;
mod transaction;

pub use block::Block;
pub use error::TypeError;
pub use priority::{PriorityCode, PRIORITY_DISOWNED, PRIORITY_OWNED};
pub use rw_set::ReadWriteSet;
pub use transaction::Transaction;
