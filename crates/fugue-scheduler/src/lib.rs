//! # fugue-scheduler
//!
//! Seamless parallel transaction scheduling for Fugue.
//!
//! The scheduler takes an ordered block of transactions plus a pre-block
//! world state and extracts parallelism while preserving serial semantics:
//! every validator reaches the same confirmed set and the same post-block
//! state root.
//!
//! ## How it works
//!
//! 1. **Optimistic execution**: every transaction runs in parallel against a
//!    snapshot taken before the block, claiming its write keys in the
//!    [`OwnershipTable`] as it goes.
//! 2. **Conflict detection**: a transaction survives if it still owns all of
//!    its write claims and none of its reads are owned by a different
//!    transaction. Survivors confirm and release their keys; the rest
//!    re-execute against a snapshot layered with the confirmed writes, until
//!    the pending set drains or the retry bound trips.
//! 3. **Commit**: the unified write list is applied to the state database in
//!    a single atomic batch and the post-block state root is computed.
//!
//! Claim resolution is driven by [`PriorityCode`](fugue_types::PriorityCode):
//! a deterministic total order over transactions, so ownership races settle
//! the same way on every node regardless of thread interleaving.

#![warn(missing_docs)]
#![warn(clippy::all)]

mod error;
mod executor;
mod ownership;
mod scheduler;

pub use error::{SchedulerError, SchedulerResult};
pub use executor::{balance_key, ExecutionResult, TransactionExecutor, TransferExecutor};
pub use ownership::{OwnershipEntry, OwnershipTable};
pub use scheduler::{
    ExecutedTransaction, ScheduleResult, Scheduler, SchedulerConfig, SeamlessScheduler,
    DEFAULT_THREAD_COUNT, MAX_RETRIES,
};
