//! Error types for state operations

use fugue_primitives::H256;
use thiserror::Error;

/// Errors from state storage operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StateError {
    /// Key not found in state
    #[error("key not found: {0}")]
    KeyNotFound(H256),

    /// Snapshot has expired or is invalid
    #[error("snapshot expired")]
    SnapshotExpired,

    /// Lock acquisition failed
    #[error("lock error: {0}")]
    LockError(String),
}
