//! Error types for the scheduler

use fugue_primitives::H256;
use fugue_state::StateError;
use thiserror::Error;

/// Scheduler errors.
///
/// Executor-reported `Failed` results are not errors; they confirm normally
/// with their read/write set. On any of these errors the state database is
/// left untouched.
#[derive(Debug, Clone, Error)]
pub enum SchedulerError {
    /// The executor raised a hard fault (a panic, not a revert) while
    /// executing a transaction; the schedule aborts without committing
    #[error("execution failed for transaction {tx_hash}: {reason}")]
    ExecutionFailed {
        /// Hash of the offending transaction
        tx_hash: H256,
        /// Trapped fault message
        reason: String,
    },

    /// Conflict resolution did not drain the pending set within the bound
    #[error("transaction {tx_hash} still pending after {attempts} rounds")]
    MaxRetriesExceeded {
        /// Hash of a transaction still pending
        tx_hash: H256,
        /// Number of rounds performed
        attempts: usize,
    },

    /// The block failed structural validation
    #[error("invalid block: {0}")]
    InvalidBlock(String),

    /// The underlying state database reported a fault
    #[error("state error: {0}")]
    StateError(#[from] StateError),
}

/// Result type for scheduler operations
pub type SchedulerResult<T> = Result<T, SchedulerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let err = SchedulerError::MaxRetriesExceeded {
            tx_hash: H256::from_bytes([0xab; 32]),
            attempts: 100,
        };
        let msg = err.to_string();
        assert!(msg.contains("100"));
        assert!(msg.contains("0xabab"));

        let err = SchedulerError::InvalidBlock("duplicate transaction hash".into());
        assert!(err.to_string().contains("duplicate"));
    }

    #[test]
    fn test_state_error_wraps() {
        let err: SchedulerError = StateError::SnapshotExpired.into();
        assert!(matches!(err, SchedulerError::StateError(StateError::SnapshotExpired)));
    }
}
