//! Error types for core type operations

use fugue_crypto::CryptoError;
use thiserror::Error;

/// Errors from transaction and block operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TypeError {
    /// Signature verification failed
    #[error("invalid signature")]
    InvalidSignature,

    /// Sender address could not be recovered
    #[error("sender recovery failed: {0}")]
    RecoveryFailed(#[from] CryptoError),

    /// Transaction is structurally invalid
    #[error("invalid transaction: {0}")]
    InvalidTransaction(String),
}
