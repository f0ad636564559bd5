//! Error types for cryptographic operations

use thiserror::Error;

/// Cryptographic operation error
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CryptoError {
    /// Private key bytes are not a valid scalar
    #[error("invalid private key")]
    InvalidPrivateKey,

    /// Signature is malformed or has invalid components
    #[error("invalid signature: {0}")]
    InvalidSignature(String),

    /// Recovery ID is out of range
    #[error("invalid recovery id: {0}")]
    InvalidRecoveryId(u8),

    /// Signing operation failed
    #[error("signing failed: {0}")]
    SigningFailed(String),

    /// Public key recovery failed
    #[error("public key recovery failed: {0}")]
    RecoveryFailed(String),

    /// Public key is not a valid curve point
    #[error("invalid public key")]
    InvalidPublicKey,
}
