//! # fugue-crypto
//!
//! Cryptographic primitives for the Fugue blockchain:
//!
//! - [`keccak256`] / [`keccak256_concat`]: Keccak-256 hashing
//! - [`PrivateKey`] / [`PublicKey`]: secp256k1 key pair
//! - [`Signature`]: recoverable ECDSA signature (Ethereum-style `v`)

#![warn(missing_docs)]
#![warn(clippy::all)]

mod error;
mod hash;
mod signature;

pub use error::CryptoError;
pub use hash::{keccak256, keccak256_concat};
pub use signature::{PrivateKey, PublicKey, Signature, SIGNATURE_LENGTH};
