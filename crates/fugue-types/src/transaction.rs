//! Signed transactions

use fugue_crypto::{keccak256, Signature};
use fugue_primitives::{Address, H256, U256};

use crate::error::TypeError;

/// A signed Fugue transaction.
///
/// The scheduler treats transactions as opaque apart from their deterministic
/// hash; executors additionally recover the sender from the signature.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transaction {
    /// Sender's transaction count
    pub nonce: u64,
    /// Recipient address (`None` for contract creation)
    pub to: Option<Address>,
    /// Transfer value
    pub value: U256,
    /// Call data
    pub data: Vec<u8>,
    /// ECDSA signature over the signing hash
    pub signature: Signature,
}

impl Transaction {
    /// Create a new signed transaction
    pub fn new(
        nonce: u64,
        to: Option<Address>,
        value: U256,
        data: Vec<u8>,
        signature: Signature,
    ) -> Self {
        Self {
            nonce,
            to,
            value,
            data,
            signature,
        }
    }

    /// The hash signed by the sender: the body without the signature.
    ///
    /// Exposed as an associated function so signers can compute it before the
    /// transaction exists.
    pub fn signing_hash_for(nonce: u64, to: Option<&Address>, value: &U256, data: &[u8]) -> H256 {
        keccak256(&signing_payload(nonce, to, value, data))
    }

    /// The signing hash of this transaction
    pub fn signing_hash(&self) -> H256 {
        Self::signing_hash_for(self.nonce, self.to.as_ref(), &self.value, &self.data)
    }

    /// The transaction hash, covering the full body including the signature
    pub fn hash(&self) -> H256 {
        let mut payload = signing_payload(self.nonce, self.to.as_ref(), &self.value, &self.data);
        payload.extend_from_slice(&self.signature.to_bytes());
        keccak256(&payload)
    }

    /// Recover the sender address from the signature
    pub fn sender(&self) -> Result<Address, TypeError> {
        let pubkey = self.signature.recover(&self.signing_hash())?;
        Ok(pubkey.to_address())
    }
}

/// Deterministic, unambiguous encoding of the unsigned body.
///
/// `to = None` is tagged distinctly from `to = Some(zero_address)`, and the
/// call data carries a length prefix so no two field tuples share an encoding.
fn signing_payload(nonce: u64, to: Option<&Address>, value: &U256, data: &[u8]) -> Vec<u8> {
    let mut buf = Vec::with_capacity(8 + 1 + 20 + 32 + 8 + data.len());
    buf.extend_from_slice(&nonce.to_be_bytes());
    match to {
        Some(addr) => {
            buf.push(1);
            buf.extend_from_slice(addr.as_bytes());
        }
        None => buf.push(0),
    }
    let mut value_bytes = [0u8; 32];
    value.to_big_endian(&mut value_bytes);
    buf.extend_from_slice(&value_bytes);
    buf.extend_from_slice(&(data.len() as u64).to_be_bytes());
    buf.extend_from_slice(data);
    buf
}
