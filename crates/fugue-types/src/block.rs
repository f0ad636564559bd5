//! Blocks: ordered transaction batches with header metadata

use fugue_crypto::{keccak256, keccak256_concat};
use fugue_primitives::H256;

use crate::transaction::Transaction;

/// A block delivered by consensus for scheduling.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    /// Block number
    pub height: u64,
    /// Hash of the parent block
    pub parent_hash: H256,
    /// Ordered list of transactions
    pub transactions: Vec<Transaction>,
    /// Block timestamp (Unix seconds)
    pub timestamp: u64,
}

impl Block {
    /// Create a new block
    pub fn new(
        height: u64,
        parent_hash: H256,
        transactions: Vec<Transaction>,
        timestamp: u64,
    ) -> Self {
        Self {
            height,
            parent_hash,
            transactions,
            timestamp,
        }
    }

    /// Block hash: `keccak256(height_BE || parent_hash || transactions_hash || timestamp_BE)`
    pub fn hash(&self) -> H256 {
        keccak256_concat(&[
            &self.height.to_be_bytes(),
            self.parent_hash.as_bytes(),
            self.transactions_hash().as_bytes(),
            &self.timestamp.to_be_bytes(),
        ])
    }

    /// Hash of the concatenated transaction hashes; the empty list hashes
    /// the empty byte string.
    pub fn transactions_hash(&self) -> H256 {
        let mut buf = Vec::with_capacity(self.transactions.len() * 32);
        for tx in &self.transactions {
            buf.extend_from_slice(tx.hash().as_bytes());
        }
        keccak256(&buf)
    }

    /// Number of transactions in the block
    pub fn transaction_count(&self) -> usize {
        self.transactions.len()
    }
}
