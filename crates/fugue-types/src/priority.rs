//! Transaction priority codes for Seamless Scheduling

use std::cmp::Ordering;

use fugue_primitives::H256;

/// Ownership status: the transaction owns the key
pub const PRIORITY_OWNED: u8 = 0;

/// Ownership status: ownership has been released
pub const PRIORITY_DISOWNED: u8 = 1;

/// Encoded length: release bit (1) + block height (8) + hash (32)
const ENCODED_LEN: usize = 41;

/// A transaction's priority in the Seamless Scheduling order.
///
/// Lower value means higher priority. The order compares the release bit
/// first (OWNED before DISOWNED), then block height ascending, then the hash
/// lexicographically. A fresh ownership cell holds the [`sentinel`]: the
/// maximum of the order, so any transaction priority can claim it.
///
/// [`sentinel`]: PriorityCode::sentinel
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PriorityCode {
    release_bit: u8,
    block_height: u64,
    hash: H256,
}

impl PriorityCode {
    /// Create a priority code with OWNED status
    pub fn new(block_height: u64, hash: H256) -> Self {
        Self {
            release_bit: PRIORITY_OWNED,
            block_height,
            hash,
        }
    }

    /// The sentinel held by a fresh ownership cell: `(DISOWNED, u64::MAX, 0)`.
    ///
    /// Every valid transaction priority compares strictly less than it.
    pub fn sentinel() -> Self {
        Self {
            release_bit: PRIORITY_DISOWNED,
            block_height: u64::MAX,
            hash: H256::ZERO,
        }
    }

    /// Flip the release bit to DISOWNED; height and hash are preserved
    pub fn release(&mut self) {
        self.release_bit = PRIORITY_DISOWNED;
    }

    /// Whether ownership has been released
    pub fn is_released(&self) -> bool {
        self.release_bit == PRIORITY_DISOWNED
    }

    /// The block height component
    pub fn block_height(&self) -> u64 {
        self.block_height
    }

    /// The hash component
    pub fn hash(&self) -> &H256 {
        &self.hash
    }

    /// Serialize as `release_bit || block_height_BE || hash` (41 bytes)
    pub fn to_bytes(&self) -> [u8; ENCODED_LEN] {
        let mut bytes = [0u8; ENCODED_LEN];
        bytes[0] = self.release_bit;
        bytes[1..9].copy_from_slice(&self.block_height.to_be_bytes());
        bytes[9..41].copy_from_slice(self.hash.as_bytes());
        bytes
    }

    /// Deserialize from the 41-byte encoding
    pub fn from_bytes(bytes: &[u8; ENCODED_LEN]) -> Self {
        let mut height = [0u8; 8];
        height.copy_from_slice(&bytes[1..9]);
        let mut hash = [0u8; 32];
        hash.copy_from_slice(&bytes[9..41]);
        Self {
            release_bit: bytes[0],
            block_height: u64::from_be_bytes(height),
            hash: H256::from_bytes(hash),
        }
    }
}

impl Ord for PriorityCode {
    fn cmp(&self, other: &Self) -> Ordering {
        self.release_bit
            .cmp(&other.release_bit)
            .then_with(|| self.block_height.cmp(&other.block_height))
            .then_with(|| self.hash.cmp(&other.hash))
    }
}

impl PartialOrd for PriorityCode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
