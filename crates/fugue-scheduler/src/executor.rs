//! Transaction execution interface and the native transfer executor

use fugue_crypto::keccak256_concat;
use fugue_primitives::{Address, H256, U256};
use fugue_state::Snapshot;
use fugue_types::{ReadWriteSet, Transaction};

/// Outcome of executing a single transaction.
///
/// `Failed` covers reverts and executor-level rejections; a failed
/// transaction still confirms into the block with its read/write set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExecutionResult {
    /// Execution succeeded
    Success {
        /// Return data, if any
        output: Vec<u8>,
    },
    /// Execution failed
    Failed {
        /// Failure reason
        reason: String,
    },
}

impl ExecutionResult {
    /// Whether execution succeeded
    pub fn is_success(&self) -> bool {
        matches!(self, ExecutionResult::Success { .. })
    }
}

/// Deterministic transaction execution against an immutable snapshot.
///
/// Implementations must be pure with respect to the snapshot: the same
/// `(transaction, snapshot)` pair yields byte-identical output on every call,
/// machine, and process. All reads go through the snapshot; in-flight writes
/// of sibling transactions are never observed, and no I/O happens here.
pub trait TransactionExecutor: Send + Sync {
    /// Execute `tx` against `snapshot`, returning the recorded accesses and
    /// the outcome
    fn execute(&self, tx: &Transaction, snapshot: &Snapshot) -> (ReadWriteSet, ExecutionResult);
}

/// Storage key of an account's balance cell
pub fn balance_key(address: &Address) -> H256 {
    keccak256_concat(&[b"acct:balance", address.as_bytes()])
}

/// Native value-transfer executor.
///
/// Balances live in per-account cells as 32-byte big-endian integers. A
/// transfer reads the sender and recipient cells and writes both (one cell
/// for a self-transfer). Insufficient funds, overflow, contract creation, and
/// failed sender recovery all yield `Failed` with the reads still recorded.
#[derive(Debug, Default, Clone, Copy)]
pub struct TransferExecutor;

impl TransferExecutor {
    /// Create a transfer executor
    pub fn new() -> Self {
        Self
    }

    /// Encode a balance for storage
    pub fn encode_balance(value: U256) -> Vec<u8> {
        let mut bytes = [0u8; 32];
        value.to_big_endian(&mut bytes);
        bytes.to_vec()
    }

    fn decode_balance(raw: Option<Vec<u8>>) -> Option<U256> {
        match raw {
            None => Some(U256::zero()),
            Some(bytes) if bytes.len() <= 32 => Some(U256::from_big_endian(&bytes)),
            Some(_) => None,
        }
    }
}

impl TransactionExecutor for TransferExecutor {
    fn execute(&self, tx: &Transaction, snapshot: &Snapshot) -> (ReadWriteSet, ExecutionResult) {
        let mut rwset = ReadWriteSet::new();

        let failed = |rwset: ReadWriteSet, reason: String| {
            (rwset, ExecutionResult::Failed { reason })
        };

        let sender = match tx.sender() {
            Ok(sender) => sender,
            Err(e) => return failed(rwset, format!("sender recovery failed: {e}")),
        };
        let recipient = match tx.to {
            Some(to) => to,
            None => return failed(rwset, "contract creation is not supported".into()),
        };

        let sender_cell = balance_key(&sender);
        rwset.record_read(sender_cell);
        let sender_balance = match Self::decode_balance(snapshot.get(&sender_cell)) {
            Some(balance) => balance,
            None => return failed(rwset, "malformed sender balance".into()),
        };

        if sender == recipient {
            // Self-transfer: the cell must still cover the value, but nothing moves
            if sender_balance < tx.value {
                return failed(rwset, "insufficient balance".into());
            }
            rwset.record_write(sender_cell, Self::encode_balance(sender_balance));
            return (rwset, ExecutionResult::Success { output: vec![] });
        }

        let recipient_cell = balance_key(&recipient);
        rwset.record_read(recipient_cell);
        let recipient_balance = match Self::decode_balance(snapshot.get(&recipient_cell)) {
            Some(balance) => balance,
            None => return failed(rwset, "malformed recipient balance".into()),
        };

        if sender_balance < tx.value {
            return failed(rwset, "insufficient balance".into());
        }
        let credited = match recipient_balance.checked_add(tx.value) {
            Some(credited) => credited,
            None => return failed(rwset, "recipient balance overflow".into()),
        };

        rwset.record_write(sender_cell, Self::encode_balance(sender_balance - tx.value));
        rwset.record_write(recipient_cell, Self::encode_balance(credited));
        (rwset, ExecutionResult::Success { output: vec![] })
    }
}
