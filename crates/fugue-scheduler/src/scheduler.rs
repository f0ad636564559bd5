//! The Seamless scheduling core loop

use std::any::Any;
use std::collections::HashSet;
use std::panic::{catch_unwind, AssertUnwindSafe};

use fugue_crypto::keccak256_concat;
use fugue_primitives::H256;
use fugue_state::{state_root, Snapshot, StateDB};
use fugue_types::{Block, PriorityCode, ReadWriteSet, Transaction};
use rayon::prelude::*;
use tracing::{debug, trace};

use crate::error::SchedulerError;
use crate::executor::{ExecutionResult, TransactionExecutor};
use crate::ownership::OwnershipTable;

/// Default number of worker threads
pub const DEFAULT_THREAD_COUNT: usize = 4;

/// Default bound on conflict-resolution rounds per block
pub const MAX_RETRIES: usize = 100;

/// Scheduler tuning knobs
#[derive(Debug, Clone, Copy)]
pub struct SchedulerConfig {
    /// Advisory worker thread count; execution currently runs on the global pool
    pub thread_count: usize,
    /// Bound on conflict-resolution rounds per block
    pub max_retries: usize,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            thread_count: DEFAULT_THREAD_COUNT,
            max_retries: MAX_RETRIES,
        }
    }
}

/// A transaction that has been executed, with its recorded effects
#[derive(Debug, Clone)]
pub struct ExecutedTransaction {
    /// The original transaction
    pub transaction: Transaction,
    /// Assigned priority code
    pub priority: PriorityCode,
    /// Recorded read/write set
    pub rwset: ReadWriteSet,
    /// Execution outcome
    pub result: ExecutionResult,
}

impl ExecutedTransaction {
    /// The transaction hash
    pub fn hash(&self) -> H256 {
        self.transaction.hash()
    }
}

/// Outcome of scheduling one block
#[derive(Debug)]
pub struct ScheduleResult {
    /// Confirmed transactions, in ascending priority order over the whole
    /// block
    pub confirmed: Vec<ExecutedTransaction>,
    /// Hash of the scheduled block
    pub block_hash: H256,
    /// State root after the block's writes were committed
    pub state_root: H256,
    /// Total number of re-executions performed
    pub reexecution_count: usize,
}

/// Block scheduling interface
pub trait Scheduler: Send + Sync {
    /// Schedule and execute a block against `state`, committing on success.
    ///
    /// On error the state database is left untouched.
    fn schedule(
        &self,
        block: Block,
        state: &mut dyn StateDB,
        executor: &dyn TransactionExecutor,
    ) -> Result<ScheduleResult, SchedulerError>;
}

/// The Seamless scheduler.
///
/// Runs the block's transactions optimistically in parallel, resolves
/// conflicts through priority-ordered key ownership, and re-executes losers
/// against progressively richer snapshots until the pending set drains.
pub struct SeamlessScheduler {
    config: SchedulerConfig,
}

impl SeamlessScheduler {
    /// Create a scheduler with the given advisory thread count
    pub fn new(thread_count: usize) -> Self {
        Self::with_config(SchedulerConfig {
            thread_count,
            ..SchedulerConfig::default()
        })
    }

    /// Create a scheduler from a full configuration
    pub fn with_config(config: SchedulerConfig) -> Self {
        Self { config }
    }

    /// Create a scheduler with the default thread count
    pub fn with_default_threads() -> Self {
        Self::with_config(SchedulerConfig::default())
    }

    /// The active configuration
    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }
}

impl Default for SeamlessScheduler {
    fn default() -> Self {
        Self::with_default_threads()
    }
}

impl Scheduler for SeamlessScheduler {
    fn schedule(
        &self,
        block: Block,
        state: &mut dyn StateDB,
        executor: &dyn TransactionExecutor,
    ) -> Result<ScheduleResult, SchedulerError> {
        validate_block(&block)?;

        let block_hash = block.hash();
        if block.transactions.is_empty() {
            debug!(height = block.height, "scheduling empty block");
            return Ok(ScheduleResult {
                confirmed: Vec::new(),
                block_hash,
                state_root: state_root(&*state),
                reexecution_count: 0,
            });
        }

        let transactions_hash = block.transactions_hash();
        let table = OwnershipTable::new();
        // Captured once; every optimistic run sees the pre-block world
        let base = state.snapshot();

        let assigned: Vec<(Transaction, PriorityCode)> = block
            .transactions
            .iter()
            .map(|tx| {
                let seed =
                    keccak256_concat(&[tx.hash().as_bytes(), transactions_hash.as_bytes()]);
                (tx.clone(), PriorityCode::new(block.height, seed))
            })
            .collect();

        debug!(
            height = block.height,
            transactions = assigned.len(),
            "phase 1: optimistic parallel execution"
        );
        let mut pending: Vec<ExecutedTransaction> = assigned
            .into_par_iter()
            .map(|(tx, priority)| execute_and_claim(executor, &table, &base, tx, priority))
            .collect::<Result<_, _>>()?;

        let mut confirmed: Vec<ExecutedTransaction> = Vec::new();
        let mut confirmed_writes: Vec<(H256, Vec<u8>)> = Vec::new();
        let mut reexecution_count = 0usize;
        let mut retries = 0usize;

        while !pending.is_empty() {
            if retries >= self.config.max_retries {
                let tx_hash = pending[0].hash();
                debug!(%tx_hash, attempts = retries, "retry bound exceeded");
                return Err(SchedulerError::MaxRetriesExceeded {
                    tx_hash,
                    attempts: retries,
                });
            }

            let round = std::mem::take(&mut pending);
            let (passed, aborted): (Vec<_>, Vec<_>) = round
                .into_iter()
                .partition(|etx| survives_conflict_check(&table, etx));

            trace!(
                round = retries,
                passed = passed.len(),
                aborted = aborted.len(),
                "conflict detection round"
            );

            for etx in &passed {
                // Freed so re-executions can legitimately claim these keys;
                // the new owners will read the passing writes via the overlay
                table.release_all(&etx.rwset.write_keys());
                confirmed_writes.extend_from_slice(etx.rwset.writes());
            }
            confirmed.extend(passed);

            if aborted.is_empty() {
                break;
            }

            let next = base.overlay(&confirmed_writes);
            reexecution_count += aborted.len();
            pending = aborted
                .into_par_iter()
                .map(|etx| {
                    execute_and_claim(executor, &table, &next, etx.transaction, etx.priority)
                })
                .collect::<Result<_, _>>()?;
            retries += 1;
        }

        confirmed.sort_by(|a, b| a.priority.cmp(&b.priority));

        debug!(
            confirmed = confirmed.len(),
            writes = confirmed_writes.len(),
            reexecutions = reexecution_count,
            "phase 3: commit"
        );
        state.commit(&confirmed_writes);

        Ok(ScheduleResult {
            confirmed,
            block_hash,
            state_root: state_root(&*state),
            reexecution_count,
        })
    }
}

/// Structural validation ahead of Phase 1
fn validate_block(block: &Block) -> Result<(), SchedulerError> {
    let mut seen = HashSet::with_capacity(block.transactions.len());
    for tx in &block.transactions {
        let hash = tx.hash();
        if !seen.insert(hash) {
            return Err(SchedulerError::InvalidBlock(format!(
                "duplicate transaction hash {hash}"
            )));
        }
    }
    Ok(())
}

/// Execute one transaction and claim its write keys.
///
/// Claim outcomes are deliberately ignored here; conflict detection reads the
/// settled owners after the round's join. An executor panic is a hard fault,
/// trapped and surfaced as [`SchedulerError::ExecutionFailed`]; reverts
/// travel through [`ExecutionResult::Failed`] instead.
fn execute_and_claim(
    executor: &dyn TransactionExecutor,
    table: &OwnershipTable,
    snapshot: &Snapshot,
    transaction: Transaction,
    priority: PriorityCode,
) -> Result<ExecutedTransaction, SchedulerError> {
    let outcome = catch_unwind(AssertUnwindSafe(|| executor.execute(&transaction, snapshot)));
    let (rwset, result) = match outcome {
        Ok(pair) => pair,
        Err(payload) => {
            return Err(SchedulerError::ExecutionFailed {
                tx_hash: transaction.hash(),
                reason: panic_reason(payload.as_ref()),
            })
        }
    };
    for (key, _) in rwset.writes() {
        let _ = table.get_or_create(key).try_set_owner(&priority);
    }
    Ok(ExecutedTransaction {
        transaction,
        priority,
        rwset,
        result,
    })
}

/// Best-effort extraction of a panic payload message
fn panic_reason(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "executor panicked".to_string()
    }
}

/// Whether a transaction's recorded accesses survived the round.
///
/// Write keys must still be owned by this transaction; read keys must be
/// either released or owned by this transaction itself.
fn survives_conflict_check(table: &OwnershipTable, etx: &ExecutedTransaction) -> bool {
    for (key, _) in etx.rwset.writes() {
        if !table.get_or_create(key).check_ownership(&etx.priority) {
            trace!(tx = %etx.hash(), key = %key, "write claim stolen");
            return false;
        }
    }
    for key in etx.rwset.reads() {
        let owner = table.get_or_create(key).current_owner();
        if !owner.is_released() && owner != etx.priority {
            trace!(tx = %etx.hash(), key = %key, "read overridden by concurrent writer");
            return false;
        }
    }
    true
}
