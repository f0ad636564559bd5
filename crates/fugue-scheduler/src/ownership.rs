//! Ownership tracking for storage keys
//!
//! Each storage key touched by an in-flight write maps to an
//! [`OwnershipEntry`]: a cell holding the [`PriorityCode`] of the transaction
//! currently claiming the key. Claims only move towards higher priority, so
//! concurrent claimants of the same key always settle on the same winner.

use std::sync::Arc;

use dashmap::DashMap;
use fugue_primitives::H256;
use fugue_types::PriorityCode;
use parking_lot::RwLock;

/// A concurrent cell holding the owning priority for one storage key.
///
/// Invariants: under [`try_set_owner`] the owner only moves strictly towards
/// higher priority (lower value); [`release_ownership`] unconditionally flips
/// the cell to DISOWNED, after which any priority may claim it.
///
/// [`try_set_owner`]: OwnershipEntry::try_set_owner
/// [`release_ownership`]: OwnershipEntry::release_ownership
pub struct OwnershipEntry {
    owner: RwLock<PriorityCode>,
}

impl OwnershipEntry {
    /// Create a cell in the DISOWNED sentinel state
    pub fn new() -> Self {
        Self {
            owner: RwLock::new(PriorityCode::sentinel()),
        }
    }

    /// Attempt to claim the cell for `who`.
    ///
    /// Succeeds iff `who` is at least as high priority as the current owner;
    /// equal priorities re-claim idempotently. Returns whether the claim took.
    pub fn try_set_owner(&self, who: &PriorityCode) -> bool {
        let mut owner = self.owner.write();
        if who <= &*owner {
            *owner = who.clone();
            true
        } else {
            false
        }
    }

    /// Whether `who` would hold the cell: true iff `who <= current owner`
    pub fn check_ownership(&self, who: &PriorityCode) -> bool {
        who <= &*self.owner.read()
    }

    /// Flip the cell to DISOWNED. The previous owner's height and hash are
    /// preserved for debugging.
    pub fn release_ownership(&self) {
        self.owner.write().release();
    }

    /// A copy of the current owner
    pub fn current_owner(&self) -> PriorityCode {
        self.owner.read().clone()
    }
}

impl Default for OwnershipEntry {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for OwnershipEntry {
    fn clone(&self) -> Self {
        Self {
            owner: RwLock::new(self.owner.read().clone()),
        }
    }
}

/// Concurrent map from storage key to its [`OwnershipEntry`].
///
/// Entries are created lazily on first [`get_or_create`] and live until
/// [`clear`]. All callers asking for the same key receive handles to the same
/// cell. Lock ordering is table shard then entry; entry methods never reach
/// back into the table.
///
/// [`get_or_create`]: OwnershipTable::get_or_create
/// [`clear`]: OwnershipTable::clear
pub struct OwnershipTable {
    entries: DashMap<H256, Arc<OwnershipEntry>>,
}

impl OwnershipTable {
    /// Create an empty table
    pub fn new() -> Self {
        Self {
            entries: DashMap::new(),
        }
    }

    /// The entry for `key`, created in the DISOWNED state if absent.
    ///
    /// Creation is atomic per key: two concurrent creators observe the same
    /// cell.
    pub fn get_or_create(&self, key: &H256) -> Arc<OwnershipEntry> {
        let entry = self
            .entries
            .entry(*key)
            .or_insert_with(|| Arc::new(OwnershipEntry::new()));
        Arc::clone(entry.value())
    }

    /// Release every entry for the given keys; unknown keys are skipped
    pub fn release_all(&self, keys: &[H256]) {
        for key in keys {
            if let Some(entry) = self.entries.get(key) {
                entry.release_ownership();
            }
        }
    }

    /// Drop all entries
    pub fn clear(&self) {
        self.entries.clear();
    }

    /// Number of tracked keys
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no keys are tracked
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for OwnershipTable {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    fn key(byte: u8) -> H256 {
        H256::from_bytes([byte; 32])
    }

    fn priority(height: u64) -> PriorityCode {
        PriorityCode::new(height, H256::ZERO)
    }

    #[test]
    fn test_fresh_entry_accepts_any_priority() {
        let entry = OwnershipEntry::new();
        assert!(entry.current_owner().is_released());
        assert!(entry.check_ownership(&priority(u64::MAX)));
        assert!(entry.try_set_owner(&priority(500)));
    }

    #[test]
    fn test_higher_priority_steals() {
        let entry = OwnershipEntry::new();
        assert!(entry.try_set_owner(&priority(200)));
        assert!(entry.try_set_owner(&priority(100)));
        assert_eq!(entry.current_owner().block_height(), 100);

        // The displaced claimant no longer passes the check
        assert!(!entry.check_ownership(&priority(200)));
        assert!(entry.check_ownership(&priority(100)));
    }

    #[test]
    fn test_lower_priority_rejected() {
        let entry = OwnershipEntry::new();
        assert!(entry.try_set_owner(&priority(100)));
        assert!(!entry.try_set_owner(&priority(200)));
        assert_eq!(entry.current_owner().block_height(), 100);
    }

    #[test]
    fn test_equal_priority_reclaims() {
        let entry = OwnershipEntry::new();
        let p = PriorityCode::new(100, H256::from_bytes([0xab; 32]));
        assert!(entry.try_set_owner(&p));
        assert!(entry.try_set_owner(&p));
        assert!(entry.check_ownership(&p));
    }

    #[test]
    fn test_release_reopens_cell() {
        let entry = OwnershipEntry::new();
        entry.try_set_owner(&priority(100));
        entry.release_ownership();

        let owner = entry.current_owner();
        assert!(owner.is_released());
        // Height of the last owner is kept for debugging
        assert_eq!(owner.block_height(), 100);

        // Even a worse priority can now claim
        assert!(entry.try_set_owner(&priority(999)));
        assert!(!entry.current_owner().is_released());
    }

    #[test]
    fn test_release_is_idempotent() {
        let entry = OwnershipEntry::new();
        entry.try_set_owner(&priority(1));
        entry.release_ownership();
        entry.release_ownership();
        assert!(entry.current_owner().is_released());
    }

    #[test]
    fn test_table_get_or_create_returns_same_cell() {
        let table = OwnershipTable::new();
        let first = table.get_or_create(&key(1));
        first.try_set_owner(&priority(100));

        let second = table.get_or_create(&key(1));
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(second.current_owner().block_height(), 100);
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_table_distinct_keys_distinct_cells() {
        let table = OwnershipTable::new();
        table.get_or_create(&key(1)).try_set_owner(&priority(100));
        assert!(table.get_or_create(&key(2)).current_owner().is_released());
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn test_release_all() {
        let table = OwnershipTable::new();
        let p = priority(100);
        table.get_or_create(&key(1)).try_set_owner(&p);
        table.get_or_create(&key(2)).try_set_owner(&p);
        table.get_or_create(&key(3)).try_set_owner(&p);

        table.release_all(&[key(1), key(2)]);

        assert!(table.get_or_create(&key(1)).current_owner().is_released());
        assert!(table.get_or_create(&key(2)).current_owner().is_released());
        assert!(!table.get_or_create(&key(3)).current_owner().is_released());

        // Unknown keys and the empty list are no-ops
        table.release_all(&[key(9)]);
        table.release_all(&[]);
    }

    #[test]
    fn test_clear() {
        let table = OwnershipTable::new();
        table.get_or_create(&key(1));
        table.get_or_create(&key(2));
        assert!(!table.is_empty());

        table.clear();
        assert!(table.is_empty());
        assert_eq!(table.len(), 0);

        table.get_or_create(&key(1));
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_concurrent_get_or_create_single_entry() {
        let table = Arc::new(OwnershipTable::new());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let table = Arc::clone(&table);
                thread::spawn(move || table.get_or_create(&key(1)))
            })
            .collect();

        let cells: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        assert_eq!(table.len(), 1);
        for cell in &cells[1..] {
            assert!(Arc::ptr_eq(&cells[0], cell));
        }
    }

    #[test]
    fn test_concurrent_claims_settle_on_highest_priority() {
        let table = Arc::new(OwnershipTable::new());
        let entry = table.get_or_create(&key(1));

        let handles: Vec<_> = (0..8u64)
            .map(|i| {
                let entry = Arc::clone(&entry);
                thread::spawn(move || entry.try_set_owner(&priority(100 + i)))
            })
            .collect();
        let successes = handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .filter(|&ok| ok)
            .count();

        // The best priority always lands; later, worse claims may also have
        // succeeded transiently before being displaced
        assert!(successes >= 1);
        assert_eq!(entry.current_owner().block_height(), 100);
    }

    #[test]
    fn test_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<OwnershipEntry>();
        assert_send_sync::<OwnershipTable>();
    }
}
