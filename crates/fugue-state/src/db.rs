//! State storage trait and in-memory implementation

use std::collections::HashMap;

use fugue_primitives::H256;

use crate::snapshot::Snapshot;

/// Key-value world state with snapshot isolation and atomic batch commit.
///
/// `snapshot()` must be isolated from all subsequent mutation, and `commit`
/// must apply its writes as a single observable step: a snapshot taken
/// afterwards sees all of them, one taken before sees none.
pub trait StateDB: Send + Sync {
    /// Read a value by key
    fn get(&self, key: &H256) -> Option<Vec<u8>>;

    /// Write a value
    fn set(&mut self, key: H256, value: Vec<u8>);

    /// Delete a key
    fn delete(&mut self, key: &H256);

    /// Create a read-only point-in-time snapshot
    fn snapshot(&self) -> Snapshot;

    /// Apply a batch of writes atomically; later duplicates win
    fn commit(&mut self, writes: &[(H256, Vec<u8>)]);

    /// All keys currently present
    fn keys(&self) -> Vec<H256>;
}

/// In-memory [`StateDB`]: the reference realization, with deep-clone snapshots.
#[derive(Debug, Default)]
pub struct MemoryStateDB {
    data: HashMap<H256, Vec<u8>>,
}

impl MemoryStateDB {
    /// Create an empty state database
    pub fn new() -> Self {
        Self::default()
    }
}

impl StateDB for MemoryStateDB {
    fn get(&self, key: &H256) -> Option<Vec<u8>> {
        self.data.get(key).cloned()
    }

    fn set(&mut self, key: H256, value: Vec<u8>) {
        self.data.insert(key, value);
    }

    fn delete(&mut self, key: &H256) {
        self.data.remove(key);
    }

    fn snapshot(&self) -> Snapshot {
        Snapshot::from_entries(self.data.iter().map(|(k, v)| (*k, v.clone())))
    }

    fn commit(&mut self, writes: &[(H256, Vec<u8>)]) {
        for (key, value) in writes {
            self.data.insert(*key, value.clone());
        }
    }

    fn keys(&self) -> Vec<H256> {
        self.data.keys().copied().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(byte: u8) -> H256 {
        H256::from_bytes([byte; 32])
    }

    #[test]
    fn test_get_set_delete() {
        let mut db = MemoryStateDB::new();
        assert_eq!(db.get(&key(1)), None);

        db.set(key(1), vec![1, 2, 3]);
        assert_eq!(db.get(&key(1)), Some(vec![1, 2, 3]));

        db.set(key(1), vec![4]);
        assert_eq!(db.get(&key(1)), Some(vec![4]));

        db.delete(&key(1));
        assert_eq!(db.get(&key(1)), None);

        // Deleting a missing key is a no-op
        db.delete(&key(2));
    }

    #[test]
    fn test_snapshot_isolation() {
        let mut db = MemoryStateDB::new();
        db.set(key(1), vec![1]);

        let snap = db.snapshot();
        db.set(key(1), vec![2]);
        db.delete(&key(1));

        assert_eq!(snap.get(&key(1)), Some(vec![1]));
        assert_eq!(db.get(&key(1)), None);
    }

    #[test]
    fn test_multiple_snapshots_independent() {
        let mut db = MemoryStateDB::new();
        db.set(key(1), vec![1]);
        let snap1 = db.snapshot();
        db.set(key(1), vec![2]);
        let snap2 = db.snapshot();
        db.set(key(1), vec![3]);

        assert_eq!(snap1.get(&key(1)), Some(vec![1]));
        assert_eq!(snap2.get(&key(1)), Some(vec![2]));
        assert_eq!(db.get(&key(1)), Some(vec![3]));
    }

    #[test]
    fn test_commit_batch() {
        let mut db = MemoryStateDB::new();
        db.commit(&[(key(1), vec![1]), (key(2), vec![2])]);
        assert_eq!(db.get(&key(1)), Some(vec![1]));
        assert_eq!(db.get(&key(2)), Some(vec![2]));
        assert_eq!(db.keys().len(), 2);
    }

    #[test]
    fn test_commit_duplicate_keys_last_wins() {
        let mut db = MemoryStateDB::new();
        db.commit(&[(key(1), vec![1]), (key(1), vec![2]), (key(1), vec![3])]);
        assert_eq!(db.get(&key(1)), Some(vec![3]));
    }

    #[test]
    fn test_commit_visible_to_later_snapshots_only() {
        let mut db = MemoryStateDB::new();
        let before = db.snapshot();
        db.commit(&[(key(1), vec![1])]);
        let after = db.snapshot();

        assert_eq!(before.get(&key(1)), None);
        assert_eq!(after.get(&key(1)), Some(vec![1]));
    }

    #[test]
    fn test_keys_tracks_contents() {
        let mut db = MemoryStateDB::new();
        assert!(db.keys().is_empty());

        db.set(key(1), vec![1]);
        db.set(key(2), vec![2]);
        db.set(key(1), vec![9]);
        let keys = db.keys();
        assert_eq!(keys.len(), 2);
        assert!(keys.contains(&key(1)));

        db.delete(&key(1));
        assert!(!db.keys().contains(&key(1)));
    }

    #[test]
    fn test_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<MemoryStateDB>();
        assert_send_sync::<Snapshot>();
    }
}
