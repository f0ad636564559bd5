//! Immutable point-in-time state views

use std::collections::HashMap;

use fugue_primitives::H256;

/// A read-only view of the world state at a point in time.
///
/// The snapshot owns its data: mutation of the originating [`StateDB`] never
/// disturbs it. Wrap in an `Arc` to share across worker threads.
///
/// [`StateDB`]: crate::StateDB
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    data: HashMap<H256, Vec<u8>>,
}

impl Snapshot {
    /// Build a snapshot from key-value entries
    pub fn from_entries(entries: impl IntoIterator<Item = (H256, Vec<u8>)>) -> Self {
        Self {
            data: entries.into_iter().collect(),
        }
    }

    /// Read a value by key
    pub fn get(&self, key: &H256) -> Option<Vec<u8>> {
        self.data.get(key).cloned()
    }

    /// Whether the snapshot holds a value for `key`
    pub fn contains(&self, key: &H256) -> bool {
        self.data.contains_key(key)
    }

    /// Number of entries in the view
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether the view is empty
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// A new snapshot with `writes` applied on top of this view.
    ///
    /// Later duplicates in `writes` win, matching commit semantics.
    pub fn overlay(&self, writes: &[(H256, Vec<u8>)]) -> Snapshot {
        let mut data = self.data.clone();
        for (key, value) in writes {
            data.insert(*key, value.clone());
        }
        Snapshot { data }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(byte: u8) -> H256 {
        H256::from_bytes([byte; 32])
    }

    #[test]
    fn test_from_entries_and_get() {
        let snap = Snapshot::from_entries([(key(1), vec![1]), (key(2), vec![2])]);
        assert_eq!(snap.get(&key(1)), Some(vec![1]));
        assert_eq!(snap.get(&key(3)), None);
        assert!(snap.contains(&key(2)));
        assert_eq!(snap.len(), 2);
        assert!(!snap.is_empty());
    }

    #[test]
    fn test_overlay_applies_writes_without_touching_base() {
        let base = Snapshot::from_entries([(key(1), vec![1])]);
        let layered = base.overlay(&[(key(1), vec![9]), (key(2), vec![2])]);

        assert_eq!(layered.get(&key(1)), Some(vec![9]));
        assert_eq!(layered.get(&key(2)), Some(vec![2]));
        // Base is untouched
        assert_eq!(base.get(&key(1)), Some(vec![1]));
        assert_eq!(base.get(&key(2)), None);
    }

    #[test]
    fn test_overlay_duplicate_keys_last_wins() {
        let base = Snapshot::default();
        let layered = base.overlay(&[(key(1), vec![1]), (key(1), vec![2])]);
        assert_eq!(layered.get(&key(1)), Some(vec![2]));
    }
}
