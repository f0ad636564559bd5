//! State root computation

use fugue_crypto::keccak256;
use fugue_primitives::H256;

use crate::db::StateDB;

/// Deterministic digest of the full committed state.
///
/// Keccak-256 over the concatenation of every `key || value` pair, in
/// ascending key order. A surrogate for a Merkle root: every node computing
/// the same post-block state computes the same digest.
pub fn state_root(state: &dyn StateDB) -> H256 {
    let mut keys = state.keys();
    keys.sort_unstable();

    let mut buf = Vec::new();
    for key in keys {
        if let Some(value) = state.get(&key) {
            buf.extend_from_slice(key.as_bytes());
            buf.extend_from_slice(&value);
        }
    }
    keccak256(&buf)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::MemoryStateDB;

    fn key(byte: u8) -> H256 {
        H256::from_bytes([byte; 32])
    }

    #[test]
    fn test_empty_state_root() {
        let db = MemoryStateDB::new();
        assert_eq!(state_root(&db), keccak256(&[]));
    }

    #[test]
    fn test_root_is_insertion_order_independent() {
        let mut a = MemoryStateDB::new();
        a.set(key(1), vec![1]);
        a.set(key(2), vec![2]);

        let mut b = MemoryStateDB::new();
        b.set(key(2), vec![2]);
        b.set(key(1), vec![1]);

        assert_eq!(state_root(&a), state_root(&b));
    }

    #[test]
    fn test_root_matches_manual_digest() {
        let mut db = MemoryStateDB::new();
        db.set(key(2), vec![0xbb]);
        db.set(key(1), vec![0xaa]);

        let mut buf = Vec::new();
        buf.extend_from_slice(key(1).as_bytes());
        buf.push(0xaa);
        buf.extend_from_slice(key(2).as_bytes());
        buf.push(0xbb);

        assert_eq!(state_root(&db), keccak256(&buf));
    }

    #[test]
    fn test_root_changes_with_values() {
        let mut db = MemoryStateDB::new();
        db.set(key(1), vec![1]);
        let before = state_root(&db);

        db.set(key(1), vec![2]);
        assert_ne!(state_root(&db), before);
    }
}
