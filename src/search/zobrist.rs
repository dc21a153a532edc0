//! Zobrist hashing for position identification
//!
//! Zobrist hashing allows O(1) incremental hash updates when placing/removing stones.
//! The hash is an XOR over per-(cell, side) keys, so it does not depend on the
//! order in which stones were placed.
//!
//! # Example
//!
//! ```
//! use gomoku::board::{Pos, Role};
//! use gomoku::search::ZobristTable;
//!
//! let zt = ZobristTable::new(7);
//! let a = zt.toggle(zt.toggle(0, Pos::new(7, 7), Role::ME), Pos::new(7, 8), Role::OPPONENT);
//! let b = zt.toggle(zt.toggle(0, Pos::new(7, 8), Role::OPPONENT), Pos::new(7, 7), Role::ME);
//! assert_eq!(a, b);
//! ```

use std::sync::OnceLock;

use rand::{RngCore, SeedableRng};
use rand_xoshiro::Xoshiro256PlusPlus;

use crate::board::{Pos, Role, TOTAL_CELLS};

/// Seed of the primary cache key table
const HASH_SEED: u64 = 0x1234_5678_9ABC_DEF0;
/// Seed of the independent fingerprint table
const FINGERPRINT_SEED: u64 = 0x0F1E_2D3C_4B5A_6978;

/// Zobrist key table: one random 64-bit key per (cell, side).
pub struct ZobristTable {
    keys: [[u64; 2]; TOTAL_CELLS],
}

impl ZobristTable {
    /// Create a table from a fixed seed. Same seed = same table = reproducible hashes.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(seed);
        let mut keys = [[0u64; 2]; TOTAL_CELLS];
        for cell in keys.iter_mut() {
            cell[0] = rng.next_u64();
            cell[1] = rng.next_u64();
        }
        Self { keys }
    }

    /// Key for a stone of `role` at `pos`
    #[inline]
    #[must_use]
    pub fn key(&self, pos: Pos, role: Role) -> u64 {
        self.keys[pos.to_index()][role.index()]
    }

    /// XOR a stone in or out of `hash`. Placing and removing are the same operation.
    #[inline]
    #[must_use]
    pub fn toggle(&self, hash: u64, pos: Pos, role: Role) -> u64 {
        hash ^ self.key(pos, role)
    }
}

/// Process-wide immutable key tables: (cache key table, fingerprint table)
pub fn tables() -> &'static (ZobristTable, ZobristTable) {
    static TABLES: OnceLock<(ZobristTable, ZobristTable)> = OnceLock::new();
    TABLES.get_or_init(|| {
        (
            ZobristTable::new(HASH_SEED),
            ZobristTable::new(FINGERPRINT_SEED),
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zobrist_deterministic() {
        let a = ZobristTable::new(42);
        let b = ZobristTable::new(42);
        let pos = Pos::new(3, 11);
        assert_eq!(a.key(pos, Role::ME), b.key(pos, Role::ME));
        assert_eq!(a.key(pos, Role::OPPONENT), b.key(pos, Role::OPPONENT));
    }

    #[test]
    fn test_zobrist_sides_differ() {
        let zt = ZobristTable::new(42);
        let pos = Pos::new(7, 7);
        assert_ne!(zt.key(pos, Role::ME), zt.key(pos, Role::OPPONENT));
    }

    #[test]
    fn test_zobrist_undo() {
        let zt = ZobristTable::new(42);
        let h = zt.toggle(0, Pos::new(5, 5), Role::ME);
        let h2 = zt.toggle(h, Pos::new(6, 6), Role::OPPONENT);
        assert_eq!(zt.toggle(h2, Pos::new(6, 6), Role::OPPONENT), h);
    }

    #[test]
    fn test_tables_independent() {
        let (hash, fingerprint) = tables();
        let pos = Pos::new(0, 0);
        assert_ne!(hash.key(pos, Role::ME), fingerprint.key(pos, Role::ME));
    }

    #[test]
    fn test_zobrist_all_keys_distinct() {
        let zt = ZobristTable::new(HASH_SEED);
        let mut seen = std::collections::HashSet::new();
        for idx in 0..TOTAL_CELLS {
            let pos = Pos::from_index(idx);
            assert!(seen.insert(zt.key(pos, Role::ME)));
            assert!(seen.insert(zt.key(pos, Role::OPPONENT)));
        }
    }
}
