//! Position cache for search results
//!
//! The cache maps a position hash to the result of searching that position:
//! value, bound kind, best move and principal variation, tagged with the role
//! to move, the restriction flags and the remaining depth of that search.
//!
//! # Example
//!
//! ```
//! use gomoku::board::{Pos, Role};
//! use gomoku::search::{CacheEntry, EntryType, PositionCache, PositionStore, Restrict};
//!
//! let mut cache = PositionCache::new(1024);
//! let entry = CacheEntry {
//!     fingerprint: 7,
//!     role: Role::ME,
//!     restrict: Restrict::NONE,
//!     depth: 4,
//!     value: 120,
//!     entry_type: EntryType::Exact,
//!     best_move: Some(Pos::new(7, 7)),
//!     pv: vec![Pos::new(7, 7)],
//! };
//! cache.put(0xABCD, entry);
//!
//! let hit = cache.get(0xABCD).unwrap();
//! assert_eq!(hit.value, 120);
//! assert_eq!(cache.size(), 1);
//! ```

use std::collections::{HashMap, VecDeque};

use log::trace;

use crate::board::{Pos, Role};

use super::movegen::Restrict;

/// Default number of cached positions
pub const DEFAULT_CAPACITY: usize = 100_000;

/// How a cached value relates to the true value of the position
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryType {
    /// Exact score - the search completed normally
    Exact,
    /// Lower bound - score >= stored value (beta cutoff)
    LowerBound,
    /// Upper bound - score <= stored value (alpha fail-low)
    UpperBound,
}

/// One cached search result
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheEntry {
    /// Independent second hash of the position, checked before trusting a hit
    pub fingerprint: u64,
    /// Side to move when the entry was stored
    pub role: Role,
    /// Candidate restriction in force for that search
    pub restrict: Restrict,
    /// Remaining depth the value was searched to
    pub depth: i32,
    /// Value from the perspective of `role`, mate scores relative to this node
    pub value: i32,
    pub entry_type: EntryType,
    pub best_move: Option<Pos>,
    /// Principal variation starting with `best_move`
    pub pv: Vec<Pos>,
}

impl CacheEntry {
    /// Whether this entry was stored for the same position and search mode
    #[inline]
    #[must_use]
    pub fn matches(&self, fingerprint: u64, role: Role, restrict: Restrict) -> bool {
        self.fingerprint == fingerprint && self.role == role && self.restrict == restrict
    }
}

/// Storage backend for cached search results.
///
/// [`PositionCache`] is the bounded store used by the engine; [`NoCache`]
/// stores nothing and can be swapped in where memoization is unwanted.
pub trait PositionStore: Send {
    fn get(&self, hash: u64) -> Option<&CacheEntry>;

    /// Insert or overwrite the entry for `hash`
    fn put(&mut self, hash: u64, entry: CacheEntry);

    fn clear(&mut self);

    /// Number of stored entries
    fn size(&self) -> usize;
}

/// Bounded cache evicting the oldest inserted key once full.
///
/// Overwriting an existing key keeps its original insertion slot, so eviction
/// follows first insertion, not recency of use.
pub struct PositionCache {
    entries: HashMap<u64, CacheEntry>,
    order: VecDeque<u64>,
    capacity: usize,
}

impl PositionCache {
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: HashMap::with_capacity(capacity.min(DEFAULT_CAPACITY)),
            order: VecDeque::with_capacity(capacity.min(DEFAULT_CAPACITY)),
            capacity,
        }
    }
}

impl Default for PositionCache {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl PositionStore for PositionCache {
    #[inline]
    fn get(&self, hash: u64) -> Option<&CacheEntry> {
        self.entries.get(&hash)
    }

    fn put(&mut self, hash: u64, entry: CacheEntry) {
        if let Some(slot) = self.entries.get_mut(&hash) {
            *slot = entry;
            return;
        }
        if self.entries.len() >= self.capacity {
            if let Some(oldest) = self.order.pop_front() {
                self.entries.remove(&oldest);
                trace!("cache full ({}), evicted {oldest:#018x}", self.capacity);
            }
        }
        self.entries.insert(hash, entry);
        self.order.push_back(hash);
    }

    fn clear(&mut self) {
        self.entries.clear();
        self.order.clear();
    }

    #[inline]
    fn size(&self) -> usize {
        self.entries.len()
    }
}

/// Store that keeps nothing
#[derive(Debug, Default, Clone, Copy)]
pub struct NoCache;

impl PositionStore for NoCache {
    fn get(&self, _hash: u64) -> Option<&CacheEntry> {
        None
    }

    fn put(&mut self, _hash: u64, _entry: CacheEntry) {}

    fn clear(&mut self) {}

    fn size(&self) -> usize {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(value: i32, mv: (u8, u8)) -> CacheEntry {
        CacheEntry {
            fingerprint: 99,
            role: Role::ME,
            restrict: Restrict::NONE,
            depth: 2,
            value,
            entry_type: EntryType::Exact,
            best_move: Some(Pos::new(mv.0, mv.1)),
            pv: vec![Pos::new(mv.0, mv.1)],
        }
    }

    #[test]
    fn test_get_is_idempotent() {
        let mut cache = PositionCache::new(16);
        cache.put(1, entry(50, (3, 3)));

        let first = cache.get(1).map(|e| (e.value, e.best_move));
        let second = cache.get(1).map(|e| (e.value, e.best_move));
        assert_eq!(first, Some((50, Some(Pos::new(3, 3)))));
        assert_eq!(first, second);
    }

    #[test]
    fn test_put_overwrites() {
        let mut cache = PositionCache::new(16);
        cache.put(1, entry(50, (3, 3)));
        cache.put(1, entry(-20, (4, 4)));
        assert_eq!(cache.size(), 1);
        assert_eq!(cache.get(1).unwrap().value, -20);
    }

    #[test]
    fn test_evicts_oldest_when_full() {
        let mut cache = PositionCache::new(3);
        for key in 1..=3 {
            cache.put(key, entry(key as i32, (0, 0)));
        }
        // Overwrite does not refresh the slot of key 1
        cache.put(1, entry(10, (0, 1)));
        cache.put(4, entry(4, (0, 0)));

        assert_eq!(cache.size(), 3);
        assert!(cache.get(1).is_none());
        assert!(cache.get(2).is_some());
        assert!(cache.get(4).is_some());
    }

    #[test]
    fn test_clear() {
        let mut cache = PositionCache::new(8);
        cache.put(5, entry(1, (1, 1)));
        cache.clear();
        assert_eq!(cache.size(), 0);
        assert!(cache.get(5).is_none());
        cache.put(6, entry(1, (1, 1)));
        assert_eq!(cache.size(), 1);
    }

    #[test]
    fn test_zero_capacity_still_holds_one() {
        let mut cache = PositionCache::new(0);
        cache.put(1, entry(1, (1, 1)));
        cache.put(2, entry(2, (2, 2)));
        assert_eq!(cache.size(), 1);
        assert!(cache.get(2).is_some());
    }

    #[test]
    fn test_matches_checks_every_tag() {
        let e = entry(0, (0, 0));
        assert!(e.matches(99, Role::ME, Restrict::NONE));
        assert!(!e.matches(98, Role::ME, Restrict::NONE));
        assert!(!e.matches(99, Role::OPPONENT, Restrict::NONE));
        assert!(!e.matches(99, Role::ME, Restrict::FOURS));
    }

    #[test]
    fn test_no_cache_stores_nothing() {
        let mut store = NoCache;
        store.put(1, entry(1, (1, 1)));
        assert!(store.get(1).is_none());
        assert_eq!(store.size(), 0);
    }
}
