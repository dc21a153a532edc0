//! Search module for Gomoku AI
//!
//! Contains:
//! - The search-side position with scoped trial placements
//! - Zobrist hashing for position identification
//! - Position cache for search results
//! - Candidate move generation and pre-search tactics
//! - Alpha-Beta search with iterative deepening

pub mod alphabeta;
pub mod cache;
pub mod movegen;
pub mod position;
pub mod threat;
pub mod zobrist;

pub use alphabeta::{SearchPolicy, SearchResult, SearchStats, Searcher, INF, WIN_THRESHOLD};
pub use cache::{CacheEntry, EntryType, NoCache, PositionCache, PositionStore, DEFAULT_CAPACITY};
pub use movegen::{candidates, neighborhood, Restrict, DEFAULT_CANDIDATE_LIMIT};
pub use position::{Placement, Position};
pub use threat::{
    analyze, best_fork_defense, can_make_four, creates_four, fork_cells, threat_count, winning_moves,
    Tactic,
};
pub use zobrist::ZobristTable;
