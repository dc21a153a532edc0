//! Main AI engine integrating all search components
//!
//! The engine takes an application [`Board`] and the side to move, converts it
//! to the search encoding (mover = +1) and picks a move in priority order:
//!
//! 1. **Opening**: on an empty board, the center
//! 2. **Immediate win**: a cell that completes five
//! 3. **Defense**: block the opponent's winning cell, or the fork cell that
//!    hurts them most
//! 4. **Alpha-Beta**: negamax search with the difficulty's policy
//!
//! # Example
//!
//! ```
//! use gomoku::{AIEngine, Board, Difficulty, Pos, Stone};
//!
//! let mut engine = AIEngine::with_difficulty(Difficulty::Easy);
//! let mut board = Board::new();
//! board.place_stone(Pos::new(7, 7), Stone::Black);
//!
//! let result = engine.get_move(&board, Stone::White).unwrap();
//! println!("Best move: {:?}", result.best_move);
//! println!("Search type: {:?}", result.search_type);
//! println!("Time: {}ms", result.time_ms);
//! ```

use std::time::{Duration, Instant};

use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::board::{Board, Pos, Role, Stone, CENTER};
use crate::error::EngineError;
use crate::eval::{evaluate, PatternScore};
use crate::rules::winner;
use crate::search::{
    analyze, PositionCache, PositionStore, Position, Restrict, SearchPolicy, SearchResult, Searcher,
    Tactic, DEFAULT_CANDIDATE_LIMIT, DEFAULT_CAPACITY,
};

/// Strength preset: search depth, time budget and which search features run.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    /// Depth 2, 500 ms, 10 candidates, no cache
    Easy,
    /// Depth 4, 1 s, no cache
    Medium,
    /// Depth 6, 3 s, cache and iterative deepening
    #[default]
    Hard,
    /// Depth 8, 6 s, cache, iterative deepening, forcing moves only from ply 6
    Expert,
}

impl Difficulty {
    pub fn depth(self) -> i32 {
        match self {
            Difficulty::Easy => 2,
            Difficulty::Medium => 4,
            Difficulty::Hard => 6,
            Difficulty::Expert => 8,
        }
    }

    pub fn timeout_ms(self) -> u64 {
        match self {
            Difficulty::Easy => 500,
            Difficulty::Medium => 1_000,
            Difficulty::Hard => 3_000,
            Difficulty::Expert => 6_000,
        }
    }

    /// Search policy of this tier before any config overrides
    pub fn policy(self) -> SearchPolicy {
        let full = matches!(self, Difficulty::Hard | Difficulty::Expert);
        SearchPolicy {
            use_cache: full,
            iterative_deepening: full,
            timeout: Some(Duration::from_millis(self.timeout_ms())),
            restrict: Restrict::NONE,
            candidate_limit: if self == Difficulty::Easy { 10 } else { DEFAULT_CANDIDATE_LIMIT },
            forcing_ply: (self == Difficulty::Expert).then_some(6),
        }
    }
}

/// Engine configuration, loadable from TOML.
///
/// Unset fields fall back to the difficulty preset.
///
/// # Example
///
/// ```
/// use gomoku::{Difficulty, EngineConfig};
///
/// let config: EngineConfig = toml::from_str("difficulty = \"medium\"\ndepth = 2").unwrap();
/// assert_eq!(config.difficulty, Difficulty::Medium);
/// assert_eq!(config.max_depth(), 2);
/// assert_eq!(config.timeout_ms(), 1_000);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub difficulty: Difficulty,
    /// Overrides the preset depth
    pub depth: Option<i32>,
    /// Overrides the preset time budget
    pub timeout_ms: Option<u64>,
    /// Only consider moves forming a run of three or more
    pub only_three: bool,
    /// Only consider moves forming a run of four or more
    pub only_four: bool,
    /// Overrides the preset candidates per node
    pub candidate_limit: Option<usize>,
    /// Maximum cached positions
    pub cache_capacity: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            difficulty: Difficulty::default(),
            depth: None,
            timeout_ms: None,
            only_three: false,
            only_four: false,
            candidate_limit: None,
            cache_capacity: DEFAULT_CAPACITY,
        }
    }
}

impl EngineConfig {
    #[must_use]
    pub fn with_difficulty(difficulty: Difficulty) -> Self {
        Self {
            difficulty,
            ..Self::default()
        }
    }

    pub fn max_depth(&self) -> i32 {
        self.depth.unwrap_or_else(|| self.difficulty.depth())
    }

    pub fn timeout_ms(&self) -> u64 {
        self.timeout_ms.unwrap_or_else(|| self.difficulty.timeout_ms())
    }

    /// Preset policy with this config's overrides applied
    pub fn policy(&self) -> SearchPolicy {
        let mut policy = self.difficulty.policy();
        policy.timeout = Some(Duration::from_millis(self.timeout_ms()));
        policy.restrict = Restrict {
            only_three: self.only_three,
            only_four: self.only_four,
        };
        if let Some(limit) = self.candidate_limit {
            policy.candidate_limit = limit.max(1);
        }
        policy
    }
}

/// Type of search that produced the result.
///
/// This indicates which phase of the search hierarchy found the move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchType {
    /// Center cell on an empty board
    Opening,
    /// Found immediate winning move
    ImmediateWin,
    /// Block of the opponent's winning cell
    Defense,
    /// Defensive move against an opponent fork
    ForkDefense,
    /// Regular alpha-beta search result
    AlphaBeta,
}

/// Result of a move search with detailed statistics.
#[derive(Debug, Clone)]
pub struct MoveResult {
    /// Best move found; `None` when no candidate exists
    pub best_move: Option<Pos>,
    /// Evaluation for the side to move
    pub score: i32,
    /// Type of search that found this move
    pub search_type: SearchType,
    /// Expected continuation, starting with `best_move`
    pub pv: Vec<Pos>,
    /// Depth of the last completed search pass (0 without search)
    pub depth: i32,
    /// Number of nodes searched
    pub nodes: u64,
    /// Cache lookups that replaced a search
    pub cache_hits: u64,
    /// Share of cache lookups that were hits, in percent
    pub cache_hit_rate: f64,
    /// Share of beta cutoffs made by the first move tried, in percent
    pub first_move_rate: f64,
    /// Time taken in milliseconds
    pub time_ms: u64,
}

impl MoveResult {
    /// Create a result decided without searching
    #[inline]
    fn direct(pos: Pos, score: i32, search_type: SearchType, time_ms: u64) -> Self {
        Self {
            best_move: Some(pos),
            score,
            search_type,
            pv: vec![pos],
            depth: 0,
            nodes: 1,
            cache_hits: 0,
            cache_hit_rate: 0.0,
            first_move_rate: 0.0,
            time_ms,
        }
    }

    /// Create a result from alpha-beta search
    #[inline]
    fn from_alphabeta(result: SearchResult, time_ms: u64) -> Self {
        Self {
            best_move: result.best_move,
            score: result.value,
            search_type: SearchType::AlphaBeta,
            pv: result.pv,
            depth: result.depth,
            nodes: result.stats.nodes,
            cache_hits: result.stats.cache_hits,
            cache_hit_rate: result.stats.cache_hit_rate(),
            first_move_rate: result.stats.first_move_rate(),
            time_ms,
        }
    }
}

/// Main AI Engine for Gomoku.
///
/// Owns the searcher and its position cache, which persists across calls.
/// Call [`AIEngine::clear_cache`] when starting a new game.
pub struct AIEngine {
    searcher: Searcher,
    config: EngineConfig,
}

impl AIEngine {
    /// Create an engine at the default difficulty.
    ///
    /// # Example
    ///
    /// ```
    /// use gomoku::{AIEngine, Difficulty};
    ///
    /// let engine = AIEngine::new();
    /// assert_eq!(engine.config().difficulty, Difficulty::Hard);
    /// ```
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(EngineConfig::default())
    }

    #[must_use]
    pub fn with_difficulty(difficulty: Difficulty) -> Self {
        Self::with_config(EngineConfig::with_difficulty(difficulty))
    }

    #[must_use]
    pub fn with_config(config: EngineConfig) -> Self {
        let store = Box::new(PositionCache::new(config.cache_capacity));
        Self::with_store(config, store)
    }

    /// Create an engine over a custom cache implementation.
    #[must_use]
    pub fn with_store(config: EngineConfig, store: Box<dyn PositionStore>) -> Self {
        Self {
            searcher: Searcher::with_store(config.policy(), store),
            config,
        }
    }

    #[inline]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Switch preset. Explicit overrides in the config still apply.
    pub fn set_difficulty(&mut self, difficulty: Difficulty) {
        self.config.difficulty = difficulty;
        self.searcher.set_policy(self.config.policy());
    }

    /// Replace the configuration.
    ///
    /// A changed `cache_capacity` replaces the cache with a fresh
    /// [`PositionCache`] of the new size.
    pub fn set_config(&mut self, config: EngineConfig) {
        if config.cache_capacity != self.config.cache_capacity {
            debug!("cache capacity {} -> {}", self.config.cache_capacity, config.cache_capacity);
            let store = Box::new(PositionCache::new(config.cache_capacity));
            self.searcher = Searcher::with_store(config.policy(), store);
        } else {
            self.searcher.set_policy(config.policy());
        }
        self.config = config;
    }

    pub fn clear_cache(&mut self) {
        self.searcher.clear_cache();
    }

    pub fn cache_size(&self) -> usize {
        self.searcher.cache_size()
    }

    /// Pick a move for `side` on `board`.
    ///
    /// Fails only for [`Stone::Empty`] as the side. On a full board, or when
    /// the restriction flags leave no candidate, `best_move` is `None`.
    pub fn get_move(&mut self, board: &Board, side: Stone) -> Result<MoveResult, EngineError> {
        let start = Instant::now();
        let mut position = Position::from_board(board, side)?;

        let result = self.choose(&mut position, start);
        debug_assert!(result.best_move.map_or(true, |pos| board.is_empty(pos)));

        match result.best_move {
            Some(pos) => info!(
                "{side:?} plays {pos} ({:?}, score {}, depth {}, {} nodes, {} ms)",
                result.search_type, result.score, result.depth, result.nodes, result.time_ms
            ),
            None => info!("{side:?} has no candidate move"),
        }
        Ok(result)
    }

    /// Pick a move from a raw row-major grid.
    ///
    /// The grid must be exactly `BOARD_SIZE` rows of `BOARD_SIZE` cells.
    pub fn get_move_from_grid(&mut self, rows: &[Vec<Stone>], side: Stone) -> Result<MoveResult, EngineError> {
        let board = Board::from_rows(rows)?;
        self.get_move(&board, side)
    }

    fn choose(&mut self, position: &mut Position, start: Instant) -> MoveResult {
        let elapsed = || start.elapsed().as_millis() as u64;

        if position.is_board_empty() {
            return MoveResult::direct(CENTER, 0, SearchType::Opening, elapsed());
        }
        if let Some(role) = winner(position) {
            debug!("game already won by {role:?}");
            let result = self.searcher.search(position, Role::ME, self.config.max_depth());
            return MoveResult::from_alphabeta(result, elapsed());
        }

        match analyze(position, Role::ME) {
            Tactic::Win(pos) => {
                return MoveResult::direct(pos, PatternScore::FIVE - 1, SearchType::ImmediateWin, elapsed());
            }
            Tactic::Lost(pos) => {
                return MoveResult::direct(pos, -(PatternScore::FIVE - 2), SearchType::Defense, elapsed());
            }
            Tactic::Block(pos) => {
                let score = score_after(position, pos);
                return MoveResult::direct(pos, score, SearchType::Defense, elapsed());
            }
            Tactic::DefendFork(pos) => {
                let score = score_after(position, pos);
                return MoveResult::direct(pos, score, SearchType::ForkDefense, elapsed());
            }
            Tactic::Quiet => {}
        }

        let result = self.searcher.search(position, Role::ME, self.config.max_depth());
        if result.timed_out {
            debug!("search hit the deadline at depth {}", result.depth);
        }
        debug!(
            "cache hit rate {:.1}%, first-move cutoffs {:.1}% of {}",
            result.stats.cache_hit_rate(),
            result.stats.first_move_rate(),
            result.stats.beta_cutoffs
        );
        MoveResult::from_alphabeta(result, elapsed())
    }
}

impl Default for AIEngine {
    fn default() -> Self {
        Self::new()
    }
}

/// Static evaluation for the mover after playing `pos`
fn score_after(position: &mut Position, pos: Pos) -> i32 {
    let guard = position.place(pos, Role::ME);
    evaluate(&guard, Role::ME)
}
