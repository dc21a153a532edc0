//! Alpha-Beta search with iterative deepening and a position cache
//!
//! Negamax with alpha-beta pruning over the ranked candidates of
//! [`candidates`](super::candidates). One [`Searcher`] serves every difficulty:
//! the [`SearchPolicy`] decides whether the cache and iterative deepening are
//! used, how many candidates each node expands and when the search narrows to
//! forcing moves.
//!
//! # Features
//!
//! - Iterative deepening over even depths, reusing the previous root ordering
//! - Cached results keyed by Zobrist hash, verified by a second fingerprint
//! - Tactical override at every node (immediate wins and forced blocks)
//! - Ply-adjusted mate scores, so faster wins rank higher
//! - Deadline checked every 1024 nodes; an interrupted pass is discarded
//!
//! # Example
//!
//! ```
//! use gomoku::board::{Pos, Role};
//! use gomoku::search::{Position, SearchPolicy, Searcher};
//!
//! let mut searcher = Searcher::new(SearchPolicy::default());
//! let mut position = Position::new();
//! position.set_stone(Pos::new(7, 7), Role::OPPONENT);
//!
//! let result = searcher.search(&mut position, Role::ME, 2);
//! let best = result.best_move.unwrap();
//! assert!(position.is_empty(best));
//! ```

use std::iter;
use std::time::{Duration, Instant};

use log::debug;

use crate::board::{Pos, Role};
use crate::eval::{evaluate, PatternScore};
use crate::rules::{is_winning_move, winner};

use super::cache::{CacheEntry, EntryType, PositionCache, PositionStore};
use super::movegen::{candidates, Restrict, DEFAULT_CANDIDATE_LIMIT};
use super::threat::winning_moves;
use super::Position;

/// Infinity score for alpha-beta bounds
pub const INF: i32 = PatternScore::FIVE + 1;

/// Scores at or beyond this magnitude are proven wins or losses
pub const WIN_THRESHOLD: i32 = PatternScore::FIVE - 1000;

/// Nodes between deadline checks (power of two)
const CHECK_INTERVAL: u64 = 1024;

/// Search knobs selected by the difficulty tier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchPolicy {
    /// Probe and fill the position cache
    pub use_cache: bool,
    /// Deepen 2, 4, ... up to the maximum instead of one fixed-depth pass
    pub iterative_deepening: bool,
    /// Wall-clock budget for one search call
    pub timeout: Option<Duration>,
    /// Restriction applied at every node
    pub restrict: Restrict,
    /// Candidates expanded per node
    pub candidate_limit: usize,
    /// From this ply on, only three-forming moves are generated
    pub forcing_ply: Option<i32>,
}

impl Default for SearchPolicy {
    fn default() -> Self {
        Self {
            use_cache: true,
            iterative_deepening: true,
            timeout: None,
            restrict: Restrict::NONE,
            candidate_limit: DEFAULT_CANDIDATE_LIMIT,
            forcing_ply: None,
        }
    }
}

/// Search statistics for diagnostics and tuning.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchStats {
    /// Nodes visited, root excluded
    pub nodes: u64,
    /// Cache lookups
    pub cache_probes: u64,
    /// Lookups whose value was used without searching
    pub cache_hits: u64,
    /// Total beta cutoffs (fail-high)
    pub beta_cutoffs: u64,
    /// Beta cutoffs on the first move tried (measures move ordering quality)
    pub first_move_cutoffs: u64,
}

impl SearchStats {
    /// First-move cutoff rate in percent
    pub fn first_move_rate(&self) -> f64 {
        if self.beta_cutoffs == 0 {
            0.0
        } else {
            self.first_move_cutoffs as f64 / self.beta_cutoffs as f64 * 100.0
        }
    }

    /// Cache hit rate in percent
    pub fn cache_hit_rate(&self) -> f64 {
        if self.cache_probes == 0 {
            0.0
        } else {
            self.cache_hits as f64 / self.cache_probes as f64 * 100.0
        }
    }
}

/// Search result containing the best move found and associated statistics.
#[derive(Debug, Clone)]
pub struct SearchResult {
    /// Value for the side that was searched
    pub value: i32,
    /// Best move found; `None` when no candidate exists
    pub best_move: Option<Pos>,
    /// Principal variation starting with `best_move`
    pub pv: Vec<Pos>,
    /// Depth of the last completed pass
    pub depth: i32,
    /// Whether the deadline cut the search short
    pub timed_out: bool,
    pub stats: SearchStats,
}

/// Value and principal variation of one node
#[derive(Debug, Clone)]
struct Line {
    value: i32,
    pv: Vec<Pos>,
}

impl Line {
    fn leaf(value: i32) -> Self {
        Self { value, pv: Vec::new() }
    }

    fn forced(value: i32, mv: Pos) -> Self {
        Self { value, pv: vec![mv] }
    }
}

/// Outcome of one root pass
struct RootPass {
    best: Line,
    /// Root moves with the value each one was searched to
    scored: Vec<(Pos, i32)>,
    complete: bool,
}

/// Rebase a mate score from "plies from root" to "plies from this node"
#[inline]
fn to_cache(value: i32, ply: i32) -> i32 {
    if value >= WIN_THRESHOLD {
        value + ply
    } else if value <= -WIN_THRESHOLD {
        value - ply
    } else {
        value
    }
}

#[inline]
fn from_cache(value: i32, ply: i32) -> i32 {
    if value >= WIN_THRESHOLD {
        value - ply
    } else if value <= -WIN_THRESHOLD {
        value + ply
    } else {
        value
    }
}

/// Negamax searcher owning its position cache.
///
/// The cache outlives single searches; call [`Searcher::clear_cache`] between
/// unrelated games.
pub struct Searcher {
    store: Box<dyn PositionStore>,
    policy: SearchPolicy,
    stats: SearchStats,
    deadline: Option<Instant>,
    aborted: bool,
}

impl Searcher {
    /// Create a searcher with a default-sized [`PositionCache`].
    #[must_use]
    pub fn new(policy: SearchPolicy) -> Self {
        Self::with_store(policy, Box::new(PositionCache::default()))
    }

    /// Create a searcher over any cache implementation.
    #[must_use]
    pub fn with_store(policy: SearchPolicy, store: Box<dyn PositionStore>) -> Self {
        Self {
            store,
            policy,
            stats: SearchStats::default(),
            deadline: None,
            aborted: false,
        }
    }

    #[inline]
    pub fn policy(&self) -> &SearchPolicy {
        &self.policy
    }

    pub fn set_policy(&mut self, policy: SearchPolicy) {
        self.policy = policy;
    }

    pub fn clear_cache(&mut self) {
        self.store.clear();
    }

    #[inline]
    pub fn cache_size(&self) -> usize {
        self.store.size()
    }

    /// Search `position` for `role` to a depth of `max_depth` plies.
    ///
    /// `max_depth` is rounded down to an even number of at least 2, so every
    /// pass ends on a reply by the opponent. The position is left exactly as
    /// it was passed in.
    pub fn search(&mut self, position: &mut Position, role: Role, max_depth: i32) -> SearchResult {
        let start = Instant::now();
        self.stats = SearchStats::default();
        self.aborted = false;
        self.deadline = self.policy.timeout.map(|timeout| start + timeout);

        let max_depth = (max_depth.max(2) / 2) * 2;
        let restrict = self.restrict_at(0);

        // Finished game: nothing to play
        if winner(position).is_some() || position.is_full() {
            return self.finish(Line::leaf(self.static_value(position, role)), 0, false);
        }

        // Tactical override at the root
        if let Some(&win) = winning_moves(position, role).first() {
            return self.finish(Line::forced(PatternScore::FIVE - 1, win), 1, false);
        }
        let threats = winning_moves(position, role.opponent());
        if threats.len() >= 2 {
            return self.finish(Line::forced(-(PatternScore::FIVE - 2), threats[0]), 2, false);
        }

        let mut order: Vec<Pos> = match threats.first() {
            Some(&cell) => vec![cell],
            None => candidates(position, role, max_depth, restrict, self.policy.candidate_limit)
                .into_iter()
                .map(|(pos, _)| pos)
                .collect(),
        };
        if order.is_empty() {
            return self.finish(Line::leaf(self.static_value(position, role)), 0, false);
        }
        if let Some(mv) = self.cached_move(position, role, restrict) {
            promote(&mut order, mv);
        }

        let depths: Vec<i32> = if self.policy.iterative_deepening {
            (2..=max_depth).step_by(2).collect()
        } else {
            vec![max_depth]
        };

        let mut completed: Option<(Line, i32)> = None;
        let mut partial: Option<Line> = None;
        let mut out_of_time = false;

        for depth in depths {
            let pass = self.search_root(position, role, depth, &order);

            if !pass.complete {
                debug!("depth {depth} interrupted after {} of {} root moves", pass.scored.len(), order.len());
                if !pass.best.pv.is_empty() {
                    partial = Some(pass.best);
                }
                break;
            }

            debug!(
                "depth {depth}: value {} best {:?} nodes {} cache hits {}",
                pass.best.value,
                pass.best.pv.first(),
                self.stats.nodes,
                self.stats.cache_hits
            );

            let mut scored = pass.scored;
            scored.sort_by(|a, b| b.1.cmp(&a.1));
            order = scored.into_iter().map(|(pos, _)| pos).collect();
            if let Some(&mv) = pass.best.pv.first() {
                promote(&mut order, mv);
            }

            if self.policy.use_cache {
                self.store_entry(position, role, restrict, depth, 0, -INF, INF, &pass.best);
            }

            let proven = pass.best.value.abs() >= WIN_THRESHOLD;
            completed = Some((pass.best, depth));
            if proven {
                break;
            }
            if depth < max_depth && self.deadline_passed() {
                debug!("deadline reached before depth {}", depth + 2);
                out_of_time = true;
                break;
            }
        }

        let timed_out = self.aborted || out_of_time;
        match (completed, partial) {
            (Some((line, depth)), _) => self.finish(line, depth, timed_out),
            (None, Some(line)) => self.finish(line, 0, timed_out),
            (None, None) => {
                // Nothing finished in time: fall back to the top-ranked candidate
                let value = self.static_value(position, role);
                self.finish(Line::forced(value, order[0]), 0, timed_out)
            }
        }
    }

    fn finish(&self, line: Line, depth: i32, timed_out: bool) -> SearchResult {
        SearchResult {
            value: line.value,
            best_move: line.pv.first().copied(),
            pv: line.pv,
            depth,
            timed_out,
            stats: self.stats.clone(),
        }
    }

    /// One full-window pass over the root moves in the given order.
    fn search_root(&mut self, position: &mut Position, role: Role, depth: i32, order: &[Pos]) -> RootPass {
        let mut best = Line::leaf(-INF);
        let mut scored = Vec::with_capacity(order.len());
        let mut alpha = -INF;

        for &mv in order {
            let child = {
                let mut guard = position.place(mv, role);
                self.negamax(&mut guard, role.opponent(), depth - 1, 1, -INF, -alpha)
            };
            let Some(child) = child else {
                return RootPass {
                    best,
                    scored,
                    complete: false,
                };
            };

            let value = -child.value;
            scored.push((mv, value));
            if value > best.value {
                best = Line {
                    value,
                    pv: iter::once(mv).chain(child.pv).collect(),
                };
            }
            alpha = alpha.max(value);
        }

        RootPass {
            best,
            scored,
            complete: true,
        }
    }

    /// Recursive alpha-beta search with negamax formulation.
    ///
    /// Returns `None` once the deadline has passed; the caller must discard the
    /// whole pass.
    fn negamax(
        &mut self,
        position: &mut Position,
        role: Role,
        depth: i32,
        ply: i32,
        alpha: i32,
        beta: i32,
    ) -> Option<Line> {
        self.stats.nodes += 1;

        if self.stats.nodes & (CHECK_INTERVAL - 1) == 0 && self.deadline_passed() {
            self.aborted = true;
        }
        if self.aborted {
            return None;
        }

        // The previous mover completed five
        if let Some(last) = position.last_move() {
            if is_winning_move(position, last.row, last.col, role.opponent()) {
                return Some(Line::leaf(-(PatternScore::FIVE - ply)));
            }
        }
        if depth <= 0 || position.is_full() {
            return Some(Line::leaf(self.static_value(position, role)));
        }

        if let Some(&win) = winning_moves(position, role).first() {
            return Some(Line::forced(PatternScore::FIVE - ply - 1, win));
        }
        let threats = winning_moves(position, role.opponent());
        if threats.len() >= 2 {
            return Some(Line::forced(-(PatternScore::FIVE - ply - 2), threats[0]));
        }
        let forced = threats.first().copied();

        let restrict = self.restrict_at(ply);
        let hash = position.hash();
        let mut cached_move = None;

        if self.policy.use_cache {
            self.stats.cache_probes += 1;
            if let Some(entry) = self.store.get(hash) {
                if entry.matches(position.fingerprint(), role, restrict) {
                    let value = from_cache(entry.value, ply);
                    if entry.depth >= depth || value.abs() >= WIN_THRESHOLD {
                        let usable = match entry.entry_type {
                            EntryType::Exact => true,
                            EntryType::LowerBound => value >= beta,
                            EntryType::UpperBound => value <= alpha,
                        };
                        if usable {
                            self.stats.cache_hits += 1;
                            return Some(Line {
                                value,
                                pv: entry.pv.clone(),
                            });
                        }
                    }
                    cached_move = entry.best_move;
                }
            }
        }

        let moves: Vec<Pos> = match forced {
            Some(cell) => vec![cell],
            None => {
                let mut list: Vec<Pos> = candidates(position, role, depth, restrict, self.policy.candidate_limit)
                    .into_iter()
                    .map(|(pos, _)| pos)
                    .collect();
                if let Some(mv) = cached_move {
                    promote(&mut list, mv);
                }
                list
            }
        };
        if moves.is_empty() {
            return Some(Line::leaf(self.static_value(position, role)));
        }

        let mut best = Line::leaf(-INF);
        for (i, &mv) in moves.iter().enumerate() {
            let child = {
                let mut guard = position.place(mv, role);
                self.negamax(&mut guard, role.opponent(), depth - 1, ply + 1, -beta, -alpha.max(best.value))?
            };

            let value = -child.value;
            if value > best.value {
                best = Line {
                    value,
                    pv: iter::once(mv).chain(child.pv).collect(),
                };
            }
            if best.value >= beta {
                self.stats.beta_cutoffs += 1;
                if i == 0 {
                    self.stats.first_move_cutoffs += 1;
                }
                break;
            }
        }

        if self.policy.use_cache {
            self.store_entry(position, role, restrict, depth, ply, alpha, beta, &best);
        }
        Some(best)
    }

    #[allow(clippy::too_many_arguments)]
    fn store_entry(
        &mut self,
        position: &Position,
        role: Role,
        restrict: Restrict,
        depth: i32,
        ply: i32,
        alpha: i32,
        beta: i32,
        line: &Line,
    ) {
        let entry_type = if line.value <= alpha {
            EntryType::UpperBound
        } else if line.value >= beta {
            EntryType::LowerBound
        } else {
            EntryType::Exact
        };
        self.store.put(
            position.hash(),
            CacheEntry {
                fingerprint: position.fingerprint(),
                role,
                restrict,
                depth,
                value: to_cache(line.value, ply),
                entry_type,
                best_move: line.pv.first().copied(),
                pv: line.pv.clone(),
            },
        );
    }

    /// Best move remembered for this exact position, if any
    fn cached_move(&self, position: &Position, role: Role, restrict: Restrict) -> Option<Pos> {
        if !self.policy.use_cache {
            return None;
        }
        self.store
            .get(position.hash())
            .filter(|entry| entry.matches(position.fingerprint(), role, restrict))
            .and_then(|entry| entry.best_move)
    }

    fn restrict_at(&self, ply: i32) -> Restrict {
        match self.policy.forcing_ply {
            Some(from) if ply >= from => self.policy.restrict.union(Restrict::THREES),
            _ => self.policy.restrict,
        }
    }

    /// Static evaluation kept clear of the proven-result range
    #[inline]
    fn static_value(&self, position: &Position, role: Role) -> i32 {
        evaluate(position, role).clamp(-(WIN_THRESHOLD - 1), WIN_THRESHOLD - 1)
    }

    #[inline]
    fn deadline_passed(&self) -> bool {
        self.deadline.is_some_and(|deadline| Instant::now() >= deadline)
    }
}

/// Move `mv` to the front of `moves` if present, keeping the rest in order
fn promote(moves: &mut [Pos], mv: Pos) {
    if let Some(i) = moves.iter().position(|&p| p == mv) {
        moves[..=i].rotate_right(1);
    }
}
