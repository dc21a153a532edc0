//! Tactical checks run ahead of the tree search
//!
//! These answer the questions that do not need a search at all:
//! - can the side to move win right now?
//! - does the opponent threaten to win next turn (and at how many cells)?
//! - can the opponent set up two threats with one stone (a fork)?
//!
//! [`analyze`] combines them in priority order into a [`Tactic`].

use crate::board::{Pos, Role};
use crate::eval::evaluate_move;
use crate::rules::{is_winning_move, line_shapes};

use super::movegen::neighborhood;
use super::Position;

/// Forced decision found without searching
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tactic {
    /// Mover completes five here
    Win(Pos),
    /// Opponent has exactly one winning cell; occupy it
    Block(Pos),
    /// Opponent has two or more winning cells; only one can be blocked
    Lost(Pos),
    /// Opponent can fork; this cell leaves them the fewest forks
    DefendFork(Pos),
    /// Nothing forced, search normally
    Quiet,
}

/// Empty cells where a stone of `role` completes five, in board order.
pub fn winning_moves(position: &Position, role: Role) -> Vec<Pos> {
    let mut wins: Vec<Pos> = neighborhood(position)
        .into_iter()
        .filter(|pos| is_winning_move(position, pos.row, pos.col, role))
        .collect();
    wins.sort_unstable();
    wins
}

/// Number of lines through `pos` where a stone of `role` makes a five,
/// a four or an open three.
pub fn threat_count(position: &Position, pos: Pos, role: Role) -> usize {
    line_shapes(position, pos, role)
        .iter()
        .filter(|shape| shape.is_five() || shape.is_four() || shape.is_open_three())
        .count()
}

/// Whether a stone of `role` at `pos` makes a four or five
pub fn creates_four(position: &Position, pos: Pos, role: Role) -> bool {
    line_shapes(position, pos, role)
        .iter()
        .any(|shape| shape.is_five() || shape.is_four())
}

/// Whether `role` has any move that makes a four or five
pub fn can_make_four(position: &Position, role: Role) -> bool {
    neighborhood(position)
        .into_iter()
        .any(|pos| creates_four(position, pos, role))
}

/// Cells where one stone of `role` creates two or more threats at once.
pub fn fork_cells(position: &Position, role: Role) -> Vec<Pos> {
    let mut forks: Vec<Pos> = neighborhood(position)
        .into_iter()
        .filter(|&pos| threat_count(position, pos, role) >= 2)
        .collect();
    forks.sort_unstable();
    forks
}

/// Defensive cell against the opponent's forks.
///
/// Tries every cell near the stones and keeps the one after which the
/// opponent has the fewest fork cells left; ties go to the cell with the best
/// evaluation delta for `mover`. Returns `None` when the opponent has no fork.
pub fn best_fork_defense(position: &mut Position, mover: Role) -> Option<Pos> {
    let opponent = mover.opponent();
    if fork_cells(position, opponent).is_empty() {
        return None;
    }

    let mut best: Option<(Pos, usize, i32)> = None;
    for pos in neighborhood(position) {
        let gain = evaluate_move(position, pos, mover);
        let remaining = {
            let guard = position.place(pos, mover);
            fork_cells(&guard, opponent).len()
        };

        let better = match best {
            None => true,
            Some((best_pos, best_remaining, best_gain)) => {
                (remaining, -gain, pos) < (best_remaining, -best_gain, best_pos)
            }
        };
        if better {
            best = Some((pos, remaining, gain));
        }
    }

    best.map(|(pos, _, _)| pos)
}

/// Classify the position for `mover` before any search.
///
/// Priority: own win, then the opponent's winning cells, then the opponent's
/// forks. Fork defense is skipped when the mover can make a four, since that
/// forces the opponent to answer first.
///
/// # Example
///
/// ```
/// use gomoku::board::{Pos, Role};
/// use gomoku::search::{analyze, Position, Tactic};
///
/// let mut position = Position::new();
/// for col in 3..7 {
///     position.set_stone(Pos::new(7, col), Role::OPPONENT);
/// }
/// position.set_stone(Pos::new(7, 2), Role::ME);
///
/// assert_eq!(analyze(&mut position, Role::ME), Tactic::Block(Pos::new(7, 7)));
/// ```
pub fn analyze(position: &mut Position, mover: Role) -> Tactic {
    if let Some(&win) = winning_moves(position, mover).first() {
        return Tactic::Win(win);
    }

    let threats = winning_moves(position, mover.opponent());
    match threats.len() {
        0 => {}
        1 => return Tactic::Block(threats[0]),
        _ => return Tactic::Lost(threats[0]),
    }

    if can_make_four(position, mover) {
        return Tactic::Quiet;
    }
    best_fork_defense(position, mover).map_or(Tactic::Quiet, Tactic::DefendFork)
}
