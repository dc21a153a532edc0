//! Candidate move generation
//!
//! Only empty cells within two steps (Chebyshev distance) of an existing stone
//! are considered. Each one is scored with the evaluator and the best few are
//! kept, highest first.

use serde::{Deserialize, Serialize};

use crate::board::{Pos, Role, BOARD_SIZE, CENTER};
use crate::eval::evaluate_move;
use crate::rules::line_shapes;

use super::Position;

/// Default cap on candidates per node
pub const DEFAULT_CANDIDATE_LIMIT: usize = 12;

/// Neighborhood radius around existing stones
const RADIUS: i32 = 2;

/// Narrows generation to forcing moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Restrict {
    /// Keep only moves forming a run of three or more
    pub only_three: bool,
    /// Keep only moves forming a run of four or more
    pub only_four: bool,
}

impl Restrict {
    pub const NONE: Restrict = Restrict {
        only_three: false,
        only_four: false,
    };
    pub const THREES: Restrict = Restrict {
        only_three: true,
        only_four: false,
    };
    pub const FOURS: Restrict = Restrict {
        only_three: false,
        only_four: true,
    };

    #[inline]
    pub fn is_none(self) -> bool {
        !self.only_three && !self.only_four
    }

    /// Combine two restrictions, keeping every flag set in either
    #[inline]
    #[must_use]
    pub fn union(self, other: Restrict) -> Restrict {
        Restrict {
            only_three: self.only_three || other.only_three,
            only_four: self.only_four || other.only_four,
        }
    }

    /// Whether a stone of `role` at `pos` passes this restriction
    pub fn admits(self, position: &Position, pos: Pos, role: Role) -> bool {
        let needed = if self.only_four {
            4
        } else if self.only_three {
            3
        } else {
            return true;
        };
        line_shapes(position, pos, role)
            .iter()
            .any(|shape| shape.length >= needed)
    }
}

/// Empty cells within [`RADIUS`] of any stone, each listed once.
pub fn neighborhood(position: &Position) -> Vec<Pos> {
    let mut cells = Vec::with_capacity(64);
    let mut seen = [[false; BOARD_SIZE]; BOARD_SIZE];

    for &stone in position.stones() {
        for dr in -RADIUS..=RADIUS {
            for dc in -RADIUS..=RADIUS {
                let r = i32::from(stone.row) + dr;
                let c = i32::from(stone.col) + dc;

                if !Pos::is_valid(r, c) {
                    continue;
                }

                #[allow(clippy::cast_sign_loss)]
                let (ru, cu) = (r as usize, c as usize);
                if seen[ru][cu] {
                    continue;
                }
                seen[ru][cu] = true;

                #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
                let pos = Pos::new(r as u8, c as u8);
                if position.is_empty(pos) {
                    cells.push(pos);
                }
            }
        }
    }

    cells
}

/// Ordering score of a move: what `role` gains by playing it plus what the
/// opponent would gain by playing it instead.
#[inline]
pub fn score_move(position: &Position, pos: Pos, role: Role) -> i32 {
    evaluate_move(position, pos, role) + evaluate_move(position, pos, role.opponent())
}

/// Generate ranked candidate moves for `role`.
///
/// Returns at most `limit` moves (fewer at the last ply), sorted by
/// descending score. An empty board yields only the center cell.
///
/// # Example
///
/// ```
/// use gomoku::board::{Pos, Role, CENTER};
/// use gomoku::search::{candidates, Position, Restrict};
///
/// let position = Position::new();
/// let moves = candidates(&position, Role::ME, 4, Restrict::NONE, 12);
/// assert_eq!(moves.len(), 1);
/// assert_eq!(moves[0].0, CENTER);
/// ```
#[must_use]
pub fn candidates(
    position: &Position,
    role: Role,
    depth: i32,
    restrict: Restrict,
    limit: usize,
) -> Vec<(Pos, i32)> {
    if position.is_board_empty() {
        return if restrict.is_none() {
            vec![(CENTER, 0)]
        } else {
            Vec::new()
        };
    }

    let mut scored: Vec<(Pos, i32)> = neighborhood(position)
        .into_iter()
        .filter(|&pos| restrict.admits(position, pos, role))
        .map(|pos| (pos, score_move(position, pos, role)))
        .collect();

    scored.sort_unstable_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));

    let cap = if depth <= 1 { (limit * 2 / 3).max(1) } else { limit.max(1) };
    scored.truncate(cap);
    scored
}

#[cfg(test)]
mod tests {
    use super::*;

    fn position_with(stones: &[(u8, u8, Role)]) -> Position {
        let mut position = Position::new();
        for &(r, c, role) in stones {
            position.set_stone(Pos::new(r, c), role);
        }
        position
    }

    #[test]
    fn test_neighborhood_radius() {
        let position = position_with(&[(7, 7, Role::ME)]);
        let cells = neighborhood(&position);
        assert_eq!(cells.len(), 24);
        assert!(cells.iter().all(|p| {
            (i32::from(p.row) - 7).abs() <= 2 && (i32::from(p.col) - 7).abs() <= 2
        }));
        assert!(!cells.contains(&Pos::new(7, 7)));
    }

    #[test]
    fn test_neighborhood_clipped_at_corner() {
        let position = position_with(&[(0, 0, Role::ME)]);
        assert_eq!(neighborhood(&position).len(), 8);
    }

    #[test]
    fn test_candidates_capped_and_sorted() {
        let position = position_with(&[(7, 7, Role::ME), (7, 8, Role::OPPONENT), (8, 8, Role::ME)]);
        let moves = candidates(&position, Role::ME, 4, Restrict::NONE, 10);
        assert_eq!(moves.len(), 10);
        assert!(moves.windows(2).all(|w| w[0].1 >= w[1].1));
        assert!(moves.iter().all(|(p, _)| position.is_empty(*p)));
    }

    #[test]
    fn test_candidates_tighter_at_last_ply() {
        let position = position_with(&[(7, 7, Role::ME), (7, 8, Role::OPPONENT)]);
        assert_eq!(candidates(&position, Role::ME, 1, Restrict::NONE, 12).len(), 8);
    }

    #[test]
    fn test_candidates_rank_blocking_open_three_first() {
        let position = position_with(&[
            (7, 6, Role::OPPONENT),
            (7, 7, Role::OPPONENT),
            (7, 8, Role::OPPONENT),
            (3, 3, Role::ME),
        ]);
        let moves = candidates(&position, Role::ME, 4, Restrict::NONE, 12);
        let top = moves[0].0;
        assert!(top == Pos::new(7, 5) || top == Pos::new(7, 9), "top was {top}");
    }

    #[test]
    fn test_restrict_fours() {
        let position = position_with(&[
            (7, 6, Role::ME),
            (7, 7, Role::ME),
            (7, 8, Role::ME),
            (9, 9, Role::OPPONENT),
        ]);
        let moves = candidates(&position, Role::ME, 4, Restrict::FOURS, 12);
        let cells: Vec<Pos> = moves.iter().map(|(p, _)| *p).collect();
        assert_eq!(cells.len(), 2);
        assert!(cells.contains(&Pos::new(7, 5)));
        assert!(cells.contains(&Pos::new(7, 9)));
    }

    #[test]
    fn test_restrict_threes_includes_fours() {
        let position = position_with(&[(7, 7, Role::ME), (7, 8, Role::ME), (9, 9, Role::OPPONENT)]);
        let moves = candidates(&position, Role::ME, 4, Restrict::THREES, 12);
        assert!(!moves.is_empty());
        for (pos, _) in &moves {
            assert!(Restrict::THREES.admits(&position, *pos, Role::ME));
        }
        assert!(moves.iter().any(|(p, _)| *p == Pos::new(7, 9)));
    }

    #[test]
    fn test_restricted_empty_board_has_no_candidates() {
        let position = Position::new();
        assert!(candidates(&position, Role::ME, 4, Restrict::THREES, 12).is_empty());
    }

    #[test]
    fn test_restrict_union() {
        assert_eq!(Restrict::NONE.union(Restrict::THREES), Restrict::THREES);
        let both = Restrict::THREES.union(Restrict::FOURS);
        assert!(both.only_three && both.only_four);
        assert!(Restrict::NONE.is_none());
    }
}
