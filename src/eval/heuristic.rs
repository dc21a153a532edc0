//! Heuristic evaluation function for Gomoku positions
//!
//! Every maximal line in the four directions is reduced to runs of consecutive
//! same-side stones. Each run is scored by [`run_score`] from its length and
//! the number of open ends; the side totals are then compared.
//!
//! The evaluation is antisymmetric, as negamax requires:
//! `evaluate(p, role) == -evaluate(p, role.opponent())`.

use crate::board::{Pos, Role, BOARD_SIZE};
use crate::rules::DIRECTIONS;
use crate::search::Position;

use super::patterns::run_score;

const N: i32 = BOARD_SIZE as i32;

/// A hypothetical stone laid over the position while scanning
type Overlay = Option<(Pos, i8)>;

/// Evaluate the position from the perspective of `role`.
///
/// Returns the sum of `role`'s run scores minus the sum of the opponent's.
/// Positive values favour `role`. An empty board scores 0.
///
/// # Example
///
/// ```
/// use gomoku::board::{Pos, Role};
/// use gomoku::eval::evaluate;
/// use gomoku::search::Position;
///
/// let mut position = Position::new();
/// assert_eq!(evaluate(&position, Role::ME), 0);
///
/// position.set_stone(Pos::new(7, 7), Role::ME);
/// assert!(evaluate(&position, Role::ME) > 0);
/// assert_eq!(evaluate(&position, Role::ME), -evaluate(&position, Role::OPPONENT));
/// ```
#[must_use]
pub fn evaluate(position: &Position, role: Role) -> i32 {
    let totals = side_totals(position);
    totals[role.index()] - totals[role.opponent().index()]
}

/// Change in `evaluate(position, role)` if `role` played at `pos`.
///
/// Only the four lines through `pos` can change, so only those are scanned.
#[must_use]
pub fn evaluate_move(position: &Position, pos: Pos, role: Role) -> i32 {
    let before = lines_through(position, pos, None);
    let after = lines_through(position, pos, Some((pos, role.cell())));
    let mine = role.index();
    let theirs = role.opponent().index();
    (after[mine] - after[theirs]) - (before[mine] - before[theirs])
}

/// Run score totals indexed by [`Role::index`]
#[must_use]
pub fn side_totals(position: &Position) -> [i32; 2] {
    let mut totals = [0i32; 2];

    for i in 0..N {
        scan_line(position, (i, 0), (0, 1), None, &mut totals);
        scan_line(position, (0, i), (1, 0), None, &mut totals);
        // Diagonals start on the left and top edges (SE), top and right edges (SW)
        scan_line(position, (i, 0), (1, 1), None, &mut totals);
        scan_line(position, (0, i), (1, -1), None, &mut totals);
        if i > 0 {
            scan_line(position, (0, i), (1, 1), None, &mut totals);
            scan_line(position, (i, N - 1), (1, -1), None, &mut totals);
        }
    }

    totals
}

/// Totals over the four full lines that pass through `pos`
fn lines_through(position: &Position, pos: Pos, overlay: Overlay) -> [i32; 2] {
    let mut totals = [0i32; 2];
    for &(dr, dc) in &DIRECTIONS {
        let mut r = i32::from(pos.row);
        let mut c = i32::from(pos.col);
        while Pos::is_valid(r - dr, c - dc) {
            r -= dr;
            c -= dc;
        }
        scan_line(position, (r, c), (dr, dc), overlay, &mut totals);
    }
    totals
}

#[inline]
fn cell(position: &Position, r: i32, c: i32, overlay: Overlay) -> Option<i8> {
    match overlay {
        Some((p, v)) if i32::from(p.row) == r && i32::from(p.col) == c => Some(v),
        _ => position.get_at(r, c),
    }
}

#[inline]
fn add_run(totals: &mut [i32; 2], side: i8, length: u32, open_ends: u32) {
    let idx = if side > 0 { 0 } else { 1 };
    totals[idx] += run_score(length, open_ends);
}

/// Walk one maximal line from `start` until it leaves the board.
fn scan_line(
    position: &Position,
    start: (i32, i32),
    (dr, dc): (i32, i32),
    overlay: Overlay,
    totals: &mut [i32; 2],
) {
    let (mut r, mut c) = start;
    let mut run_side = 0i8;
    let mut run_len = 0u32;
    let mut left_open = false;
    let mut prev: Option<i8> = None;

    loop {
        let cur = cell(position, r, c, overlay);
        match cur {
            Some(v) if v != 0 && v == run_side => run_len += 1,
            _ => {
                if run_len > 0 {
                    let right_open = cur == Some(0);
                    add_run(totals, run_side, run_len, u32::from(left_open) + u32::from(right_open));
                }
                match cur {
                    None => break,
                    Some(0) => {
                        run_side = 0;
                        run_len = 0;
                    }
                    Some(v) => {
                        run_side = v;
                        run_len = 1;
                        left_open = prev == Some(0);
                    }
                }
            }
        }
        prev = cur;
        r += dr;
        c += dc;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::eval::PatternScore;

    fn position_with(stones: &[(u8, u8, Role)]) -> Position {
        let mut position = Position::new();
        for &(r, c, role) in stones {
            position.set_stone(Pos::new(r, c), role);
        }
        position
    }

    #[test]
    fn test_empty_board_is_zero() {
        let position = Position::new();
        assert_eq!(evaluate(&position, Role::ME), 0);
        assert_eq!(evaluate(&position, Role::OPPONENT), 0);
    }

    #[test]
    fn test_evaluate_is_deterministic() {
        let position = position_with(&[(7, 7, Role::ME), (7, 8, Role::OPPONENT), (8, 8, Role::ME)]);
        let first = evaluate(&position, Role::ME);
        for _ in 0..5 {
            assert_eq!(evaluate(&position, Role::ME), first);
        }
    }

    #[test]
    fn test_single_center_stone() {
        // Open single in all four directions
        let position = position_with(&[(7, 7, Role::ME)]);
        assert_eq!(evaluate(&position, Role::ME), 4 * PatternScore::OPEN_ONE);
    }

    #[test]
    fn test_corner_stone_is_closed() {
        // Horizontal and vertical runs touch an edge; the SE diagonal too.
        // The SW diagonal through (0, 0) is the corner cell alone: dead.
        let position = position_with(&[(0, 0, Role::ME)]);
        assert_eq!(evaluate(&position, Role::ME), 3 * PatternScore::CLOSED_ONE);
    }

    #[test]
    fn test_live_four_beats_blocked_four_beats_nothing() {
        let live = position_with(&[(7, 5, Role::ME), (7, 6, Role::ME), (7, 7, Role::ME), (7, 8, Role::ME)]);
        let blocked = position_with(&[
            (7, 5, Role::ME),
            (7, 6, Role::ME),
            (7, 7, Role::ME),
            (7, 8, Role::ME),
            (7, 4, Role::OPPONENT),
        ]);
        let five = position_with(&[
            (7, 5, Role::ME),
            (7, 6, Role::ME),
            (7, 7, Role::ME),
            (7, 8, Role::ME),
            (7, 9, Role::ME),
        ]);
        let live_score = evaluate(&live, Role::ME);
        let blocked_score = evaluate(&blocked, Role::ME);
        assert!(live_score > blocked_score);
        assert!(evaluate(&five, Role::ME) > live_score);
        assert!(evaluate(&five, Role::ME) >= PatternScore::FIVE);
    }

    #[test]
    fn test_antisymmetric() {
        let position = position_with(&[
            (7, 7, Role::ME),
            (7, 8, Role::ME),
            (8, 8, Role::OPPONENT),
            (6, 6, Role::OPPONENT),
            (9, 9, Role::OPPONENT),
        ]);
        assert_eq!(evaluate(&position, Role::ME), -evaluate(&position, Role::OPPONENT));
    }

    #[test]
    fn test_run_against_edge() {
        // Four touching the left edge has one open end
        let position = position_with(&[(3, 0, Role::ME), (3, 1, Role::ME), (3, 2, Role::ME), (3, 3, Role::ME)]);
        let totals = side_totals(&position);
        // Row: closed four. Each stone also forms singles in the other three directions.
        assert!(totals[0] >= PatternScore::CLOSED_FOUR);
        assert!(totals[0] < PatternScore::OPEN_FOUR);
        assert_eq!(totals[1], 0);
    }

    #[test]
    fn test_evaluate_move_matches_full_difference() {
        let mut position = position_with(&[
            (7, 7, Role::ME),
            (7, 8, Role::ME),
            (8, 7, Role::OPPONENT),
            (6, 9, Role::OPPONENT),
            (0, 14, Role::ME),
        ]);
        for &(r, c) in &[(7, 9), (7, 6), (8, 8), (0, 13), (14, 0), (6, 8)] {
            let pos = Pos::new(r, c);
            for role in [Role::ME, Role::OPPONENT] {
                let before = evaluate(&position, role);
                let delta = evaluate_move(&position, pos, role);
                let guard = position.place(pos, role);
                let after = evaluate(&guard, role);
                drop(guard);
                assert_eq!(after - before, delta, "delta mismatch at {pos} for {role:?}");
            }
        }
    }

    #[test]
    fn test_blocking_move_has_positive_delta() {
        let position = position_with(&[(7, 6, Role::OPPONENT), (7, 7, Role::OPPONENT), (7, 8, Role::OPPONENT)]);
        assert!(evaluate_move(&position, Pos::new(7, 9), Role::ME) > 0);
    }
}
