//! Five-in-a-row detection
//!
//! All checks look at a single cell and the four lines through it, treating the
//! cell as if it held the given role. Nothing here mutates the position.

use crate::board::{Pos, Role};
use crate::search::Position;

/// Direction vectors for line checking (4 directions)
pub const DIRECTIONS: [(i32, i32); 4] = [
    (0, 1),  // Horizontal
    (1, 0),  // Vertical
    (1, 1),  // Diagonal SE
    (1, -1), // Diagonal SW
];

/// Run of `role` stones through one cell along one direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineShape {
    /// Consecutive stones including the cell itself
    pub length: u32,
    /// Empty cells directly beyond both ends (0-2)
    pub open_ends: u32,
}

impl LineShape {
    #[inline]
    pub fn is_five(self) -> bool {
        self.length >= 5
    }

    /// Four with at least one way to extend
    #[inline]
    pub fn is_four(self) -> bool {
        self.length == 4 && self.open_ends >= 1
    }

    #[inline]
    pub fn is_open_three(self) -> bool {
        self.length == 3 && self.open_ends == 2
    }
}

/// Shape of the run through `pos` along `(dr, dc)`, with `pos` counted as `role`.
pub fn line_shape(position: &Position, pos: Pos, role: Role, (dr, dc): (i32, i32)) -> LineShape {
    let me = role.cell();
    let mut length = 1;
    let mut open_ends = 0;

    for sign in [1, -1] {
        let mut r = i32::from(pos.row) + dr * sign;
        let mut c = i32::from(pos.col) + dc * sign;
        loop {
            match position.get_at(r, c) {
                Some(v) if v == me => {
                    length += 1;
                    r += dr * sign;
                    c += dc * sign;
                }
                Some(0) => {
                    open_ends += 1;
                    break;
                }
                // Opponent stone or board edge
                _ => break,
            }
        }
    }

    LineShape { length, open_ends }
}

/// Shapes in all four directions through `pos`
pub fn line_shapes(position: &Position, pos: Pos, role: Role) -> [LineShape; 4] {
    DIRECTIONS.map(|dir| line_shape(position, pos, role, dir))
}

/// Check whether a stone of `role` at (`row`, `col`) makes five or more in a row.
///
/// The cell is treated as holding `role` whatever it holds now, so the same
/// check serves as the terminal test for a stone that was just placed.
///
/// # Example
///
/// ```
/// use gomoku::board::{Pos, Role};
/// use gomoku::rules::is_winning_move;
/// use gomoku::search::Position;
///
/// let mut position = Position::new();
/// for col in 7..11 {
///     position.set_stone(Pos::new(7, col), Role::ME);
/// }
/// assert!(is_winning_move(&position, 7, 11, Role::ME));
/// assert!(!is_winning_move(&position, 8, 11, Role::ME));
/// ```
#[must_use]
pub fn is_winning_move(position: &Position, row: u8, col: u8, role: Role) -> bool {
    let pos = Pos::new(row, col);
    DIRECTIONS
        .iter()
        .any(|&dir| line_shape(position, pos, role, dir).is_five())
}

/// Check if `role` already has five or more in a row anywhere.
pub fn has_five(position: &Position, role: Role) -> bool {
    position
        .stones()
        .iter()
        .filter(|&&pos| position.get(pos) == role.cell())
        .any(|&pos| is_winning_move(position, pos.row, pos.col, role))
}

/// Winner of the position, if any side has five in a row
pub fn winner(position: &Position) -> Option<Role> {
    [Role::ME, Role::OPPONENT]
        .into_iter()
        .find(|&role| has_five(position, role))
}
