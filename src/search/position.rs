//! Search-side board with signed cells and scoped trial placements
//!
//! The search works on a [`Position`] whose cells hold `+1` for the side to move
//! at the root, `-1` for its opponent and `0` for empty. Trial stones are placed
//! through [`Position::place`], which returns a [`Placement`] guard; dropping the
//! guard removes the stone again, so every return path of the recursion
//! (including cutoffs and deadline aborts) leaves the position as it found it.

use std::ops::{Deref, DerefMut};

use crate::board::{Board, Pos, Role, Stone, BOARD_SIZE, TOTAL_CELLS};
use crate::error::EngineError;

use super::zobrist::tables;

/// Board in the search's symmetric encoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Position {
    cells: [[i8; BOARD_SIZE]; BOARD_SIZE],
    hash: u64,
    fingerprint: u64,
    /// Every occupied cell; setup stones first, then trial placements in order
    stones: Vec<Pos>,
    /// Number of setup stones at the front of `stones`
    base: usize,
}

impl Position {
    #[must_use]
    pub fn new() -> Self {
        Self {
            cells: [[0; BOARD_SIZE]; BOARD_SIZE],
            hash: 0,
            fingerprint: 0,
            stones: Vec::with_capacity(TOTAL_CELLS),
            base: 0,
        }
    }

    /// Convert an application board. Stones of `mover` become `+1`.
    pub fn from_board(board: &Board, mover: Stone) -> Result<Self, EngineError> {
        let opponent = match mover {
            Stone::Empty => return Err(EngineError::InvalidSide),
            side => side.opponent(),
        };
        let mut position = Position::new();
        if let Some(mine) = board.stones(mover) {
            for pos in mine.iter_ones() {
                position.set_stone(pos, Role::ME);
            }
        }
        if let Some(theirs) = board.stones(opponent) {
            for pos in theirs.iter_ones() {
                position.set_stone(pos, Role::OPPONENT);
            }
        }
        Ok(position)
    }

    /// Permanently add a setup stone on an empty cell.
    pub fn set_stone(&mut self, pos: Pos, role: Role) {
        debug_assert_eq!(self.stones.len(), self.base, "setup while trial stones are placed");
        if !self.is_empty(pos) {
            return;
        }
        self.put(pos, role);
        self.base += 1;
    }

    #[inline]
    pub fn get(&self, pos: Pos) -> i8 {
        self.cells[pos.row as usize][pos.col as usize]
    }

    /// Cell value at signed coordinates, `None` off the board
    #[inline]
    pub fn get_at(&self, row: i32, col: i32) -> Option<i8> {
        if Pos::is_valid(row, col) {
            Some(self.cells[row as usize][col as usize])
        } else {
            None
        }
    }

    #[inline]
    pub fn is_empty(&self, pos: Pos) -> bool {
        self.get(pos) == 0
    }

    /// Order-independent Zobrist hash of the occupied cells
    #[inline]
    pub fn hash(&self) -> u64 {
        self.hash
    }

    /// Second hash from an independent key table, used to verify cache hits
    #[inline]
    pub fn fingerprint(&self) -> u64 {
        self.fingerprint
    }

    #[inline]
    pub fn stones(&self) -> &[Pos] {
        &self.stones
    }

    #[inline]
    pub fn stone_count(&self) -> usize {
        self.stones.len()
    }

    #[inline]
    pub fn is_board_empty(&self) -> bool {
        self.stones.is_empty()
    }

    #[inline]
    pub fn is_full(&self) -> bool {
        self.stones.len() == TOTAL_CELLS
    }

    /// Most recent trial placement, if the search has placed any
    #[inline]
    pub fn last_move(&self) -> Option<Pos> {
        if self.stones.len() > self.base {
            self.stones.last().copied()
        } else {
            None
        }
    }

    /// Place a trial stone. The stone is removed when the guard drops.
    #[must_use = "the stone is removed as soon as the guard is dropped"]
    pub fn place(&mut self, pos: Pos, role: Role) -> Placement<'_> {
        debug_assert!(self.is_empty(pos), "trial stone on occupied cell {pos}");
        self.put(pos, role);
        Placement {
            position: self,
            pos,
            role,
        }
    }

    fn put(&mut self, pos: Pos, role: Role) {
        let (keys, prints) = tables();
        self.cells[pos.row as usize][pos.col as usize] = role.cell();
        self.hash = keys.toggle(self.hash, pos, role);
        self.fingerprint = prints.toggle(self.fingerprint, pos, role);
        self.stones.push(pos);
    }

    fn take(&mut self, pos: Pos, role: Role) {
        debug_assert_eq!(self.stones.last(), Some(&pos), "placements must unwind in order");
        debug_assert_eq!(self.get(pos), role.cell());
        let (keys, prints) = tables();
        self.stones.pop();
        self.cells[pos.row as usize][pos.col as usize] = 0;
        self.hash = keys.toggle(self.hash, pos, role);
        self.fingerprint = prints.toggle(self.fingerprint, pos, role);
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::new()
    }
}

/// A trial stone that is lifted again when this guard goes out of scope.
///
/// Dereferences to the underlying [`Position`] so the recursion can keep
/// searching through it.
pub struct Placement<'a> {
    position: &'a mut Position,
    pos: Pos,
    role: Role,
}

impl Deref for Placement<'_> {
    type Target = Position;

    fn deref(&self) -> &Position {
        self.position
    }
}

impl DerefMut for Placement<'_> {
    fn deref_mut(&mut self) -> &mut Position {
        self.position
    }
}

impl Drop for Placement<'_> {
    fn drop(&mut self) {
        self.position.take(self.pos, self.role);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_board_maps_mover_to_plus_one() {
        let mut board = Board::new();
        board.place_stone(Pos::new(7, 7), Stone::Black);
        board.place_stone(Pos::new(7, 8), Stone::White);

        let as_white = Position::from_board(&board, Stone::White).unwrap();
        assert_eq!(as_white.get(Pos::new(7, 8)), 1);
        assert_eq!(as_white.get(Pos::new(7, 7)), -1);

        let as_black = Position::from_board(&board, Stone::Black).unwrap();
        assert_eq!(as_black.get(Pos::new(7, 7)), 1);
        assert_eq!(as_black.stone_count(), 2);
        assert_eq!(as_black.last_move(), None);
    }

    #[test]
    fn test_from_board_rejects_empty_side() {
        let board = Board::new();
        assert_eq!(
            Position::from_board(&board, Stone::Empty),
            Err(EngineError::InvalidSide)
        );
    }

    #[test]
    fn test_placement_restores_on_drop() {
        let mut position = Position::new();
        position.set_stone(Pos::new(7, 7), Role::ME);
        let before = position.clone();

        {
            let mut first = position.place(Pos::new(7, 8), Role::OPPONENT);
            assert_eq!(first.get(Pos::new(7, 8)), -1);
            assert_eq!(first.last_move(), Some(Pos::new(7, 8)));
            {
                let second = first.place(Pos::new(8, 8), Role::ME);
                assert_eq!(second.stone_count(), 3);
                assert_eq!(second.last_move(), Some(Pos::new(8, 8)));
            }
            assert_eq!(first.stone_count(), 2);
        }

        assert_eq!(position, before);
    }

    #[test]
    fn test_hash_is_order_independent() {
        let mut a = Position::new();
        a.set_stone(Pos::new(1, 1), Role::ME);
        a.set_stone(Pos::new(2, 2), Role::OPPONENT);

        let mut b = Position::new();
        b.set_stone(Pos::new(2, 2), Role::OPPONENT);
        b.set_stone(Pos::new(1, 1), Role::ME);

        assert_eq!(a.hash(), b.hash());
        assert_eq!(a.fingerprint(), b.fingerprint());
    }

    #[test]
    fn test_trial_hash_matches_setup_hash() {
        let mut setup = Position::new();
        setup.set_stone(Pos::new(4, 4), Role::ME);
        setup.set_stone(Pos::new(4, 5), Role::OPPONENT);

        let mut trial = Position::new();
        trial.set_stone(Pos::new(4, 4), Role::ME);
        let guard = trial.place(Pos::new(4, 5), Role::OPPONENT);
        assert_eq!(guard.hash(), setup.hash());
        assert_eq!(guard.fingerprint(), setup.fingerprint());
    }

    #[test]
    fn test_get_at_off_board() {
        let position = Position::new();
        assert_eq!(position.get_at(-1, 3), None);
        assert_eq!(position.get_at(3, 15), None);
        assert_eq!(position.get_at(3, 3), Some(0));
    }
}
