//! Application-side board

use std::fmt;
use std::str::FromStr;

use super::bitboard::Bitboard;
use super::{Pos, Stone, BOARD_SIZE};
use crate::error::EngineError;

/// Game board as owned by the caller.
///
/// Cells are Black, White or Empty. The engine never mutates a `Board`; it
/// converts it into a search [`Position`](crate::search::Position) first.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Board {
    /// Black stones bitboard
    pub black: Bitboard,
    /// White stones bitboard
    pub white: Bitboard,
}

impl Board {
    pub fn new() -> Self {
        Self {
            black: Bitboard::new(),
            white: Bitboard::new(),
        }
    }

    /// Build a board from a row-major grid, checking its dimensions.
    pub fn from_rows(rows: &[Vec<Stone>]) -> Result<Self, EngineError> {
        if rows.len() != BOARD_SIZE {
            return Err(EngineError::RowCount {
                rows: rows.len(),
                expected: BOARD_SIZE,
            });
        }
        let mut board = Board::new();
        for (r, row) in rows.iter().enumerate() {
            if row.len() != BOARD_SIZE {
                return Err(EngineError::RowLength {
                    row: r,
                    len: row.len(),
                    expected: BOARD_SIZE,
                });
            }
            for (c, &stone) in row.iter().enumerate() {
                board.place_stone(Pos::new(r as u8, c as u8), stone);
            }
        }
        Ok(board)
    }

    #[inline]
    pub fn size(&self) -> usize {
        BOARD_SIZE
    }

    /// Get stone at position
    #[inline]
    pub fn get(&self, pos: Pos) -> Stone {
        if self.black.get(pos) {
            Stone::Black
        } else if self.white.get(pos) {
            Stone::White
        } else {
            Stone::Empty
        }
    }

    #[inline]
    pub fn is_empty(&self, pos: Pos) -> bool {
        !self.black.get(pos) && !self.white.get(pos)
    }

    /// Place a stone, replacing whatever was there
    #[inline]
    pub fn place_stone(&mut self, pos: Pos, stone: Stone) {
        self.remove_stone(pos);
        match stone {
            Stone::Black => self.black.set(pos),
            Stone::White => self.white.set(pos),
            Stone::Empty => {}
        }
    }

    #[inline]
    pub fn remove_stone(&mut self, pos: Pos) {
        self.black.clear(pos);
        self.white.clear(pos);
    }

    /// Get bitboard for a color (returns None for Empty)
    #[inline]
    pub fn stones(&self, stone: Stone) -> Option<&Bitboard> {
        match stone {
            Stone::Black => Some(&self.black),
            Stone::White => Some(&self.white),
            Stone::Empty => None,
        }
    }

    /// Total stones on board
    #[inline]
    pub fn stone_count(&self) -> u32 {
        self.black.count() + self.white.count()
    }

    #[inline]
    pub fn is_board_empty(&self) -> bool {
        self.black.is_empty() && self.white.is_empty()
    }

    #[inline]
    pub fn is_full(&self) -> bool {
        self.stone_count() as usize == BOARD_SIZE * BOARD_SIZE
    }
}

/// Text format: one line per row, `.` empty, `X`/`B` black, `O`/`W` white.
/// Whitespace inside a line is ignored, blank lines are skipped.
impl FromStr for Board {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut rows = Vec::with_capacity(BOARD_SIZE);
        for line in s.lines().filter(|l| !l.trim().is_empty()) {
            let r = rows.len();
            let mut row = Vec::with_capacity(BOARD_SIZE);
            for (c, ch) in line.chars().filter(|ch| !ch.is_whitespace()).enumerate() {
                let stone = match ch {
                    '.' | '+' | '_' => Stone::Empty,
                    'X' | 'x' | 'B' | 'b' => Stone::Black,
                    'O' | 'o' | 'W' | 'w' => Stone::White,
                    symbol => return Err(EngineError::BadSymbol { symbol, row: r, col: c }),
                };
                row.push(stone);
            }
            rows.push(row);
        }
        Board::from_rows(&rows)
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for r in 0..BOARD_SIZE as u8 {
            let line: String = (0..BOARD_SIZE as u8)
                .map(|c| self.get(Pos::new(r, c)).symbol())
                .collect();
            writeln!(f, "{line}")?;
        }
        Ok(())
    }
}
