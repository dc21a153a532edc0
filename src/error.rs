//! Error types for the engine boundary

use thiserror::Error;

/// Errors raised when the engine cannot possibly produce a move.
///
/// Every other condition (no candidates, deadline reached) degrades to a
/// best-effort result instead.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EngineError {
    /// The grid does not have `BOARD_SIZE` rows
    #[error("board has {rows} rows, expected {expected}")]
    RowCount { rows: usize, expected: usize },

    /// A row does not have `BOARD_SIZE` cells
    #[error("board row {row} has {len} cells, expected {expected}")]
    RowLength {
        row: usize,
        len: usize,
        expected: usize,
    },

    /// Unknown cell symbol in the text format
    #[error("unknown cell symbol {symbol:?} at ({row}, {col})")]
    BadSymbol { symbol: char, row: usize, col: usize },

    /// The side to move must be Black or White
    #[error("side to move must be black or white")]
    InvalidSide,
}
