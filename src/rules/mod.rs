//! Game rules for free-style Gomoku
//!
//! Five or more in a row wins; overlines count. There are no captures and no
//! forbidden moves.

pub mod win;

// Re-exports for convenient access
pub use win::{
    has_five, is_winning_move, line_shape, line_shapes, winner, LineShape, DIRECTIONS,
};
