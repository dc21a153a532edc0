//! Gomoku AI Engine
//!
//! An adversarial search engine for five-in-a-row on a 15x15 board:
//! - Five or more in a row wins (overlines count)
//! - No captures, no forbidden moves
//!
//! # Architecture
//!
//! The engine is organized into several modules:
//! - [`board`]: Board representation with bitboards
//! - [`rules`]: Five-in-a-row detection and line shapes
//! - [`eval`]: Position evaluation and heuristics
//! - [`search`]: Position cache, move generation, tactics and alpha-beta
//! - [`engine`]: Main AI engine integrating all components
//! - [`error`]: Errors raised at the engine boundary
//!
//! # Quick Start
//!
//! ```
//! use gomoku::{AIEngine, Board, Difficulty, Pos, Stone};
//!
//! let mut board = Board::new();
//! let mut engine = AIEngine::with_difficulty(Difficulty::Easy);
//!
//! board.place_stone(Pos::new(7, 7), Stone::Black);
//!
//! // AI responds as White
//! let result = engine.get_move(&board, Stone::White).unwrap();
//! if let Some(pos) = result.best_move {
//!     board.place_stone(pos, Stone::White);
//!     println!("AI plays at ({}, {})", pos.row, pos.col);
//! }
//! ```
//!
//! # Search Priority
//!
//! 1. Center on an empty board
//! 2. Immediate winning move
//! 3. Block the opponent's winning cell or fork
//! 4. Alpha-Beta search with the difficulty's policy

pub mod board;
pub mod engine;
pub mod error;
pub mod eval;
pub mod rules;
pub mod search;

// Re-export commonly used types for convenience
pub use board::{Board, Pos, Role, Stone, BOARD_SIZE};
pub use engine::{AIEngine, Difficulty, EngineConfig, MoveResult, SearchType};
pub use error::EngineError;
