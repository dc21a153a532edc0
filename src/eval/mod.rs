//! Evaluation module for Gomoku positions
//!
//! This module provides pattern recognition and scoring for board positions.
//! The evaluation considers line patterns (ones, twos, threes, fours, fives)
//! and their open ends.

pub mod heuristic;
pub mod patterns;

pub use heuristic::{evaluate, evaluate_move, side_totals};
pub use patterns::{run_score, PatternScore};
