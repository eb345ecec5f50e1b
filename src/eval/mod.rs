//! Evaluation module for board positions
//!
//! This module provides pattern recognition and scoring for board positions.
//! The evaluation considers:
//! - Line patterns (twos, threes, fours, fives)
//! - The missing-teeth penalty on broken fours
//! - Bounce extensions along diagonals
//! - Positional bonuses (center control)

pub mod heuristic;
pub mod patterns;

pub use heuristic::{evaluate, evaluate_sampled, score_placement};
pub use patterns::{bounce_value, center_bonus, sequence_value, PatternScore};
