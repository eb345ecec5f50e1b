//! Game rules for the 6x6 five-in-a-row variant
//!
//! This module implements the rule set including:
//! - Line geometry (clipped, wrap-around and bounce lines)
//! - Run scanning and the missing-teeth validity check
//! - Win and draw detection
//! - The knight constraint on the first response

pub mod geometry;
pub mod knight;
pub mod line;
pub mod win;

use serde::{Deserialize, Serialize};

// Re-exports for convenient access
pub use geometry::{reflection_points, step, Direction, GeometryMode, Ray};
pub use knight::{is_knight_move, knight_targets, legal_responses, KNIGHT_OFFSETS};
pub use line::{has_missing_teeth, is_great_diagonal, scan_line, window_is_valid, LineScan};
pub use win::{
    check_game_status, check_win, find_winning_move, find_winning_moves, status_after_move,
    GameStatus, WinResult,
};

/// Rule toggles, passed explicitly to every rule-dependent call.
///
/// All three default to off, which gives plain clipped five-in-a-row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Rules {
    /// Diagonal lines reflect off the board edge
    pub bounce: bool,
    /// Lines re-enter from the opposite edge
    pub wrap: bool,
    /// Fives off the great diagonals must be physically contiguous
    pub missing_teeth: bool,
}

impl Rules {
    /// Argument order follows the classic toggle order: bounce, missing teeth, wrap
    pub const fn new(bounce: bool, missing_teeth: bool, wrap: bool) -> Self {
        Self {
            bounce,
            wrap,
            missing_teeth,
        }
    }

    pub const fn with_bounce(mut self, on: bool) -> Self {
        self.bounce = on;
        self
    }

    pub const fn with_wrap(mut self, on: bool) -> Self {
        self.wrap = on;
        self
    }

    pub const fn with_missing_teeth(mut self, on: bool) -> Self {
        self.missing_teeth = on;
        self
    }

    /// Bounce and missing teeth together make lines expensive to reason about
    #[inline]
    pub fn is_complex(&self) -> bool {
        self.bounce && self.missing_teeth
    }
}

impl std::fmt::Display for Rules {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let on_off = |b: bool| if b { "on" } else { "off" };
        write!(
            f,
            "bounce={} wrap={} missing_teeth={}",
            on_off(self.bounce),
            on_off(self.wrap),
            on_off(self.missing_teeth)
        )
    }
}
