//! Pattern scores for line evaluation
//!
//! The same table scores threats (hypothetical placements) and whole-board
//! evaluation, so a run means the same thing to the move orderer and to the
//! minimax leaves.

use crate::rules::{LineScan, Rules};

/// Pattern scores
pub struct PatternScore;

impl PatternScore {
    /// Valid five: immediate win
    pub const FIVE: i32 = 1_000;
    /// Four with at least one open end
    pub const FOUR: i32 = 100;
    /// Four (or five) that the missing-teeth rule invalidates
    pub const FOUR_PENALIZED: i32 = 40;
    /// Three, both ends open
    pub const OPEN_THREE: i32 = 50;
    /// Three, one end open
    pub const CLOSED_THREE: i32 = 10;
    /// Two, both ends open
    pub const OPEN_TWO: i32 = 5;

    // Extra credit for diagonal runs that actually bounce
    pub const BOUNCE_FIVE: i32 = 1_000;
    pub const BOUNCE_FOUR: i32 = 80;
    pub const BOUNCE_THREE: i32 = 30;

    /// Weight per step of closeness to the centre
    pub const CENTER_WEIGHT: i32 = 1;
}

/// Score one run by length, open ends and the missing-teeth check
pub fn sequence_value(scan: &LineScan, size: usize, rules: Rules) -> i32 {
    match scan.len() {
        n if n >= 5 => {
            if scan.winning_window(size, rules).is_some() {
                PatternScore::FIVE
            } else {
                PatternScore::FOUR_PENALIZED
            }
        }
        4 if scan.open_ends > 0 => {
            if scan.passes_missing_teeth(size, rules) {
                PatternScore::FOUR
            } else {
                PatternScore::FOUR_PENALIZED
            }
        }
        3 => match scan.open_ends {
            2 => PatternScore::OPEN_THREE,
            1 => PatternScore::CLOSED_THREE,
            _ => 0,
        },
        2 if scan.open_ends == 2 => PatternScore::OPEN_TWO,
        _ => 0,
    }
}

/// Bonus for a bounce scan; zero unless the run really reflects
pub fn bounce_value(scan: &LineScan, size: usize, rules: Rules) -> i32 {
    if !scan.reflects() {
        return 0;
    }
    match scan.len() {
        n if n >= 5 && scan.winning_window(size, rules).is_some() => PatternScore::BOUNCE_FIVE,
        n if n >= 4 => PatternScore::BOUNCE_FOUR,
        3 => PatternScore::BOUNCE_THREE,
        _ => 0,
    }
}

/// Closeness to the centre: 0 in the corners, highest on the middle cells.
/// Symmetric under every board rotation and reflection.
pub fn center_bonus(row: u8, col: u8, size: usize) -> i32 {
    let span = size as i32 - 1;
    let dr = (2 * i32::from(row) - span).abs();
    let dc = (2 * i32::from(col) - span).abs();
    (2 * span - dr - dc) / 2 * PatternScore::CENTER_WEIGHT
}
