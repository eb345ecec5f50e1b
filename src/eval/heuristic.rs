//! Heuristic evaluation function for board positions
//!
//! This module provides the leaf evaluation for the minimax search.
//! It evaluates board positions based on:
//! - Line patterns (fives, fours, threes, twos) under the active geometry
//! - Bounce extensions along diagonals
//! - Positional bonuses (center control)
//!
//! `evaluate` is exhaustive and deterministic. `evaluate_sampled` is a
//! cheaper random approximation reserved for the weaker tiers.

use rand::seq::IteratorRandom;
use rand::Rng;

use crate::board::{Bitboard, Board, Pos, Stone};
use crate::rules::{scan_line, Direction, GeometryMode, Rules};

use super::patterns::{bounce_value, center_bonus, sequence_value};

/// Evaluate the board for `ai` against `opponent`.
///
/// Returns a score where:
/// - Positive values favour `ai`
/// - Negative values favour `opponent`
///
/// Every occupied cell is visited in row-major order. A run is credited
/// by the first cell whose scan reaches it; later scans that touch an
/// already credited cell in the same direction are skipped.
#[must_use]
pub fn evaluate(board: &Board, ai: Stone, opponent: Stone, rules: Rules) -> i32 {
    let mut credited = Credited::default();
    board
        .occupied()
        .iter_ones()
        .map(|pos| signed_cell_score(board, pos, ai, opponent, rules, &mut credited))
        .sum()
}

/// Evaluate from at most `sample` randomly chosen occupied cells.
///
/// This is a heuristic approximation: results vary with the random source
/// and runs may be missed. Only the medium tier uses it.
pub fn evaluate_sampled<R: Rng + ?Sized>(
    board: &Board,
    ai: Stone,
    opponent: Stone,
    rules: Rules,
    rng: &mut R,
    sample: usize,
) -> i32 {
    let mut credited = Credited::default();
    board
        .occupied()
        .iter_ones()
        .choose_multiple(rng, sample)
        .into_iter()
        .map(|pos| signed_cell_score(board, pos, ai, opponent, rules, &mut credited))
        .sum()
}

/// Score of a hypothetical placement for `player`, from `player`'s point of view
pub fn score_placement(scratch: &mut Board, pos: Pos, player: Stone, rules: Rules) -> i32 {
    if !scratch.place(pos, player) {
        return i32::MIN;
    }
    let score = evaluate(scratch, player, player.opponent(), rules);
    scratch.remove(pos);
    score
}

/// Cells already credited to a run, per direction, for line and bounce scans.
///
/// The scanner reaches at most four cells each way, so a run longer than
/// five looks different from different cells. Skipping any scan that
/// overlaps a credited one keeps such a run from counting twice.
#[derive(Debug, Default)]
struct Credited {
    line: [Bitboard; 4],
    bounce: [Bitboard; 4],
}

/// Claim the cells of a scan; false if an earlier scan already owns one
fn claim(owned: &mut Bitboard, cells: &[Pos]) -> bool {
    if cells.iter().any(|&p| owned.get(p)) {
        return false;
    }
    for &p in cells {
        owned.set(p);
    }
    true
}

fn signed_cell_score(
    board: &Board,
    pos: Pos,
    ai: Stone,
    opponent: Stone,
    rules: Rules,
    credited: &mut Credited,
) -> i32 {
    let color = board.get(pos);
    let score = cell_score(board, pos, color, rules, credited);
    if color == ai {
        score
    } else if color == opponent {
        -score
    } else {
        0
    }
}

/// Position value of `pos` plus the runs through it not yet credited
fn cell_score(board: &Board, pos: Pos, color: Stone, rules: Rules, credited: &mut Credited) -> i32 {
    let size = board.size();
    let line_mode = GeometryMode::line_mode(rules);
    let mut score = center_bonus(pos.row, pos.col, size);

    for (i, direction) in Direction::ALL.into_iter().enumerate() {
        let scan = scan_line(board, pos, color, direction, line_mode);
        if claim(&mut credited.line[i], &scan.cells) {
            score += sequence_value(&scan, size, rules);
        }

        if rules.bounce && direction.is_diagonal() {
            let bounced = scan_line(board, pos, color, direction, GeometryMode::Bounce);
            if claim(&mut credited.bounce[i], &bounced.cells) {
                score += bounce_value(&bounced, size, rules);
            }
        }
    }

    score
}
