//! Knight-move constraint on the first response
//!
//! When the option is on, the second mark of a game must sit a chess
//! knight's jump away from the opening mark. With wrap on, the jump
//! wraps around the edges like every other line does.

use crate::board::{Board, Pos};

/// The eight knight jumps as (row_delta, col_delta)
pub const KNIGHT_OFFSETS: [(i32, i32); 8] = [
    (-2, -1),
    (-2, 1),
    (-1, -2),
    (-1, 2),
    (1, -2),
    (1, 2),
    (2, -1),
    (2, 1),
];

/// Cells reachable from `from` by one knight jump, row-major, without duplicates
pub fn knight_targets(size: usize, from: Pos, wrap: bool) -> Vec<Pos> {
    let n = size as i32;
    let mut targets: Vec<Pos> = KNIGHT_OFFSETS
        .iter()
        .filter_map(|&(dr, dc)| {
            let (mut r, mut c) = (i32::from(from.row) + dr, i32::from(from.col) + dc);
            if wrap {
                r = r.rem_euclid(n);
                c = c.rem_euclid(n);
            }
            #[allow(clippy::cast_sign_loss, clippy::cast_possible_truncation)]
            Pos::is_valid(r, c, size).then(|| Pos::new(r as u8, c as u8))
        })
        .filter(|&p| p != from)
        .collect();
    targets.sort();
    targets.dedup();
    targets
}

/// Whether `to` is one knight jump from `from`
pub fn is_knight_move(size: usize, from: Pos, to: Pos, wrap: bool) -> bool {
    knight_targets(size, from, wrap).contains(&to)
}

/// Empty knight targets from the opening mark
pub fn legal_responses(board: &Board, opening: Pos, wrap: bool) -> Vec<Pos> {
    knight_targets(board.size(), opening, wrap)
        .into_iter()
        .filter(|&p| board.is_empty(p))
        .collect()
}
