//! Threat detection for move ordering and forced-threat defence
//!
//! A threat is an empty cell scored by what a mark there would build:
//! - Attack: the mark makes a four, an open three or a win
//! - Block: the same cell seen from the defender (denies the attacker)
//! - Develop: anything smaller, such as open twos
//!
//! Placements are scored in place: the line scanner treats the empty origin
//! as holding the player's mark, so the live board is never written.

use crate::board::{Board, Pos, Stone};
use crate::eval::{bounce_value, sequence_value, PatternScore};
use crate::rules::{find_winning_moves, scan_line, Direction, GeometryMode, Rules};

/// What a threat does for the side to move
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ThreatKind {
    Attack,
    Block,
    Develop,
}

/// A scored empty cell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Threat {
    pub pos: Pos,
    /// Relative priority; higher is more urgent
    pub priority: i32,
    pub kind: ThreatKind,
}

/// Score every empty cell for `player`. Cells worth nothing are left out.
///
/// The result is in row-major order and unsorted; see `rank_moves` for an
/// ordering.
pub fn detect_threats(board: &Board, player: Stone, rules: Rules) -> Vec<Threat> {
    if !player.is_player() {
        return Vec::new();
    }

    board
        .empty_cells()
        .into_iter()
        .filter_map(|pos| {
            let (priority, strongest) = placement_priority(board, pos, player, rules);
            if priority <= 0 {
                return None;
            }
            let kind = if strongest >= PatternScore::FOUR_PENALIZED {
                ThreatKind::Attack
            } else {
                ThreatKind::Develop
            };
            Some(Threat { pos, priority, kind })
        })
        .collect()
}

/// The attacker's threats, seen as cells `defender` should occupy
pub fn detect_blocks(board: &Board, defender: Stone, rules: Rules) -> Vec<Threat> {
    detect_threats(board, defender.opponent(), rules)
        .into_iter()
        .map(|t| Threat {
            kind: ThreatKind::Block,
            ..t
        })
        .collect()
}

/// Merge attacks and blocks per cell and order by priority, highest first.
///
/// A cell's priority is its attack value plus its block value, labelled
/// by whichever side dominates. The sort is stable, so equal priorities
/// keep row-major order.
pub fn rank_moves(board: &Board, player: Stone, rules: Rules) -> Vec<Threat> {
    let attacks = detect_threats(board, player, rules);
    let blocks = detect_blocks(board, player, rules);

    let mut merged: Vec<Threat> = Vec::with_capacity(attacks.len() + blocks.len());
    for threat in attacks.into_iter().chain(blocks) {
        match merged.iter_mut().find(|m| m.pos == threat.pos) {
            Some(existing) => {
                if threat.kind == ThreatKind::Block && threat.priority > existing.priority {
                    existing.kind = ThreatKind::Block;
                }
                existing.priority += threat.priority;
            }
            None => merged.push(threat),
        }
    }

    merged.sort_by_key(|t| t.pos);
    merged.sort_by(|a, b| b.priority.cmp(&a.priority));
    merged
}

/// Moves that leave `player` with two or more distinct winning completions,
/// paired with the completion count. Row-major order.
pub fn find_forks(board: &Board, player: Stone, rules: Rules) -> Vec<(Pos, usize)> {
    if !player.is_player() {
        return Vec::new();
    }
    let mut scratch = board.snapshot();
    board
        .empty_cells()
        .into_iter()
        .filter_map(|pos| {
            if !scratch.place(pos, player) {
                return None;
            }
            let completions = find_winning_moves(&scratch, player, rules).len();
            scratch.remove(pos);
            (completions >= 2).then_some((pos, completions))
        })
        .collect()
}

/// Sum of the per-direction values of a mark at `pos`, plus the strongest
/// single direction
fn placement_priority(board: &Board, pos: Pos, player: Stone, rules: Rules) -> (i32, i32) {
    let size = board.size();
    let line_mode = GeometryMode::line_mode(rules);
    let mut total = 0;
    let mut strongest = 0;

    for direction in Direction::ALL {
        let scan = scan_line(board, pos, player, direction, line_mode);
        let mut value = sequence_value(&scan, size, rules);

        if rules.bounce && direction.is_diagonal() {
            let bounced = scan_line(board, pos, player, direction, GeometryMode::Bounce);
            value += bounce_value(&bounced, size, rules);
        }

        strongest = strongest.max(value);
        total += value;
    }

    (total, strongest)
}

#[cfg(test)]
mod tests {
    use super::*;

    const PLAIN: Rules = Rules::new(false, false, false);

    fn board(rows: &[&str]) -> Board {
        Board::from_rows(rows).unwrap()
    }

    fn priority_at(threats: &[Threat], pos: Pos) -> Option<i32> {
        threats.iter().find(|t| t.pos == pos).map(|t| t.priority)
    }

    #[test]
    fn test_detect_threats_winning_cell() {
        let b = board(&[
            "......",
            ".XXXX.",
            "......",
            "......",
            "......",
            "......",
        ]);
        let threats = detect_threats(&b, Stone::X, PLAIN);
        let win = priority_at(&threats, Pos::new(1, 0)).unwrap();
        assert!(win >= PatternScore::FIVE, "completing five scores as a win, got {}", win);
        assert!(threats.iter().all(|t| b.is_empty(t.pos)));
    }

    #[test]
    fn test_detect_threats_does_not_mutate() {
        let b = board(&[
            "......",
            "..XX..",
            "......",
            "......",
            "......",
            "......",
        ]);
        let before = b.clone();
        let _ = detect_threats(&b, Stone::X, PLAIN);
        assert_eq!(b, before);
    }

    #[test]
    fn test_fork_outranks_single_line() {
        // (3,3) makes fours on the row and the column at once
        let b = board(&[
            "......",
            "...X..",
            "...X..",
            ".XX.X.",
            "...X..",
            "......",
        ]);
        let threats = detect_threats(&b, Stone::X, PLAIN);
        let fork = priority_at(&threats, Pos::new(3, 3)).unwrap();
        let single = priority_at(&threats, Pos::new(0, 3)).unwrap();
        assert!(fork >= 2 * PatternScore::FOUR, "two open fours, got {}", fork);
        assert!(fork > single, "fork {} should beat single line {}", fork, single);
    }

    #[test]
    fn test_missing_teeth_penalizes_broken_four() {
        // Wrapped diagonal four (2,3) (3,4) (4,5) (5,0): extending at (1,2)
        let b = board(&[
            "......",
            "......",
            "...X..",
            "....X.",
            ".....X",
            "X.....",
        ]);
        let wrap = PLAIN.with_wrap(true);
        let free = priority_at(&detect_threats(&b, Stone::X, wrap), Pos::new(1, 2)).unwrap();
        let teeth = priority_at(
            &detect_threats(&b, Stone::X, wrap.with_missing_teeth(true)),
            Pos::new(1, 2),
        )
        .unwrap();
        assert!(teeth < free, "broken line must be worth less ({} vs {})", teeth, free);
    }

    #[test]
    fn test_detect_blocks_relabels() {
        let b = board(&[
            "......",
            ".OOO..",
            "......",
            "......",
            "......",
            "......",
        ]);
        let blocks = detect_blocks(&b, Stone::X, PLAIN);
        assert!(!blocks.is_empty());
        assert!(blocks.iter().all(|t| t.kind == ThreatKind::Block));
        assert!(priority_at(&blocks, Pos::new(1, 4)).is_some());
    }

    #[test]
    fn test_rank_moves_puts_win_first() {
        let b = board(&[
            "......",
            ".XXXX.",
            "......",
            "..OOO.",
            "......",
            "......",
        ]);
        let ranked = rank_moves(&b, Stone::X, PLAIN);
        assert_eq!(ranked[0].pos, Pos::new(1, 0), "winning cells first, row-major on ties");
        assert_eq!(ranked[1].pos, Pos::new(1, 5));
        assert!(ranked.windows(2).all(|w| w[0].priority >= w[1].priority));
    }

    #[test]
    fn test_find_forks() {
        let b = board(&[
            "......",
            "......",
            "..XX..",
            "......",
            "......",
            "......",
        ]);
        // (2,1) or (2,4) makes an open three, not a fork
        assert!(find_forks(&b, Stone::X, PLAIN).is_empty());

        let open = board(&[
            "......",
            "......",
            ".XX.X.",
            "......",
            "......",
            "......",
        ]);
        // Six-wide row: (2,3) gives .XXXX. with both ends open
        let forks = find_forks(&open, Stone::X, PLAIN);
        assert_eq!(forks, vec![(Pos::new(2, 3), 2)]);
    }
}
