//! Run scanning along one line through a cell
//!
//! A scan walks both ways from an origin cell, collecting consecutive marks
//! of one player (at most four each way) under a given geometry mode, and
//! records whether each end of the run is open.

use crate::board::{Bitboard, Board, Pos, Stone};

use super::geometry::{Direction, GeometryMode, Ray};
use super::Rules;

/// Cells examined on each side of the origin
pub const MAX_REACH: usize = 4;

/// Marks needed to win
pub const WIN_LENGTH: usize = 5;

/// A run of one player's marks through an origin cell
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineScan {
    /// Run cells from the backward extreme to the forward extreme
    pub cells: Vec<Pos>,
    /// Index of the origin within `cells`
    pub origin: usize,
    /// Ends (0-2) whose next reachable cell is empty
    pub open_ends: u8,
    pub direction: Direction,
    pub mode: GeometryMode,
}

impl LineScan {
    #[inline]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// First five-cell window containing the origin that counts as a win
    pub fn winning_window(&self, size: usize, rules: Rules) -> Option<&[Pos]> {
        if self.cells.len() < WIN_LENGTH {
            return None;
        }
        let first = self.origin.saturating_sub(WIN_LENGTH - 1);
        let last = self.origin.min(self.cells.len() - WIN_LENGTH);
        (first..=last)
            .map(|start| &self.cells[start..start + WIN_LENGTH])
            .find(|window| window_is_valid(window, size, rules))
    }

    /// Whether the whole run survives the missing-teeth check
    #[inline]
    pub fn passes_missing_teeth(&self, size: usize, rules: Rules) -> bool {
        window_is_valid(&self.cells, size, rules)
    }

    /// Whether the run changes direction anywhere (a bounce actually happened)
    pub fn reflects(&self) -> bool {
        !super::geometry::reflection_points(&self.cells).is_empty()
    }
}

/// Scan the run of `color` through `origin` along `direction`.
///
/// The origin is counted as holding `color` whatever the board says, so
/// callers can score a hypothetical placement without mutating the board.
pub fn scan_line(
    board: &Board,
    origin: Pos,
    color: Stone,
    direction: Direction,
    mode: GeometryMode,
) -> LineScan {
    let (dr, dc) = direction.delta();
    let mut seen = Bitboard::new();
    seen.set(origin);

    let (forward, forward_open) = extend(board, origin, color, (dr, dc), mode, &mut seen);
    let (backward, backward_open) = extend(board, origin, color, (-dr, -dc), mode, &mut seen);

    let mut cells = Vec::with_capacity(backward.len() + forward.len() + 1);
    cells.extend(backward.iter().rev());
    let origin_index = cells.len();
    cells.push(origin);
    cells.extend(forward);

    LineScan {
        cells,
        origin: origin_index,
        open_ends: u8::from(forward_open) + u8::from(backward_open),
        direction,
        mode,
    }
}

/// Walk one way collecting `color`; returns the run and whether its end is open
fn extend(
    board: &Board,
    origin: Pos,
    color: Stone,
    (dr, dc): (i32, i32),
    mode: GeometryMode,
    seen: &mut Bitboard,
) -> (Vec<Pos>, bool) {
    let mut run = Vec::with_capacity(MAX_REACH);
    let mut ray = Ray::new(board.size(), origin, dr, dc, mode);

    while run.len() < MAX_REACH {
        match ray.next() {
            Some(pos) if seen.get(pos) => return (run, false),
            Some(pos) if board.get(pos) == color => {
                seen.set(pos);
                run.push(pos);
            }
            Some(pos) => return (run, board.is_empty(pos)),
            None => return (run, false),
        }
    }

    let open = matches!(ray.next(), Some(pos) if !seen.get(pos) && board.is_empty(pos));
    (run, open)
}

/// All cells on the main diagonal (row == col) or the anti-diagonal
/// (row + col == N - 1)
pub fn is_great_diagonal(cells: &[Pos], size: usize) -> bool {
    let last = size as i32 - 1;
    !cells.is_empty()
        && (cells.iter().all(|p| p.row == p.col)
            || cells
                .iter()
                .all(|p| i32::from(p.row) + i32::from(p.col) == last))
}

/// Some pair of consecutive cells is not physically touching
pub fn has_missing_teeth(cells: &[Pos]) -> bool {
    cells.windows(2).any(|pair| !pair[0].is_adjacent(pair[1]))
}

/// A line passes unless missing teeth is on, it lies off the great
/// diagonals, and it has a gap between consecutive cells. Rows and columns
/// get no exemption: one stitched together by wrap has a gap.
#[inline]
pub fn window_is_valid(cells: &[Pos], size: usize, rules: Rules) -> bool {
    !rules.missing_teeth || is_great_diagonal(cells, size) || !has_missing_teeth(cells)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board(rows: &[&str]) -> Board {
        Board::from_rows(rows).unwrap()
    }

    #[test]
    fn test_scan_counts_run_and_open_ends() {
        let b = board(&[
            "......",
            ".XXX..",
            "......",
            "......",
            "......",
            "......",
        ]);
        let scan = scan_line(&b, Pos::new(1, 2), Stone::X, Direction::Horizontal, GeometryMode::Clipped);
        assert_eq!(scan.len(), 3);
        assert_eq!(scan.origin, 1);
        assert_eq!(scan.open_ends, 2);
        assert_eq!(scan.cells, vec![Pos::new(1, 1), Pos::new(1, 2), Pos::new(1, 3)]);
    }

    #[test]
    fn test_scan_blocked_by_edge_and_opponent() {
        let b = board(&[
            "XXXO..",
            "......",
            "......",
            "......",
            "......",
            "......",
        ]);
        let scan = scan_line(&b, Pos::new(0, 0), Stone::X, Direction::Horizontal, GeometryMode::Clipped);
        assert_eq!(scan.len(), 3);
        assert_eq!(scan.open_ends, 0);
    }

    #[test]
    fn test_scan_wrap_joins_both_edges() {
        let b = board(&[
            "......",
            "......",
            "XX..XX",
            "......",
            "......",
            "......",
        ]);
        let clipped = scan_line(&b, Pos::new(2, 0), Stone::X, Direction::Horizontal, GeometryMode::Clipped);
        assert_eq!(clipped.len(), 2);

        let wrapped = scan_line(&b, Pos::new(2, 0), Stone::X, Direction::Horizontal, GeometryMode::Wrap);
        assert_eq!(wrapped.len(), 4);
        assert_eq!(wrapped.open_ends, 2);
    }

    #[test]
    fn test_scan_counts_hypothetical_origin() {
        let b = board(&[
            "......",
            "......",
            "..X...",
            "...X..",
            "......",
            "......",
        ]);
        // (1,1) is empty but scored as if X were there
        let scan = scan_line(&b, Pos::new(1, 1), Stone::X, Direction::MainDiagonal, GeometryMode::Clipped);
        assert_eq!(scan.len(), 3);
        assert_eq!(scan.open_ends, 2);
    }

    #[test]
    fn test_bounce_scan_reflects() {
        // (3,2) (2,1) (1,0) reflect off the left edge to (0,1)
        let b = board(&[
            ".X....",
            "X.....",
            ".X....",
            "..X...",
            "......",
            "......",
        ]);
        let scan = scan_line(&b, Pos::new(3, 2), Stone::X, Direction::MainDiagonal, GeometryMode::Bounce);
        assert_eq!(scan.len(), 4);
        assert!(scan.reflects());

        let clipped = scan_line(&b, Pos::new(3, 2), Stone::X, Direction::MainDiagonal, GeometryMode::Clipped);
        assert!(!clipped.reflects());
    }

    #[test]
    fn test_winning_window_needs_five() {
        let b = board(&[
            "XXXX..",
            "......",
            "......",
            "......",
            "......",
            "......",
        ]);
        let scan = scan_line(&b, Pos::new(0, 0), Stone::X, Direction::Horizontal, GeometryMode::Clipped);
        assert!(scan.winning_window(6, Rules::default()).is_none());
    }

    #[test]
    fn test_great_diagonal_detection() {
        let row: Vec<Pos> = (0..5).map(|c| Pos::new(2, c)).collect();
        let main: Vec<Pos> = (0..5).map(|i| Pos::new(i, i)).collect();
        let anti: Vec<Pos> = (0..5).map(|i| Pos::new(i, 5 - i)).collect();
        let off: Vec<Pos> = (0..5).map(|i| Pos::new(i, i + 1)).collect();
        assert!(!is_great_diagonal(&row, 6), "rows are not exempt");
        assert!(is_great_diagonal(&main, 6));
        assert!(is_great_diagonal(&anti, 6));
        assert!(!is_great_diagonal(&off, 6));
        assert!(!is_great_diagonal(&anti, 7), "anti-diagonal depends on the size");
    }

    #[test]
    fn test_missing_teeth_rejects_broken_diagonal() {
        // Wraps from (4,5) to (5,0): not touching, and off the major axes
        let broken = [
            Pos::new(1, 2),
            Pos::new(2, 3),
            Pos::new(3, 4),
            Pos::new(4, 5),
            Pos::new(5, 0),
        ];
        assert!(has_missing_teeth(&broken));
        assert!(!window_is_valid(&broken, 6, Rules::default().with_missing_teeth(true)));
        assert!(window_is_valid(&broken, 6, Rules::default()));

        // A wrapped row is broken between (0,5) and (0,0)
        let row = [Pos::new(0, 3), Pos::new(0, 4), Pos::new(0, 5), Pos::new(0, 0), Pos::new(0, 1)];
        assert!(!window_is_valid(&row, 6, Rules::default().with_missing_teeth(true)));

        // An unbroken row still passes
        let plain_row: Vec<Pos> = (1..6).map(|c| Pos::new(3, c)).collect();
        assert!(window_is_valid(&plain_row, 6, Rules::default().with_missing_teeth(true)));
    }
}
