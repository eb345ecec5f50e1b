//! Win condition checking for the bounce / wrap variant
//!
//! Win conditions:
//! 1. Five of one player's marks along a line through the last move
//! 2. The line may wrap across an edge or bounce off one when those rules are on
//! 3. With missing teeth on, a five off the great diagonals must be unbroken
//!
//! Draw: the board is full and nobody has five.

use crate::board::{Board, Pos, Stone};

use super::geometry::{reflection_points, Direction, GeometryMode};
use super::line::scan_line;
use super::Rules;

/// Outcome of checking one cell
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct WinResult {
    pub winner: Option<Stone>,
    /// The five cells of the winning line, in line order
    pub winning_cells: Vec<Pos>,
    pub direction: Option<Direction>,
    pub mode: Option<GeometryMode>,
    /// Path index of the first bounce reflection, if the line bounced
    pub bounce_index: Option<usize>,
    /// Path index of a second reflection (lines passing near a corner)
    pub second_bounce_index: Option<usize>,
}

impl WinResult {
    #[inline]
    pub fn none() -> Self {
        Self::default()
    }

    #[inline]
    pub fn is_win(&self) -> bool {
        self.winner.is_some()
    }
}

/// Whole-board status for the game driver
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct GameStatus {
    pub is_over: bool,
    pub winner: Option<Stone>,
    pub is_draw: bool,
    pub winning_cells: Vec<Pos>,
    pub bounce_index: Option<usize>,
    pub second_bounce_index: Option<usize>,
}

impl GameStatus {
    fn from_win(win: WinResult) -> Self {
        Self {
            is_over: true,
            winner: win.winner,
            is_draw: false,
            winning_cells: win.winning_cells,
            bounce_index: win.bounce_index,
            second_bounce_index: win.second_bounce_index,
        }
    }

    fn draw() -> Self {
        Self {
            is_over: true,
            is_draw: true,
            ..Self::default()
        }
    }
}

/// Check whether the mark at `pos` is part of a winning five.
///
/// Directions are checked horizontal, vertical, main diagonal, anti-diagonal.
/// Within a direction the modes go Clipped, Bounce, Wrap; the first valid
/// window decides.
pub fn check_win(board: &Board, pos: Pos, rules: Rules) -> WinResult {
    let color = board.get(pos);
    if !color.is_player() {
        return WinResult::none();
    }

    for direction in Direction::ALL {
        for mode in GeometryMode::precedence(direction, rules) {
            let scan = scan_line(board, pos, color, direction, mode);
            if let Some(window) = scan.winning_window(board.size(), rules) {
                let reflections = if mode == GeometryMode::Bounce {
                    reflection_points(window)
                } else {
                    Vec::new()
                };
                return WinResult {
                    winner: Some(color),
                    winning_cells: window.to_vec(),
                    direction: Some(direction),
                    mode: Some(mode),
                    bounce_index: reflections.first().copied(),
                    second_bounce_index: reflections.get(1).copied(),
                };
            }
        }
    }

    WinResult::none()
}

/// Scan every occupied cell (row-major) for a win, then check for a draw
pub fn check_game_status(board: &Board, rules: Rules) -> GameStatus {
    let occupied = board.occupied();
    for pos in occupied.iter_ones() {
        let win = check_win(board, pos, rules);
        if win.is_win() {
            return GameStatus::from_win(win);
        }
    }
    if board.is_full() {
        GameStatus::draw()
    } else {
        GameStatus::default()
    }
}

/// Status after a single placement: only lines through `last_move` can be new wins
pub fn status_after_move(board: &Board, last_move: Pos, rules: Rules) -> GameStatus {
    let win = check_win(board, last_move, rules);
    if win.is_win() {
        GameStatus::from_win(win)
    } else if board.is_full() {
        GameStatus::draw()
    } else {
        GameStatus::default()
    }
}

/// First empty cell (row-major) where `player` completes a win
pub fn find_winning_move(board: &Board, player: Stone, rules: Rules) -> Option<Pos> {
    if !player.is_player() {
        return None;
    }
    let mut scratch = board.snapshot();
    board
        .empty_cells()
        .into_iter()
        .find(|&pos| completes_win(&mut scratch, pos, player, rules))
}

/// Every empty cell where `player` completes a win, row-major
pub fn find_winning_moves(board: &Board, player: Stone, rules: Rules) -> Vec<Pos> {
    if !player.is_player() {
        return Vec::new();
    }
    let mut scratch = board.snapshot();
    board
        .empty_cells()
        .into_iter()
        .filter(|&pos| completes_win(&mut scratch, pos, player, rules))
        .collect()
}

/// Try a placement on the scratch board and undo it
#[inline]
fn completes_win(scratch: &mut Board, pos: Pos, player: Stone, rules: Rules) -> bool {
    if !scratch.place(pos, player) {
        return false;
    }
    let wins = check_win(scratch, pos, rules).is_win();
    scratch.remove(pos);
    wins
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board(rows: &[&str]) -> Board {
        Board::from_rows(rows).unwrap()
    }

    const PLAIN: Rules = Rules::new(false, false, false);

    #[test]
    fn test_five_in_row_horizontal() {
        let b = board(&[
            "......",
            "XXXXX.",
            "......",
            "......",
            "......",
            "......",
        ]);
        for c in 0..5 {
            let win = check_win(&b, Pos::new(1, c), PLAIN);
            assert_eq!(win.winner, Some(Stone::X), "win must be seen from column {}", c);
            assert_eq!(win.winning_cells.len(), 5);
            assert_eq!(win.direction, Some(Direction::Horizontal));
        }
    }

    #[test]
    fn test_five_in_row_vertical_and_diagonals() {
        let vertical = board(&[
            "...O..",
            "...O..",
            "...O..",
            "...O..",
            "...O..",
            "......",
        ]);
        assert_eq!(check_win(&vertical, Pos::new(2, 3), PLAIN).winner, Some(Stone::O));

        let main = board(&[
            "X.....",
            ".X....",
            "..X...",
            "...X..",
            "....X.",
            "......",
        ]);
        assert_eq!(
            check_win(&main, Pos::new(4, 4), PLAIN).direction,
            Some(Direction::MainDiagonal)
        );

        let anti = board(&[
            "......",
            "....O.",
            "...O..",
            "..O...",
            ".O....",
            "O.....",
        ]);
        assert_eq!(
            check_win(&anti, Pos::new(5, 0), PLAIN).direction,
            Some(Direction::AntiDiagonal)
        );
    }

    #[test]
    fn test_four_in_row_not_win() {
        let b = board(&[
            "......",
            ".XXXX.",
            "......",
            "......",
            "......",
            "......",
        ]);
        assert!(!check_win(&b, Pos::new(1, 2), PLAIN).is_win());
    }

    #[test]
    fn test_six_in_row_reports_five_cells() {
        let b = board(&[
            "XXXXXX",
            "......",
            "......",
            "......",
            "......",
            "......",
        ]);
        let win = check_win(&b, Pos::new(0, 5), PLAIN);
        assert!(win.is_win());
        assert_eq!(win.winning_cells.len(), 5);
        assert!(win.winning_cells.contains(&Pos::new(0, 5)));
    }

    #[test]
    fn test_empty_cell_never_wins() {
        let b = Board::new();
        assert_eq!(check_win(&b, Pos::new(0, 0), PLAIN), WinResult::none());
    }

    #[test]
    fn test_wrap_row_win_only_with_wrap() {
        let b = board(&[
            "......",
            "......",
            "XXX.XX",
            "......",
            "......",
            "......",
        ]);
        // Physically 3 + 2, joined across the edge
        assert!(!check_win(&b, Pos::new(2, 0), PLAIN).is_win());

        let wrap = PLAIN.with_wrap(true);
        let win = check_win(&b, Pos::new(2, 0), wrap);
        assert!(win.is_win());
        assert_eq!(win.mode, Some(GeometryMode::Wrap));
        assert_eq!(win.bounce_index, None);
    }

    #[test]
    fn test_bounce_win_single_reflection() {
        // (2,0) (1,1) (0,2) reflects off the top edge to (1,3) (2,4)
        let b = board(&[
            "..X...",
            ".X.X..",
            "X...X.",
            "......",
            "......",
            "......",
        ]);
        assert!(!check_win(&b, Pos::new(0, 2), PLAIN).is_win());

        let bounce = PLAIN.with_bounce(true);
        let win = check_win(&b, Pos::new(0, 2), bounce);
        assert_eq!(win.winner, Some(Stone::X));
        assert_eq!(win.mode, Some(GeometryMode::Bounce));
        let reflect_at = win.bounce_index.unwrap();
        assert_eq!(win.winning_cells[reflect_at], Pos::new(0, 2));
        assert_eq!(win.second_bounce_index, None);
    }

    #[test]
    fn test_bounce_ignored_on_rows() {
        let b = board(&[
            "......",
            "......",
            "XXX.XX",
            "......",
            "......",
            "......",
        ]);
        assert!(!check_win(&b, Pos::new(2, 0), PLAIN.with_bounce(true)).is_win());
    }

    #[test]
    fn test_bounce_takes_precedence_over_wrap() {
        // The diagonal completes by bouncing; wrap would need different cells
        let b = board(&[
            "..X...",
            ".X.X..",
            "X...X.",
            "......",
            "......",
            "......",
        ]);
        let both = Rules::new(true, false, true);
        let win = check_win(&b, Pos::new(1, 1), both);
        assert_eq!(win.mode, Some(GeometryMode::Bounce));
    }

    #[test]
    fn test_missing_teeth_rejects_wrapped_diagonal() {
        // (2,3) (3,4) (4,5) wrap to (5,0) (0,1): off the great diagonals
        let b = board(&[
            ".X....",
            "......",
            "...X..",
            "....X.",
            ".....X",
            "X.....",
        ]);
        let wrap = PLAIN.with_wrap(true);
        assert!(check_win(&b, Pos::new(2, 3), wrap).is_win());
        assert!(!check_win(&b, Pos::new(2, 3), wrap.with_missing_teeth(true)).is_win());
    }

    #[test]
    fn test_missing_teeth_exempts_great_diagonal() {
        // (3,3) (4,4) (5,5) wrap to (0,0) (1,1): all on row == col
        let b = board(&[
            "O.....",
            ".O....",
            "......",
            "...O..",
            "....O.",
            ".....O",
        ]);
        let rules = Rules::new(false, true, true);
        let win = check_win(&b, Pos::new(4, 4), rules);
        assert_eq!(win.winner, Some(Stone::O));
    }

    #[test]
    fn test_missing_teeth_rejects_wrapped_row() {
        // (0,3) (0,4) (0,5) wrap to (0,0) (0,1) around the gap at (0,2)
        let b = board(&[
            "XX.XXX",
            "......",
            "......",
            "......",
            "......",
            "......",
        ]);
        let wrap = Rules::new(false, false, true);
        assert!(check_win(&b, Pos::new(0, 0), wrap).is_win());

        let teeth = Rules::new(false, true, true);
        for col in [0, 1, 3, 4, 5] {
            let win = check_win(&b, Pos::new(0, col), teeth);
            assert_eq!(win.winner, None, "gapped row must not win from column {}", col);
        }
    }

    #[test]
    fn test_missing_teeth_accepts_unbroken_row() {
        let b = board(&[
            "......",
            ".XXXXX",
            "......",
            "......",
            "......",
            "......",
        ]);
        let win = check_win(&b, Pos::new(1, 3), Rules::new(false, true, true));
        assert_eq!(win.winner, Some(Stone::X));
        assert_eq!(win.mode, Some(GeometryMode::Clipped));
    }

    #[test]
    fn test_bounce_off_great_diagonal_with_missing_teeth() {
        // (0,3) (1,4) (2,5) reflect off the right edge to (3,4) (4,3)
        let b = board(&[
            "...X..",
            "....X.",
            ".....X",
            "....X.",
            "...X..",
            "......",
        ]);
        let rules = Rules::new(true, true, false);
        assert!(!check_win(&b, Pos::new(0, 3), rules.with_bounce(false)).is_win());

        for origin in [Pos::new(0, 3), Pos::new(2, 5), Pos::new(4, 3)] {
            let win = check_win(&b, origin, rules);
            assert_eq!(win.winner, Some(Stone::X), "bounced five missed from {}", origin);
            assert_eq!(win.mode, Some(GeometryMode::Bounce));
            assert_eq!(win.bounce_index, Some(2));
            assert_eq!(win.winning_cells[2], Pos::new(2, 5));
            assert_eq!(win.second_bounce_index, None);
        }
    }

    #[test]
    fn test_check_game_status_draw() {
        let b = board(&[
            "XXOOXX",
            "OOXXOO",
            "XXOOXX",
            "OOXXOO",
            "XXOOXX",
            "OOXXOO",
        ]);
        let status = check_game_status(&b, PLAIN);
        assert!(status.is_over);
        assert!(status.is_draw);
        assert_eq!(status.winner, None);
    }

    #[test]
    fn test_check_game_status_in_progress_and_win() {
        let mut b = Board::new();
        assert_eq!(check_game_status(&b, PLAIN), GameStatus::default());

        for c in 1..6 {
            b.place(Pos::new(4, c), Stone::O);
        }
        let status = check_game_status(&b, PLAIN);
        assert!(status.is_over);
        assert!(!status.is_draw);
        assert_eq!(status.winner, Some(Stone::O));
        assert_eq!(status.winning_cells.len(), 5);
        assert_eq!(status_after_move(&b, Pos::new(4, 3), PLAIN), status);
    }

    #[test]
    fn test_find_winning_move() {
        let b = board(&[
            "......",
            ".XXXX.",
            "......",
            "......",
            "......",
            "......",
        ]);
        assert_eq!(find_winning_move(&b, Stone::X, PLAIN), Some(Pos::new(1, 0)));
        assert_eq!(
            find_winning_moves(&b, Stone::X, PLAIN),
            vec![Pos::new(1, 0), Pos::new(1, 5)]
        );
        assert_eq!(find_winning_move(&b, Stone::O, PLAIN), None);
        assert_eq!(find_winning_move(&b, Stone::Empty, PLAIN), None);
    }

    #[test]
    fn test_find_winning_move_leaves_board_untouched() {
        let b = board(&[
            "......",
            ".XXXX.",
            "......",
            "......",
            "......",
            "......",
        ]);
        let before = b.clone();
        let _ = find_winning_moves(&b, Stone::X, PLAIN);
        assert_eq!(b, before);
    }
}
