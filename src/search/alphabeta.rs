//! Depth-bounded alpha-beta search
//!
//! Negamax with alpha-beta pruning over a single owned work board, using
//! the make/unmake discipline: every trial placement is removed before its
//! recursion level returns, so no caller ever sees a half-explored board.
//!
//! # Features
//!
//! - Terminal detection through the win checker at every node
//! - Mate scores adjusted by remaining depth (faster wins, slower losses)
//! - Move generation with proximity filtering, ordered by threat rank
//!
//! # Example
//!
//! ```
//! use bounce_gomoku::board::{Board, Pos, Stone};
//! use bounce_gomoku::rules::Rules;
//! use bounce_gomoku::search::Searcher;
//!
//! let mut board = Board::new();
//! board.place(Pos::new(2, 2), Stone::X);
//!
//! let mut searcher = Searcher::new();
//! let result = searcher.search(&board, Stone::O, 2, Rules::default());
//! assert!(result.best_move.is_some());
//! ```

use std::collections::HashMap;

use tracing::trace;

use crate::board::{Board, Pos, Stone};
use crate::eval::evaluate;
use crate::rules::{check_win, Rules};

use super::threat::{rank_moves, ThreatKind};

/// Score of a proven win before the depth adjustment
pub const MATE_SCORE: i32 = 100_000;

/// Bound for the alpha-beta window
const INF: i32 = MATE_SCORE + 1_000;

/// Search result containing the best move found and associated statistics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchResult {
    /// Best move found, if any
    pub best_move: Option<Pos>,
    /// Score of the best move from the mover's point of view
    pub score: i32,
    /// Depth searched
    pub depth: u8,
    /// Total nodes searched
    pub nodes: u64,
}

impl SearchResult {
    /// Whether the score proves a forced win
    #[inline]
    pub fn is_mate(&self) -> bool {
        self.score >= MATE_SCORE
    }
}

/// Alpha-beta searcher. Holds only call-scoped state.
#[derive(Debug, Default)]
pub struct Searcher {
    nodes: u64,
    rules: Rules,
}

impl Searcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Nodes visited by the last search
    pub fn nodes(&self) -> u64 {
        self.nodes
    }

    /// Search `depth` plies for `color`.
    ///
    /// Ties between root moves go to the first in generation order.
    /// Returns no move only when the board is full.
    pub fn search(&mut self, board: &Board, color: Stone, depth: u8, rules: Rules) -> SearchResult {
        self.nodes = 0;
        self.rules = rules;
        let depth = depth.max(1);

        let mut work = board.snapshot();
        let moves = ordered_moves(&work, color, rules);

        let mut best_move = None;
        let mut best_score = -INF;
        let mut alpha = -INF;
        let beta = INF;

        for mov in moves {
            if !work.place(mov, color) {
                continue;
            }
            let score = -self.negamax(&mut work, color.opponent(), depth - 1, -beta, -alpha, mov);
            work.remove(mov);

            trace!(pos = %mov, score, "root move");

            if score > best_score {
                best_score = score;
                best_move = Some(mov);
            }
            alpha = alpha.max(score);
        }

        SearchResult {
            best_move,
            score: if best_move.is_some() { best_score } else { 0 },
            depth,
            nodes: self.nodes,
        }
    }

    /// `color` is to move; `last` is the opponent's move that led here
    fn negamax(
        &mut self,
        board: &mut Board,
        color: Stone,
        depth: u8,
        mut alpha: i32,
        beta: i32,
        last: Pos,
    ) -> i32 {
        self.nodes += 1;

        if check_win(board, last, self.rules).is_win() {
            return -(MATE_SCORE + i32::from(depth));
        }
        if board.is_full() {
            return 0;
        }
        if depth == 0 {
            return evaluate(board, color, color.opponent(), self.rules);
        }

        let mut best = -INF;
        for mov in ordered_moves(board, color, self.rules) {
            if !board.place(mov, color) {
                continue;
            }
            let score = -self.negamax(board, color.opponent(), depth - 1, -beta, -alpha, mov);
            board.remove(mov);

            if score > best {
                best = score;
            }
            if score >= beta {
                break;
            }
            alpha = alpha.max(score);
        }
        best
    }
}

/// Empty cells touching a mark (diagonals included), row-major.
/// On an empty board every cell is a candidate.
pub fn candidate_moves(board: &Board) -> Vec<Pos> {
    let occupied: Vec<Pos> = board.occupied().iter_ones().collect();
    if occupied.is_empty() {
        return board.empty_cells();
    }
    board
        .empty_cells()
        .into_iter()
        .filter(|&p| occupied.iter().any(|&o| o.is_adjacent(p)))
        .collect()
}

/// Candidates in search order: threat rank first, generation order on ties.
///
/// Attack and block cells are added even when they touch no mark, since
/// wrap and bounce completions can sit away from every mark.
pub fn ordered_moves(board: &Board, color: Stone, rules: Rules) -> Vec<Pos> {
    let ranked = rank_moves(board, color, rules);
    let priority: HashMap<Pos, i32> = ranked.iter().map(|t| (t.pos, t.priority)).collect();

    let mut moves = candidate_moves(board);
    for threat in &ranked {
        if threat.kind != ThreatKind::Develop && !moves.contains(&threat.pos) {
            moves.push(threat.pos);
        }
    }
    moves.sort();
    moves.sort_by_key(|p| std::cmp::Reverse(priority.get(p).copied().unwrap_or(0)));
    moves
}
