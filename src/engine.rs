//! Top-tier AI engine
//!
//! This module provides the engine behind the "impossible" difficulty. Each
//! move request walks a fixed priority list:
//!
//! 1. **Opening**: fewer than three marks on the board, play a centre cell
//! 2. **Immediate win**: a move that wins now
//! 3. **Block**: the opponent's winning cell
//! 4. **Forced threat**: our own fork, else the opponent's best fork cell
//! 5. **Minimax**: alpha-beta search at an adaptive depth
//!
//! # Example
//!
//! ```
//! use bounce_gomoku::{Board, Pos, Rules, SearchEngine, SearchType, Stone};
//!
//! let engine = SearchEngine::new();
//! let mut board = Board::new();
//! for col in 1..5 {
//!     board.place(Pos::new(1, col), Stone::X);
//! }
//!
//! let result = engine.get_move_with_stats(&board, Stone::X, Rules::default());
//! assert_eq!(result.best_move, Some(Pos::new(1, 0)));
//! assert_eq!(result.search_type, SearchType::ImmediateWin);
//! ```

use std::time::Instant;

use tracing::{debug, instrument};

use crate::board::{Board, Pos, Stone};
use crate::config::SearchConfig;
use crate::eval::center_bonus;
use crate::rules::{find_winning_move, Rules};
use crate::search::{find_forks, Searcher, MATE_SCORE};

/// Type of search that produced the result.
///
/// This indicates which phase of the priority list found the move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchType {
    /// Centre-biased opening cell, no search
    Opening,
    /// Move that completes a five
    ImmediateWin,
    /// Move that occupies the opponent's winning cell
    Block,
    /// Own fork, or denial of the opponent's fork
    ForcedThreat,
    /// Alpha-beta search result
    Minimax,
}

/// Result of a move search with detailed statistics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveResult {
    /// Best move found; `None` only on a full board
    pub best_move: Option<Pos>,
    /// Score of the chosen move for the side to move
    pub score: i32,
    pub search_type: SearchType,
    /// Search depth (0 when no search ran)
    pub depth: u8,
    /// Number of nodes searched
    pub nodes: u64,
    /// Time taken in milliseconds
    pub time_ms: u64,
}

impl MoveResult {
    #[inline]
    fn direct(pos: Pos, score: i32, search_type: SearchType, start: Instant) -> Self {
        Self {
            best_move: Some(pos),
            score,
            search_type,
            depth: 0,
            nodes: 0,
            time_ms: elapsed_ms(start),
        }
    }

    #[inline]
    fn no_move(start: Instant) -> Self {
        Self {
            best_move: None,
            score: 0,
            search_type: SearchType::Minimax,
            depth: 0,
            nodes: 0,
            time_ms: elapsed_ms(start),
        }
    }
}

/// The "impossible" tier engine.
///
/// Holds only configuration; every search works on its own copy of the
/// board, so one engine can serve games with different rules.
#[derive(Debug, Clone, Default)]
pub struct SearchEngine {
    config: SearchConfig,
}

impl SearchEngine {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_config(config: SearchConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Best move for `color`, or `None` on a full board
    #[must_use]
    pub fn get_move(&self, board: &Board, color: Stone, rules: Rules) -> Option<Pos> {
        self.get_move_with_stats(board, color, rules).best_move
    }

    /// Best move with the phase that found it and search statistics
    #[instrument(level = "debug", skip(self, board), fields(marks = board.stone_count()))]
    pub fn get_move_with_stats(&self, board: &Board, color: Stone, rules: Rules) -> MoveResult {
        let start = Instant::now();
        let opponent = color.opponent();

        if board.is_full() {
            debug!("board full, no move");
            return MoveResult::no_move(start);
        }

        // 1. Opening table
        if board.stone_count() < self.config.opening_piece_limit {
            if let Some(pos) = opening_move(board) {
                debug!(%pos, "opening move");
                return MoveResult::direct(pos, 0, SearchType::Opening, start);
            }
        }

        // 2. Win now
        if let Some(pos) = find_winning_move(board, color, rules) {
            debug!(%pos, "immediate win");
            return MoveResult::direct(pos, MATE_SCORE, SearchType::ImmediateWin, start);
        }

        // 3. Block the opponent's win
        if let Some(pos) = find_winning_move(board, opponent, rules) {
            debug!(%pos, "blocking opponent win");
            return MoveResult::direct(pos, 0, SearchType::Block, start);
        }

        // 4. Forks: take ours, else deny theirs
        if let Some((pos, completions)) = strongest_fork(board, color, rules) {
            debug!(%pos, completions, "creating fork");
            return MoveResult::direct(pos, MATE_SCORE - 2, SearchType::ForcedThreat, start);
        }
        if let Some((pos, completions)) = strongest_fork(board, opponent, rules) {
            debug!(%pos, completions, "denying opponent fork");
            return MoveResult::direct(pos, 0, SearchType::ForcedThreat, start);
        }

        // 5. Alpha-beta
        let depth = self
            .config
            .adaptive_depth(board.empty_count(), board.size(), rules);
        let mut searcher = Searcher::new();
        let result = searcher.search(board, color, depth, rules);
        let time_ms = elapsed_ms(start);

        debug!(
            best = ?result.best_move,
            score = result.score,
            depth,
            nodes = result.nodes,
            time_ms,
            "minimax search complete"
        );

        MoveResult {
            best_move: result.best_move,
            score: result.score,
            search_type: SearchType::Minimax,
            depth,
            nodes: result.nodes,
            time_ms,
        }
    }
}

/// First empty cell in centre-out order (row-major among equals)
pub fn opening_move(board: &Board) -> Option<Pos> {
    opening_order(board.size())
        .into_iter()
        .find(|&p| board.is_empty(p))
}

/// Every cell, closest to the centre first
pub fn opening_order(size: usize) -> Vec<Pos> {
    let mut cells: Vec<Pos> = (0..size as u8)
        .flat_map(|r| (0..size as u8).map(move |c| Pos::new(r, c)))
        .collect();
    cells.sort_by_key(|p| std::cmp::Reverse(center_bonus(p.row, p.col, size)));
    cells
}

/// Fork cell with the most winning completions, first on ties
fn strongest_fork(board: &Board, player: Stone, rules: Rules) -> Option<(Pos, usize)> {
    find_forks(board, player, rules)
        .into_iter()
        .fold(None, |best: Option<(Pos, usize)>, fork| match best {
            Some(b) if b.1 >= fork.1 => Some(b),
            _ => Some(fork),
        })
}

#[inline]
fn elapsed_ms(start: Instant) -> u64 {
    u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX)
}
