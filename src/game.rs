//! Game state management for a match between two sides
//!
//! `Game` is the driver around the core: it owns the board, validates and
//! applies moves, re-checks the status after each one, enforces the knight
//! opening rule and keeps a scoreboard across rounds.

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::board::{Board, Pos, Stone};
use crate::config::EngineConfig;
use crate::error::{Error, Result};
use crate::eval::score_placement;
use crate::rules::{check_game_status, legal_responses, status_after_move, GameStatus, Rules};
use crate::strategy::{Difficulty, StrategySelector};

/// Results across rounds
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scoreboard {
    pub x_wins: u32,
    pub o_wins: u32,
    pub draws: u32,
}

impl Scoreboard {
    fn record(&mut self, status: &GameStatus, delta: i32) {
        let slot = match status.winner {
            Some(Stone::X) => &mut self.x_wins,
            Some(Stone::O) => &mut self.o_wins,
            _ if status.is_draw => &mut self.draws,
            _ => return,
        };
        *slot = slot.saturating_add_signed(delta);
    }

    pub fn rounds(&self) -> u32 {
        self.x_wins + self.o_wins + self.draws
    }
}

impl std::fmt::Display for Scoreboard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "X {} - O {} (draws {})", self.x_wins, self.o_wins, self.draws)
    }
}

/// Main game state
#[derive(Debug, Clone)]
pub struct Game {
    board: Board,
    rules: Rules,
    knight_move: bool,
    current_turn: Stone,
    /// Side that opens the current round
    opener: Stone,
    move_history: Vec<(Pos, Stone)>,
    status: GameStatus,
    scoreboard: Scoreboard,
}

impl Game {
    /// 6x6 game, X opens
    pub fn new(rules: Rules, knight_move: bool) -> Self {
        Self::on_board(Board::new(), rules, knight_move)
    }

    pub fn with_size(size: usize, rules: Rules, knight_move: bool) -> Result<Self> {
        Ok(Self::on_board(Board::with_size(size)?, rules, knight_move))
    }

    pub fn from_config(config: &EngineConfig) -> Result<Self> {
        config.validate()?;
        Self::with_size(config.board_size, config.rules, config.knight_move)
    }

    fn on_board(board: Board, rules: Rules, knight_move: bool) -> Self {
        Self {
            board,
            rules,
            knight_move,
            current_turn: Stone::X,
            opener: Stone::X,
            move_history: Vec::new(),
            status: GameStatus::default(),
            scoreboard: Scoreboard::default(),
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn rules(&self) -> Rules {
        self.rules
    }

    /// Change the rules between rounds or mid-round; the status is re-checked
    pub fn set_rules(&mut self, rules: Rules) {
        self.rules = rules;
        if !self.status.is_over {
            self.status = check_game_status(&self.board, rules);
            if self.status.is_over {
                self.scoreboard.record(&self.status, 1);
            }
        }
    }

    pub fn current_turn(&self) -> Stone {
        self.current_turn
    }

    pub fn status(&self) -> &GameStatus {
        &self.status
    }

    pub fn is_over(&self) -> bool {
        self.status.is_over
    }

    pub fn scoreboard(&self) -> Scoreboard {
        self.scoreboard
    }

    pub fn move_history(&self) -> &[(Pos, Stone)] {
        &self.move_history
    }

    pub fn last_move(&self) -> Option<Pos> {
        self.move_history.last().map(|&(pos, _)| pos)
    }

    /// Cells the next move is limited to, when the knight rule is in force.
    ///
    /// Applies only to the first response of a round, and is waived when
    /// every knight cell is taken.
    pub fn knight_constraint(&self) -> Option<Vec<Pos>> {
        if !self.knight_move || self.move_history.len() != 1 {
            return None;
        }
        let (opening, _) = self.move_history[0];
        let legal = legal_responses(&self.board, opening, self.rules.wrap);
        (!legal.is_empty()).then_some(legal)
    }

    /// Play a mark for the side to move
    pub fn play(&mut self, pos: Pos) -> Result<GameStatus> {
        if self.status.is_over {
            return Err(Error::GameOver);
        }
        if !self.board.contains(pos) {
            return Err(Error::OutOfBounds {
                row: pos.row as usize,
                col: pos.col as usize,
                size: self.board.size(),
            });
        }
        if !self.board.is_empty(pos) {
            return Err(Error::CellOccupied { pos });
        }
        if let Some(legal) = self.knight_constraint() {
            if !legal.contains(&pos) {
                return Err(Error::KnightMoveRequired {
                    pos,
                    opening: self.move_history[0].0,
                });
            }
        }

        let color = self.current_turn;
        if !self.board.place(pos, color) {
            return Err(Error::CellOccupied { pos });
        }
        self.move_history.push((pos, color));

        self.status = status_after_move(&self.board, pos, self.rules);
        if self.status.is_over {
            self.scoreboard.record(&self.status, 1);
            info!(winner = ?self.status.winner, draw = self.status.is_draw, "round over");
        } else {
            self.current_turn = color.opponent();
        }

        Ok(self.status.clone())
    }

    /// Ask the selector for a move and play it.
    ///
    /// When the knight rule is in force and the strategy's cell breaks it,
    /// the knight cell with the best evaluation is played instead.
    pub fn computer_move<R: Rng>(
        &mut self,
        selector: &mut StrategySelector<R>,
        difficulty: Difficulty,
    ) -> Result<Option<Pos>> {
        if self.status.is_over {
            return Err(Error::GameOver);
        }

        let player = self.current_turn;
        let mut chosen =
            selector.select_move(&self.board, difficulty, player, player.opponent(), self.rules);

        if let (Some(pos), Some(legal)) = (chosen, self.knight_constraint()) {
            if !legal.contains(&pos) {
                let substitute = self.best_of(&legal, player);
                warn!(
                    requested = %pos,
                    substitute = ?substitute,
                    "strategy ignored the knight rule"
                );
                chosen = substitute;
            }
        }

        match chosen {
            Some(pos) => {
                debug!(%pos, %difficulty, "computer move");
                self.play(pos)?;
                Ok(Some(pos))
            }
            None => Ok(None),
        }
    }

    /// Take back the last move
    pub fn undo(&mut self) -> Option<(Pos, Stone)> {
        let (pos, color) = self.move_history.pop()?;
        if self.status.is_over {
            self.scoreboard.record(&self.status, -1);
        }
        self.board.remove(pos);
        self.current_turn = color;
        self.status = GameStatus::default();
        Some((pos, color))
    }

    /// Clear the board for the next round; the other side opens
    pub fn new_round(&mut self) {
        self.board.reset();
        self.move_history.clear();
        self.status = GameStatus::default();
        self.opener = self.opener.opponent();
        self.current_turn = self.opener;
    }

    /// Highest evaluated cell for `player`, first on ties
    fn best_of(&self, cells: &[Pos], player: Stone) -> Option<Pos> {
        let mut scratch = self.board.snapshot();
        let mut best: Option<(Pos, i32)> = None;
        for &pos in cells {
            let score = score_placement(&mut scratch, pos, player, self.rules);
            if best.map_or(true, |(_, s)| score > s) {
                best = Some((pos, score));
            }
        }
        best.map(|(pos, _)| pos)
    }
}

impl Default for Game {
    fn default() -> Self {
        Self::new(Rules::default(), false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_play_alternates_turns() {
        let mut game = Game::default();
        assert_eq!(game.current_turn(), Stone::X);
        game.play(Pos::new(2, 2)).unwrap();
        assert_eq!(game.current_turn(), Stone::O);
        assert_eq!(game.board().get(Pos::new(2, 2)), Stone::X);
        assert_eq!(game.last_move(), Some(Pos::new(2, 2)));
    }

    #[test]
    fn test_play_rejects_bad_moves() {
        let mut game = Game::default();
        game.play(Pos::new(0, 0)).unwrap();
        assert!(matches!(game.play(Pos::new(0, 0)), Err(Error::CellOccupied { .. })));
        assert!(matches!(game.play(Pos::new(6, 1)), Err(Error::OutOfBounds { .. })));
        assert_eq!(game.move_history().len(), 1);
    }

    #[test]
    fn test_win_ends_round_and_scores() {
        let mut game = Game::default();
        for c in 0..4 {
            game.play(Pos::new(0, c)).unwrap();
            game.play(Pos::new(5, c)).unwrap();
        }
        let status = game.play(Pos::new(0, 4)).unwrap();
        assert!(status.is_over);
        assert_eq!(status.winner, Some(Stone::X));
        assert_eq!(status.winning_cells.len(), 5);
        assert_eq!(game.scoreboard().x_wins, 1);
        assert!(matches!(game.play(Pos::new(3, 3)), Err(Error::GameOver)));
    }

    #[test]
    fn test_undo_reverts_win() {
        let mut game = Game::default();
        for c in 0..4 {
            game.play(Pos::new(0, c)).unwrap();
            game.play(Pos::new(5, c)).unwrap();
        }
        game.play(Pos::new(0, 4)).unwrap();
        assert_eq!(game.undo(), Some((Pos::new(0, 4), Stone::X)));
        assert!(!game.is_over());
        assert_eq!(game.scoreboard().rounds(), 0);
        assert_eq!(game.current_turn(), Stone::X);
    }

    #[test]
    fn test_knight_constraint() {
        let mut game = Game::new(Rules::default(), true);
        assert!(game.knight_constraint().is_none(), "no constraint on the opening move");
        game.play(Pos::new(2, 2)).unwrap();

        let legal = game.knight_constraint().unwrap();
        assert!(legal.contains(&Pos::new(0, 1)));
        assert!(matches!(
            game.play(Pos::new(2, 3)),
            Err(Error::KnightMoveRequired { .. })
        ));
        game.play(Pos::new(4, 3)).unwrap();
        assert!(game.knight_constraint().is_none(), "only the first response is limited");
        game.play(Pos::new(2, 3)).unwrap();
    }

    #[test]
    fn test_computer_respects_knight_rule() {
        let mut game = Game::new(Rules::default(), true);
        game.play(Pos::new(2, 2)).unwrap();
        let mut selector = StrategySelector::seeded(17);
        let pos = game
            .computer_move(&mut selector, Difficulty::Impossible)
            .unwrap()
            .unwrap();
        // The opening table wants (2,3); the rule forces a knight cell
        assert!(
            crate::rules::is_knight_move(6, Pos::new(2, 2), pos, false),
            "{} is not a knight move",
            pos
        );
    }

    #[test]
    fn test_new_round_alternates_opener() {
        let mut game = Game::default();
        game.play(Pos::new(1, 1)).unwrap();
        game.new_round();
        assert!(game.board().is_board_empty());
        assert_eq!(game.current_turn(), Stone::O);
        game.new_round();
        assert_eq!(game.current_turn(), Stone::X);
    }

    #[test]
    fn test_full_game_between_computers_terminates() {
        let mut game = Game::default();
        let mut selector = StrategySelector::seeded(23);
        let mut moves = 0;
        while !game.is_over() {
            let pos = game.computer_move(&mut selector, Difficulty::Easy).unwrap();
            assert!(pos.is_some());
            moves += 1;
            assert!(moves <= 36);
        }
        assert_eq!(game.scoreboard().rounds(), 1);
    }

    #[test]
    fn test_from_config() {
        let config = EngineConfig {
            board_size: 7,
            knight_move: true,
            ..EngineConfig::default()
        };
        let game = Game::from_config(&config).unwrap();
        assert_eq!(game.board().size(), 7);

        let bad = EngineConfig {
            board_size: 3,
            ..EngineConfig::default()
        };
        assert!(Game::from_config(&bad).is_err());
    }
}
