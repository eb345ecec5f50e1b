//! Bounce Gomoku: five-in-a-row on a small board with variant geometry
//!
//! Two players place X and O marks on a 6x6 board (5x5 to 8x8 supported)
//! and try to complete five in a line. Three optional rules change what a
//! line is:
//! - **Bounce**: diagonals reflect off the board edges
//! - **Wrap**: lines continue across opposite edges
//! - **Missing teeth**: a five that leaves its straight track must be
//!   unbroken cell to cell
//!
//! A knight-move opening rule can also restrict the first response.
//!
//! # Architecture
//!
//! - [`board`]: Board representation with bitboards
//! - [`rules`]: Line geometry, win detection, the knight rule
//! - [`eval`]: Pattern scoring and position evaluation
//! - [`search`]: Threat ranking and alpha-beta search
//! - [`engine`]: The top-tier engine with its phase priority list
//! - [`strategy`]: Difficulty tiers and the strategy selector
//! - [`game`]: Turn order, move validation and scoring across rounds
//! - [`config`]: JSON-backed engine configuration
//!
//! # Quick Start
//!
//! ```
//! use bounce_gomoku::{Difficulty, Game, Pos, Rules, StrategySelector};
//!
//! let mut game = Game::new(Rules::new(true, false, false), false);
//! game.play(Pos::new(2, 2)).unwrap();
//!
//! let mut selector = StrategySelector::seeded(7);
//! let reply = game.computer_move(&mut selector, Difficulty::Hard).unwrap();
//! assert!(reply.is_some());
//! assert_eq!(game.move_history().len(), 2);
//! ```

pub mod board;
pub mod config;
pub mod engine;
pub mod error;
pub mod eval;
pub mod game;
pub mod rules;
pub mod search;
pub mod strategy;

// Re-export commonly used types for convenience
pub use board::{Board, Pos, Stone, DEFAULT_BOARD_SIZE, MAX_BOARD_SIZE, MIN_BOARD_SIZE};
pub use config::{EngineConfig, SearchConfig};
pub use engine::{MoveResult, SearchEngine, SearchType};
pub use error::{Error, Result};
pub use game::{Game, Scoreboard};
pub use rules::{check_game_status, check_win, GameStatus, Rules, WinResult};
pub use strategy::{Difficulty, Strategy, StrategySelector};
