//! Error types for the engine, its configuration and the game driver

use thiserror::Error;

use crate::board::Pos;

/// Main error type for the crate
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    #[error("unknown difficulty '{label}' (expected easy, medium, hard, extrahard or impossible)")]
    UnknownDifficulty { label: String },

    #[error("board size {size} is not supported (must be {min}-{max})")]
    InvalidBoardSize { size: usize, min: usize, max: usize },

    #[error("board row count or width mismatch: expected {expected}, got {got} in '{context}'")]
    InvalidBoardLength {
        expected: usize,
        got: usize,
        context: String,
    },

    #[error("invalid character '{character}' at position {position} in '{context}'")]
    InvalidCellCharacter {
        character: char,
        position: usize,
        context: String,
    },

    #[error("position ({row}, {col}) is outside a {size}x{size} board")]
    OutOfBounds { row: usize, col: usize, size: usize },

    #[error("invalid move: position {pos} is already occupied")]
    CellOccupied { pos: Pos },

    #[error("first response must be a knight move from the opening at {opening}, got {pos}")]
    KnightMoveRequired { pos: Pos, opening: Pos },

    #[error("game already over")]
    GameOver,

    #[error("invalid configuration: {message}")]
    InvalidConfig { message: String },

    #[error("failed to {operation}: {source}")]
    Io {
        operation: String,
        #[source]
        source: std::io::Error,
    },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Convenience type alias for Results using the crate's Error type
pub type Result<T> = std::result::Result<T, Error>;
