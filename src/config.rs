//! Engine configuration
//!
//! Every field has a default, so a JSON file only needs the keys it
//! changes:
//!
//! ```json
//! { "rules": { "bounce": true }, "search": { "base_depth": 4 } }
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::board::{DEFAULT_BOARD_SIZE, MAX_BOARD_SIZE, MIN_BOARD_SIZE};
use crate::error::{Error, Result};
use crate::rules::Rules;

/// Deepest search the engine will ever run
pub const MAX_SEARCH_DEPTH: u8 = 8;

/// Search and strategy tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Depth used while the board is still open
    pub base_depth: u8,
    /// Empty-cell counts below which depth grows by one, two and three
    pub depth_thresholds: [usize; 3],
    /// Boards at least this wide count as large for the complex-rules reduction
    pub large_board_size: usize,
    /// Fewer marks than this on the board: play from the opening table
    pub opening_piece_limit: u32,
    /// Medium tier: chance of taking a win or block when one exists
    pub tactic_chance: f64,
    /// Medium tier: candidate and evaluation sample size
    pub sample_size: usize,
    /// Extra-hard tier search depth
    pub shallow_depth: u8,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            base_depth: 3,
            depth_thresholds: [20, 12, 8],
            large_board_size: 7,
            opening_piece_limit: 3,
            tactic_chance: 0.5,
            sample_size: 6,
            shallow_depth: 2,
        }
    }
}

impl SearchConfig {
    /// Depth for a position with `empty` free cells.
    ///
    /// Base depth, plus one per threshold crossed, minus one when bounce and
    /// missing teeth are both on and the board is large.
    pub fn adaptive_depth(&self, empty: usize, board_size: usize, rules: Rules) -> u8 {
        let bonus = self.depth_thresholds.iter().filter(|&&t| empty < t).count() as u8;
        let mut depth = self.base_depth.saturating_add(bonus);
        if rules.is_complex() && board_size >= self.large_board_size {
            depth = depth.saturating_sub(1);
        }
        depth.clamp(1, MAX_SEARCH_DEPTH)
    }
}

/// Top-level configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub board_size: usize,
    /// Rules a new game starts with
    pub rules: Rules,
    /// First response must be a knight move from the opening mark
    pub knight_move: bool,
    pub search: SearchConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            board_size: DEFAULT_BOARD_SIZE,
            rules: Rules::default(),
            knight_move: false,
            search: SearchConfig::default(),
        }
    }
}

impl EngineConfig {
    /// Parse and validate a JSON configuration
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: EngineConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a JSON configuration file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| Error::Io {
            operation: format!("read config {}", path.display()),
            source,
        })?;
        Self::from_json_str(&json)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<()> {
        if !(MIN_BOARD_SIZE..=MAX_BOARD_SIZE).contains(&self.board_size) {
            return Err(Error::InvalidBoardSize {
                size: self.board_size,
                min: MIN_BOARD_SIZE,
                max: MAX_BOARD_SIZE,
            });
        }

        let search = &self.search;
        if search.base_depth == 0 || search.base_depth > MAX_SEARCH_DEPTH {
            return invalid(format!(
                "base_depth must be 1-{}, got {}",
                MAX_SEARCH_DEPTH, search.base_depth
            ));
        }
        if search.shallow_depth == 0 || search.shallow_depth > MAX_SEARCH_DEPTH {
            return invalid(format!(
                "shallow_depth must be 1-{}, got {}",
                MAX_SEARCH_DEPTH, search.shallow_depth
            ));
        }
        if search.depth_thresholds.windows(2).any(|w| w[0] < w[1]) {
            return invalid(format!(
                "depth_thresholds must be non-increasing, got {:?}",
                search.depth_thresholds
            ));
        }
        if !(0.0..=1.0).contains(&search.tactic_chance) {
            return invalid(format!("tactic_chance must be within 0-1, got {}", search.tactic_chance));
        }
        if search.sample_size == 0 {
            return invalid("sample_size must be at least 1".to_string());
        }
        Ok(())
    }
}

fn invalid(message: String) -> Result<()> {
    Err(Error::InvalidConfig { message })
}
