//! Difficulty tiers and the strategy selector
//!
//! Five move-selection policies, weakest first:
//!
//! | label        | strategy                         |
//! |--------------|----------------------------------|
//! | `easy`       | uniform random empty cell        |
//! | `medium`     | occasional tactics, sampled eval |
//! | `hard`       | win, block, greedy evaluation    |
//! | `extrahard`  | win, block, shallow minimax      |
//! | `impossible` | full [`SearchEngine`]            |
//!
//! Randomness comes only from the selector's injected source, and only the
//! `easy` and `medium` tiers draw from it.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use rand::rngs::StdRng;
use rand::seq::{IteratorRandom, SliceRandom};
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::board::{Board, Pos, Stone};
use crate::config::SearchConfig;
use crate::engine::SearchEngine;
use crate::error::Error;
use crate::eval::{evaluate, evaluate_sampled};
use crate::rules::{find_winning_move, Rules};
use crate::search::{candidate_moves, rank_moves, Searcher};

/// Difficulty label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
    ExtraHard,
    Impossible,
}

impl Difficulty {
    pub const ALL: [Difficulty; 5] = [
        Difficulty::Easy,
        Difficulty::Medium,
        Difficulty::Hard,
        Difficulty::ExtraHard,
        Difficulty::Impossible,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
            Difficulty::ExtraHard => "extrahard",
            Difficulty::Impossible => "impossible",
        }
    }

    /// Lenient parse: unknown labels fall back to `Medium` with a warning
    pub fn from_label(label: &str) -> Self {
        label.parse().unwrap_or_else(|_| {
            warn!(label, "unknown difficulty, falling back to medium");
            Difficulty::Medium
        })
    }
}

impl FromStr for Difficulty {
    type Err = Error;

    /// Case-insensitive, surrounding whitespace ignored
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Difficulty::ALL
            .into_iter()
            .find(|d| d.label().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| Error::UnknownDifficulty {
                label: s.to_string(),
            })
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A move-selection policy. Each variant holds only what it needs.
#[derive(Debug, Clone)]
pub enum Strategy {
    Random,
    Tactical { tactic_chance: f64, sample_size: usize },
    Greedy,
    ShallowMinimax { depth: u8 },
    Impossible(SearchEngine),
}

impl Strategy {
    pub fn for_difficulty(difficulty: Difficulty, config: &SearchConfig) -> Self {
        match difficulty {
            Difficulty::Easy => Strategy::Random,
            Difficulty::Medium => Strategy::Tactical {
                tactic_chance: config.tactic_chance,
                sample_size: config.sample_size,
            },
            Difficulty::Hard => Strategy::Greedy,
            Difficulty::ExtraHard => Strategy::ShallowMinimax {
                depth: config.shallow_depth,
            },
            Difficulty::Impossible => Strategy::Impossible(SearchEngine::with_config(config.clone())),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Strategy::Random => "random",
            Strategy::Tactical { .. } => "tactical",
            Strategy::Greedy => "greedy",
            Strategy::ShallowMinimax { .. } => "shallow-minimax",
            Strategy::Impossible(_) => "impossible",
        }
    }

    /// Pick an empty cell for `player`; `None` only when the board is full
    pub fn select_move<R: Rng + ?Sized>(
        &self,
        board: &Board,
        player: Stone,
        opponent: Stone,
        rules: Rules,
        rng: &mut R,
    ) -> Option<Pos> {
        if board.is_full() {
            return None;
        }

        let chosen = match self {
            Strategy::Random => board.empty_cells().choose(rng).copied(),
            Strategy::Tactical {
                tactic_chance,
                sample_size,
            } => {
                let tactic = if rng.gen_bool(tactic_chance.clamp(0.0, 1.0)) {
                    win_or_block(board, player, opponent, rules)
                } else {
                    None
                };
                tactic.or_else(|| sampled_best(board, player, opponent, rules, rng, *sample_size))
            }
            Strategy::Greedy => win_or_block(board, player, opponent, rules)
                .or_else(|| greedy_best(board, player, opponent, rules)),
            Strategy::ShallowMinimax { depth } => win_or_block(board, player, opponent, rules)
                .or_else(|| Searcher::new().search(board, player, *depth, rules).best_move),
            Strategy::Impossible(engine) => engine.get_move(board, player, rules),
        };

        // Every policy ends on an empty cell while one exists
        chosen
            .filter(|&p| board.is_empty(p))
            .or_else(|| board.empty_cells().first().copied())
    }
}

fn win_or_block(board: &Board, player: Stone, opponent: Stone, rules: Rules) -> Option<Pos> {
    find_winning_move(board, player, rules).or_else(|| find_winning_move(board, opponent, rules))
}

/// Best evaluator score among the top-ranked threat cells, or among all
/// candidates when nothing is threatened. First on ties.
fn greedy_best(board: &Board, player: Stone, opponent: Stone, rules: Rules) -> Option<Pos> {
    let ranked = rank_moves(board, player, rules);
    let pool: Vec<Pos> = match ranked.first() {
        Some(top) => ranked
            .iter()
            .take_while(|t| t.priority == top.priority)
            .map(|t| t.pos)
            .collect(),
        None => candidate_moves(board),
    };

    let mut scratch = board.snapshot();
    let mut best: Option<(Pos, i32)> = None;
    for pos in pool {
        if !scratch.place(pos, player) {
            continue;
        }
        let score = evaluate(&scratch, player, opponent, rules);
        scratch.remove(pos);
        if best.map_or(true, |(_, s)| score > s) {
            best = Some((pos, score));
        }
    }
    best.map(|(pos, _)| pos)
}

/// Heuristic approximation: score a random sample of candidates with a
/// sampled evaluation and keep the best
fn sampled_best<R: Rng + ?Sized>(
    board: &Board,
    player: Stone,
    opponent: Stone,
    rules: Rules,
    rng: &mut R,
    sample_size: usize,
) -> Option<Pos> {
    let pool = candidate_moves(board).into_iter().choose_multiple(rng, sample_size);
    let mut scratch = board.snapshot();
    let mut best: Option<(Pos, i32)> = None;
    for pos in pool {
        if !scratch.place(pos, player) {
            continue;
        }
        let score = evaluate_sampled(&scratch, player, opponent, rules, rng, sample_size);
        scratch.remove(pos);
        if best.map_or(true, |(_, s)| score > s) {
            best = Some((pos, score));
        }
    }
    best.map(|(pos, _)| pos)
}

/// Maps difficulty labels to strategies, built lazily and cached.
///
/// Generic over the random source so tests can inject a seeded one.
pub struct StrategySelector<R = StdRng> {
    rng: R,
    config: SearchConfig,
    cache: HashMap<Difficulty, Strategy>,
}

impl StrategySelector<StdRng> {
    /// Selector seeded from the operating system
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    /// Reproducible selector
    pub fn seeded(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }
}

impl Default for StrategySelector<StdRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Rng> StrategySelector<R> {
    pub fn with_rng(rng: R) -> Self {
        Self::with_config(SearchConfig::default(), rng)
    }

    pub fn with_config(config: SearchConfig, rng: R) -> Self {
        Self {
            rng,
            config,
            cache: HashMap::new(),
        }
    }

    /// Cached strategy for a difficulty, built on first use
    pub fn strategy(&mut self, difficulty: Difficulty) -> &Strategy {
        let config = &self.config;
        self.cache
            .entry(difficulty)
            .or_insert_with(|| Strategy::for_difficulty(difficulty, config))
    }

    /// Number of strategies built so far
    pub fn cached(&self) -> usize {
        self.cache.len()
    }

    /// Move for a difficulty label; unknown labels play as `medium`
    pub fn get_move(
        &mut self,
        board: &Board,
        difficulty: &str,
        player: Stone,
        opponent: Stone,
        rules: Rules,
    ) -> Option<Pos> {
        let difficulty = Difficulty::from_label(difficulty);
        self.select_move(board, difficulty, player, opponent, rules)
    }

    /// Move for a parsed difficulty
    pub fn select_move(
        &mut self,
        board: &Board,
        difficulty: Difficulty,
        player: Stone,
        opponent: Stone,
        rules: Rules,
    ) -> Option<Pos> {
        let config = &self.config;
        let strategy = self
            .cache
            .entry(difficulty)
            .or_insert_with(|| Strategy::for_difficulty(difficulty, config));
        let chosen = strategy.select_move(board, player, opponent, rules, &mut self.rng);
        debug!(%difficulty, strategy = strategy.name(), chosen = ?chosen, "strategy move");
        chosen
    }
}
