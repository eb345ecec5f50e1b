//! Bounce Gomoku CLI
//!
//! Plays computer-vs-computer rounds between two difficulty tiers and
//! prints each position as it develops.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use bounce_gomoku::{Difficulty, EngineConfig, Game, Stone, StrategySelector};

#[derive(Parser)]
#[command(name = "bounce-gomoku")]
#[command(version, about = "Five-in-a-row with bounce, wrap and missing-teeth rules", long_about = None)]
struct Cli {
    /// JSON configuration file; flags below override it
    #[arg(long)]
    config: Option<PathBuf>,

    /// Board size (5-8)
    #[arg(long)]
    size: Option<usize>,

    /// Diagonal lines reflect off the edges
    #[arg(long)]
    bounce: bool,

    /// Lines continue across opposite edges
    #[arg(long)]
    wrap: bool,

    /// Off-axis fives must be unbroken cell to cell
    #[arg(long)]
    missing_teeth: bool,

    /// First response must be a knight move from the opening mark
    #[arg(long)]
    knight: bool,

    /// Difficulty playing X
    #[arg(long, default_value = "hard")]
    x: Difficulty,

    /// Difficulty playing O
    #[arg(long, default_value = "impossible")]
    o: Difficulty,

    /// Number of rounds; the opener alternates
    #[arg(long, default_value_t = 1)]
    rounds: u32,

    /// Seed for reproducible play
    #[arg(long)]
    seed: Option<u64>,

    /// Only print the final scoreboard
    #[arg(long)]
    quiet: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = build_config(&cli)?;
    info!(size = config.board_size, rules = %config.rules, knight = config.knight_move, "starting match");

    let mut selector = match cli.seed {
        Some(seed) => StrategySelector::seeded(seed),
        None => StrategySelector::new(),
    };
    let mut game = Game::from_config(&config).context("invalid game configuration")?;

    for round in 1..=cli.rounds {
        if round > 1 {
            game.new_round();
        }
        play_round(&mut game, &mut selector, &cli, round)?;
    }

    println!("{}", game.scoreboard());
    Ok(())
}

fn build_config(cli: &Cli) -> Result<EngineConfig> {
    let mut config = match &cli.config {
        Some(path) => EngineConfig::load(path)
            .with_context(|| format!("failed to load config from {}", path.display()))?,
        None => EngineConfig::default(),
    };

    if let Some(size) = cli.size {
        config.board_size = size;
    }
    config.rules = config
        .rules
        .with_bounce(config.rules.bounce || cli.bounce)
        .with_wrap(config.rules.wrap || cli.wrap)
        .with_missing_teeth(config.rules.missing_teeth || cli.missing_teeth);
    config.knight_move |= cli.knight;

    config.validate()?;
    Ok(config)
}

fn play_round(
    game: &mut Game,
    selector: &mut StrategySelector,
    cli: &Cli,
    round: u32,
) -> Result<()> {
    if !cli.quiet {
        println!("Round {} ({} opens)", round, game.current_turn());
    }

    while !game.is_over() {
        let side = game.current_turn();
        let difficulty = match side {
            Stone::O => cli.o,
            _ => cli.x,
        };
        let Some(pos) = game.computer_move(selector, difficulty)? else {
            break;
        };
        if !cli.quiet {
            println!("{} ({}) plays {}", side, difficulty, pos);
            println!("{}", game.board());
        }
    }

    let status = game.status();
    match status.winner {
        Some(winner) => info!(round, %winner, cells = ?status.winning_cells, "round won"),
        None => info!(round, "round drawn"),
    }
    Ok(())
}
