//! Play a series of capture matches between reflex and random agents.
//!
//! Red takes the even agent indices and blue the odd ones. Results are
//! printed and, with `--summary`, written as YAML.

use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use capture_rs::agents::team::{build_match_agents, parse_pair};
use capture_rs::config::{load_config, CaptureConfig};
use capture_rs::game_runner::play_series;
use capture_rs::grid::Layout;
use capture_rs::match_writer::{write_summary_yaml, SeriesSummary};

#[derive(Parser, Debug)]
#[command(
    name = "capture_match",
    about = "Play capture-the-flag matches between reflex agents",
    version
)]
struct Args {
    /// Layout file (defaults to the built-in 20x9 maze)
    #[arg(long)]
    layout: Option<PathBuf>,

    /// Number of matches to play
    #[arg(long, default_value_t = 1)]
    games: usize,

    /// Base seed for reproducible runs
    #[arg(long)]
    seed: Option<u64>,

    /// Override the move budget from the config
    #[arg(long)]
    max_moves: Option<u32>,

    /// Red agents, e.g. offense,defense
    #[arg(long, default_value = "offense,defense")]
    red: String,

    /// Blue agents, e.g. random,random
    #[arg(long, default_value = "random,random")]
    blue: String,

    /// YAML config file with policy and match settings
    #[arg(long)]
    config: Option<PathBuf>,

    /// Write a YAML summary of the series here
    #[arg(long)]
    summary: Option<PathBuf>,

    /// Number of threads to use for parallel matches
    #[arg(long)]
    num_threads: Option<usize>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::filter::EnvFilter::from_default_env())
        .init();

    if let Some(num_threads) = args.num_threads {
        env::set_var("RAYON_NUM_THREADS", num_threads.to_string());
    }

    let config = match &args.config {
        Some(path) => load_config(path)?,
        None => CaptureConfig::default(),
    };
    let mut rules = config.match_rules;
    if let Some(max_moves) = args.max_moves {
        rules.max_moves = max_moves;
    }

    let (layout, layout_name) = match &args.layout {
        Some(path) => (Layout::load(path)?, path.display().to_string()),
        None => (Layout::default_capture()?, "default_capture".to_string()),
    };
    anyhow::ensure!(
        layout.agent_starts.len() == 4,
        "Layout {} has {} agents, expected 4",
        layout_name,
        layout.agent_starts.len()
    );

    let red = parse_pair(&args.red).context("Invalid --red")?;
    let blue = parse_pair(&args.blue).context("Invalid --blue")?;

    println!("Playing {} game(s) on {}", args.games, layout_name);
    println!("  Red:  {}", args.red);
    println!("  Blue: {}", args.blue);
    println!("  Max moves: {}", rules.max_moves);

    let policy = config.policy;
    let seed = args.seed;
    let results = play_series(&layout, rules, args.games, |game_index| {
        let game_seed = seed.map(|s| s.wrapping_add(game_index as u64 * 1000));
        Ok(build_match_agents(red, blue, &policy, game_seed))
    })?;

    for (i, result) in results.iter().enumerate() {
        let winner = match result.winner {
            Some(team) => format!("{:?}", team),
            None => "tie".to_string(),
        };
        println!(
            "Game {}: score {:+}, winner {}, {} moves",
            i, result.score, winner, result.num_moves
        );
    }

    let summary = SeriesSummary::new(layout_name, args.red, args.blue, seed, results);
    println!(
        "\nRed {} / Blue {} / Ties {}, mean score {:.2}",
        summary.red_wins, summary.blue_wins, summary.ties, summary.mean_score
    );

    if let Some(path) = &args.summary {
        write_summary_yaml(path, &summary)?;
        println!("Summary saved to: {}", path.display());
    }

    Ok(())
}
