//! Writing match summaries to disk as YAML.

use anyhow::{Context, Result};
use serde::Serialize;
use std::fs;
use std::path::Path;

use crate::game_runner::MatchResult;
use crate::game_state::Team;

/// Aggregate of a series of matches, written as a YAML file.
#[derive(Debug, Serialize)]
pub struct SeriesSummary {
    /// Layout the series was played on.
    pub layout: String,
    /// Agent kinds in the red seats, e.g. `offense,defense`.
    pub red: String,
    pub blue: String,
    pub seed: Option<u64>,
    pub games: usize,
    pub red_wins: usize,
    pub blue_wins: usize,
    pub ties: usize,
    /// Mean final score from red's point of view.
    pub mean_score: f64,
    pub results: Vec<MatchResult>,
}

impl SeriesSummary {
    pub fn new(
        layout: impl Into<String>,
        red: impl Into<String>,
        blue: impl Into<String>,
        seed: Option<u64>,
        results: Vec<MatchResult>,
    ) -> Self {
        let count = |team: Team| results.iter().filter(|r| r.winner == Some(team)).count();
        let red_wins = count(Team::Red);
        let blue_wins = count(Team::Blue);
        let games = results.len();
        let mean_score = if games == 0 {
            0.0
        } else {
            results.iter().map(|r| r.score as f64).sum::<f64>() / games as f64
        };
        Self {
            layout: layout.into(),
            red: red.into(),
            blue: blue.into(),
            seed,
            games,
            red_wins,
            blue_wins,
            ties: games - red_wins - blue_wins,
            mean_score,
            results,
        }
    }
}

/// Write a series summary as YAML, creating parent directories as needed.
pub fn write_summary_yaml<P: AsRef<Path>>(path: P, summary: &SeriesSummary) -> Result<()> {
    if let Some(parent) = path.as_ref().parent() {
        fs::create_dir_all(parent)?;
    }
    let contents = serde_yaml::to_string(summary).context("Failed to serialize summary")?;
    fs::write(path.as_ref(), contents)
        .with_context(|| format!("Failed to write {}", path.as_ref().display()))?;
    Ok(())
}
