//! Configuration for agents and matches.
//!
//! Every field has a default, so an empty file (or no file at all) yields the
//! stock policy. Weight overrides are keyed by snake_case feature names and a
//! misspelled name is a parse error rather than a silently ignored entry.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::weights::WeightOverrides;

/// Top-level config file.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CaptureConfig {
    pub policy: PolicyConfig,
    #[serde(rename = "match")]
    pub match_rules: MatchConfig,
}

/// Upper bound on the offensive trail.
pub const MAX_MEMORY_CAPACITY: usize = 10;

/// Tunables of the reflex agents.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PolicyConfig {
    /// Positions the offensive trail remembers, at most
    /// [`MAX_MEMORY_CAPACITY`].
    pub memory_capacity: usize,
    /// How many of the most recent trail entries count as a revisit.
    pub revisit_window: usize,
    /// Food left at or below which agents head back to their start.
    pub endgame_food_threshold: usize,
    /// Team score from which the forager also hunts invaders.
    pub defensive_score_threshold: i32,
    /// Distance a scared agent keeps from invaders.
    pub keep_away_distance: u32,
    /// Row spacing of patrol points along the boundary column.
    pub patrol_stride: usize,
    pub weights: WeightOverrides,
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self {
            memory_capacity: 10,
            revisit_window: 5,
            endgame_food_threshold: 2,
            defensive_score_threshold: 5,
            keep_away_distance: 3,
            patrol_stride: 4,
            weights: WeightOverrides::default(),
        }
    }
}

/// Rules of the reference engine.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MatchConfig {
    /// Total agent moves before the game is cut off.
    pub max_moves: u32,
    /// Manhattan distance within which opponents are visible.
    pub sight_range: i32,
    /// Moves a defender stays scared after a capsule is eaten.
    pub scared_time: u32,
    /// Pellets a team may leave uneaten and still win outright.
    pub min_food: usize,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            max_moves: 1200,
            sight_range: 5,
            scared_time: 40,
            min_food: 2,
        }
    }
}

/// Load a `CaptureConfig` from a YAML file.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<CaptureConfig> {
    let contents = fs::read_to_string(path.as_ref())
        .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;
    parse_config(&contents)
        .with_context(|| format!("Failed to parse config file: {}", path.as_ref().display()))
}

pub fn parse_config(contents: &str) -> Result<CaptureConfig> {
    if contents.trim().is_empty() {
        return Ok(CaptureConfig::default());
    }
    let config: CaptureConfig = serde_yaml::from_str(contents)?;
    config.policy.validate()?;
    Ok(config)
}

impl PolicyConfig {
    pub fn validate(&self) -> Result<()> {
        anyhow::ensure!(
            self.memory_capacity <= MAX_MEMORY_CAPACITY,
            "memory_capacity must be at most {}, got {}",
            MAX_MEMORY_CAPACITY,
            self.memory_capacity
        );
        Ok(())
    }
}
