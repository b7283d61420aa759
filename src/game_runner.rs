//! Core game loop for capture matches.
//!
//! Agents are abstracted behind the [`ActionSelector`] trait so the runner
//! can be tested with mock agents.

use anyhow::{Context, Result};
use rayon::prelude::*;
use serde::Serialize;
use tracing::{debug, info};

use crate::agents::ActionSelector;
use crate::config::MatchConfig;
use crate::game_mechanics::CaptureGame;
use crate::game_state::{CaptureState, Team};
use crate::grid::Layout;

/// Result of a complete match.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct MatchResult {
    /// Final score from red's point of view.
    pub score: i32,
    /// `None` on a tie.
    pub winner: Option<Team>,
    /// Total number of agent moves played.
    pub num_moves: u32,
}

/// Play one match to the end.
///
/// `agents[i]` controls agent `i`. Every agent is registered on its own
/// observation, then agents move in index order, each seeing only what its
/// team can see.
pub fn play_match(
    agents: &mut [Box<dyn ActionSelector>],
    mut game: CaptureGame,
) -> Result<MatchResult> {
    anyhow::ensure!(
        agents.len() == game.num_agents(),
        "Layout has {} agents but {} were provided",
        game.num_agents(),
        agents.len()
    );
    for (i, agent) in agents.iter().enumerate() {
        anyhow::ensure!(
            agent.index() == i,
            "Agent in seat {} controls index {}",
            i,
            agent.index()
        );
    }

    for agent in agents.iter_mut() {
        let index = agent.index();
        agent
            .register(&game.observation_for(index))
            .with_context(|| format!("Failed to register agent {}", index))?;
    }

    let mut num_moves = 0;
    'game: while !game.is_over() {
        for agent in agents.iter_mut() {
            if game.is_over() {
                break 'game;
            }
            let index = agent.index();
            let action = agent
                .select_action(&game.observation_for(index))
                .with_context(|| format!("Agent {} failed to choose an action", index))?;
            anyhow::ensure!(
                game.legal_actions(index).contains(&action),
                "Agent {} chose illegal action {}",
                index,
                action
            );
            game.apply_action(index, action);
            num_moves += 1;
        }
        debug!(moves_left = game.moves_left(), score = game.red_score(), "Round complete");
    }

    let result = MatchResult {
        score: game.red_score(),
        winner: game.winner(),
        num_moves,
    };
    info!(score = result.score, winner = ?result.winner, num_moves, "Match finished");
    Ok(result)
}

/// Play `num_games` independent matches in parallel.
///
/// `make_agents(game_index)` builds a fresh set of agents for each game.
pub fn play_series<F>(
    layout: &Layout,
    rules: MatchConfig,
    num_games: usize,
    make_agents: F,
) -> Result<Vec<MatchResult>>
where
    F: Fn(usize) -> Result<Vec<Box<dyn ActionSelector>>> + Sync,
{
    (0..num_games)
        .into_par_iter()
        .map(|game_index| {
            let game = CaptureGame::new(layout.clone(), rules)?;
            let mut agents = make_agents(game_index)?;
            play_match(&mut agents, game).with_context(|| format!("Game {} failed", game_index))
        })
        .collect()
}
