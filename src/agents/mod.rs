//! Agent implementations for capture-the-flag matches.
//!
//! All agents implement the [`ActionSelector`] trait. The reflex policy itself
//! only needs a [`CaptureState`](crate::game_state::CaptureState); the trait
//! binds it to the reference engine for the match runner.

use crate::actions::Action;
use crate::game_mechanics::CaptureGame;

pub mod defense;
pub mod lookahead;
pub mod memory;
pub mod offense;
pub mod patrol;
pub mod random_agent;
pub mod reflex_agent;
pub mod team;

/// Trait for agents that pick one action per tick.
///
/// The state passed in is the agent's own observation: opponents out of
/// sight have no position.
pub trait ActionSelector {
    /// Index of the agent this selector controls.
    fn index(&self) -> usize;

    /// Called once before the first move of a match.
    fn register(&mut self, _state: &CaptureGame) -> anyhow::Result<()> {
        Ok(())
    }

    /// Select a legal action for this tick.
    fn select_action(&mut self, state: &CaptureGame) -> anyhow::Result<Action>;
}
