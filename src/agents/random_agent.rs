//! Random agent: picks a legal action uniformly at random.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::actions::Action;
use crate::agents::ActionSelector;
use crate::game_mechanics::CaptureGame;
use crate::game_state::CaptureState;

/// An agent that selects a random legal action.
pub struct RandomAgent<R: Rng = StdRng> {
    index: usize,
    rng: R,
}

impl<R: Rng> RandomAgent<R> {
    pub fn new(index: usize, rng: R) -> Self {
        Self { index, rng }
    }
}

impl RandomAgent<StdRng> {
    pub fn from_entropy(index: usize) -> Self {
        Self::new(index, StdRng::from_entropy())
    }
}

impl<R: Rng> ActionSelector for RandomAgent<R> {
    fn index(&self) -> usize {
        self.index
    }

    fn select_action(&mut self, state: &CaptureGame) -> anyhow::Result<Action> {
        let legal = state.legal_actions(self.index);
        anyhow::ensure!(!legal.is_empty(), "No legal actions available");
        Ok(legal[self.rng.gen_range(0..legal.len())])
    }
}
