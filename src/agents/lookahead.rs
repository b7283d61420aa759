//! One-step lookahead helpers shared by the reflex roles.

use crate::actions::Action;
use crate::game_state::{CaptureState, Team};
use crate::grid::Cell;

/// The state after `agent` performs `action`, re-applying the action once
/// when the first application leaves the agent between two cells.
pub fn grid_successor<S: CaptureState>(state: &S, agent: usize, action: Action) -> S {
    let successor = state.successor(agent, action);
    match successor.agent_position(agent) {
        Some(position) if !position.is_on_grid() => successor.successor(agent, action),
        _ => successor,
    }
}

/// Visible opponents of `team`, split by what they are currently doing.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Opponents {
    /// Opponents on our half.
    pub invaders: Vec<Cell>,
    /// Opponents on their half that cannot currently eat us.
    pub scared_defenders: Vec<Cell>,
    pub normal_defenders: Vec<Cell>,
}

impl Opponents {
    pub fn observe<S: CaptureState>(state: &S, team: Team) -> Self {
        let mut opponents = Opponents::default();
        for index in state.opponents(team) {
            let enemy = state.agent_state(index);
            let Some(cell) = enemy.cell() else {
                continue;
            };
            if enemy.is_pacman {
                opponents.invaders.push(cell);
            } else if enemy.is_scared() {
                opponents.scared_defenders.push(cell);
            } else {
                opponents.normal_defenders.push(cell);
            }
        }
        opponents
    }
}
