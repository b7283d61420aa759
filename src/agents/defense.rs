//! Features of the guard: stay home, close in on invaders, and wander the
//! boundary when the coast is clear.

use crate::actions::Action;
use crate::agents::lookahead::{grid_successor, Opponents};
use crate::config::PolicyConfig;
use crate::features::{Feature, FeatureVector};
use crate::game_state::{CaptureState, Team};
use crate::grid::Cell;
use crate::pathfinding::{min_distance, MazeDistance};

/// `patrol_target` is the controller's current target; extraction never
/// changes it.
pub fn defense_features<S, D>(
    state: &S,
    agent: usize,
    action: Action,
    patrol_target: Option<Cell>,
    distancer: &D,
    policy: &PolicyConfig,
) -> FeatureVector
where
    S: CaptureState,
    D: MazeDistance + ?Sized,
{
    let mut features = FeatureVector::new();
    let team = Team::of_agent(agent);
    let successor = grid_successor(state, agent, action);
    let me = successor.agent_state(agent);
    let Some(position) = me.cell() else {
        return features;
    };

    features.set(Feature::OnDefense, if me.is_pacman { 0.0 } else { 1.0 });

    let invaders = Opponents::observe(&successor, team).invaders;
    features.set(Feature::NumInvaders, invaders.len() as f64);

    if let Some(d) = min_distance(distancer, position, invaders.iter().copied()) {
        features.set(Feature::InvaderDistance, d as f64);
        let chase = 1.0 / (1.0 + d as f64);
        if me.is_scared() {
            features.set(Feature::ScaredOfInvader, 1.0);
            if d < policy.keep_away_distance {
                features.set(Feature::InvaderDistance, policy.keep_away_distance as f64);
            } else {
                features.set(Feature::InvaderChase, chase);
            }
        } else {
            features.set(Feature::InvaderChase, chase);
        }
    } else if let Some(target) = patrol_target {
        features.set(
            Feature::PatrolDistance,
            distancer.maze_distance(position, target) as f64,
        );
    }

    if action.is_stop() {
        features.set(Feature::Stop, 1.0);
    }
    if action == state.agent_state(agent).direction.reverse() {
        features.set(Feature::Reverse, 1.0);
    }

    features
}
