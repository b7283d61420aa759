//! One-ply reflex agent: score every legal action with a linear evaluation
//! and play one of the best.

use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::Rng;
use tracing::{debug, trace};

use crate::actions::Action;
use crate::agents::defense::defense_features;
use crate::agents::lookahead::{grid_successor, Opponents};
use crate::agents::memory::MemoryTrail;
use crate::agents::offense::offense_features;
use crate::agents::patrol::{patrol_points, PatrolController};
use crate::agents::team::RoleKind;
use crate::agents::ActionSelector;
use crate::config::PolicyConfig;
use crate::evaluator;
use crate::features::{Feature, FeatureVector};
use crate::game_mechanics::CaptureGame;
use crate::game_state::{CaptureState, Team};
use crate::grid::Cell;
use crate::pathfinding::{MazeDistance, MazeDistancer};
use crate::weights::{WeightProfile, WeightTables};

/// Distance oracle shared by every decision of one agent.
pub type SharedDistancer = Arc<dyn MazeDistance + Send + Sync>;

/// Role together with the state only that role keeps.
#[derive(Clone, Debug)]
pub enum Role {
    Baseline,
    Offense(MemoryTrail),
    Defense(PatrolController),
}

impl Role {
    fn new(kind: RoleKind, policy: &PolicyConfig) -> Self {
        match kind {
            RoleKind::Baseline => Role::Baseline,
            RoleKind::Offense => Role::Offense(MemoryTrail::new(policy.memory_capacity)),
            RoleKind::Defense => Role::Defense(PatrolController::new(Vec::new())),
        }
    }

    pub fn kind(&self) -> RoleKind {
        match self {
            Role::Baseline => RoleKind::Baseline,
            Role::Offense(_) => RoleKind::Offense,
            Role::Defense(_) => RoleKind::Defense,
        }
    }
}

pub struct ReflexAgent<R: Rng = StdRng> {
    index: usize,
    team: Team,
    role: Role,
    policy: PolicyConfig,
    weights: WeightTables,
    /// Cell at registration; the end-game retreat heads back here.
    start: Option<Cell>,
    distancer: Option<SharedDistancer>,
    rng: R,
}

impl<R: Rng> ReflexAgent<R> {
    pub fn new(index: usize, kind: RoleKind, policy: PolicyConfig, rng: R) -> Self {
        let weights = WeightTables::with_overrides(&policy.weights);
        Self {
            index,
            team: Team::of_agent(index),
            role: Role::new(kind, &policy),
            policy,
            weights,
            start: None,
            distancer: None,
            rng,
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn team(&self) -> Team {
        self.team
    }

    pub fn kind(&self) -> RoleKind {
        self.role.kind()
    }

    pub fn role(&self) -> &Role {
        &self.role
    }

    pub fn start(&self) -> Option<Cell> {
        self.start
    }

    pub fn trail(&self) -> Option<&MemoryTrail> {
        match &self.role {
            Role::Offense(trail) => Some(trail),
            _ => None,
        }
    }

    pub fn patrol(&self) -> Option<&PatrolController> {
        match &self.role {
            Role::Defense(patrol) => Some(patrol),
            _ => None,
        }
    }

    /// Episode start: remember where we spawned, reset role state and draw
    /// the first patrol target.
    pub fn register_initial_state<S: CaptureState>(
        &mut self,
        state: &S,
        distancer: SharedDistancer,
    ) -> Result<()> {
        anyhow::ensure!(
            self.index < state.num_agents(),
            "Agent {} is not part of a {}-agent game",
            self.index,
            state.num_agents()
        );
        let start = state
            .agent_state(self.index)
            .cell()
            .with_context(|| format!("Agent {} cannot see its own position", self.index))?;
        self.start = Some(start);
        self.distancer = Some(distancer);

        match &mut self.role {
            Role::Baseline => {}
            Role::Offense(trail) => trail.clear(),
            Role::Defense(patrol) => {
                let points = patrol_points(state, self.team, self.policy.patrol_stride);
                *patrol = PatrolController::new(points);
                patrol.start(&mut self.rng);
            }
        }

        debug!(
            agent = self.index,
            role = %self.kind(),
            %start,
            "Registered agent"
        );
        Ok(())
    }

    fn distancer(&self) -> Result<&(dyn MazeDistance + Send + Sync)> {
        self.distancer
            .as_deref()
            .with_context(|| format!("Agent {} has not been registered", self.index))
    }

    /// Features of playing `action` from `state`. Never mutates the agent.
    pub fn features<S: CaptureState>(&self, state: &S, action: Action) -> Result<FeatureVector> {
        let distancer = self.distancer()?;
        let features = match &self.role {
            Role::Baseline => {
                let successor = grid_successor(state, self.index, action);
                let mut features = FeatureVector::new();
                features.set(Feature::SuccessorScore, successor.score(self.team) as f64);
                features
            }
            Role::Offense(trail) => {
                offense_features(state, self.index, action, trail, distancer, &self.policy)
            }
            Role::Defense(patrol) => defense_features(
                state,
                self.index,
                action,
                patrol.target(),
                distancer,
                &self.policy,
            ),
        };
        Ok(features)
    }

    /// The table that scores `features`.
    pub fn weights_for(&self, features: &FeatureVector) -> &WeightProfile {
        match &self.role {
            Role::Baseline => &self.weights.baseline,
            Role::Offense(_) => self.weights.offense_for(features),
            Role::Defense(_) => &self.weights.defense,
        }
    }

    pub fn evaluate<S: CaptureState>(&self, state: &S, action: Action) -> Result<f64> {
        let features = self.features(state, action)?;
        let value = evaluator::evaluate(&features, self.weights_for(&features));
        trace!(agent = self.index, %action, %features, value, "Evaluated action");
        Ok(value)
    }

    pub fn choose_action<S: CaptureState>(&mut self, state: &S) -> Result<Action> {
        let started = Instant::now();
        let actions = state.legal_actions(self.index);
        anyhow::ensure!(!actions.is_empty(), "No legal actions for agent {}", self.index);
        let start = self
            .start
            .with_context(|| format!("Agent {} has not been registered", self.index))?;
        let position = state.agent_state(self.index).cell();

        // Patrol bookkeeping happens once per tick, before any scoring
        if let (Role::Defense(patrol), Some(position)) = (&mut self.role, position) {
            let invader_visible = !Opponents::observe(state, self.team).invaders.is_empty();
            patrol.update(position, invader_visible, &mut self.rng);
        }

        let mut values = Vec::with_capacity(actions.len());
        for &action in &actions {
            values.push(self.evaluate(state, action)?);
        }
        let best_value = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let best: Vec<Action> = actions
            .iter()
            .zip(&values)
            .filter(|(_, value)| **value == best_value)
            .map(|(action, _)| *action)
            .collect();

        let food_left = state.food(self.team).len();
        if food_left <= self.policy.endgame_food_threshold {
            let action = self.retreat_action(state, &actions, start)?;
            debug!(agent = self.index, food_left, %action, "Heading back to start");
            return Ok(action);
        }

        if let (Role::Offense(trail), Some(position)) = (&mut self.role, position) {
            trail.push(position);
        }

        let action = *best
            .choose(&mut self.rng)
            .with_context(|| format!("No action of agent {} has a comparable value", self.index))?;
        debug!(
            agent = self.index,
            %action,
            value = best_value,
            ties = best.len(),
            elapsed_us = started.elapsed().as_micros() as u64,
            "Chose action"
        );
        Ok(action)
    }

    /// Legal action whose successor is closest to `start`; the first one
    /// wins ties.
    fn retreat_action<S: CaptureState>(
        &self,
        state: &S,
        actions: &[Action],
        start: Cell,
    ) -> Result<Action> {
        let distancer = self.distancer()?;
        let mut best: Option<(Action, u32)> = None;
        for &action in actions {
            let successor = grid_successor(state, self.index, action);
            let Some(cell) = successor.agent_state(self.index).cell() else {
                continue;
            };
            let distance = distancer.maze_distance(start, cell);
            if best.map_or(true, |(_, shortest)| distance < shortest) {
                best = Some((action, distance));
            }
        }
        Ok(best.map_or(actions[0], |(action, _)| action))
    }
}

impl<R: Rng> ActionSelector for ReflexAgent<R> {
    fn index(&self) -> usize {
        self.index
    }

    fn register(&mut self, state: &CaptureGame) -> Result<()> {
        let distancer: SharedDistancer = Arc::new(MazeDistancer::new(state.layout()));
        self.register_initial_state(state, distancer)
    }

    fn select_action(&mut self, state: &CaptureGame) -> Result<Action> {
        self.choose_action(state)
    }
}
