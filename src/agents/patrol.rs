//! Wandering targets for the defender while no invader is in sight.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::game_state::{CaptureState, Team};
use crate::grid::Cell;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PatrolMode {
    Patrolling,
    Pursuing,
}

#[derive(Clone, Debug)]
pub struct PatrolController {
    points: Vec<Cell>,
    target: Option<Cell>,
    mode: PatrolMode,
}

/// Open cells on the home side of the boundary, every `stride` rows starting
/// at row 1.
pub fn patrol_points<S: CaptureState>(state: &S, team: Team, stride: usize) -> Vec<Cell> {
    let x = team.boundary_column(state.width());
    (1..state.height() - 1)
        .step_by(stride.max(1))
        .map(|y| Cell::new(x, y))
        .filter(|&cell| !state.has_wall(cell))
        .collect()
}

impl PatrolController {
    pub fn new(points: Vec<Cell>) -> Self {
        Self {
            points,
            target: None,
            mode: PatrolMode::Patrolling,
        }
    }

    pub fn points(&self) -> &[Cell] {
        &self.points
    }

    pub fn target(&self) -> Option<Cell> {
        self.target
    }

    pub fn mode(&self) -> PatrolMode {
        self.mode
    }

    /// Draw the first target at episode start.
    pub fn start<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.mode = PatrolMode::Patrolling;
        self.target = self.points.choose(rng).copied();
    }

    /// Per-tick update from the defender's own cell and whether any invader
    /// is visible.
    pub fn update<R: Rng + ?Sized>(&mut self, position: Cell, invader_visible: bool, rng: &mut R) {
        if invader_visible {
            self.mode = PatrolMode::Pursuing;
            self.target = None;
            return;
        }

        self.mode = PatrolMode::Patrolling;
        if self.target.map_or(true, |target| target == position) {
            self.target = self.points.choose(rng).copied();
        }
    }
}
