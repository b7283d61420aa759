//! Reference capture-the-flag engine.
//!
//! Agents move a full cell per action. Red agents (even indices) defend the
//! west half, blue agents (odd indices) the east half. A score above zero
//! favours red.

use std::collections::VecDeque;
use std::sync::Arc;

use anyhow::Result;
use ndarray::Array2;
use tracing::warn;

use crate::actions::Action;
use crate::config::MatchConfig;
use crate::game_state::{AgentState, CaptureState, Team};
use crate::grid::{Cell, Layout};

/// Distance under which two agents collide.
const COLLISION_TOLERANCE: f64 = 0.7;

#[derive(Clone, Debug)]
pub struct CaptureGame {
    layout: Arc<Layout>,
    /// Indexed `[[x, y]]`.
    food: Array2<bool>,
    capsules: Vec<Cell>,
    agents: Vec<AgentState>,
    /// Red's perspective.
    score: i32,
    moves_left: u32,
    rules: MatchConfig,
    /// Pellets initially on each half, indexed by the team that owns the half.
    initial_food: [usize; 2],
}

fn team_slot(team: Team) -> usize {
    match team {
        Team::Red => 0,
        Team::Blue => 1,
    }
}

impl CaptureGame {
    pub fn new(layout: Layout, rules: MatchConfig) -> Result<Self> {
        anyhow::ensure!(
            layout.agent_starts.len() % 2 == 0,
            "Layout has {} agents, teams must be even",
            layout.agent_starts.len()
        );

        let agents = layout
            .agent_starts
            .iter()
            .map(|&start| AgentState::new(start))
            .collect();
        let food = layout.food.clone();
        let capsules = layout.capsules.clone();

        let mut game = Self {
            layout: Arc::new(layout),
            food,
            capsules,
            agents,
            score: 0,
            moves_left: rules.max_moves,
            rules,
            initial_food: [0, 0],
        };
        game.initial_food = [
            game.food_on_half(Team::Red).len(),
            game.food_on_half(Team::Blue).len(),
        ];
        Ok(game)
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn rules(&self) -> &MatchConfig {
        &self.rules
    }

    pub fn moves_left(&self) -> u32 {
        self.moves_left
    }

    /// Score from red's point of view.
    pub fn red_score(&self) -> i32 {
        self.score
    }

    pub fn has_food(&self, cell: Cell) -> bool {
        self.layout.in_bounds(cell) && self.food[[cell.x as usize, cell.y as usize]]
    }

    /// Pellets lying on the half `owner` defends.
    pub fn food_on_half(&self, owner: Team) -> Vec<Cell> {
        let width = self.layout.width;
        let mut cells = Vec::new();
        for ((x, y), &present) in self.food.indexed_iter() {
            let cell = Cell::new(x as i32, y as i32);
            if present && owner.owns(cell, width) {
                cells.push(cell);
            }
        }
        cells
    }

    fn returned_by(&self, team: Team) -> u32 {
        self.agents
            .iter()
            .enumerate()
            .filter(|(i, _)| Team::of_agent(*i) == team)
            .map(|(_, agent)| agent.num_returned)
            .sum()
    }

    /// Whether `team` has banked all pellets it attacks except `min_food`.
    fn has_cleared_food(&self, team: Team) -> bool {
        let available = self.initial_food[team_slot(team.opponent())];
        let target = available.saturating_sub(self.rules.min_food);
        target > 0 && self.returned_by(team) as usize >= target
    }

    pub fn is_over(&self) -> bool {
        self.moves_left == 0
            || self.has_cleared_food(Team::Red)
            || self.has_cleared_food(Team::Blue)
    }

    pub fn winner(&self) -> Option<Team> {
        match self.score {
            s if s > 0 => Some(Team::Red),
            s if s < 0 => Some(Team::Blue),
            _ => None,
        }
    }

    /// Copy of the state as seen by `observer`: opponents further than the
    /// sight range from every teammate lose their position.
    pub fn observation_for(&self, observer: usize) -> CaptureGame {
        let team = Team::of_agent(observer);
        let teammates: Vec<Cell> = (0..self.agents.len())
            .filter(|&i| Team::of_agent(i) == team)
            .filter_map(|i| self.agents[i].cell())
            .collect();

        let mut observed = self.clone();
        for opponent in self.opponents(team) {
            let Some(cell) = self.agents[opponent].cell() else {
                continue;
            };
            let visible = teammates
                .iter()
                .any(|mate| mate.manhattan(cell) <= self.rules.sight_range);
            if !visible {
                observed.agents[opponent].position = None;
            }
        }
        observed
    }

    /// Apply `action` for `agent` in place. Illegal actions leave the agent
    /// where it is.
    pub fn apply_action(&mut self, agent: usize, action: Action) {
        let Some(position) = self.agents[agent].position else {
            warn!(agent, "Cannot move an agent whose position is hidden");
            return;
        };

        let action = if self.legal_actions(agent).contains(&action) {
            action
        } else {
            warn!(agent, %action, "Illegal action replaced by Stop");
            Action::Stop
        };

        let (dx, dy) = action.vector();
        let next = position.translate(dx as f64, dy as f64);
        let team = Team::of_agent(agent);
        {
            let state = &mut self.agents[agent];
            state.position = Some(next);
            state.direction = action;
        }

        if next.is_on_grid() {
            let cell = next.nearest_cell();
            let on_enemy_half = !team.owns(cell, self.layout.width);
            self.agents[agent].is_pacman = on_enemy_half;
            if on_enemy_half {
                self.consume(agent, cell);
            } else {
                self.bank_food(agent);
            }
        }

        self.resolve_collisions(agent);

        let state = &mut self.agents[agent];
        state.scared_timer = state.scared_timer.saturating_sub(1);
        self.moves_left = self.moves_left.saturating_sub(1);
    }

    fn consume(&mut self, agent: usize, cell: Cell) {
        let (x, y) = (cell.x as usize, cell.y as usize);
        if self.food[[x, y]] {
            self.food[[x, y]] = false;
            self.agents[agent].num_carrying += 1;
        }

        if let Some(i) = self.capsules.iter().position(|&c| c == cell) {
            self.capsules.remove(i);
            let scared_time = self.rules.scared_time;
            for opponent in self.opponents(Team::of_agent(agent)) {
                self.agents[opponent].scared_timer = scared_time;
            }
        }
    }

    fn bank_food(&mut self, agent: usize) {
        let carried = self.agents[agent].num_carrying;
        if carried == 0 {
            return;
        }
        let state = &mut self.agents[agent];
        state.num_returned += carried;
        state.num_carrying = 0;
        match Team::of_agent(agent) {
            Team::Red => self.score += carried as i32,
            Team::Blue => self.score -= carried as i32,
        }
    }

    fn resolve_collisions(&mut self, agent: usize) {
        let team = Team::of_agent(agent);
        for opponent in self.opponents(team) {
            let (Some(mine), Some(theirs)) =
                (self.agents[agent].position, self.agents[opponent].position)
            else {
                continue;
            };
            let distance = (mine.x - theirs.x).abs() + (mine.y - theirs.y).abs();
            if distance > COLLISION_TOLERANCE {
                continue;
            }

            let me = &self.agents[agent];
            let them = &self.agents[opponent];
            if me.is_pacman && !them.is_pacman {
                if them.is_scared() {
                    self.kill(opponent);
                } else {
                    self.kill(agent);
                    return;
                }
            } else if !me.is_pacman && them.is_pacman {
                if me.is_scared() {
                    self.kill(agent);
                    return;
                } else {
                    self.kill(opponent);
                }
            }
        }
    }

    /// Send an agent back to its start, dropping carried food where it died.
    fn kill(&mut self, agent: usize) {
        let carried = self.agents[agent].num_carrying;
        if carried > 0 {
            if let Some(cell) = self.agents[agent].cell() {
                self.dump_food(cell, carried as usize);
            }
        }
        let start = self.agents[agent].start;
        let returned = self.agents[agent].num_returned;
        self.agents[agent] = AgentState::new(start);
        self.agents[agent].num_returned = returned;
    }

    /// Place `amount` pellets on the free cells closest to `origin`, staying
    /// on the half `origin` belongs to.
    fn dump_food(&mut self, origin: Cell, amount: usize) {
        let width = self.layout.width;
        let half_owner = if Team::Red.owns(origin, width) {
            Team::Red
        } else {
            Team::Blue
        };

        let mut visited =
            Array2::<bool>::from_elem((width as usize, self.layout.height as usize), false);
        let mut queue = VecDeque::new();
        visited[[origin.x as usize, origin.y as usize]] = true;
        queue.push_back(origin);

        let mut remaining = amount;
        while let Some(cell) = queue.pop_front() {
            if remaining == 0 {
                break;
            }
            if !self.has_food(cell) && !self.capsules.contains(&cell) {
                self.food[[cell.x as usize, cell.y as usize]] = true;
                remaining -= 1;
            }
            for action in [Action::North, Action::South, Action::East, Action::West] {
                let (dx, dy) = action.vector();
                let next = cell.offset(dx, dy);
                if self.layout.has_wall(next)
                    || !half_owner.owns(next, width)
                    || visited[[next.x as usize, next.y as usize]]
                {
                    continue;
                }
                visited[[next.x as usize, next.y as usize]] = true;
                queue.push_back(next);
            }
        }

        if remaining > 0 {
            warn!(remaining, "No room left to drop food");
        }
    }
}

impl CaptureState for CaptureGame {
    fn num_agents(&self) -> usize {
        self.agents.len()
    }

    fn legal_actions(&self, agent: usize) -> Vec<Action> {
        let Some(position) = self.agents[agent].position else {
            return vec![Action::Stop];
        };
        let cell = position.nearest_cell();
        Action::ALL
            .iter()
            .copied()
            .filter(|action| {
                let (dx, dy) = action.vector();
                !self.layout.has_wall(cell.offset(dx, dy))
            })
            .collect()
    }

    fn successor(&self, agent: usize, action: Action) -> Self {
        let mut next = self.clone();
        next.apply_action(agent, action);
        next
    }

    fn agent_state(&self, agent: usize) -> &AgentState {
        &self.agents[agent]
    }

    fn food(&self, team: Team) -> Vec<Cell> {
        self.food_on_half(team.opponent())
    }

    fn capsules(&self, team: Team) -> Vec<Cell> {
        let width = self.layout.width;
        self.capsules
            .iter()
            .copied()
            .filter(|&cell| !team.owns(cell, width))
            .collect()
    }

    fn score(&self, team: Team) -> i32 {
        match team {
            Team::Red => self.score,
            Team::Blue => -self.score,
        }
    }

    fn width(&self) -> i32 {
        self.layout.width
    }

    fn height(&self) -> i32 {
        self.layout.height
    }

    fn has_wall(&self, cell: Cell) -> bool {
        self.layout.has_wall(cell)
    }
}

/// Move an agent to an arbitrary cell. Only meant for setting up test
/// positions.
#[cfg(test)]
impl CaptureGame {
    pub(crate) fn place_agent(&mut self, agent: usize, cell: Cell) {
        let team = Team::of_agent(agent);
        let state = &mut self.agents[agent];
        state.position = Some(crate::grid::Point::from(cell));
        state.is_pacman = !team.owns(cell, self.layout.width);
    }

    pub(crate) fn agent_mut(&mut self, agent: usize) -> &mut AgentState {
        &mut self.agents[agent]
    }

    pub(crate) fn set_red_score(&mut self, score: i32) {
        self.score = score;
    }

    pub(crate) fn set_food(&mut self, cells: &[Cell]) {
        self.food.fill(false);
        for cell in cells {
            self.food[[cell.x as usize, cell.y as usize]] = true;
        }
    }

    pub(crate) fn set_capsules(&mut self, cells: &[Cell]) {
        self.capsules = cells.to_vec();
    }
}
