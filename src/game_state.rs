//! The contract between the decision core and whatever engine runs the game.
//!
//! The policy only ever reads a state through [`CaptureState`]; the reference
//! implementation lives in [`crate::game_mechanics`].

use serde::{Deserialize, Serialize};

use crate::actions::Action;
use crate::grid::{Cell, Point};

/// The two sides of the board.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Team {
    Red,
    Blue,
}

impl Team {
    /// Red agents have even indices, blue agents odd ones.
    pub fn of_agent(index: usize) -> Team {
        if index % 2 == 0 {
            Team::Red
        } else {
            Team::Blue
        }
    }

    pub fn opponent(self) -> Team {
        match self {
            Team::Red => Team::Blue,
            Team::Blue => Team::Red,
        }
    }

    pub fn is_red(self) -> bool {
        self == Team::Red
    }

    /// Whether `cell` lies in this team's home half of a board `width` wide.
    pub fn owns(self, cell: Cell, width: i32) -> bool {
        let red_half = cell.x < width / 2;
        red_half == self.is_red()
    }

    /// The home column adjacent to the boundary.
    pub fn boundary_column(self, width: i32) -> i32 {
        match self {
            Team::Red => width / 2 - 1,
            Team::Blue => width / 2,
        }
    }
}

/// Everything an observer can read about one agent.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AgentState {
    pub start: Cell,
    /// `None` when the agent is outside the observer's sight.
    pub position: Option<Point>,
    /// Heading of the last move (Stop at spawn).
    pub direction: Action,
    /// True while on the opposing half.
    pub is_pacman: bool,
    pub scared_timer: u32,
    pub num_carrying: u32,
    pub num_returned: u32,
}

impl AgentState {
    pub fn new(start: Cell) -> Self {
        Self {
            start,
            position: Some(Point::from(start)),
            direction: Action::Stop,
            is_pacman: false,
            scared_timer: 0,
            num_carrying: 0,
            num_returned: 0,
        }
    }

    /// The cell this agent occupies, if visible.
    pub fn cell(&self) -> Option<Cell> {
        self.position.map(Point::nearest_cell)
    }

    pub fn is_scared(&self) -> bool {
        self.scared_timer > 0
    }
}

/// Read-only view of a game state as consumed by the policy.
///
/// Food, capsules and score are always expressed from the point of view of
/// `team`: `food(team)` is what `team` is trying to eat.
pub trait CaptureState: Sized {
    fn num_agents(&self) -> usize;

    fn legal_actions(&self, agent: usize) -> Vec<Action>;

    /// State after `agent` performs `action`. The agent may end up between
    /// two cells on engines with sub-cell movement.
    fn successor(&self, agent: usize, action: Action) -> Self;

    fn agent_state(&self, agent: usize) -> &AgentState;

    fn food(&self, team: Team) -> Vec<Cell>;

    fn capsules(&self, team: Team) -> Vec<Cell>;

    fn score(&self, team: Team) -> i32;

    fn width(&self) -> i32;

    fn height(&self) -> i32;

    fn has_wall(&self, cell: Cell) -> bool;

    fn opponents(&self, team: Team) -> Vec<usize> {
        (0..self.num_agents())
            .filter(|&i| Team::of_agent(i) != team)
            .collect()
    }

    fn agent_position(&self, agent: usize) -> Option<Point> {
        self.agent_state(agent).position
    }
}
