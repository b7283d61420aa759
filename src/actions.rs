use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A single move for one agent on one tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    North,
    South,
    East,
    West,
    Stop,
}

impl Action {
    /// All actions in the order the engine enumerates them.
    pub const ALL: [Action; 5] = [
        Action::North,
        Action::South,
        Action::East,
        Action::West,
        Action::Stop,
    ];

    /// The opposite heading. Stop reverses to itself.
    pub fn reverse(self) -> Action {
        match self {
            Action::North => Action::South,
            Action::South => Action::North,
            Action::East => Action::West,
            Action::West => Action::East,
            Action::Stop => Action::Stop,
        }
    }

    /// Unit displacement `(dx, dy)`. North increases `y`.
    pub fn vector(self) -> (i32, i32) {
        match self {
            Action::North => (0, 1),
            Action::South => (0, -1),
            Action::East => (1, 0),
            Action::West => (-1, 0),
            Action::Stop => (0, 0),
        }
    }

    pub fn is_stop(self) -> bool {
        self == Action::Stop
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Action::North => "North",
            Action::South => "South",
            Action::East => "East",
            Action::West => "West",
            Action::Stop => "Stop",
        };
        f.write_str(name)
    }
}

impl FromStr for Action {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "north" | "n" => Ok(Action::North),
            "south" | "s" => Ok(Action::South),
            "east" | "e" => Ok(Action::East),
            "west" | "w" => Ok(Action::West),
            "stop" => Ok(Action::Stop),
            other => anyhow::bail!("Unknown action: {}", other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reverse_is_an_involution() {
        for action in Action::ALL {
            assert_eq!(action.reverse().reverse(), action);
        }
        assert_eq!(Action::North.reverse(), Action::South);
        assert_eq!(Action::East.reverse(), Action::West);
        assert_eq!(Action::Stop.reverse(), Action::Stop);
    }

    #[test]
    fn test_vectors_cancel_with_reverse() {
        for action in Action::ALL {
            let (dx, dy) = action.vector();
            let (rx, ry) = action.reverse().vector();
            assert_eq!((dx + rx, dy + ry), (0, 0));
        }
    }

    #[test]
    fn test_parse_actions() {
        assert_eq!("North".parse::<Action>().unwrap(), Action::North);
        assert_eq!("w".parse::<Action>().unwrap(), Action::West);
        assert!("up".parse::<Action>().is_err());
    }
}
