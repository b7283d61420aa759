//! Building the agents of a team from role names.

use std::fmt;
use std::str::FromStr;

use anyhow::Result;
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::agents::random_agent::RandomAgent;
use crate::agents::reflex_agent::ReflexAgent;
use crate::agents::ActionSelector;
use crate::config::PolicyConfig;

/// Which reflex policy an agent plays.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RoleKind {
    /// Greedy on the successor score alone.
    Baseline,
    Offense,
    Defense,
}

/// First agent forages, second guards.
pub const DEFAULT_ROLES: [RoleKind; 2] = [RoleKind::Offense, RoleKind::Defense];

impl fmt::Display for RoleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RoleKind::Baseline => "baseline",
            RoleKind::Offense => "offense",
            RoleKind::Defense => "defense",
        };
        write!(f, "{}", name)
    }
}

impl FromStr for RoleKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "offense" | "offensive" | "OffensiveReflexAgent" => Ok(RoleKind::Offense),
            "defense" | "defensive" | "DefensiveReflexAgent" => Ok(RoleKind::Defense),
            "baseline" | "ReflexCaptureAgent" => Ok(RoleKind::Baseline),
            other => anyhow::bail!("Unknown role: {}", other),
        }
    }
}

/// Any agent the match runner can seat.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AgentKind {
    Reflex(RoleKind),
    Random,
}

impl fmt::Display for AgentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AgentKind::Reflex(role) => write!(f, "{}", role),
            AgentKind::Random => write!(f, "random"),
        }
    }
}

impl FromStr for AgentKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "random" | "RandomAgent" => Ok(AgentKind::Random),
            other => Ok(AgentKind::Reflex(other.parse()?)),
        }
    }
}

/// Parse a comma-separated pair such as `offense,defense`.
pub fn parse_pair(s: &str) -> Result<[AgentKind; 2]> {
    let kinds = s
        .split(',')
        .map(|part| part.parse::<AgentKind>())
        .collect::<Result<Vec<AgentKind>>>()?;
    match kinds.as_slice() {
        [first, second] => Ok([*first, *second]),
        _ => anyhow::bail!("Expected two agents separated by a comma, got {:?}", s),
    }
}

/// Per-agent generator: reproducible when a seed is given.
fn agent_rng(seed: Option<u64>, index: usize) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed.wrapping_add(index as u64)),
        None => StdRng::from_entropy(),
    }
}

/// The two reflex agents of one team.
pub fn create_team(
    first_index: usize,
    second_index: usize,
    first: RoleKind,
    second: RoleKind,
    policy: &PolicyConfig,
    seed: Option<u64>,
) -> [ReflexAgent; 2] {
    [
        ReflexAgent::new(first_index, first, policy.clone(), agent_rng(seed, first_index)),
        ReflexAgent::new(second_index, second, policy.clone(), agent_rng(seed, second_index)),
    ]
}

pub fn build_agent(
    index: usize,
    kind: AgentKind,
    policy: &PolicyConfig,
    seed: Option<u64>,
) -> Box<dyn ActionSelector> {
    let rng = agent_rng(seed, index);
    match kind {
        AgentKind::Reflex(role) => Box::new(ReflexAgent::new(index, role, policy.clone(), rng)),
        AgentKind::Random => Box::new(RandomAgent::new(index, rng)),
    }
}

/// Seat red on even indices and blue on odd ones, in index order.
pub fn build_match_agents(
    red: [AgentKind; 2],
    blue: [AgentKind; 2],
    policy: &PolicyConfig,
    seed: Option<u64>,
) -> Vec<Box<dyn ActionSelector>> {
    vec![
        build_agent(0, red[0], policy, seed),
        build_agent(1, blue[0], policy, seed),
        build_agent(2, red[1], policy, seed),
        build_agent(3, blue[1], policy, seed),
    ]
}
