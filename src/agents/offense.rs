//! Features of the forager: eat enemy food, avoid defenders, bank what it
//! carries, and hunt invaders once the team is comfortably ahead.

use crate::actions::Action;
use crate::agents::lookahead::{grid_successor, Opponents};
use crate::agents::memory::MemoryTrail;
use crate::config::PolicyConfig;
use crate::features::{Feature, FeatureVector};
use crate::game_state::{CaptureState, Team};
use crate::grid::Cell;
use crate::pathfinding::{min_distance, MazeDistance};

const EAT_FOOD_BONUS: f64 = 10.0;
const CARRY_DANGER_SCALE: f64 = 1.2;
/// Successors with at most this many non-Stop moves count as dead ends.
const ESCAPE_ROUTES: usize = 2;
/// A normal defender closer than this makes the return urgent.
const DANGER_RADIUS: u32 = 4;
const BANKING_BONUS: usize = 3;
const LOSING_URGENCY: f64 = 3.0;
const URGENCY: f64 = 1.5;

pub fn offense_features<S, D>(
    state: &S,
    agent: usize,
    action: Action,
    trail: &MemoryTrail,
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

    let score = successor.score(team);
    features.set(Feature::Score, score as f64);

    let food = successor.food(team);
    if state.food(team).len() > food.len() {
        features.set(Feature::DistanceToFood, 0.0);
        features.set(Feature::EatFood, EAT_FOOD_BONUS);
    } else if let Some(d) = min_distance(distancer, position, food.iter().copied()) {
        features.set(Feature::DistanceToFood, d as f64);
    }

    let opponents = Opponents::observe(&successor, team);
    let invader_distance = min_distance(distancer, position, opponents.invaders.iter().copied());
    if let Some(d) = invader_distance {
        if !me.is_pacman {
            features.set(Feature::InvaderDistance, d as f64);
        }
    }
    if let Some(d) = min_distance(distancer, position, opponents.scared_defenders.iter().copied()) {
        features.set(Feature::ScaredDefenderDistance, d as f64);
    }
    let defender_distance =
        min_distance(distancer, position, opponents.normal_defenders.iter().copied());
    if let Some(d) = defender_distance {
        features.set(Feature::NormalDefenderDistance, d as f64);
        if me.num_carrying > 0 {
            features.scale(
                Feature::NormalDefenderDistance,
                me.num_carrying as f64 * CARRY_DANGER_SCALE,
            );
        }
        let capsules = successor.capsules(team);
        if let Some(d) = min_distance(distancer, position, capsules.iter().copied()) {
            features.set(Feature::DistanceToCapsule, d as f64);
        }
    }

    if action.is_stop() {
        features.set(Feature::Stop, 1.0);
    }
    if action == state.agent_state(agent).direction.reverse() {
        features.set(Feature::Reverse, 1.0);
    }
    if trail.visited_recently(position, policy.revisit_window) {
        features.set(Feature::Revisit, 1.0);
    }

    let escape_routes = successor
        .legal_actions(agent)
        .into_iter()
        .filter(|a| !a.is_stop())
        .count();
    features.set(
        Feature::LimitedEscape,
        if escape_routes <= ESCAPE_ROUTES { 1.0 } else { 0.0 },
    );

    if me.is_pacman && me.num_carrying > 0 {
        let x = team.boundary_column(state.width());
        let boundary = (0..state.height())
            .map(|y| Cell::new(x, y))
            .filter(|&cell| !state.has_wall(cell));
        if let Some(d) = min_distance(distancer, position, boundary) {
            let carried = me.num_carrying as f64;
            let in_danger = defender_distance.is_some_and(|d| d < DANGER_RADIUS);
            let factor = if me.num_carrying as usize >= BANKING_BONUS || in_danger {
                if state.score(team) < 0 {
                    carried * LOSING_URGENCY
                } else {
                    carried * URGENCY
                }
            } else {
                carried
            };
            features.set(Feature::ReturnWithFood, d as f64 * factor);
        }
    }

    features.set(Feature::Defensive, 0.0);
    if score >= policy.defensive_score_threshold && !me.is_pacman {
        if let Some(d) = invader_distance {
            features.set(Feature::Defensive, 1.0);
            let chase = 1.0 / (1.0 + d as f64);
            if me.is_scared() {
                features.set(Feature::ScaredOfInvader, 1.0);
                if d < policy.keep_away_distance {
                    features.set(Feature::DistanceToInvader, policy.keep_away_distance as f64);
                } else {
                    features.set(Feature::InvaderChase, chase);
                }
            } else {
                features.set(Feature::InvaderChase, chase);
            }
        }
    }

    features
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agents::lookahead::testing::HalfStepGame;
    use crate::config::MatchConfig;
    use crate::game_mechanics::CaptureGame;
    use crate::grid::Layout;
    use crate::pathfinding::MazeDistancer;

    /// Width 10, red home x <= 4, blue home x >= 5.
    const ARENA: &str = "
%%%%%%%%%%
%1  . .  %
% %%  %% %
%o  . . 2%
%%%%%%%%%%
";

    fn arena() -> (CaptureGame, MazeDistancer) {
        let layout = Layout::parse(ARENA).unwrap();
        let distancer = MazeDistancer::new(&layout);
        let game = CaptureGame::new(layout, MatchConfig::default()).unwrap();
        (game, distancer)
    }

    fn extract(game: &CaptureGame, distancer: &MazeDistancer, action: Action) -> FeatureVector {
        offense_features(
            game,
            0,
            action,
            &MemoryTrail::new(10),
            distancer,
            &PolicyConfig::default(),
        )
    }

    #[test]
    fn test_eating_food_sets_bonus() {
        let (mut game, distancer) = arena();
        game.place_agent(0, Cell::new(5, 3));
        let features = extract(&game, &distancer, Action::East);
        assert_eq!(features.get(Feature::EatFood), 10.0);
        assert!(features.is_set(Feature::DistanceToFood));
        assert_eq!(features.get(Feature::DistanceToFood), 0.0);
    }

    #[test]
    fn test_distance_to_nearest_food() {
        let (game, distancer) = arena();
        // From (2, 3) the closest enemy pellet is (6, 3)
        let features = extract(&game, &distancer, Action::East);
        assert_eq!(features.get(Feature::DistanceToFood), 4.0);
        assert!(!features.is_set(Feature::EatFood));
        assert_eq!(features.get(Feature::Defensive), 0.0);
        assert!(features.is_set(Feature::Defensive));
    }

    #[test]
    fn test_no_food_left_leaves_distance_unset() {
        let (mut game, distancer) = arena();
        game.set_food(&[Cell::new(4, 1)]);
        let features = extract(&game, &distancer, Action::East);
        assert!(!features.is_set(Feature::DistanceToFood));
        assert!(!features.is_set(Feature::EatFood));
    }

    #[test]
    fn test_stop_and_reverse_flags() {
        let (mut game, distancer) = arena();
        game.place_agent(0, Cell::new(2, 3));
        game.agent_mut(0).direction = Action::East;

        let features = extract(&game, &distancer, Action::West);
        assert_eq!(features.get(Feature::Reverse), 1.0);
        assert!(!features.is_set(Feature::Stop));

        let features = extract(&game, &distancer, Action::Stop);
        assert_eq!(features.get(Feature::Stop), 1.0);
        assert!(!features.is_set(Feature::Reverse));
    }

    #[test]
    fn test_stop_reverses_stop() {
        let (game, distancer) = arena();
        let features = extract(&game, &distancer, Action::Stop);
        assert_eq!(features.get(Feature::Stop), 1.0);
        assert_eq!(features.get(Feature::Reverse), 1.0);
    }

    #[test]
    fn test_revisit_uses_recent_trail() {
        let (game, distancer) = arena();
        let mut trail = MemoryTrail::new(10);
        trail.push(Cell::new(2, 3));
        let features = offense_features(
            &game,
            0,
            Action::East,
            &trail,
            &distancer,
            &PolicyConfig::default(),
        );
        assert_eq!(features.get(Feature::Revisit), 1.0);

        for x in 0..5 {
            trail.push(Cell::new(x, 0));
        }
        let features = offense_features(
            &game,
            0,
            Action::East,
            &trail,
            &distancer,
            &PolicyConfig::default(),
        );
        assert!(!features.is_set(Feature::Revisit));
    }

    #[test]
    fn test_limited_escape() {
        let (game, distancer) = arena();
        // (2, 3) is a corridor: only East and West
        let features = extract(&game, &distancer, Action::East);
        assert_eq!(features.get(Feature::LimitedEscape), 1.0);
        assert!(features.is_set(Feature::LimitedEscape));

        // (4, 2) opens north, south and east
        let (mut game, distancer) = arena();
        game.place_agent(0, Cell::new(4, 3));
        let features = extract(&game, &distancer, Action::South);
        assert_eq!(features.get(Feature::LimitedEscape), 0.0);
        assert!(features.is_set(Feature::LimitedEscape));
    }

    #[test]
    fn test_carried_food_scales_defender_distance() {
        let (mut game, distancer) = arena();
        game.place_agent(0, Cell::new(5, 1));
        game.agent_mut(0).num_carrying = 3;
        game.place_agent(1, Cell::new(8, 3));
        game.set_food(&[Cell::new(4, 3)]);

        let features = extract(&game, &distancer, Action::East);
        // East to (6, 1): defender at (8, 3) is 4 away
        assert!((features.get(Feature::NormalDefenderDistance) - 4.0 * 3.0 * 1.2).abs() < 1e-9);
        assert_eq!(features.get(Feature::DistanceToCapsule), 0.0);
        assert!(!features.is_set(Feature::DistanceToCapsule));
    }

    #[test]
    fn test_capsule_distance_only_with_normal_defender() {
        let (mut game, distancer) = arena();
        game.set_capsules(&[Cell::new(8, 3)]);
        game.place_agent(0, Cell::new(5, 1));
        game.place_agent(1, Cell::new(8, 1));
        // Nothing to eat at (6, 1), so nothing is carried after the move
        game.set_food(&[Cell::new(4, 3)]);
        let features = extract(&game, &distancer, Action::East);
        assert_eq!(features.get(Feature::NormalDefenderDistance), 2.0);
        // (6, 1) east along the top row, then down the (8, _) column
        assert_eq!(features.get(Feature::DistanceToCapsule), 4.0);

        game.agent_mut(1).scared_timer = 10;
        let features = extract(&game, &distancer, Action::East);
        assert!(!features.is_set(Feature::NormalDefenderDistance));
        assert!(!features.is_set(Feature::DistanceToCapsule));
        assert_eq!(features.get(Feature::ScaredDefenderDistance), 2.0);
    }

    #[test]
    fn test_eating_on_the_move_scales_defender_distance() {
        let (mut game, distancer) = arena();
        game.place_agent(0, Cell::new(5, 1));
        game.place_agent(1, Cell::new(8, 1));
        // East eats the pellet at (6, 1), so the successor carries one
        let features = extract(&game, &distancer, Action::East);
        assert_eq!(features.get(Feature::EatFood), 10.0);
        assert!((features.get(Feature::NormalDefenderDistance) - 2.0 * 1.2).abs() < 1e-9);
    }

    #[test]
    fn test_return_with_food_factor() {
        let (mut game, distancer) = arena();
        game.place_agent(0, Cell::new(5, 1));
        game.agent_mut(0).num_carrying = 1;
        game.agent_mut(1).scared_timer = 10;
        game.set_food(&[Cell::new(4, 3)]);

        // East to (6, 1): boundary column x = 4, nearest open cell (4, 1) at 2
        let features = extract(&game, &distancer, Action::East);
        assert_eq!(features.get(Feature::ReturnWithFood), 2.0);

        game.agent_mut(0).num_carrying = 3;
        let features = extract(&game, &distancer, Action::East);
        assert_eq!(features.get(Feature::ReturnWithFood), 2.0 * 3.0 * 1.5);

        game.set_red_score(-1);
        let features = extract(&game, &distancer, Action::East);
        assert_eq!(features.get(Feature::ReturnWithFood), 2.0 * 3.0 * 3.0);
    }

    #[test]
    fn test_return_not_set_at_home() {
        let (mut game, distancer) = arena();
        game.agent_mut(0).num_carrying = 2;
        let features = extract(&game, &distancer, Action::East);
        assert!(!features.is_set(Feature::ReturnWithFood));
    }

    #[test]
    fn test_defensive_mode_chases_invader() {
        let (mut game, distancer) = arena();
        game.set_red_score(5);
        game.place_agent(0, Cell::new(1, 1));
        game.place_agent(1, Cell::new(4, 1));

        // East to (2, 1): invader two steps away
        let features = extract(&game, &distancer, Action::East);
        assert_eq!(features.get(Feature::Defensive), 1.0);
        assert_eq!(features.get(Feature::InvaderDistance), 2.0);
        assert!((features.get(Feature::InvaderChase) - 1.0 / 3.0).abs() < 1e-12);
        assert!(!features.is_set(Feature::ScaredOfInvader));
    }

    #[test]
    fn test_defensive_mode_keeps_away_when_scared() {
        let (mut game, distancer) = arena();
        game.set_red_score(6);
        game.place_agent(0, Cell::new(1, 1));
        game.place_agent(1, Cell::new(4, 1));
        game.agent_mut(0).scared_timer = 10;

        let features = extract(&game, &distancer, Action::East);
        assert_eq!(features.get(Feature::Defensive), 1.0);
        assert_eq!(features.get(Feature::ScaredOfInvader), 1.0);
        assert_eq!(features.get(Feature::DistanceToInvader), 3.0);
        assert!(!features.is_set(Feature::InvaderChase));
    }

    #[test]
    fn test_defensive_mode_needs_lead() {
        let (mut game, distancer) = arena();
        game.set_red_score(4);
        game.place_agent(0, Cell::new(1, 1));
        game.place_agent(1, Cell::new(4, 1));
        let features = extract(&game, &distancer, Action::East);
        assert_eq!(features.get(Feature::Defensive), 0.0);
        assert!(!features.is_set(Feature::InvaderChase));
    }

    #[test]
    fn test_extraction_is_pure() {
        let (mut game, distancer) = arena();
        game.place_agent(0, Cell::new(5, 1));
        game.agent_mut(0).num_carrying = 2;
        game.place_agent(1, Cell::new(8, 1));
        let mut trail = MemoryTrail::new(10);
        trail.push(Cell::new(4, 1));
        let policy = PolicyConfig::default();

        for action in game.legal_actions(0) {
            let first = offense_features(&game, 0, action, &trail, &distancer, &policy);
            let second = offense_features(&game, 0, action, &trail, &distancer, &policy);
            assert_eq!(first, second);
        }
        assert_eq!(trail.len(), 1);
    }

    #[test]
    fn test_half_step_engine_is_resolved_to_a_cell() {
        let (game, distancer) = arena();
        let half = HalfStepGame::new(game.clone());
        let policy = PolicyConfig::default();
        let trail = MemoryTrail::new(10);

        let full = offense_features(&game, 0, Action::East, &trail, &distancer, &policy);
        let resolved = offense_features(&half, 0, Action::East, &trail, &distancer, &policy);
        assert_eq!(full, resolved);
    }
}
