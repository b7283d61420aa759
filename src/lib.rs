//! Reflex team policy for a two-versus-two capture-the-flag maze game.
//!
//! Each tick an agent scores every legal move by a weighted sum of features
//! of the successor state and plays one of the best. The forager
//! ([`agents::offense`]) eats enemy food and banks it; the guard
//! ([`agents::defense`]) chases invaders and patrols the boundary.
//! [`game_mechanics::CaptureGame`] is a small reference engine to run them.

pub mod actions;
pub mod agents;
pub mod config;
pub mod evaluator;
pub mod features;
pub mod game_mechanics;
pub mod game_runner;
pub mod game_state;
pub mod grid;
pub mod match_writer;
pub mod pathfinding;
pub mod weights;
