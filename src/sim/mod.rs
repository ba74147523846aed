//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed step per display frame
//! - Seeded RNG only
//! - No rendering or platform dependencies

pub mod collision;
pub mod spawn;
pub mod state;
pub mod tick;

pub use collision::{Aabb, Collision, boundary_collision, detect, obstacle_collision};
pub use spawn::{gap_anchor, maybe_spawn, spawn_obstacle};
pub use state::{Body, Difficulty, DifficultyProfile, Obstacle, SimState};
pub use tick::{TickOutcome, score_passed, tick};
