//! Sky Hopper - A side-scrolling gap-dodging arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (physics, spawning, collisions, scoring)
//! - `flow`: Game-flow state machine (menus, play, game over)
//! - `profiles`: Player profiles and leaderboard
//! - `persistence`: Key-value storage backends
//! - `platform`: Frame driver (start/stop, timestamps)
//! - `renderer`: WebGPU rendering pipeline
//! - `ui`: Menu button layout and hit-testing
//! - `settings`: Persisted preferences
//! - `audio`: Web Audio sound effects (wasm only)

#[cfg(target_arch = "wasm32")]
pub mod audio;
pub mod flow;
pub mod persistence;
pub mod platform;
pub mod profiles;
pub mod renderer;
pub mod settings;
pub mod sim;
pub mod ui;

pub use flow::{Command, Game, GamePhase};
pub use profiles::{Profile, ProfileStore};
pub use settings::Settings;

/// Game configuration constants
pub mod consts {
    /// Playfield dimensions (pixels)
    pub const PLAYFIELD_WIDTH: f32 = 320.0;
    pub const PLAYFIELD_HEIGHT: f32 = 480.0;

    /// Body defaults - fixed column, only moves vertically
    pub const BODY_X: f32 = 60.0;
    pub const BODY_WIDTH: f32 = 34.0;
    pub const BODY_HEIGHT: f32 = 24.0;
    pub const BODY_START_Y: f32 = PLAYFIELD_HEIGHT / 2.0;

    /// Velocity added every tick (pixels/tick², positive is down)
    pub const GRAVITY: f32 = 0.5;
    /// Velocity set (not added) by a jump
    pub const JUMP_VELOCITY: f32 = -8.0;

    /// Obstacle span width
    pub const OBSTACLE_WIDTH: f32 = 52.0;
    /// Minimum height of either obstacle segment
    pub const GAP_MARGIN: f32 = 50.0;

    /// Maximum profile name length (chars)
    pub const MAX_NAME_LEN: usize = 16;
    /// Profiles kept in the store; each one gets a digit key on the select screen
    pub const MAX_PROFILES: usize = 8;
}
