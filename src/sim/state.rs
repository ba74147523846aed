//! Game state and core simulation types
//!
//! Everything that changes from tick to tick during a session lives in
//! [`SimState`], which is owned by the game and passed by `&mut` into each tick.

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::collision::Aabb;
use crate::consts::*;

/// Difficulty tiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Difficulty {
    Easy,
    Medium,
    #[default]
    Hard,
}

/// Immutable per-session tuning selected by a [`Difficulty`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DifficultyProfile {
    /// Vertical gap height between the two obstacle segments
    pub gap: f32,
    /// Horizontal obstacle speed (pixels/tick, negative = leftward)
    pub speed: f32,
    /// Minimum elapsed time between spawns (ms)
    pub spawn_interval_ms: f64,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    pub fn profile(&self) -> DifficultyProfile {
        match self {
            Difficulty::Easy => DifficultyProfile {
                gap: 150.0,
                speed: -1.2,
                spawn_interval_ms: 2200.0,
            },
            Difficulty::Medium => DifficultyProfile {
                gap: 120.0,
                speed: -1.5,
                spawn_interval_ms: 1800.0,
            },
            Difficulty::Hard => DifficultyProfile {
                gap: 120.0,
                speed: -2.0,
                spawn_interval_ms: 1500.0,
            },
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
        }
    }
}

/// The player-controlled body. Horizontal position and size are fixed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Body {
    /// Top edge
    pub y: f32,
    /// Vertical velocity (pixels/tick, positive = down)
    pub vel: f32,
}

impl Default for Body {
    fn default() -> Self {
        Self {
            y: BODY_START_Y,
            vel: 0.0,
        }
    }
}

impl Body {
    #[inline]
    pub fn top(&self) -> f32 {
        self.y
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.y + BODY_HEIGHT
    }

    pub fn aabb(&self) -> Aabb {
        Aabb::new(BODY_X, self.y, BODY_WIDTH, BODY_HEIGHT)
    }

    /// Override velocity with the jump impulse
    pub fn jump(&mut self) {
        self.vel = JUMP_VELOCITY;
    }

    /// One step of constant-acceleration motion: velocity first, then position
    pub fn integrate(&mut self) {
        self.vel += GRAVITY;
        self.y += self.vel;
    }
}

/// A gated obstacle: a top segment and a bottom segment with a gap between
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Obstacle {
    /// Left edge
    pub x: f32,
    /// Top of the gap
    pub gap_y: f32,
    /// Gap height (fixed for the session)
    pub gap: f32,
    pub top_height: f32,
    pub bottom_height: f32,
    /// Set once the body has cleared this obstacle
    pub passed: bool,
}

impl Obstacle {
    pub fn new(x: f32, gap_y: f32, gap: f32) -> Self {
        Self {
            x,
            gap_y,
            gap,
            top_height: gap_y,
            bottom_height: PLAYFIELD_HEIGHT - gap_y - gap,
            passed: false,
        }
    }

    /// Trailing edge
    #[inline]
    pub fn right(&self) -> f32 {
        self.x + OBSTACLE_WIDTH
    }

    /// Bottom of the gap
    #[inline]
    pub fn gap_bottom(&self) -> f32 {
        self.gap_y + self.gap
    }

    pub fn top_aabb(&self) -> Aabb {
        Aabb::new(self.x, 0.0, OBSTACLE_WIDTH, self.top_height)
    }

    pub fn bottom_aabb(&self) -> Aabb {
        Aabb::new(self.x, self.gap_bottom(), OBSTACLE_WIDTH, self.bottom_height)
    }

    /// Still (partly) on screen
    #[inline]
    pub fn is_live(&self) -> bool {
        self.right() > 0.0
    }
}

/// Per-session simulation state
#[derive(Debug, Clone)]
pub struct SimState {
    pub rng: Pcg32,
    pub difficulty: Difficulty,
    pub body: Body,
    /// Live obstacles in spawn order
    pub obstacles: Vec<Obstacle>,
    pub score: u32,
    /// Timestamp (ms) of the last spawn
    pub last_spawn_ms: f64,
    /// Ticks simulated this session
    pub time_ticks: u64,
}

impl SimState {
    pub fn new(seed: u64, difficulty: Difficulty) -> Self {
        Self {
            rng: Pcg32::seed_from_u64(seed),
            difficulty,
            body: Body::default(),
            obstacles: Vec::new(),
            score: 0,
            last_spawn_ms: 0.0,
            time_ticks: 0,
        }
    }

    /// Start a fresh session. The RNG keeps running so consecutive sessions differ.
    pub fn reset(&mut self, difficulty: Difficulty) {
        self.difficulty = difficulty;
        self.body = Body::default();
        self.obstacles.clear();
        self.score = 0;
        self.last_spawn_ms = 0.0;
        self.time_ticks = 0;
    }

    #[inline]
    pub fn profile(&self) -> DifficultyProfile {
        self.difficulty.profile()
    }
}
