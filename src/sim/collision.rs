//! Collision detection for axis-aligned boxes
//!
//! The body never rotates and obstacles are rectangles, so every test here is
//! an exact comparison of box edges. Touching an obstacle segment or the floor
//! counts as a hit.

use glam::Vec2;

use super::state::{Body, Obstacle};
use crate::consts::*;

/// Axis-aligned bounding box (y grows downward)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec2,
    pub max: Vec2,
}

impl Aabb {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            min: Vec2::new(x, y),
            max: Vec2::new(x + width, y + height),
        }
    }

    #[inline]
    pub fn width(&self) -> f32 {
        self.max.x - self.min.x
    }

    #[inline]
    pub fn height(&self) -> f32 {
        self.max.y - self.min.y
    }

    pub fn center(&self) -> Vec2 {
        (self.min + self.max) * 0.5
    }

    /// Horizontal spans overlap. Boxes that only share an edge do not.
    #[inline]
    pub fn overlaps_x(&self, other: &Aabb) -> bool {
        self.min.x < other.max.x && self.max.x > other.min.x
    }

    /// Strictly inside (pointer hit-testing)
    pub fn contains(&self, p: Vec2) -> bool {
        p.x > self.min.x && p.x < self.max.x && p.y > self.min.y && p.y < self.max.y
    }
}

/// What ended the session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collision {
    Floor,
    Ceiling,
    /// Index into the live obstacle list
    Obstacle(usize),
}

/// Body against the playfield bounds
pub fn boundary_collision(body: &Body) -> Option<Collision> {
    if body.bottom() >= PLAYFIELD_HEIGHT {
        Some(Collision::Floor)
    } else if body.top() < 0.0 {
        Some(Collision::Ceiling)
    } else {
        None
    }
}

/// Body against a single obstacle
pub fn obstacle_collision(body: &Body, obstacle: &Obstacle) -> bool {
    let span = Aabb::new(obstacle.x, 0.0, OBSTACLE_WIDTH, PLAYFIELD_HEIGHT);
    if !body.aabb().overlaps_x(&span) {
        return false;
    }
    body.top() <= obstacle.gap_y || body.bottom() >= obstacle.gap_bottom()
}

/// First terminal collision this tick, if any.
///
/// Bounds are checked before obstacles; several overlapping obstacles still
/// produce a single verdict.
pub fn detect(body: &Body, obstacles: &[Obstacle]) -> Option<Collision> {
    boundary_collision(body).or_else(|| {
        obstacles
            .iter()
            .position(|ob| obstacle_collision(body, ob))
            .map(Collision::Obstacle)
    })
}
