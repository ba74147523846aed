//! Obstacle generation
//!
//! One obstacle per elapsed spawn interval, never more than one per tick.

use rand::Rng;

use super::state::{DifficultyProfile, Obstacle, SimState};
use crate::consts::*;

/// Map a unit sample in `[0, 1)` to a gap anchor (top of the gap).
///
/// Both segments keep at least [`GAP_MARGIN`] of height.
pub fn gap_anchor(unit: f32, gap: f32) -> f32 {
    let usable = (PLAYFIELD_HEIGHT - gap - 2.0 * GAP_MARGIN).max(0.0);
    unit.clamp(0.0, 1.0) * usable + GAP_MARGIN
}

/// Build a new obstacle at the right edge of the playfield
pub fn spawn_obstacle<R: Rng>(rng: &mut R, profile: &DifficultyProfile) -> Obstacle {
    let unit: f32 = rng.random();
    Obstacle::new(PLAYFIELD_WIDTH, gap_anchor(unit, profile.gap), profile.gap)
}

/// Whether the spawn interval has elapsed since the last spawn
#[inline]
pub fn spawn_due(last_spawn_ms: f64, now_ms: f64, profile: &DifficultyProfile) -> bool {
    now_ms - last_spawn_ms > profile.spawn_interval_ms
}

/// Append an obstacle if one is due. Returns true if one was spawned.
///
/// The timer restarts at `now_ms`; missed intervals are not made up.
pub fn maybe_spawn(state: &mut SimState, now_ms: f64) -> bool {
    let profile = state.profile();
    if !spawn_due(state.last_spawn_ms, now_ms, &profile) {
        return false;
    }

    let obstacle = spawn_obstacle(&mut state.rng, &profile);
    log::debug!(
        "Spawned obstacle gap_y={:.1} (tick {})",
        obstacle.gap_y,
        state.time_ticks
    );
    state.obstacles.push(obstacle);
    state.last_spawn_ms = now_ms;
    true
}
