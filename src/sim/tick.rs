//! Fixed-step simulation tick
//!
//! One call advances a playing session by exactly one display frame. There is
//! no delta-time scaling: the driver is expected to call this at a steady rate.

use super::collision::{Collision, detect};
use super::spawn::maybe_spawn;
use super::state::SimState;
use crate::consts::*;

/// What happened during a tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickOutcome {
    /// Obstacles cleared this tick
    pub scored: u32,
    /// Whether an obstacle was spawned
    pub spawned: bool,
    /// Terminal collision, at most one per tick
    pub collision: Option<Collision>,
}

impl TickOutcome {
    #[inline]
    pub fn is_terminal(&self) -> bool {
        self.collision.is_some()
    }
}

/// Advance the session by one tick at timestamp `now_ms`
pub fn tick(state: &mut SimState, now_ms: f64) -> TickOutcome {
    let mut outcome = TickOutcome::default();
    state.time_ticks += 1;

    // Gravity, then position
    state.body.integrate();

    outcome.spawned = maybe_spawn(state, now_ms);

    let speed = state.profile().speed;
    for obstacle in &mut state.obstacles {
        obstacle.x += speed;
    }

    // Score before pruning so nothing leaves the list unscored
    outcome.scored = score_passed(state);

    state.obstacles.retain(|ob| ob.is_live());

    outcome.collision = detect(&state.body, &state.obstacles);
    outcome
}

/// Flag every obstacle whose trailing edge is behind the body and count it once
pub fn score_passed(state: &mut SimState) -> u32 {
    let mut scored = 0;
    for obstacle in state
        .obstacles
        .iter_mut()
        .filter(|ob| !ob.passed && ob.right() < BODY_X)
    {
        obstacle.passed = true;
        scored += 1;
    }
    state.score += scored;
    scored
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use crate::sim::state::{Body, Difficulty, Obstacle};

    #[test]
    fn test_gravity_applies_before_position() {
        let mut state = SimState::new(1, Difficulty::Easy);
        tick(&mut state, 0.0);
        assert_eq!(state.body.vel, GRAVITY);
        assert_eq!(state.body.y, BODY_START_Y + GRAVITY);

        tick(&mut state, 16.0);
        assert_eq!(state.body.vel, 2.0 * GRAVITY);
        assert_eq!(state.body.y, BODY_START_Y + 3.0 * GRAVITY);
    }

    #[test]
    fn test_jump_then_tick() {
        let mut state = SimState::new(1, Difficulty::Easy);
        state.body.vel = 6.0;
        state.body.jump();
        tick(&mut state, 0.0);
        assert_eq!(state.body.vel, JUMP_VELOCITY + GRAVITY);
        assert_eq!(state.body.y, BODY_START_Y + JUMP_VELOCITY + GRAVITY);
    }

    #[test]
    fn test_obstacles_advance_by_speed() {
        let mut state = SimState::new(1, Difficulty::Hard);
        state.obstacles.push(Obstacle::new(200.0, 200.0, 120.0));
        tick(&mut state, 0.0);
        assert_eq!(state.obstacles[0].x, 198.0);
    }

    #[test]
    fn test_spawn_moves_on_spawn_tick() {
        let mut state = SimState::new(1, Difficulty::Medium);
        let outcome = tick(&mut state, 1801.0);
        assert!(outcome.spawned);
        assert_eq!(state.obstacles.len(), 1);
        assert_eq!(state.obstacles[0].x, PLAYFIELD_WIDTH - 1.5);
    }

    #[test]
    fn test_offscreen_obstacles_pruned() {
        let mut state = SimState::new(1, Difficulty::Hard);
        // Right edge lands exactly on 0 after this tick
        let mut gone = Obstacle::new(-OBSTACLE_WIDTH + 2.0, 200.0, 120.0);
        gone.passed = true;
        let mut kept = Obstacle::new(-OBSTACLE_WIDTH + 2.5, 200.0, 120.0);
        kept.passed = true;
        state.obstacles.push(gone);
        state.obstacles.push(kept);

        tick(&mut state, 0.0);
        assert_eq!(state.obstacles.len(), 1);
        assert_eq!(state.obstacles[0].x, -OBSTACLE_WIDTH + 0.5);
    }

    #[test]
    fn test_scores_once_when_trailing_edge_passes() {
        let mut state = SimState::new(1, Difficulty::Hard);
        // Right edge at 61 -> 59 after one tick
        state
            .obstacles
            .push(Obstacle::new(BODY_X + 1.0 - OBSTACLE_WIDTH, 200.0, 120.0));

        let outcome = tick(&mut state, 0.0);
        assert_eq!(outcome.scored, 1);
        assert_eq!(state.score, 1);
        assert!(state.obstacles[0].passed);

        let outcome = tick(&mut state, 16.0);
        assert_eq!(outcome.scored, 0);
        assert_eq!(state.score, 1);
    }

    #[test]
    fn test_trailing_edge_on_body_not_scored() {
        let mut state = SimState::new(1, Difficulty::Hard);
        state
            .obstacles
            .push(Obstacle::new(BODY_X + 2.0 - OBSTACLE_WIDTH, 200.0, 120.0));
        // Right edge lands exactly on BODY_X: not yet behind
        tick(&mut state, 0.0);
        assert_eq!(state.score, 0);
    }

    #[test]
    fn test_floor_is_terminal() {
        let mut state = SimState::new(1, Difficulty::Easy);
        state.body = Body {
            y: PLAYFIELD_HEIGHT - BODY_HEIGHT - GRAVITY,
            vel: 0.0,
        };
        let outcome = tick(&mut state, 0.0);
        assert_eq!(outcome.collision, Some(Collision::Floor));
        assert!(outcome.is_terminal());
    }

    #[test]
    fn test_free_fall_eventually_hits_floor() {
        let mut state = SimState::new(5, Difficulty::Easy);
        let mut ticks = 0;
        loop {
            ticks += 1;
            if tick(&mut state, 0.0).is_terminal() {
                break;
            }
            assert!(ticks < 1000, "body never reached the floor");
        }
        assert!(state.body.bottom() >= PLAYFIELD_HEIGHT);
    }

    proptest! {
        #[test]
        fn prop_velocity_grows_by_gravity(y in 100.0f32..300.0, vel in -8.0f32..4.0) {
            let mut state = SimState::new(1, Difficulty::Easy);
            state.body = Body { y, vel };
            tick(&mut state, 0.0);
            let expected_vel = vel + GRAVITY;
            prop_assert_eq!(state.body.vel, expected_vel);
            prop_assert_eq!(state.body.y, y + expected_vel);
        }

        #[test]
        fn prop_jump_ignores_prior_velocity(vel in -20.0f32..20.0) {
            let mut body = Body { y: 200.0, vel };
            body.jump();
            prop_assert_eq!(body.vel, JUMP_VELOCITY);
        }

        #[test]
        fn prop_each_obstacle_scores_once(seed in any::<u64>(), frames in 200u32..3000) {
            let mut state = SimState::new(seed, Difficulty::Easy);
            let mut spawned = 0;
            let mut scored = 0;
            for i in 1..=frames {
                let outcome = tick(&mut state, i as f64 * 1000.0 / 60.0);
                spawned += outcome.spawned as u32;
                scored += outcome.scored;
                prop_assert!(state.obstacles.iter().all(|ob| ob.passed || ob.right() >= BODY_X));
            }
            // Pruned obstacles were all passed; live unpassed ones are still ahead
            let pending = state.obstacles.iter().filter(|ob| !ob.passed).count() as u32;
            prop_assert_eq!(scored, state.score);
            prop_assert_eq!(state.score, spawned - pending);
        }
    }
}
