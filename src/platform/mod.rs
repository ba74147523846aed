//! Platform abstraction layer
//!
//! The frame driver sits between the display-refresh callback and the game:
//! it owns start/stop of the loop, keeps timestamps monotonic, and tracks FPS.
//! The browser glue in `main.rs` owns the actual `requestAnimationFrame`
//! subscription and cancels it when the driver stops.

use crate::flow::Game;
use crate::persistence::Storage;
use crate::sim::TickOutcome;

/// Frames averaged for the FPS readout
const FPS_WINDOW: usize = 60;

/// Drives one game tick per display refresh
#[derive(Debug, Clone)]
pub struct FrameDriver {
    running: bool,
    last_timestamp: Option<f64>,
    frames: u64,
    frame_times: [f64; FPS_WINDOW],
    frame_index: usize,
    fps: u32,
}

impl Default for FrameDriver {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameDriver {
    /// A stopped driver
    pub fn new() -> Self {
        Self {
            running: false,
            last_timestamp: None,
            frames: 0,
            frame_times: [0.0; FPS_WINDOW],
            frame_index: 0,
            fps: 0,
        }
    }

    pub fn start(&mut self) {
        if !self.running {
            log::info!("Frame driver started");
            self.running = true;
        }
    }

    /// Halt the loop. Frames delivered afterwards are ignored.
    pub fn stop(&mut self) {
        if self.running {
            log::info!("Frame driver stopped after {} frames", self.frames);
            self.running = false;
        }
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn fps(&self) -> u32 {
        self.fps
    }

    pub fn last_timestamp(&self) -> Option<f64> {
        self.last_timestamp
    }

    /// Handle one refresh callback.
    ///
    /// Returns `None` when stopped (the caller must not reschedule), otherwise
    /// `Some` with the game's tick outcome if a play step ran.
    pub fn frame<S: Storage>(
        &mut self,
        game: &mut Game<S>,
        timestamp: f64,
    ) -> Option<Option<TickOutcome>> {
        if !self.running {
            return None;
        }

        let now = match self.last_timestamp {
            Some(last) if timestamp < last => {
                log::debug!("Clock went backwards ({} < {}), clamping", timestamp, last);
                last
            }
            _ => timestamp,
        };
        self.last_timestamp = Some(now);
        self.frames += 1;
        self.record_fps(now);

        Some(game.tick(now))
    }

    fn record_fps(&mut self, now: f64) {
        self.frame_times[self.frame_index] = now;
        self.frame_index = (self.frame_index + 1) % FPS_WINDOW;

        // Oldest sample sits at the next write slot
        let oldest = self.frame_times[self.frame_index];
        if oldest > 0.0 {
            let elapsed = now - oldest;
            if elapsed > 0.0 {
                self.fps = ((FPS_WINDOW as f64 - 1.0) * 1000.0 / elapsed).round() as u32;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flow::{Command, GamePhase};
    use crate::persistence::MemoryStorage;
    use crate::profiles::ProfileStore;
    use crate::sim::Difficulty;

    fn playing_game() -> Game<MemoryStorage> {
        let mut game = Game::new(8, ProfileStore::load(MemoryStorage::new()), false);
        game.handle_input(Command::ChooseDifficulty(Difficulty::Hard));
        game
    }

    #[test]
    fn test_stopped_driver_ignores_frames() {
        let mut driver = FrameDriver::new();
        let mut game = playing_game();
        assert!(driver.frame(&mut game, 16.0).is_none());
        // Input still queued, nothing ran
        assert_eq!(game.pending_inputs(), 1);
        assert_eq!(game.phase(), &GamePhase::Start);
    }

    #[test]
    fn test_running_driver_ticks_game() {
        let mut driver = FrameDriver::new();
        let mut game = playing_game();
        driver.start();
        let outcome = driver.frame(&mut game, 16.0);
        assert!(matches!(outcome, Some(Some(_))));
        assert_eq!(game.phase(), &GamePhase::Playing);
        assert_eq!(game.sim().time_ticks, 1);
        assert_eq!(driver.frames(), 1);
    }

    #[test]
    fn test_stop_halts_further_ticks() {
        let mut driver = FrameDriver::new();
        let mut game = playing_game();
        driver.start();
        driver.frame(&mut game, 16.0);
        driver.stop();
        driver.stop();

        let before = game.sim().body;
        assert!(driver.frame(&mut game, 32.0).is_none());
        assert_eq!(game.sim().body, before);
        assert_eq!(game.sim().time_ticks, 1);
    }

    #[test]
    fn test_timestamps_clamped_monotonic() {
        let mut driver = FrameDriver::new();
        let mut game = playing_game();
        driver.start();
        driver.frame(&mut game, 5000.0);
        driver.frame(&mut game, 4000.0);
        assert_eq!(driver.last_timestamp(), Some(5000.0));
    }

    #[test]
    fn test_fps_estimate() {
        let mut driver = FrameDriver::new();
        let mut game = playing_game();
        driver.start();
        for i in 1..=120 {
            driver.frame(&mut game, i as f64 * 1000.0 / 60.0);
        }
        assert_eq!(driver.fps(), 60);
    }
}
