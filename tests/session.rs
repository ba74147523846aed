//! Whole-session tests through the public game API

use sky_hopper::consts::*;
use sky_hopper::persistence::{MemoryStorage, Storage};
use sky_hopper::platform::FrameDriver;
use sky_hopper::profiles::STORAGE_KEY;
use sky_hopper::sim::{Difficulty, SimState};
use sky_hopper::{Command, Game, GamePhase, ProfileStore};

const FRAME_MS: f64 = 1000.0 / 60.0;

/// Flap whenever the body sinks below the next gap
fn wants_jump(sim: &SimState) -> bool {
    let target = sim
        .obstacles
        .iter()
        .find(|ob| ob.right() >= BODY_X)
        .map(|ob| ob.gap_bottom() - 10.0)
        .unwrap_or(PLAYFIELD_HEIGHT / 2.0);
    sim.body.vel >= 0.0 && sim.body.bottom() > target
}

/// Frames of assisted flying before the body is left to fall
const ASSIST_FRAMES: u32 = 60 * 20;

/// Drive frames until game over; returns the final score
fn play_out(game: &mut Game<MemoryStorage>, driver: &mut FrameDriver, now: &mut f64) -> u32 {
    for frame in 0..ASSIST_FRAMES + 600 {
        if frame < ASSIST_FRAMES && game.phase().is_playing() && wants_jump(game.sim()) {
            game.handle_input(Command::Press);
        }
        *now += FRAME_MS;
        driver.frame(game, *now);
        if let GamePhase::GameOver { final_score, .. } = game.phase() {
            return *final_score;
        }
    }
    panic!("session never ended");
}

fn create_profile(game: &mut Game<MemoryStorage>, name: &str, now: &mut f64) {
    game.handle_input(Command::OpenCreateProfile);
    for c in name.chars() {
        game.handle_input(Command::TypeChar(c));
    }
    game.handle_input(Command::SubmitName);
    *now += FRAME_MS;
    game.tick(*now);
}

#[test]
fn profile_sessions_keep_best_score() {
    let mut game = Game::new(77, ProfileStore::load(MemoryStorage::new()), true);
    let mut driver = FrameDriver::new();
    driver.start();
    let mut now = 0.0;

    create_profile(&mut game, "Ada", &mut now);
    assert_eq!(game.phase(), &GamePhase::Start);
    assert_eq!(game.active_profile(), Some("Ada"));

    let mut best = 0;
    for difficulty in Difficulty::ALL {
        game.handle_input(Command::ChooseDifficulty(difficulty));
        let score = play_out(&mut game, &mut driver, &mut now);
        let beat = score > best;
        best = best.max(score);

        let GamePhase::GameOver {
            best: shown,
            new_best,
            ..
        } = game.phase().clone()
        else {
            unreachable!()
        };
        assert_eq!(shown, best);
        assert_eq!(new_best, beat);
        assert_eq!(game.store().get("Ada").map(|p| p.high_score), Some(best));

        game.handle_input(Command::MainMenu);
        game.handle_input(Command::OpenSelectProfile);
        game.handle_input(Command::ChooseProfile(0));
        now += FRAME_MS;
        game.tick(now);
        assert_eq!(game.phase(), &GamePhase::Start);
    }
}

#[test]
fn restart_keeps_difficulty_and_resets_run() {
    let mut game = Game::new(5, ProfileStore::load(MemoryStorage::new()), false);
    let mut driver = FrameDriver::new();
    driver.start();
    let mut now = 0.0;

    game.handle_input(Command::ChooseDifficulty(Difficulty::Medium));
    play_out(&mut game, &mut driver, &mut now);

    game.handle_input(Command::Restart);
    now += FRAME_MS;
    driver.frame(&mut game, now);
    assert_eq!(game.phase(), &GamePhase::Playing);
    assert_eq!(game.sim().difficulty, Difficulty::Medium);
    assert_eq!(game.sim().score, 0);
    assert_eq!(game.sim().time_ticks, 1);
}

#[test]
fn profiles_survive_reload() {
    let mut game = Game::new(9, ProfileStore::load(MemoryStorage::new()), true);
    let mut now = 0.0;
    create_profile(&mut game, "Grace", &mut now);
    create_profile(&mut game, "Linus", &mut now);

    // Second create only runs from the profile menu
    assert_eq!(game.store().len(), 1);
    game.handle_input(Command::Back);
    now += FRAME_MS;
    game.tick(now);
    create_profile(&mut game, "Linus", &mut now);
    assert_eq!(game.store().len(), 2);

    let raw = game
        .store()
        .storage()
        .get(STORAGE_KEY)
        .expect("readable")
        .expect("written");
    let reloaded = Game::new(
        10,
        ProfileStore::load(MemoryStorage::new().with_entry(STORAGE_KEY, &raw)),
        true,
    );
    let names: Vec<&str> = reloaded
        .store()
        .list()
        .iter()
        .map(|p| p.name.as_str())
        .collect();
    assert_eq!(names, vec!["Grace", "Linus"]);
}

#[test]
fn guest_play_skips_profiles() {
    let mut game = Game::new(3, ProfileStore::load(MemoryStorage::new()), true);
    let mut driver = FrameDriver::new();
    driver.start();
    let mut now = 0.0;

    game.handle_input(Command::SkipProfiles);
    game.handle_input(Command::ChooseDifficulty(Difficulty::Hard));
    let score = play_out(&mut game, &mut driver, &mut now);

    assert!(game.store().is_empty());
    assert_eq!(game.best_score(), Some(score));
}

#[test]
fn stopped_driver_freezes_session() {
    let mut game = Game::new(1, ProfileStore::load(MemoryStorage::new()), false);
    let mut driver = FrameDriver::new();
    driver.start();

    game.handle_input(Command::ChooseDifficulty(Difficulty::Easy));
    driver.frame(&mut game, FRAME_MS);
    let before = game.sim().clone();

    driver.stop();
    for i in 2..100 {
        game.handle_input(Command::Press);
        assert!(driver.frame(&mut game, i as f64 * FRAME_MS).is_none());
    }
    assert_eq!(game.sim().body, before.body);
    assert_eq!(game.sim().time_ticks, before.time_ticks);
}
