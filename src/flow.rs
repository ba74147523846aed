//! Game-flow state machine
//!
//! Exactly one [`GamePhase`] is active. Input arrives as [`Command`]s which are
//! queued by [`Game::handle_input`] and applied at the start of the next
//! [`Game::tick`], so a tick never observes a half-applied input. Commands that
//! make no sense in the current phase are dropped.

use std::collections::VecDeque;

use crate::consts::MAX_NAME_LEN;
use crate::persistence::Storage;
use crate::profiles::{ProfileError, ProfileStore};
use crate::sim::{Aabb, Difficulty, Obstacle, SimState, TickOutcome, tick};

/// Current phase of the game
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GamePhase {
    /// Create / select / leaderboard menu
    ProfileMenu,
    /// Typing a new profile name
    CreateProfile {
        draft: String,
        /// Last validation failure, shown until the draft changes
        error: Option<ProfileError>,
    },
    /// Picking an existing profile
    SelectProfile,
    /// Read-only high score table
    Leaderboard,
    /// Difficulty selection
    Start,
    /// Active gameplay
    Playing,
    /// Session ended
    GameOver {
        final_score: u32,
        /// Best score for the active profile (or this visit, for guests)
        best: u32,
        new_best: bool,
    },
}

impl GamePhase {
    pub fn name(&self) -> &'static str {
        match self {
            GamePhase::ProfileMenu => "ProfileMenu",
            GamePhase::CreateProfile { .. } => "CreateProfile",
            GamePhase::SelectProfile => "SelectProfile",
            GamePhase::Leaderboard => "Leaderboard",
            GamePhase::Start => "Start",
            GamePhase::Playing => "Playing",
            GamePhase::GameOver { .. } => "GameOver",
        }
    }

    pub fn is_playing(&self) -> bool {
        matches!(self, GamePhase::Playing)
    }
}

/// Input commands (keyboard, pointer, touch all map onto these)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Space / tap / click on no particular button
    Press,
    OpenCreateProfile,
    OpenSelectProfile,
    OpenLeaderboard,
    /// Play without a profile
    SkipProfiles,
    Back,
    TypeChar(char),
    Backspace,
    SubmitName,
    /// Index into the profile list (creation order)
    ChooseProfile(usize),
    ChooseDifficulty(Difficulty),
    /// Play again at the same difficulty
    Restart,
    MainMenu,
}

/// Everything a presentation layer needs to draw one frame
#[derive(Debug, Clone)]
pub struct FrameView<'a> {
    pub phase: &'a GamePhase,
    pub body: Aabb,
    pub obstacles: &'a [Obstacle],
    pub score: u32,
    pub difficulty: Difficulty,
    pub active_profile: Option<&'a str>,
    pub high_score: Option<u32>,
}

/// Game instance: phase, simulation, and the profile store
pub struct Game<S: Storage> {
    phase: GamePhase,
    sim: SimState,
    store: ProfileStore<S>,
    active_profile: Option<String>,
    profiles_enabled: bool,
    /// Commands waiting for the next tick
    pending: VecDeque<Command>,
    /// Best score this visit when playing without a profile
    guest_best: u32,
}

impl<S: Storage> Game<S> {
    pub fn new(seed: u64, store: ProfileStore<S>, profiles_enabled: bool) -> Self {
        let phase = if profiles_enabled {
            GamePhase::ProfileMenu
        } else {
            GamePhase::Start
        };
        log::info!("Game created (seed {}, initial phase {})", seed, phase.name());
        Self {
            phase,
            sim: SimState::new(seed, Difficulty::default()),
            store,
            active_profile: None,
            profiles_enabled,
            pending: VecDeque::new(),
            guest_best: 0,
        }
    }

    /// Preselect the difficulty highlighted on the start screen
    pub fn with_difficulty(mut self, difficulty: Difficulty) -> Self {
        self.sim.difficulty = difficulty;
        self
    }

    pub fn phase(&self) -> &GamePhase {
        &self.phase
    }

    pub fn sim(&self) -> &SimState {
        &self.sim
    }

    pub fn store(&self) -> &ProfileStore<S> {
        &self.store
    }

    pub fn active_profile(&self) -> Option<&str> {
        self.active_profile.as_deref()
    }

    pub fn profiles_enabled(&self) -> bool {
        self.profiles_enabled
    }

    /// Best score shown next to the active player
    pub fn best_score(&self) -> Option<u32> {
        match &self.active_profile {
            Some(name) => self.store.get(name).map(|p| p.high_score),
            None => Some(self.guest_best),
        }
    }

    /// Queue a command for the next tick
    pub fn handle_input(&mut self, cmd: Command) {
        self.pending.push_back(cmd);
    }

    /// Number of commands waiting for the next tick
    pub fn pending_inputs(&self) -> usize {
        self.pending.len()
    }

    /// Apply queued input, then advance the simulation if playing.
    ///
    /// Returns the simulation outcome when a play step ran.
    pub fn tick(&mut self, now_ms: f64) -> Option<TickOutcome> {
        while let Some(cmd) = self.pending.pop_front() {
            if !self.apply(cmd) {
                log::debug!("Ignored {:?} in {}", cmd, self.phase.name());
            }
        }

        if !self.phase.is_playing() {
            return None;
        }

        let outcome = tick(&mut self.sim, now_ms);
        if outcome.is_terminal() {
            log::info!("Terminal collision: {:?}", outcome.collision);
            self.game_over();
        }
        Some(outcome)
    }

    /// Snapshot for rendering
    pub fn view(&self) -> FrameView<'_> {
        FrameView {
            phase: &self.phase,
            body: self.sim.body.aabb(),
            obstacles: &self.sim.obstacles,
            score: self.sim.score,
            difficulty: self.sim.difficulty,
            active_profile: self.active_profile.as_deref(),
            high_score: self.best_score(),
        }
    }

    fn set_phase(&mut self, phase: GamePhase) {
        log::info!("Phase: {} -> {}", self.phase.name(), phase.name());
        self.phase = phase;
    }

    /// Where "main menu" leads
    fn menu_phase(&self) -> GamePhase {
        if self.profiles_enabled {
            GamePhase::ProfileMenu
        } else {
            GamePhase::Start
        }
    }

    /// Apply one command. Returns false if it does not apply to this phase.
    fn apply(&mut self, cmd: Command) -> bool {
        match self.phase {
            GamePhase::ProfileMenu => self.apply_profile_menu(cmd),
            GamePhase::CreateProfile { .. } => self.apply_create_profile(cmd),
            GamePhase::SelectProfile => self.apply_select_profile(cmd),
            GamePhase::Leaderboard => match cmd {
                Command::Back | Command::Press => {
                    self.set_phase(GamePhase::ProfileMenu);
                    true
                }
                _ => false,
            },
            GamePhase::Start => match cmd {
                Command::ChooseDifficulty(difficulty) => {
                    self.start_session(difficulty);
                    true
                }
                Command::Back if self.profiles_enabled => {
                    self.set_phase(GamePhase::ProfileMenu);
                    true
                }
                _ => false,
            },
            GamePhase::Playing => match cmd {
                Command::Press => {
                    self.sim.body.jump();
                    true
                }
                _ => false,
            },
            GamePhase::GameOver { .. } => match cmd {
                Command::Restart => {
                    self.start_session(self.sim.difficulty);
                    true
                }
                Command::MainMenu => {
                    let next = self.menu_phase();
                    self.set_phase(next);
                    true
                }
                _ => false,
            },
        }
    }

    fn apply_profile_menu(&mut self, cmd: Command) -> bool {
        match cmd {
            Command::OpenCreateProfile => self.set_phase(GamePhase::CreateProfile {
                draft: String::new(),
                error: None,
            }),
            Command::OpenSelectProfile if !self.store.is_empty() => {
                self.set_phase(GamePhase::SelectProfile)
            }
            Command::OpenLeaderboard => self.set_phase(GamePhase::Leaderboard),
            Command::SkipProfiles => {
                self.active_profile = None;
                self.set_phase(GamePhase::Start);
            }
            _ => return false,
        }
        true
    }

    fn apply_create_profile(&mut self, cmd: Command) -> bool {
        match cmd {
            Command::TypeChar(c) => {
                let GamePhase::CreateProfile { draft, error } = &mut self.phase else {
                    return false;
                };
                if c.is_control() || draft.chars().count() >= MAX_NAME_LEN {
                    return false;
                }
                draft.push(c);
                *error = None;
                true
            }
            Command::Backspace => {
                let GamePhase::CreateProfile { draft, error } = &mut self.phase else {
                    return false;
                };
                *error = None;
                draft.pop().is_some()
            }
            Command::SubmitName => {
                let GamePhase::CreateProfile { draft, .. } = &self.phase else {
                    return false;
                };
                let draft = draft.clone();
                match self.store.create(&draft) {
                    Ok(profile) => {
                        self.active_profile = Some(profile.name.clone());
                        self.set_phase(GamePhase::Start);
                    }
                    Err(e) => {
                        log::info!("Profile rejected: {}", e);
                        if let GamePhase::CreateProfile { error, .. } = &mut self.phase {
                            *error = Some(e);
                        }
                    }
                }
                true
            }
            Command::Back => {
                self.set_phase(GamePhase::ProfileMenu);
                true
            }
            _ => false,
        }
    }

    fn apply_select_profile(&mut self, cmd: Command) -> bool {
        match cmd {
            Command::ChooseProfile(index) => {
                let Some(profile) = self.store.list().get(index) else {
                    return false;
                };
                log::info!("Selected profile '{}'", profile.name);
                self.active_profile = Some(profile.name.clone());
                self.set_phase(GamePhase::Start);
                true
            }
            Command::Back => {
                self.set_phase(GamePhase::ProfileMenu);
                true
            }
            _ => false,
        }
    }

    /// Reset the simulation and enter `Playing` with the given difficulty
    fn start_session(&mut self, difficulty: Difficulty) {
        self.sim.reset(difficulty);
        log::info!(
            "Session start: {} (profile: {})",
            difficulty.as_str(),
            self.active_profile.as_deref().unwrap_or("guest")
        );
        self.set_phase(GamePhase::Playing);
    }

    /// Snapshot the score and update the high score
    fn game_over(&mut self) {
        let final_score = self.sim.score;

        let profile_best = self.active_profile.as_deref().and_then(|name| {
            match self.store.record_score(name, final_score) {
                Ok(new_best) => self
                    .store
                    .get(name)
                    .map(|p| (p.high_score, new_best)),
                Err(e) => {
                    log::warn!("Score not recorded: {}", e);
                    None
                }
            }
        });

        let (best, new_best) = profile_best.unwrap_or_else(|| {
            let new_best = final_score > self.guest_best;
            self.guest_best = self.guest_best.max(final_score);
            (self.guest_best, new_best)
        });

        log::info!(
            "Game over: score {} (best {}{})",
            final_score,
            best,
            if new_best { ", new best" } else { "" }
        );
        self.set_phase(GamePhase::GameOver {
            final_score,
            best,
            new_best,
        });
    }
}
