//! Menu layout, text placement and input mapping
//!
//! Everything here is in playfield coordinates (320x480, y down). The
//! renderer draws the button rectangles, the page overlays the labels, and the
//! platform glue turns pointer/keyboard events into [`Command`]s with
//! [`pointer_command`] and [`key_command`].

use glam::Vec2;

use crate::consts::*;
use crate::flow::{Command, FrameView, Game, GamePhase};
use crate::persistence::Storage;
use crate::profiles::{Profile, ProfileError};
use crate::sim::{Aabb, Difficulty};

/// Profiles listed on the select screen / leaderboard
pub const MAX_LISTED: usize = MAX_PROFILES;

const CENTER_X: f32 = PLAYFIELD_WIDTH / 2.0;
const CENTER_Y: f32 = PLAYFIELD_HEIGHT / 2.0;
const BUTTON_HEIGHT: f32 = 30.0;

/// Button fill colour family
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonStyle {
    Go,
    Caution,
    Danger,
    Neutral,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Button {
    pub label: String,
    pub rect: Aabb,
    pub command: Command,
    pub style: ButtonStyle,
    /// Drawn with a highlight border
    pub selected: bool,
}

impl Button {
    fn new(label: &str, x: f32, y: f32, w: f32, command: Command, style: ButtonStyle) -> Self {
        Self {
            label: label.to_string(),
            rect: Aabb::new(x, y, w, BUTTON_HEIGHT),
            command,
            style,
            selected: false,
        }
    }

    fn selected(mut self, selected: bool) -> Self {
        self.selected = selected;
        self
    }
}

/// Text sizes used by the overlay
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextSize {
    Title,
    Large,
    Medium,
    Small,
}

/// A line of centred text
#[derive(Debug, Clone, PartialEq)]
pub struct Label {
    pub text: String,
    pub pos: Vec2,
    pub size: TextSize,
}

impl Label {
    fn new(text: impl Into<String>, x: f32, y: f32, size: TextSize) -> Self {
        Self {
            text: text.into(),
            pos: Vec2::new(x, y),
            size,
        }
    }
}

/// Everything the menus need to lay themselves out
#[derive(Debug, Clone)]
pub struct Screen<'a> {
    pub view: FrameView<'a>,
    /// Creation order
    pub profiles: &'a [Profile],
    /// Descending high score
    pub leaderboard: Vec<&'a Profile>,
    pub profiles_enabled: bool,
}

impl<'a> Screen<'a> {
    pub fn of<S: Storage>(game: &'a Game<S>) -> Self {
        Self {
            view: game.view(),
            profiles: game.store().list(),
            leaderboard: game.store().leaderboard(),
            profiles_enabled: game.profiles_enabled(),
        }
    }
}

fn difficulty_style(difficulty: Difficulty) -> ButtonStyle {
    match difficulty {
        Difficulty::Easy => ButtonStyle::Go,
        Difficulty::Medium => ButtonStyle::Caution,
        Difficulty::Hard => ButtonStyle::Danger,
    }
}

/// Buttons visible in the current phase
pub fn buttons(screen: &Screen) -> Vec<Button> {
    use ButtonStyle::*;

    match screen.view.phase {
        GamePhase::ProfileMenu => {
            let x = CENTER_X - 80.0;
            let mut list = vec![Button::new("New Profile", x, 170.0, 160.0, Command::OpenCreateProfile, Go)];
            if !screen.profiles.is_empty() {
                list.push(Button::new("Select Profile", x, 214.0, 160.0, Command::OpenSelectProfile, Caution));
            }
            list.push(Button::new("Leaderboard", x, 258.0, 160.0, Command::OpenLeaderboard, Neutral));
            list.push(Button::new("Play as Guest", x, 302.0, 160.0, Command::SkipProfiles, Neutral));
            list
        }
        GamePhase::CreateProfile { .. } => vec![
            Button::new("Save", CENTER_X - 120.0, 300.0, 110.0, Command::SubmitName, Go),
            Button::new("Back", CENTER_X + 10.0, 300.0, 110.0, Command::Back, Neutral),
        ],
        GamePhase::SelectProfile => {
            let mut list: Vec<Button> = screen
                .profiles
                .iter()
                .take(MAX_LISTED)
                .enumerate()
                .map(|(i, p)| {
                    Button::new(
                        &p.name,
                        CENTER_X - 100.0,
                        100.0 + i as f32 * 36.0,
                        200.0,
                        Command::ChooseProfile(i),
                        Caution,
                    )
                })
                .collect();
            list.push(Button::new("Back", CENTER_X - 55.0, 420.0, 110.0, Command::Back, Neutral));
            list
        }
        GamePhase::Leaderboard => vec![Button::new(
            "Back",
            CENTER_X - 55.0,
            420.0,
            110.0,
            Command::Back,
            Neutral,
        )],
        GamePhase::Start => {
            let mut list: Vec<Button> = Difficulty::ALL
                .iter()
                .enumerate()
                .map(|(i, &d)| {
                    Button::new(
                        d.as_str(),
                        CENTER_X - 120.0 + i as f32 * 80.0,
                        CENTER_Y - 15.0,
                        80.0,
                        Command::ChooseDifficulty(d),
                        difficulty_style(d),
                    )
                    .selected(d == screen.view.difficulty)
                })
                .collect();
            if screen.profiles_enabled {
                list.push(Button::new("Back", CENTER_X - 55.0, CENTER_Y + 40.0, 110.0, Command::Back, Neutral));
            }
            list
        }
        GamePhase::Playing => Vec::new(),
        GamePhase::GameOver { .. } => vec![
            Button::new("Restart", CENTER_X - 120.0, CENTER_Y + 40.0, 110.0, Command::Restart, Go),
            Button::new("Main Menu", CENTER_X + 10.0, CENTER_Y + 40.0, 110.0, Command::MainMenu, Caution),
        ],
    }
}

/// Fit of the playfield inside a host surface of `width` x `height` pixels,
/// centred with bars on the long axis
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Letterbox {
    pub scale: f32,
    pub offset: Vec2,
}

impl Letterbox {
    pub fn fit(width: f32, height: f32) -> Self {
        let scale = (width / PLAYFIELD_WIDTH).min(height / PLAYFIELD_HEIGHT).max(f32::EPSILON);
        let offset = Vec2::new(
            (width - PLAYFIELD_WIDTH * scale) / 2.0,
            (height - PLAYFIELD_HEIGHT * scale) / 2.0,
        );
        Self { scale, offset }
    }

    /// Host pixel to playfield coordinates
    pub fn to_playfield(&self, p: Vec2) -> Vec2 {
        (p - self.offset) / self.scale
    }

    /// Playfield coordinates to host pixel
    pub fn to_host(&self, p: Vec2) -> Vec2 {
        p * self.scale + self.offset
    }
}

/// Command for the first button containing `p`
pub fn hit_test(buttons: &[Button], p: Vec2) -> Option<Command> {
    buttons.iter().find(|b| b.rect.contains(p)).map(|b| b.command)
}

/// Pointer-down / touch-start at `p`.
///
/// Buttons win; otherwise a tap jumps while playing and dismisses the
/// leaderboard. Taps on empty space in other menus do nothing.
pub fn pointer_command(screen: &Screen, p: Vec2) -> Option<Command> {
    hit_test(&buttons(screen), p).or_else(|| {
        matches!(screen.view.phase, GamePhase::Playing | GamePhase::Leaderboard)
            .then_some(Command::Press)
    })
}

/// Keyboard mapping (`key` is a DOM `KeyboardEvent.key` value)
pub fn key_command(phase: &GamePhase, key: &str) -> Option<Command> {
    match phase {
        GamePhase::CreateProfile { .. } => match key {
            "Enter" => Some(Command::SubmitName),
            "Backspace" => Some(Command::Backspace),
            "Escape" => Some(Command::Back),
            _ => single_char(key).map(Command::TypeChar),
        },
        GamePhase::ProfileMenu => match key {
            "c" | "C" => Some(Command::OpenCreateProfile),
            "s" | "S" => Some(Command::OpenSelectProfile),
            "l" | "L" => Some(Command::OpenLeaderboard),
            "g" | "G" => Some(Command::SkipProfiles),
            _ => None,
        },
        GamePhase::SelectProfile => match key {
            "Escape" => Some(Command::Back),
            _ => single_char(key)
                .and_then(|c| c.to_digit(10))
                .filter(|&d| d >= 1)
                .map(|d| Command::ChooseProfile(d as usize - 1)),
        },
        GamePhase::Leaderboard => match key {
            "Escape" => Some(Command::Back),
            " " | "Enter" => Some(Command::Press),
            _ => None,
        },
        GamePhase::Start => match key {
            "1" | "e" | "E" => Some(Command::ChooseDifficulty(Difficulty::Easy)),
            "2" | "m" | "M" => Some(Command::ChooseDifficulty(Difficulty::Medium)),
            "3" | "h" | "H" => Some(Command::ChooseDifficulty(Difficulty::Hard)),
            "Escape" => Some(Command::Back),
            _ => None,
        },
        GamePhase::Playing => match key {
            " " | "ArrowUp" | "w" | "W" => Some(Command::Press),
            _ => None,
        },
        GamePhase::GameOver { .. } => match key {
            "Enter" | "r" | "R" => Some(Command::Restart),
            "Escape" | "m" | "M" => Some(Command::MainMenu),
            _ => None,
        },
    }
}

fn single_char(key: &str) -> Option<char> {
    let mut chars = key.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Some(c),
        _ => None,
    }
}

fn error_text(error: &ProfileError) -> String {
    match error {
        ProfileError::EmptyName => "Enter a name".to_string(),
        ProfileError::DuplicateName(_) => "Name already taken".to_string(),
        other => other.to_string(),
    }
}

/// Text for the current phase, including button captions
pub fn labels(screen: &Screen) -> Vec<Label> {
    let view = &screen.view;
    let mut out = Vec::new();

    match view.phase {
        GamePhase::ProfileMenu => {
            out.push(Label::new("Sky Hopper", CENTER_X, PLAYFIELD_HEIGHT / 4.0, TextSize::Title));
        }
        GamePhase::CreateProfile { draft, error } => {
            out.push(Label::new("New Profile", CENTER_X, 140.0, TextSize::Large));
            out.push(Label::new(format!("{}_", draft), CENTER_X, 210.0, TextSize::Medium));
            if let Some(error) = error {
                out.push(Label::new(error_text(error), CENTER_X, 255.0, TextSize::Small));
            }
        }
        GamePhase::SelectProfile => {
            out.push(Label::new("Select Profile", CENTER_X, 60.0, TextSize::Large));
        }
        GamePhase::Leaderboard => {
            out.push(Label::new("Leaderboard", CENTER_X, 60.0, TextSize::Large));
            if screen.leaderboard.is_empty() {
                out.push(Label::new("No players yet", CENTER_X, 120.0, TextSize::Small));
            }
            for (i, p) in screen.leaderboard.iter().take(MAX_LISTED).enumerate() {
                out.push(Label::new(
                    format!("{}. {}  {}", i + 1, p.name, p.high_score),
                    CENTER_X,
                    120.0 + i as f32 * 34.0,
                    TextSize::Medium,
                ));
            }
        }
        GamePhase::Start => {
            out.push(Label::new("Sky Hopper", CENTER_X, PLAYFIELD_HEIGHT / 3.0, TextSize::Title));
            out.push(Label::new("Select Difficulty", CENTER_X, CENTER_Y - 50.0, TextSize::Medium));
            if let Some(name) = view.active_profile {
                let best = view.high_score.unwrap_or(0);
                out.push(Label::new(
                    format!("{} - best {}", name, best),
                    CENTER_X,
                    CENTER_Y + 100.0,
                    TextSize::Small,
                ));
            }
        }
        GamePhase::Playing => {
            out.push(Label::new(view.score.to_string(), CENTER_X, 60.0, TextSize::Title));
        }
        GamePhase::GameOver {
            final_score,
            best,
            new_best,
        } => {
            out.push(Label::new("Game Over", CENTER_X, CENTER_Y - 50.0, TextSize::Title));
            out.push(Label::new(format!("Score: {}", final_score), CENTER_X, CENTER_Y, TextSize::Large));
            let best_line = if *new_best {
                format!("New best: {}", best)
            } else {
                format!("Best: {}", best)
            };
            out.push(Label::new(best_line, CENTER_X, CENTER_Y + 100.0, TextSize::Small));
        }
    }

    for button in buttons(screen) {
        let c = button.rect.center();
        out.push(Label::new(button.label, c.x, c.y, TextSize::Small));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStorage;
    use crate::profiles::ProfileStore;

    fn game(enabled: bool) -> Game<MemoryStorage> {
        Game::new(5, ProfileStore::load(MemoryStorage::new()), enabled)
    }

    #[test]
    fn test_difficulty_buttons_match_layout() {
        let g = game(false);
        let screen = Screen::of(&g);
        // Centre of the Easy button
        assert_eq!(
            pointer_command(&screen, Vec2::new(80.0, 240.0)),
            Some(Command::ChooseDifficulty(Difficulty::Easy))
        );
        assert_eq!(
            pointer_command(&screen, Vec2::new(160.0, 240.0)),
            Some(Command::ChooseDifficulty(Difficulty::Medium))
        );
        assert_eq!(
            pointer_command(&screen, Vec2::new(240.0, 240.0)),
            Some(Command::ChooseDifficulty(Difficulty::Hard))
        );
        // Empty space in a menu is not a jump
        assert_eq!(pointer_command(&screen, Vec2::new(160.0, 20.0)), None);
    }

    #[test]
    fn test_select_hidden_without_profiles() {
        let g = game(true);
        let screen = Screen::of(&g);
        let commands: Vec<Command> = buttons(&screen).iter().map(|b| b.command).collect();
        assert!(!commands.contains(&Command::OpenSelectProfile));
        assert!(commands.contains(&Command::OpenCreateProfile));
    }

    #[test]
    fn test_tap_jumps_while_playing() {
        let mut g = game(false);
        g.handle_input(Command::ChooseDifficulty(Difficulty::Easy));
        g.tick(0.0);
        let screen = Screen::of(&g);
        assert!(buttons(&screen).is_empty());
        assert_eq!(
            pointer_command(&screen, Vec2::new(10.0, 10.0)),
            Some(Command::Press)
        );
    }

    #[test]
    fn test_key_mapping() {
        assert_eq!(key_command(&GamePhase::Playing, " "), Some(Command::Press));
        assert_eq!(key_command(&GamePhase::Playing, "x"), None);
        assert_eq!(
            key_command(&GamePhase::Start, "2"),
            Some(Command::ChooseDifficulty(Difficulty::Medium))
        );
        let creating = GamePhase::CreateProfile {
            draft: String::new(),
            error: None,
        };
        assert_eq!(key_command(&creating, " "), Some(Command::TypeChar(' ')));
        assert_eq!(key_command(&creating, "Shift"), None);
        assert_eq!(key_command(&creating, "Enter"), Some(Command::SubmitName));
        assert_eq!(
            key_command(&GamePhase::SelectProfile, "3"),
            Some(Command::ChooseProfile(2))
        );
        assert_eq!(key_command(&GamePhase::SelectProfile, "0"), None);

        let over = GamePhase::GameOver {
            final_score: 3,
            best: 3,
            new_best: true,
        };
        assert_eq!(key_command(&over, " "), None);
        assert_eq!(key_command(&over, "Enter"), Some(Command::Restart));
        assert_eq!(key_command(&over, "r"), Some(Command::Restart));
    }

    #[test]
    fn test_every_listed_profile_is_selectable() {
        let mut store = ProfileStore::load(MemoryStorage::new());
        for i in 0..MAX_PROFILES {
            store.create(&format!("p{}", i)).expect("under the cap");
        }
        let mut g = Game::new(5, store, true);
        g.handle_input(Command::OpenSelectProfile);
        g.tick(0.0);

        let screen = Screen::of(&g);
        let choices: Vec<Command> = buttons(&screen)
            .iter()
            .map(|b| b.command)
            .filter(|c| matches!(c, Command::ChooseProfile(_)))
            .collect();
        assert_eq!(choices.len(), MAX_PROFILES);
        for (i, &choice) in choices.iter().enumerate() {
            let key = (i + 1).to_string();
            assert_eq!(key_command(&GamePhase::SelectProfile, &key), Some(choice));
        }
        for b in buttons(&screen) {
            assert!(b.rect.max.y <= PLAYFIELD_HEIGHT);
        }
    }

    #[test]
    fn test_start_highlights_current_difficulty() {
        let g = Game::new(5, ProfileStore::load(MemoryStorage::new()), false)
            .with_difficulty(Difficulty::Medium);
        let selected: Vec<Command> = buttons(&Screen::of(&g))
            .iter()
            .filter(|b| b.selected)
            .map(|b| b.command)
            .collect();
        assert_eq!(selected, vec![Command::ChooseDifficulty(Difficulty::Medium)]);
    }

    #[test]
    fn test_labels_include_score_and_captions() {
        let mut g = game(false);
        g.handle_input(Command::ChooseDifficulty(Difficulty::Easy));
        g.tick(0.0);
        let labels = labels(&Screen::of(&g));
        assert_eq!(labels.len(), 1);
        assert_eq!(labels[0].text, "0");

        let g = game(false);
        let texts: Vec<String> = labels_of(&g);
        assert!(texts.contains(&"Easy".to_string()));
        assert!(texts.contains(&"Select Difficulty".to_string()));
    }

    #[test]
    fn test_letterbox_maps_pointer_into_playfield() {
        // Twice as wide as tall: bars left and right
        let lb = Letterbox::fit(1280.0, 480.0);
        assert_eq!(lb.scale, 1.0);
        assert_eq!(lb.offset, Vec2::new(480.0, 0.0));
        assert_eq!(lb.to_playfield(Vec2::new(560.0, 240.0)), Vec2::new(80.0, 240.0));

        let lb = Letterbox::fit(640.0, 960.0);
        let p = Vec2::new(100.0, 300.0);
        assert_eq!(lb.to_playfield(lb.to_host(p)), p);
    }

    #[test]
    fn test_letterbox_follows_host_resize() {
        let centre = Vec2::new(CENTER_X, CENTER_Y);
        let before = Letterbox::fit(320.0, 480.0);
        assert_eq!(before.to_host(centre), centre);

        // Window widened and doubled in height
        let after = Letterbox::fit(1000.0, 960.0);
        assert_eq!(after.scale, 2.0);
        assert_eq!(after.to_host(centre), Vec2::new(500.0, 480.0));
        assert_eq!(after.to_playfield(Vec2::new(500.0, 480.0)), centre);
    }

    fn labels_of(g: &Game<MemoryStorage>) -> Vec<String> {
        labels(&Screen::of(g)).into_iter().map(|l| l.text).collect()
    }
}
