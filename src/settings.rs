//! Game settings and preferences
//!
//! Persisted separately from profiles, under its own storage key.

use serde::{Deserialize, Serialize};

use crate::persistence::{PersistenceError, Storage, load_json, save_json};
use crate::sim::Difficulty;

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Show the profile menu before play (otherwise play as guest)
    pub profiles_enabled: bool,

    // === Audio ===
    pub sound: bool,
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,

    // === Gameplay ===
    /// Difficulty highlighted on the start screen
    pub last_difficulty: Difficulty,

    // === HUD ===
    /// Show FPS counter
    pub show_fps: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            profiles_enabled: true,
            sound: true,
            master_volume: 0.8,
            last_difficulty: Difficulty::default(),
            show_fps: false,
        }
    }
}

impl Settings {
    /// Storage key
    pub const STORAGE_KEY: &'static str = "sky_hopper_settings";

    /// Effective volume (0 when sound is off)
    pub fn effective_volume(&self) -> f32 {
        if self.sound {
            self.master_volume.clamp(0.0, 1.0)
        } else {
            0.0
        }
    }

    /// Load settings, falling back to defaults on missing or corrupt data
    pub fn load(storage: &dyn Storage) -> Self {
        match load_json(storage, Self::STORAGE_KEY) {
            Some(settings) => {
                log::info!("Loaded settings");
                settings
            }
            None => {
                log::info!("Using default settings");
                Self::default()
            }
        }
    }

    pub fn save(&self, storage: &mut dyn Storage) -> Result<(), PersistenceError> {
        save_json(storage, Self::STORAGE_KEY, self)?;
        log::info!("Settings saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStorage;

    #[test]
    fn test_defaults_when_missing() {
        let storage = MemoryStorage::new();
        assert_eq!(Settings::load(&storage), Settings::default());
    }

    #[test]
    fn test_save_and_reload() {
        let mut storage = MemoryStorage::new();
        let settings = Settings {
            profiles_enabled: false,
            last_difficulty: Difficulty::Easy,
            ..Settings::default()
        };
        settings.save(&mut storage).unwrap();
        assert_eq!(Settings::load(&storage), settings);
    }

    #[test]
    fn test_partial_record_fills_defaults() {
        let storage =
            MemoryStorage::new().with_entry(Settings::STORAGE_KEY, r#"{"sound": false}"#);
        let settings = Settings::load(&storage);
        assert!(!settings.sound);
        assert!(settings.profiles_enabled);
        assert_eq!(settings.effective_volume(), 0.0);
    }
}
