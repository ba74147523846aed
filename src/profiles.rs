//! Player profiles and leaderboard
//!
//! Profiles are persisted as a JSON array of `{name, highScore}` under a single
//! storage key. High scores only ever go up.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::{MAX_NAME_LEN, MAX_PROFILES};
use crate::persistence::{Storage, load_json, save_json};

/// Storage key for the profile list
pub const STORAGE_KEY: &str = "sky_hopper_profiles";

/// A named player and their best score
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub name: String,
    pub high_score: u32,
}

/// Profile validation failures
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProfileError {
    #[error("name must not be empty")]
    EmptyName,
    #[error("a profile named '{0}' already exists")]
    DuplicateName(String),
    #[error("name must be at most {max} characters")]
    NameTooLong { max: usize },
    #[error("no profile named '{0}'")]
    UnknownProfile(String),
    #[error("at most {max} profiles")]
    TooManyProfiles { max: usize },
}

/// Trim and check a candidate profile name
pub fn validate_name(name: &str) -> Result<&str, ProfileError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(ProfileError::EmptyName);
    }
    if name.chars().count() > MAX_NAME_LEN {
        return Err(ProfileError::NameTooLong { max: MAX_NAME_LEN });
    }
    Ok(name)
}

/// Profile list backed by a [`Storage`]
#[derive(Debug)]
pub struct ProfileStore<S: Storage> {
    /// In creation order
    profiles: Vec<Profile>,
    storage: S,
}

impl<S: Storage> ProfileStore<S> {
    /// Load profiles from storage. Absent or corrupt data yields an empty store.
    pub fn load(storage: S) -> Self {
        let mut profiles: Vec<Profile> = load_json(&storage, STORAGE_KEY).unwrap_or_default();

        let before = profiles.len();
        let mut seen = std::collections::HashSet::new();
        profiles.retain(|p| seen.insert(p.name.clone()));
        if profiles.len() != before {
            log::warn!("Dropped {} duplicate stored profiles", before - profiles.len());
        }
        if profiles.len() > MAX_PROFILES {
            log::warn!("Keeping the first {} of {} stored profiles", MAX_PROFILES, profiles.len());
            profiles.truncate(MAX_PROFILES);
        }

        if profiles.is_empty() {
            log::info!("No profiles found, starting fresh");
        } else {
            log::info!("Loaded {} profiles", profiles.len());
        }
        Self { profiles, storage }
    }

    /// All profiles in creation order
    pub fn list(&self) -> &[Profile] {
        &self.profiles
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&Profile> {
        self.profiles.iter().find(|p| p.name == name)
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Create a profile with a zero high score
    pub fn create(&mut self, name: &str) -> Result<&Profile, ProfileError> {
        let name = validate_name(name)?;
        if self.get(name).is_some() {
            return Err(ProfileError::DuplicateName(name.to_string()));
        }
        if self.profiles.len() >= MAX_PROFILES {
            return Err(ProfileError::TooManyProfiles { max: MAX_PROFILES });
        }

        self.profiles.push(Profile {
            name: name.to_string(),
            high_score: 0,
        });
        log::info!("Created profile '{}'", name);
        self.persist();

        let idx = self.profiles.len() - 1;
        Ok(&self.profiles[idx])
    }

    /// Raise a profile's high score to `score` if it is higher.
    /// Returns true if the stored value changed.
    pub fn record_score(&mut self, name: &str, score: u32) -> Result<bool, ProfileError> {
        let profile = self
            .profiles
            .iter_mut()
            .find(|p| p.name == name)
            .ok_or_else(|| ProfileError::UnknownProfile(name.to_string()))?;

        if score <= profile.high_score {
            return Ok(false);
        }
        log::info!(
            "New high score for '{}': {} -> {}",
            name,
            profile.high_score,
            score
        );
        profile.high_score = score;
        self.persist();
        Ok(true)
    }

    /// Profiles by descending high score; ties keep creation order
    pub fn leaderboard(&self) -> Vec<&Profile> {
        let mut board: Vec<&Profile> = self.profiles.iter().collect();
        board.sort_by(|a, b| b.high_score.cmp(&a.high_score));
        board
    }

    /// Write through to storage. Failures keep the in-memory state.
    fn persist(&mut self) {
        match save_json(&mut self.storage, STORAGE_KEY, &self.profiles) {
            Ok(()) => log::debug!("Profiles saved ({} entries)", self.profiles.len()),
            Err(e) => log::warn!("Profiles not saved: {}", e),
        }
    }
}
