//! User settings: speech playback speed and color theme.
//!
//! Stored as a single JSON blob under the `settings` key of a
//! [`KeyValueStore`]. An absent key means defaults.

mod store;

pub use store::{default_store_path, KeyValueStore};

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::path::PathBuf;

use crate::error::ErrorKind;

/// Key the settings blob lives under.
pub const SETTINGS_KEY: &str = "settings";

/// Default playback speed.
pub const DEFAULT_SPEED: f32 = 1.0;

/// Accepted playback speed range.
pub const SPEED_RANGE: std::ops::RangeInclusive<f32> = 0.25..=4.0;

/// Color theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Theme::Light => f.write_str("light"),
            Theme::Dark => f.write_str("dark"),
        }
    }
}

/// Persisted user settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Speech playback rate
    #[serde(default = "default_speed", deserialize_with = "number_or_string")]
    pub speed: f32,
    #[serde(default)]
    pub theme: Theme,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            speed: DEFAULT_SPEED,
            theme: Theme::Light,
        }
    }
}

fn default_speed() -> f32 {
    DEFAULT_SPEED
}

/// Older stores saved the speed as the slider's string value ("1.25").
fn number_or_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f32, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(f32),
        Text(String),
    }

    match Raw::deserialize(deserializer)? {
        Raw::Number(n) => Ok(n),
        Raw::Text(s) => s
            .trim()
            .parse()
            .map_err(|_| serde::de::Error::custom(format!("invalid speed '{}'", s))),
    }
}

/// Errors from the settings store.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("Failed to access settings store '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Settings store '{}' is not valid JSON: {source}", path.display())]
    CorruptStore {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("Speed must be between 0.25 and 4.0, got {0}")]
    InvalidSpeed(f32),
}

impl SettingsError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            SettingsError::Io { .. } | SettingsError::CorruptStore { .. } => ErrorKind::Io,
            SettingsError::InvalidSpeed(_) => ErrorKind::InvalidInput,
        }
    }
}

impl Settings {
    pub fn validate(&self) -> Result<(), SettingsError> {
        if !self.speed.is_finite() || !SPEED_RANGE.contains(&self.speed) {
            return Err(SettingsError::InvalidSpeed(self.speed));
        }
        Ok(())
    }

    /// Load settings, falling back to defaults when the key is absent or
    /// its blob can't be read. An out-of-range speed is reset on its own;
    /// the stored theme is kept.
    pub fn load(store: &KeyValueStore) -> Result<Self, SettingsError> {
        let Some(blob) = store.get(SETTINGS_KEY)? else {
            return Ok(Self::default());
        };

        match serde_json::from_str::<Settings>(&blob) {
            Ok(settings) if settings.validate().is_ok() => Ok(settings),
            Ok(settings) => {
                log::warn!(
                    "Stored speed {} out of range, using {}",
                    settings.speed,
                    DEFAULT_SPEED
                );
                Ok(Self {
                    speed: DEFAULT_SPEED,
                    ..settings
                })
            }
            Err(e) => {
                log::warn!("Ignoring unreadable settings blob: {}", e);
                Ok(Self::default())
            }
        }
    }

    /// Persist these settings, replacing whatever was stored.
    pub fn save(&self, store: &KeyValueStore) -> Result<(), SettingsError> {
        self.validate()?;
        let blob = serde_json::to_string(self).map_err(|source| SettingsError::CorruptStore {
            path: store.path().to_path_buf(),
            source,
        })?;
        store.set(SETTINGS_KEY, blob)
    }

    /// Drop the stored settings so the next load yields defaults.
    pub fn reset(store: &KeyValueStore) -> Result<Self, SettingsError> {
        store.remove(SETTINGS_KEY)?;
        Ok(Self::default())
    }
}
