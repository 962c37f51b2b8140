//! Host settings
//!
//! Read from a JSON file next to the binary. Gameplay tuning is fixed in
//! `crate::consts`; these only describe the host environment.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::consts::{DEFAULT_SCREEN_HEIGHT, DEFAULT_SCREEN_WIDTH};

/// Environment variable overriding the settings file location
pub const SETTINGS_ENV: &str = "ROBOFLY_SETTINGS";
/// Default settings file name
pub const DEFAULT_SETTINGS_FILE: &str = "robofly.json";

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Logical screen width
    pub screen_width: f32,
    /// Logical screen height (the drone is lost below `screen_height + 50`)
    pub screen_height: f32,
    /// Where the native host keeps the high score
    pub high_score_path: PathBuf,
    /// Obstacle placement seed (random when unset)
    pub seed: Option<u64>,
    /// Re-read the stored high score on every physics tick
    pub resync_high_score_each_tick: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            screen_width: DEFAULT_SCREEN_WIDTH,
            screen_height: DEFAULT_SCREEN_HEIGHT,
            high_score_path: PathBuf::from("robofly_highscore.json"),
            seed: None,
            resync_high_score_each_tick: false,
        }
    }
}

impl Settings {
    /// Settings file location (`$ROBOFLY_SETTINGS` or `./robofly.json`)
    pub fn default_path() -> PathBuf {
        std::env::var_os(SETTINGS_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_SETTINGS_FILE))
    }

    /// Load settings from the default location
    pub fn load() -> Self {
        Self::load_from(&Self::default_path())
    }

    /// Load settings from a file, falling back to defaults
    pub fn load_from(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(json) => Self::from_json(&json).unwrap_or_else(|e| {
                log::warn!("Invalid settings in {}: {}", path.display(), e);
                Self::default()
            }),
            Err(_) => {
                log::info!("Using default settings");
                Self::default()
            }
        }
    }

    /// Parse settings JSON; missing fields take their defaults
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let settings: Self = serde_json::from_str(json)?;
        log::info!("Loaded settings");
        Ok(settings.sanitized())
    }

    /// Seed for obstacle placement, drawing a fresh one when unset
    pub fn seed_or_random(&self) -> u64 {
        self.seed.unwrap_or_else(rand::random)
    }

    fn sanitized(mut self) -> Self {
        if !(self.screen_width.is_finite() && self.screen_width > 0.0) {
            self.screen_width = DEFAULT_SCREEN_WIDTH;
        }
        if !(self.screen_height.is_finite() && self.screen_height > 0.0) {
            self.screen_height = DEFAULT_SCREEN_HEIGHT;
        }
        self
    }
}
