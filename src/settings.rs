//! Driver settings and preferences
//!
//! Loaded from a JSON file at startup. Every field has a default, so a
//! settings file only needs the values it changes.

use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::consts::FPS;
use crate::error::{ConfigError, InitError};
use crate::input::KeyBindings;
use crate::sim::MatchConfig;

/// Driver settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Simulation ticks per second
    pub tick_rate: u32,
    /// Sleep between ticks to hold the tick rate
    pub pacing: bool,
    /// Keyboard bindings
    pub bindings: KeyBindings,
    /// End the match when a player reaches this many points
    pub first_to: Option<u32>,
    /// Court geometry, speeds and colors
    #[serde(rename = "match")]
    pub match_config: MatchConfig,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            tick_rate: FPS,
            pacing: true,
            bindings: KeyBindings::default(),
            first_to: None,
            match_config: MatchConfig::default(),
        }
    }
}

impl Settings {
    /// Parse settings from JSON text
    pub fn from_json(json: &str, origin: &Path) -> Result<Self, InitError> {
        let settings: Settings =
            serde_json::from_str(json).map_err(|source| InitError::Settings {
                path: origin.to_path_buf(),
                source,
            })?;
        if settings.first_to == Some(0) {
            return Err(ConfigError::ZeroFirstTo.into());
        }
        settings.match_config.validate()?;
        Ok(settings)
    }

    /// Load settings from a file, or use defaults when no path is given
    pub fn load(path: Option<&Path>) -> Result<Self, InitError> {
        let Some(path) = path else {
            log::info!("Using default settings");
            return Ok(Self::default());
        };

        let json = fs::read_to_string(path).map_err(|source| InitError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let settings = Self::from_json(&json, path)?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Duration of one tick in whole milliseconds
    pub fn tick_duration(&self) -> Duration {
        Duration::from_millis(1000 / u64::from(self.tick_rate.max(1)))
    }
}
