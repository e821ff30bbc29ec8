//! Gameplay tuning loaded from an external RON file.
//!
//! Allows tweaking movement and dialogue timing without recompilation.

use bevy::prelude::*;
use serde::Deserialize;
use std::path::Path;

use super::error::DataLoadError;

/// Path of the gameplay tuning file, relative to the working directory.
pub const GAMEPLAY_CONFIG_PATH: &str = "assets/data/gameplay.ron";

/// Gameplay configuration loaded from assets/data/gameplay.ron.
#[derive(Resource, Clone, Debug, Deserialize)]
#[serde(default)]
pub struct GameplayConfig {
    // Player
    pub player_speed: f32,
    pub walk_threshold: f32,
    // Dialogue timing
    pub min_step_seconds: f32,
    pub empty_sequence_retry_seconds: f32,
    // Charging station
    pub charger_completion_delay: f32,
}

impl Default for GameplayConfig {
    fn default() -> Self {
        Self {
            player_speed: 5.0,
            walk_threshold: 0.01,
            min_step_seconds: 0.01,
            empty_sequence_retry_seconds: 0.2,
            charger_completion_delay: 0.5,
        }
    }
}

impl GameplayConfig {
    /// Parse a config from RON text.
    pub fn from_ron(path: &str, contents: &str) -> Result<Self, DataLoadError> {
        DataLoadError::parse(path, contents)
    }

    /// Load gameplay config from the RON file, falling back to defaults.
    pub fn load() -> Self {
        let path = GAMEPLAY_CONFIG_PATH;
        let config = DataLoadError::read(Path::new(path)).and_then(|contents| Self::from_ron(path, &contents));
        match config {
            Ok(config) => {
                info!("Loaded gameplay config from {}", path);
                config
            }
            Err(e @ DataLoadError::ParseError { .. }) => {
                error!("{}. Using defaults.", e);
                Self::default()
            }
            Err(e) => {
                warn!("{}. Using defaults.", e);
                Self::default()
            }
        }
    }
}

/// System to load gameplay config at startup.
pub fn load_gameplay_config(mut commands: Commands) {
    commands.insert_resource(GameplayConfig::load());
}
