//! Game state definitions that control which gameplay systems run.

use bevy::prelude::*;

/// Top-level game flow.
///
/// - Start in `Loading` while data files are read
/// - `Playing` runs every gameplay behaviour
/// - `Paused` freezes virtual time and shows the pause menu
#[derive(States, Debug, Clone, Copy, Eq, PartialEq, Hash, Default)]
pub enum GameState {
    /// Initial state - reading config, scene list and dialogue data
    #[default]
    Loading,
    /// Active gameplay
    Playing,
    /// Gameplay frozen behind the pause menu
    Paused,
}
