//! Player module - player entity, input and movement.

mod components;
mod movement;
mod plugin;

pub use components::*;
pub use movement::{apply_player_velocity, horizontal_axis, interact_just_pressed, spawn_player};
pub use plugin::PlayerPlugin;
