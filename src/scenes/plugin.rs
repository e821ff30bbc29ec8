//! Scenes plugin - scene switching, fades, scrolling backdrops and menus.

use bevy::prelude::*;

use super::content::spawn_scene_content;
use super::fader::{advance_fades, start_fades, StartFade};
use super::menu::setup_menu_systems;
use super::registry::{apply_scene_requests, load_scene_registry, ActiveScene, SceneEntered, SceneRegistry};
use super::scroll::scroll_textures;
use crate::core::GameplaySet;

/// Scenes plugin - handles the scene list and everything that moves between scenes.
pub struct ScenesPlugin;

impl Plugin for ScenesPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<SceneRegistry>()
            .init_resource::<ActiveScene>()
            .add_event::<SceneEntered>()
            .add_event::<StartFade>()
            .add_systems(Startup, load_scene_registry)
            // Fades run on real time, so they keep going while paused
            .add_systems(Update, (start_fades, advance_fades).chain().after(GameplaySet::Feedback))
            .add_systems(Update, scroll_textures.in_set(GameplaySet::Feedback))
            .add_systems(
                Update,
                (apply_scene_requests, spawn_scene_content)
                    .chain()
                    .after(advance_fades),
            );

        setup_menu_systems(app);
    }
}
