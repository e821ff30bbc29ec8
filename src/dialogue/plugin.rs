//! Dialogue plugins - interaction, NPC conversations and looping chatter.

use bevy::prelude::*;

use super::audio::play_beat_sounds;
use super::interactor::*;
use super::library::{load_dialogue_library, DialogueLibrary};
use super::looper::*;
use super::npc_interactor::*;
use crate::core::GameplaySet;

/// Dialogue behaviour. Sequences come from the `DialogueLibrary` resource.
pub struct DialoguePlugin;

impl Plugin for DialoguePlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<DialogueLibrary>()
            .add_event::<SetChatEnabled>()
            .add_systems(
                Update,
                (track_interactor_range, update_interaction_prompts, fire_interactions)
                    .chain()
                    .in_set(GameplaySet::Input),
            )
            // Advancing runs before starting so a new beat gets its full first frame
            .add_systems(
                Update,
                (abort_suspended_dialogue, advance_npc_dialogue, start_npc_dialogue)
                    .chain()
                    .in_set(GameplaySet::Behaviour),
            )
            .add_systems(
                Update,
                (
                    advance_dialogue_loopers,
                    stop_suspended_loopers,
                    init_dialogue_loopers,
                    toggle_dialogue_loopers,
                )
                    .chain()
                    .in_set(GameplaySet::Behaviour),
            );
    }
}

/// Fills the `DialogueLibrary` from disk and plays beat sounds.
///
/// Needs the asset server and the kira `AudioPlugin`.
pub struct DialogueAssetsPlugin;

impl Plugin for DialogueAssetsPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<DialogueLibrary>()
            .add_systems(Startup, load_dialogue_library)
            .add_systems(Update, play_beat_sounds.in_set(GameplaySet::Feedback));
    }
}
