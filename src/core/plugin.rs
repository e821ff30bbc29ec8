//! Core plugin that sets up game states, events, and shared systems.

use bevy::prelude::*;
use bevy_rapier2d::prelude::CollisionEvent;

use super::config::{load_gameplay_config, GameplayConfig};
use super::events::*;
use super::states::GameState;
use super::triggers::dispatch_trigger_events;
use super::tween::update_smooth_translations;

/// Frame-update ordering shared by every gameplay plugin.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum GameplaySet {
    /// Collision events become trigger enter/exit events
    Triggers,
    /// Player input and interaction prompts
    Input,
    /// Trigger responders, dialogue playback, carried objects
    Behaviour,
    /// Presentation following gameplay state (cabins, sprites)
    Feedback,
}

/// Core plugin - must be added first as other plugins depend on it.
///
/// This plugin sets up:
/// - Game states (Loading, Playing, Paused)
/// - Global events (triggers, interaction, dialogue, scene requests)
/// - Gameplay config loading
pub struct CorePlugin;

impl Plugin for CorePlugin {
    fn build(&self, app: &mut App) {
        app
            .init_state::<GameState>()
            .init_resource::<GameplayConfig>()

            // Rapier registers this too; registering twice is a no-op
            .add_event::<CollisionEvent>()
            .add_event::<TriggerEntered>()
            .add_event::<TriggerExited>()
            .add_event::<Interacted>()
            .add_event::<DialogueStarted>()
            .add_event::<DialogueFinished>()
            .add_event::<DialogueBeat>()
            .add_event::<LoadScene>()

            .add_systems(Startup, load_gameplay_config)

            // Data is loaded at Startup, so gameplay can begin right away
            .add_systems(OnEnter(GameState::Loading), start_playing)

            .configure_sets(
                Update,
                (
                    GameplaySet::Triggers,
                    GameplaySet::Input,
                    GameplaySet::Behaviour,
                    GameplaySet::Feedback,
                )
                    .chain()
                    .run_if(in_state(GameState::Playing)),
            )
            .add_systems(Update, dispatch_trigger_events.in_set(GameplaySet::Triggers))
            .add_systems(Update, update_smooth_translations.in_set(GameplaySet::Feedback));
    }
}

/// Leave Loading as soon as the Startup loaders have run.
fn start_playing(mut next_state: ResMut<NextState<GameState>>) {
    next_state.set(GameState::Playing);
}
