//! Wheelhouse - gameplay layer of a small 2D story game, built on Bevy.
//!
//! The engine does the rendering, physics, animation and asset work. This
//! crate supplies the behaviours layered on top of it.
//!
//! # Architecture
//!
//! The game is organized into plugins, each handling a specific aspect:
//!
//! - **Core**: Game states, global events, trigger dispatch, gameplay config
//! - **Player**: Side-scrolling movement, facing, speed modifiers
//! - **Npc**: NPCs that follow the player or hold their post
//! - **Dialogue**: Interactors, timed sprite dialogue, looping NPC chatter
//! - **Interactables**: Charging stations, pressure plates, lifts, conveyors, wheelchair
//! - **Scenes**: Scene requests, screen fades, scrolling backdrops, pause menu

pub mod core;
pub mod dialogue;
pub mod interactables;
pub mod npc;
pub mod player;
pub mod scenes;

use bevy::prelude::*;

/// Main game plugin that adds all sub-plugins.
pub struct WheelhousePlugin;

impl Plugin for WheelhousePlugin {
    fn build(&self, app: &mut App) {
        app
            // Core systems (must be first)
            .add_plugins(core::CorePlugin)

            // Actors
            .add_plugins(player::PlayerPlugin)
            .add_plugins(npc::NpcPlugin)

            // Dialogue behaviour plus its disk-backed sequences and audio
            .add_plugins(dialogue::DialoguePlugin)
            .add_plugins(dialogue::DialogueAssetsPlugin)

            // Environment
            .add_plugins(interactables::InteractablesPlugin)

            // Scene flow
            .add_plugins(scenes::ScenesPlugin);
    }
}

#[cfg(test)]
pub(crate) mod testing {
    //! Headless app helpers shared by the unit tests.

    use bevy::app::Plugins;
    use bevy::state::app::StatesPlugin;
    use bevy::time::TimeUpdateStrategy;
    use bevy::prelude::*;
    use std::time::Duration;

    /// Length of one simulated frame.
    pub const FRAME_SECONDS: f32 = 0.1;

    /// Build a headless app in `GameState::Playing` with the given plugins
    /// added after `CorePlugin`.
    pub fn app_with<M>(plugins: impl Plugins<M>) -> App {
        let mut app = App::new();
        app.add_plugins((MinimalPlugins, StatesPlugin))
            .insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_millis(100)))
            .init_resource::<ButtonInput<KeyCode>>()
            .add_plugins(crate::core::CorePlugin)
            .add_plugins(plugins);
        // First frame runs Startup and enters Playing with a zero delta
        app.update();
        app
    }

    /// Run enough frames to cover `seconds`.
    pub fn advance(app: &mut App, seconds: f32) {
        let frames = (seconds / FRAME_SECONDS).round() as usize;
        for _ in 0..frames {
            app.update();
        }
    }

    /// Press and release a key across one frame.
    pub fn tap(app: &mut App, key: KeyCode) {
        app.world_mut().resource_mut::<ButtonInput<KeyCode>>().press(key);
        app.update();
        let mut input = app.world_mut().resource_mut::<ButtonInput<KeyCode>>();
        input.release(key);
        input.clear();
    }

    /// Report a rapier collision start between two entities and run a frame.
    pub fn enter(app: &mut App, volume: Entity, other: Entity) {
        use bevy_rapier2d::prelude::CollisionEvent;
        use bevy_rapier2d::rapier::geometry::CollisionEventFlags;
        app.world_mut()
            .send_event(CollisionEvent::Started(volume, other, CollisionEventFlags::SENSOR));
        app.update();
    }

    /// Report a rapier collision stop between two entities and run a frame.
    pub fn exit(app: &mut App, volume: Entity, other: Entity) {
        use bevy_rapier2d::prelude::CollisionEvent;
        use bevy_rapier2d::rapier::geometry::CollisionEventFlags;
        app.world_mut()
            .send_event(CollisionEvent::Stopped(volume, other, CollisionEventFlags::SENSOR));
        app.update();
    }

    /// Every event of type `E` seen since `record` was called.
    #[derive(Resource)]
    pub struct Recorded<E: Event>(pub Vec<E>);

    /// Start collecting events of type `E` at the end of each frame.
    pub fn record<E: Event + Clone>(app: &mut App) {
        app.insert_resource(Recorded::<E>(Vec::new()));
        app.add_systems(Last, |mut reader: EventReader<E>, mut recorded: ResMut<Recorded<E>>| {
            recorded.0.extend(reader.read().cloned());
        });
    }

    pub fn recorded<E: Event + Clone>(app: &App) -> Vec<E> {
        app.world().resource::<Recorded<E>>().0.clone()
    }
}
