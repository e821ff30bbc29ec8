//! Wheelhouse - Entry Point
//!
//! A short side-scrolling story about pushing a wheelchair through a hospital.
//!
//! Controls:
//! - A/D or arrows: Walk
//! - F (gamepad East): Interact, pick up or set down the wheelchair
//! - Escape: Pause/Unpause

use bevy::prelude::*;
use bevy_kira_audio::AudioPlugin;
use bevy_rapier2d::prelude::*;

use wheelhouse::core::{LoadScene, SceneRef};
use wheelhouse::interactables::draw_belt_sensors;
use wheelhouse::player::Player;

/// World units per screen pixel at the default window size.
const CAMERA_SCALE: f32 = 1.0 / 48.0;

/// Matches Bevy's default `Time<Fixed>` rate, so one physics step per fixed tick.
const PHYSICS_STEP_SECONDS: f32 = 1.0 / 64.0;

fn main() {
    App::new()
        // Bevy default plugins
        .add_plugins(
            DefaultPlugins
                .set(WindowPlugin {
                    primary_window: Some(Window {
                        title: "Wheelhouse".to_string(),
                        resolution: (1280.0, 720.0).into(),
                        ..default()
                    }),
                    ..default()
                })
                .set(ImagePlugin::default_nearest()),
        )

        // Physics steps in FixedUpdate, after gameplay queues velocities and impulses
        .insert_resource(TimestepMode::Fixed {
            dt: PHYSICS_STEP_SECONDS,
            substeps: 1,
        })
        .add_plugins(RapierPhysicsPlugin::<NoUserData>::default().in_fixed_schedule())

        // Audio
        .add_plugins(AudioPlugin)

        // Our game plugin
        .add_plugins(wheelhouse::WheelhousePlugin)

        .add_systems(Startup, (spawn_camera, open_main_menu))
        .add_systems(Update, follow_player_with_camera)
        .add_systems(Update, draw_belt_sensors.run_if(debug_gizmos_enabled))

        .run();
}

fn spawn_camera(mut commands: Commands) {
    commands.spawn((
        Camera2d,
        OrthographicProjection {
            scale: CAMERA_SCALE,
            ..OrthographicProjection::default_2d()
        },
        Transform::from_xyz(0.0, 2.0, 0.0),
    ));
}

/// Keep the player horizontally centered; the camera returns home between levels.
fn follow_player_with_camera(
    time: Res<Time>,
    players: Query<&Transform, (With<Player>, Without<Camera2d>)>,
    mut cameras: Query<&mut Transform, With<Camera2d>>,
) {
    let target_x = players.get_single().map_or(0.0, |player| player.translation.x);
    for mut camera in cameras.iter_mut() {
        let t = (4.0 * time.delta_secs()).min(1.0);
        camera.translation.x += (target_x - camera.translation.x) * t;
    }
}

fn open_main_menu(mut load_scene: EventWriter<LoadScene>) {
    load_scene.send(LoadScene(SceneRef::Index(0)));
}

fn debug_gizmos_enabled() -> bool {
    cfg!(debug_assertions)
}
