//! Side-scrolling player movement.
//!
//! Input is sampled every frame; velocity is written every physics step so
//! rapier keeps owning the vertical axis (gravity, landing).

use bevy::prelude::*;
use bevy_rapier2d::prelude::*;

use super::components::*;
use crate::core::{ActorTag, AnimatorParams, GameState, GameplayConfig, GameplaySet, Suspended};

/// Stick deflection ignored as noise.
const STICK_DEADZONE: f32 = 0.2;

/// Set up player movement systems.
pub fn setup_movement_systems(app: &mut App) {
    app.add_systems(Update, read_movement_input.in_set(GameplaySet::Input))
        .add_systems(Update, update_facing_and_walk.in_set(GameplaySet::Feedback))
        .add_systems(
            FixedUpdate,
            apply_player_velocity
                .before(PhysicsSet::SyncBackend)
                .run_if(in_state(GameState::Playing)),
        );
}

/// Raw horizontal axis: keyboard wins, gamepads fill in when no key is held.
pub fn horizontal_axis(keyboard: &ButtonInput<KeyCode>, gamepads: &Query<&Gamepad>) -> f32 {
    let mut axis = 0.0;
    if keyboard.any_pressed([KeyCode::KeyA, KeyCode::ArrowLeft]) {
        axis -= 1.0;
    }
    if keyboard.any_pressed([KeyCode::KeyD, KeyCode::ArrowRight]) {
        axis += 1.0;
    }
    if axis != 0.0 {
        return axis;
    }

    for gamepad in gamepads.iter() {
        if gamepad.pressed(GamepadButton::DPadLeft) {
            return -1.0;
        }
        if gamepad.pressed(GamepadButton::DPadRight) {
            return 1.0;
        }
        let stick = gamepad.left_stick().x;
        if stick.abs() > STICK_DEADZONE {
            return stick.signum();
        }
    }
    0.0
}

/// Interact is `F` on the keyboard or the east face button on a gamepad.
pub fn interact_just_pressed(keyboard: &ButtonInput<KeyCode>, gamepads: &Query<&Gamepad>) -> bool {
    keyboard.just_pressed(KeyCode::KeyF)
        || gamepads
            .iter()
            .any(|gamepad| gamepad.just_pressed(GamepadButton::East))
}

/// Sample horizontal input for the player.
pub fn read_movement_input(
    keyboard: Res<ButtonInput<KeyCode>>,
    gamepads: Query<&Gamepad>,
    mut player_query: Query<(&mut PlayerMovement, Has<Suspended>), With<Player>>,
) {
    let axis = horizontal_axis(&keyboard, &gamepads);
    for (mut movement, suspended) in player_query.iter_mut() {
        movement.horizontal_input = if suspended { 0.0 } else { axis };
    }
}

/// Flip the sprite toward the input and publish the walking flag.
pub fn update_facing_and_walk(
    mut player_query: Query<(&PlayerMovement, Option<&mut Sprite>, Option<&mut AnimatorParams>), With<Player>>,
) {
    for (movement, sprite, animator) in player_query.iter_mut() {
        if let (Some(mut sprite), Some(flip)) = (sprite, movement.facing_flip()) {
            if sprite.flip_x != flip {
                sprite.flip_x = flip;
            }
        }
        if let Some(mut animator) = animator {
            let walking = movement.is_walking();
            if animator.get_bool(WALKING_PARAM) != walking {
                animator.set_bool(WALKING_PARAM, walking);
            }
        }
    }
}

/// Drive horizontal velocity from input, keeping the vertical component.
pub fn apply_player_velocity(mut player_query: Query<(&PlayerMovement, &mut Velocity), With<Player>>) {
    for (movement, mut velocity) in player_query.iter_mut() {
        velocity.linvel.x = movement.horizontal_input * movement.speed;
    }
}

/// Spawn the player body at `position`.
pub fn spawn_player(commands: &mut Commands, position: Vec2, config: &GameplayConfig) -> Entity {
    commands
        .spawn((
            Player,
            Name::new("Player"),
            ActorTag::player(),
            PlayerMovement::new(config.player_speed, config.walk_threshold),
            AnimatorParams::default(),
            Sprite::from_color(Color::srgb(0.85, 0.8, 0.7), Vec2::new(0.8, 1.8)),
            Transform::from_translation(position.extend(1.0)),
            // Rapier physics components
            RigidBody::Dynamic,
            Collider::capsule_y(0.5, 0.4),
            LockedAxes::ROTATION_LOCKED,
            Velocity::zero(),
            ExternalImpulse::default(),
            ReadMassProperties::default(),
            ActiveEvents::COLLISION_EVENTS,
        ))
        .id()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{app_with, tap};

    fn spawn_test_player(app: &mut App) -> Entity {
        app.world_mut()
            .spawn((
                Player,
                PlayerMovement::new(5.0, 0.01),
                AnimatorParams::default(),
                Sprite::default(),
            ))
            .id()
    }

    #[test]
    fn holding_left_flips_and_walks() {
        let mut app = app_with(super::super::PlayerPlugin);
        let player = spawn_test_player(&mut app);

        app.world_mut().resource_mut::<ButtonInput<KeyCode>>().press(KeyCode::KeyA);
        app.update();

        let world = app.world();
        assert_eq!(world.get::<PlayerMovement>(player).unwrap().horizontal_input, -1.0);
        assert!(world.get::<Sprite>(player).unwrap().flip_x);
        assert!(world.get::<AnimatorParams>(player).unwrap().get_bool(WALKING_PARAM));
    }

    #[test]
    fn suspended_player_ignores_input() {
        let mut app = app_with(super::super::PlayerPlugin);
        let player = spawn_test_player(&mut app);
        app.world_mut().entity_mut(player).insert(Suspended);

        tap(&mut app, KeyCode::KeyD);

        let world = app.world();
        assert_eq!(world.get::<PlayerMovement>(player).unwrap().horizontal_input, 0.0);
        assert!(!world.get::<AnimatorParams>(player).unwrap().get_bool(WALKING_PARAM));
    }
}
