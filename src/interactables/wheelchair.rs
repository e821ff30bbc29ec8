//! Wheelchair the player can pick up, push around and set down.

use bevy::prelude::*;
use bevy_rapier2d::prelude::RigidBodyDisabled;

use crate::core::{has_tag, ActorTag, Suspended, TriggerEntered, TriggerExited, PLAYER_TAG};
use crate::player::{interact_just_pressed, PlayerMovement};

/// Carryable wheelchair. Its own sensor marks the pickup range.
#[derive(Component, Debug, Clone)]
pub struct WheelChair {
    /// Player speed multiplier while pushing
    pub speed_multiplier: f32,
    /// Hint hidden once the chair is first picked up
    pub dialogue_image: Option<Entity>,
    pub(crate) player_in_range: Option<Entity>,
    pub(crate) carrier: Option<Entity>,
    pub(crate) original_parent: Option<Entity>,
}

impl Default for WheelChair {
    fn default() -> Self {
        Self {
            speed_multiplier: 0.3,
            dialogue_image: None,
            player_in_range: None,
            carrier: None,
            original_parent: None,
        }
    }
}

impl WheelChair {
    pub fn carrier(&self) -> Option<Entity> {
        self.carrier
    }

    pub fn is_picked_up(&self) -> bool {
        self.carrier.is_some()
    }
}

/// Remember where the chair was placed in the hierarchy.
pub fn init_wheelchairs(mut chairs: Query<(&mut WheelChair, Option<&Parent>), Added<WheelChair>>) {
    for (mut chair, parent) in chairs.iter_mut() {
        chair.original_parent = parent.map(Parent::get);
    }
}

/// Track the player walking up to or away from a parked chair.
pub fn wheelchair_range(
    mut entered: EventReader<TriggerEntered>,
    mut exited: EventReader<TriggerExited>,
    tags: Query<&ActorTag>,
    mut chairs: Query<&mut WheelChair, Without<Suspended>>,
) {
    for event in entered.read() {
        if let Ok(mut chair) = chairs.get_mut(event.volume) {
            if !chair.is_picked_up() && has_tag(&tags, event.other, PLAYER_TAG) {
                chair.player_in_range = Some(event.other);
            }
        }
    }
    for event in exited.read() {
        if let Ok(mut chair) = chairs.get_mut(event.volume) {
            if !chair.is_picked_up() && chair.player_in_range == Some(event.other) {
                chair.player_in_range = None;
            }
        }
    }
}

/// Interact picks the chair up, or sets it down if already carried.
pub fn carry_wheelchairs(
    mut commands: Commands,
    keyboard: Res<ButtonInput<KeyCode>>,
    gamepads: Query<&Gamepad>,
    mut chairs: Query<(Entity, &mut WheelChair, &mut Transform), Without<Suspended>>,
    mut movements: Query<&mut PlayerMovement>,
    mut visibilities: Query<&mut Visibility>,
) {
    if !interact_just_pressed(&keyboard, &gamepads) {
        return;
    }

    for (entity, mut chair, mut transform) in chairs.iter_mut() {
        if let Some(carrier) = chair.carrier.take() {
            match chair.original_parent {
                Some(parent) => commands.entity(entity).set_parent_in_place(parent),
                None => commands.entity(entity).remove_parent_in_place(),
            };
            commands.entity(entity).remove::<RigidBodyDisabled>();
            if let Ok(mut movement) = movements.get_mut(carrier) {
                movement.reset_speed();
            }
            chair.player_in_range = None;
            debug!("Wheelchair {entity:?} dropped");
            continue;
        }

        let Some(player) = chair.player_in_range else {
            continue;
        };
        chair.carrier = Some(player);
        commands.entity(entity).set_parent(player).insert(RigidBodyDisabled);
        transform.translation.x = 0.0;
        transform.translation.y = 0.0;
        if let Ok(mut movement) = movements.get_mut(player) {
            movement.modify_speed(chair.speed_multiplier);
        }
        if let Some(mut hint) = chair.dialogue_image.and_then(|e| visibilities.get_mut(e).ok()) {
            *hint = Visibility::Hidden;
        }
        debug!("Wheelchair {entity:?} picked up by {player:?}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interactables::InteractablesPlugin;
    use crate::player::Player;
    use crate::testing::{app_with, enter, exit, tap};

    struct Fixture {
        app: App,
        chair: Entity,
        player: Entity,
        room: Entity,
        hint: Entity,
    }

    fn fixture() -> Fixture {
        let mut app = app_with(InteractablesPlugin);
        let world = app.world_mut();
        let player = world
            .spawn((
                Player,
                ActorTag::player(),
                PlayerMovement::new(5.0, 0.01),
                Transform::from_xyz(4.0, 1.0, 1.0),
            ))
            .id();
        let room = world.spawn(Transform::default()).id();
        let hint = world.spawn(Visibility::Inherited).id();
        let chair = world
            .spawn((
                WheelChair {
                    dialogue_image: Some(hint),
                    ..default()
                },
                Transform::from_xyz(3.0, 1.0, 0.5),
            ))
            .set_parent(room)
            .id();
        app.update();
        Fixture {
            app,
            chair,
            player,
            room,
            hint,
        }
    }

    fn speed(app: &App, player: Entity) -> f32 {
        app.world().get::<PlayerMovement>(player).unwrap().speed
    }

    #[test]
    fn interact_out_of_range_does_nothing() {
        let Fixture { mut app, chair, .. } = fixture();
        tap(&mut app, KeyCode::KeyF);
        assert!(!app.world().get::<WheelChair>(chair).unwrap().is_picked_up());
    }

    #[test]
    fn pick_up_and_drop() {
        let Fixture {
            mut app,
            chair,
            player,
            room,
            hint,
        } = fixture();

        enter(&mut app, chair, player);
        tap(&mut app, KeyCode::KeyF);

        let world = app.world();
        assert_eq!(world.get::<WheelChair>(chair).unwrap().carrier(), Some(player));
        assert_eq!(world.get::<Parent>(chair).unwrap().get(), player);
        assert!(world.get::<RigidBodyDisabled>(chair).is_some());
        let local = world.get::<Transform>(chair).unwrap().translation;
        assert_eq!(local, Vec3::new(0.0, 0.0, 0.5));
        assert_eq!(*world.get::<Visibility>(hint).unwrap(), Visibility::Hidden);
        assert!((speed(&app, player) - 1.5).abs() < 1e-6);

        tap(&mut app, KeyCode::KeyF);
        let world = app.world();
        assert!(!world.get::<WheelChair>(chair).unwrap().is_picked_up());
        assert_eq!(world.get::<Parent>(chair).unwrap().get(), room);
        assert!(world.get::<RigidBodyDisabled>(chair).is_none());
        assert_eq!(speed(&app, player), 5.0);
    }

    #[test]
    fn suspended_chair_cannot_be_picked_up() {
        let Fixture {
            mut app,
            chair,
            player,
            room,
            hint,
        } = fixture();
        app.world_mut().entity_mut(chair).insert(Suspended);

        enter(&mut app, chair, player);
        tap(&mut app, KeyCode::KeyF);
        let world = app.world();
        assert!(!world.get::<WheelChair>(chair).unwrap().is_picked_up());
        assert_eq!(world.get::<Parent>(chair).unwrap().get(), room);
        assert_eq!(*world.get::<Visibility>(hint).unwrap(), Visibility::Inherited);
        assert_eq!(speed(&app, player), 5.0);

        // The range entry was ignored too, so waking the chair alone is not enough
        app.world_mut().entity_mut(chair).remove::<Suspended>();
        tap(&mut app, KeyCode::KeyF);
        assert!(!app.world().get::<WheelChair>(chair).unwrap().is_picked_up());
    }

    #[test]
    fn suspended_carried_chair_stays_on_the_carrier() {
        let Fixture {
            mut app, chair, player, ..
        } = fixture();
        enter(&mut app, chair, player);
        tap(&mut app, KeyCode::KeyF);
        app.world_mut().entity_mut(chair).insert(Suspended);

        tap(&mut app, KeyCode::KeyF);
        let world = app.world();
        assert_eq!(world.get::<WheelChair>(chair).unwrap().carrier(), Some(player));
        assert_eq!(world.get::<Parent>(chair).unwrap().get(), player);
        assert!((speed(&app, player) - 1.5).abs() < 1e-6);
    }

    #[test]
    fn leaving_range_forgets_the_player() {
        let Fixture {
            mut app, chair, player, ..
        } = fixture();
        enter(&mut app, chair, player);
        exit(&mut app, chair, player);
        tap(&mut app, KeyCode::KeyF);
        assert!(!app.world().get::<WheelChair>(chair).unwrap().is_picked_up());
    }
}
