//! Wheelchair lift: rolling the chair onto it sends the elevator up or down.

use bevy::prelude::*;

use crate::core::{has_tag, ActorTag, AnimatorParams, SmoothTranslation, Suspended, TriggerEntered, PLAYER_TAG};

/// Animator boolean holding the elevator position.
pub const LIFT_UP_PARAM: &str = "isUp";

/// Toggles an elevator when the player enters while pushing the wheelchair.
#[derive(Component, Debug, Clone)]
pub struct LiftManager {
    pub wheelchair: Option<Entity>,
    pub elevator_animator: Option<Entity>,
    elevator_is_up: bool,
}

impl Default for LiftManager {
    fn default() -> Self {
        Self {
            wheelchair: None,
            elevator_animator: None,
            elevator_is_up: true,
        }
    }
}

impl LiftManager {
    pub fn new(wheelchair: Entity, elevator_animator: Entity) -> Self {
        Self {
            wheelchair: Some(wheelchair),
            elevator_animator: Some(elevator_animator),
            ..default()
        }
    }

    pub fn elevator_is_up(&self) -> bool {
        self.elevator_is_up
    }
}

/// Elevator cabin gliding between two stops according to `isUp`.
#[derive(Component, Debug, Clone)]
#[require(AnimatorParams, SmoothTranslation)]
pub struct LiftCabin {
    pub up: Vec2,
    pub down: Vec2,
}

/// Read the initial elevator position from its animator.
pub fn init_lifts(mut lifts: Query<&mut LiftManager, Added<LiftManager>>, animators: Query<&AnimatorParams>) {
    for mut lift in lifts.iter_mut() {
        if let Some(animator) = lift.elevator_animator.and_then(|e| animators.get(e).ok()) {
            lift.elevator_is_up = animator.get_bool(LIFT_UP_PARAM);
        }
    }
}

/// Toggle the elevator when the player carrying the wheelchair steps in.
pub fn operate_lifts(
    mut entered: EventReader<TriggerEntered>,
    tags: Query<&ActorTag>,
    parents: Query<&Parent>,
    mut lifts: Query<&mut LiftManager, Without<Suspended>>,
    mut animators: Query<&mut AnimatorParams>,
) {
    for event in entered.read() {
        let Ok(mut lift) = lifts.get_mut(event.volume) else {
            continue;
        };
        if !has_tag(&tags, event.other, PLAYER_TAG) {
            continue;
        }
        let (Some(wheelchair), Some(elevator)) = (lift.wheelchair, lift.elevator_animator) else {
            warn!("Lift {:?} is missing its wheelchair or elevator reference", event.volume);
            continue;
        };
        let Ok(mut animator) = animators.get_mut(elevator) else {
            warn!("Lift {:?} elevator has no animator", event.volume);
            continue;
        };

        let carried_by_player = parents.get(wheelchair).is_ok_and(|parent| parent.get() == event.other);
        if !carried_by_player {
            continue;
        }

        lift.elevator_is_up = !lift.elevator_is_up;
        animator.set_bool(LIFT_UP_PARAM, lift.elevator_is_up);
        info!("Lift {:?} going {}", event.volume, if lift.elevator_is_up { "up" } else { "down" });
    }
}

/// Point each cabin at the stop matching its animator.
pub fn move_lift_cabins(mut cabins: Query<(&LiftCabin, &AnimatorParams, &mut SmoothTranslation), Changed<AnimatorParams>>) {
    for (cabin, animator, mut smooth) in cabins.iter_mut() {
        smooth.target = Some(if animator.get_bool(LIFT_UP_PARAM) {
            cabin.up
        } else {
            cabin.down
        });
    }
}
