//! Interactables plugin - environment pieces reacting to bodies and input.

use bevy::prelude::*;
use bevy_rapier2d::plugin::PhysicsSet;

use super::lift::*;
use super::light_charger::*;
use super::pressure_plate::*;
use super::sliding_floor::*;
use super::wheelchair::*;
use crate::core::{GameState, GameplaySet};

/// Interactables plugin - chargers, plates, lifts, belts and the wheelchair.
///
/// The belt gizmo outline is not registered here; debug builds add
/// `draw_belt_sensors` themselves.
pub struct InteractablesPlugin;

impl Plugin for InteractablesPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            Update,
            (
                (init_light_chargers, light_charger_triggers, charge_light_chargers).chain(),
                press_plates,
                (init_lifts, operate_lifts).chain(),
                (init_wheelchairs, wheelchair_range, carry_wheelchairs).chain(),
            )
                .in_set(GameplaySet::Behaviour),
        )
        .add_systems(
            Update,
            (open_doors, move_lift_cabins).in_set(GameplaySet::Feedback),
        )
        .add_systems(
            FixedUpdate,
            (detect_belt_riders, push_belt_riders)
                .chain()
                .before(PhysicsSet::SyncBackend)
                .run_if(in_state(GameState::Playing)),
        );
    }
}
