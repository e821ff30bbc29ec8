//! Pressure plates that open doors when the right body steps on them.

use bevy::prelude::*;
use bevy_rapier2d::prelude::ColliderDisabled;

use crate::core::{ActorTag, AnimatorParams, Suspended, TriggerEntered, NPC_TAG};

/// Pulses a trigger on a door's animator when a tagged body enters.
#[derive(Component, Debug, Clone)]
pub struct PressurePlate {
    pub door_animator: Option<Entity>,
    /// Trigger parameter pulsed on the door animator
    pub door_trigger: String,
    /// Only bodies with this tag press the plate; `None` accepts everything
    pub required_tag: Option<String>,
}

impl Default for PressurePlate {
    fn default() -> Self {
        Self {
            door_animator: None,
            door_trigger: "Open".to_string(),
            required_tag: Some(NPC_TAG.to_string()),
        }
    }
}

impl PressurePlate {
    pub fn for_door(door: Entity) -> Self {
        Self {
            door_animator: Some(door),
            ..default()
        }
    }

    fn accepts(&self, tag: Option<&ActorTag>) -> bool {
        match self.required_tag.as_deref() {
            None | Some("") => true,
            Some(required) => tag.is_some_and(|tag| tag.is(required)),
        }
    }
}

/// Door that opens on its animator's trigger: it stops blocking and hides.
#[derive(Component, Debug, Clone)]
pub struct Door {
    pub open_trigger: String,
    pub is_open: bool,
}

impl Default for Door {
    fn default() -> Self {
        Self {
            open_trigger: "Open".to_string(),
            is_open: false,
        }
    }
}

/// Pulse door triggers for bodies stepping on plates.
pub fn press_plates(
    mut entered: EventReader<TriggerEntered>,
    plates: Query<&PressurePlate, Without<Suspended>>,
    tags: Query<&ActorTag>,
    mut animators: Query<&mut AnimatorParams>,
) {
    for event in entered.read() {
        let Ok(plate) = plates.get(event.volume) else {
            continue;
        };
        if !plate.accepts(tags.get(event.other).ok()) {
            continue;
        }
        if let Some(mut animator) = plate.door_animator.and_then(|door| animators.get_mut(door).ok()) {
            animator.set_trigger(&plate.door_trigger);
        }
    }
}

/// Open doors whose trigger was pulsed.
pub fn open_doors(
    mut commands: Commands,
    mut doors: Query<(Entity, &mut Door, &mut AnimatorParams, Option<&mut Visibility>), Changed<AnimatorParams>>,
) {
    for (entity, mut door, mut animator, visibility) in doors.iter_mut() {
        if !animator.consume_trigger(&door.open_trigger) || door.is_open {
            continue;
        }
        door.is_open = true;
        if let Some(mut visibility) = visibility {
            *visibility = Visibility::Hidden;
        }
        commands.entity(entity).insert(ColliderDisabled);
    }
}
