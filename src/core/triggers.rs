//! Turns rapier collision events into trigger enter/exit events.

use bevy::prelude::*;
use bevy_rapier2d::prelude::CollisionEvent;

use super::events::{TriggerEntered, TriggerExited};

/// Re-sends every rapier collision start/stop as a pair of trigger events,
/// one from the point of view of each collider.
pub fn dispatch_trigger_events(
    mut collisions: EventReader<CollisionEvent>,
    mut entered: EventWriter<TriggerEntered>,
    mut exited: EventWriter<TriggerExited>,
) {
    for collision in collisions.read() {
        match *collision {
            CollisionEvent::Started(a, b, _) => {
                entered.send(TriggerEntered { volume: a, other: b });
                entered.send(TriggerEntered { volume: b, other: a });
            }
            CollisionEvent::Stopped(a, b, _) => {
                exited.send(TriggerExited { volume: a, other: b });
                exited.send(TriggerExited { volume: b, other: a });
            }
        }
    }
}
