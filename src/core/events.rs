//! Global events used for cross-behaviour communication.
//!
//! Behaviours never call each other directly. A trigger volume reports an
//! overlap, an interactor reports a button press, a dialogue reports that it
//! started or finished, and whoever cares listens.

use bevy::prelude::*;
use serde::Deserialize;

/// Sent when `other` starts overlapping the collider of `volume`.
///
/// Dispatched in both directions for every rapier collision start, so a
/// behaviour only has to look for events whose `volume` it owns.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct TriggerEntered {
    pub volume: Entity,
    pub other: Entity,
}

/// Sent when `other` stops overlapping the collider of `volume`.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct TriggerExited {
    pub volume: Entity,
    pub other: Entity,
}

/// Sent when the player presses interact inside an interactor's range.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Interacted {
    /// Entity carrying the `Interactor`
    pub interactor: Entity,
    /// The player standing in range
    pub player: Entity,
}

/// Sent when an NPC dialogue sequence begins (also on an accepted restart).
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct DialogueStarted {
    pub interactor: Entity,
}

/// Sent when an NPC dialogue sequence has played to its end.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct DialogueFinished {
    pub interactor: Entity,
}

/// Sent for every dialogue beat shown, by interactors and loopers alike.
#[derive(Event, Debug, Clone, PartialEq, Eq)]
pub struct DialogueBeat {
    /// The interactor or looper playing the sequence
    pub source: Entity,
    /// Library id of the sequence
    pub sequence: String,
    /// Index of the step just shown
    pub step: usize,
}

/// A scene addressed either by build index or by name.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub enum SceneRef {
    Index(usize),
    Name(String),
}

impl std::fmt::Display for SceneRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SceneRef::Index(index) => write!(f, "#{}", index),
            SceneRef::Name(name) => write!(f, "'{}'", name),
        }
    }
}

/// Request to switch to another scene.
#[derive(Event, Debug, Clone, PartialEq, Eq)]
pub struct LoadScene(pub SceneRef);
