//! Tags and markers shared by every behaviour.

use bevy::prelude::*;

/// Tag carried by the player entity.
pub const PLAYER_TAG: &str = "Player";

/// Tag carried by NPC bodies (pressure plates react to it by default).
pub const NPC_TAG: &str = "NPC";

/// String tag used by trigger filters.
#[derive(Component, Debug, Clone, PartialEq, Eq)]
pub struct ActorTag(pub String);

impl ActorTag {
    pub fn new(tag: impl Into<String>) -> Self {
        Self(tag.into())
    }

    pub fn player() -> Self {
        Self::new(PLAYER_TAG)
    }

    pub fn npc() -> Self {
        Self::new(NPC_TAG)
    }

    pub fn is(&self, tag: &str) -> bool {
        self.0 == tag
    }
}

/// Returns true when `entity` carries an `ActorTag` equal to `tag`.
pub fn has_tag(tags: &Query<&ActorTag>, entity: Entity, tag: &str) -> bool {
    tags.get(entity).is_ok_and(|actor_tag| actor_tag.is(tag))
}

/// Marks a behaviour as disabled.
///
/// Movement, followers, interactors and loopers all skip suspended
/// entities. Dialogue inserts this on its `disable_during_dialogue` list and
/// removes it afterwards.
#[derive(Component, Debug, Default, Clone, Copy)]
pub struct Suspended;
