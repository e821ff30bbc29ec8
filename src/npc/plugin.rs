//! NPC plugin - follower steering.

use bevy::prelude::*;
use bevy_rapier2d::plugin::PhysicsSet;

use super::follower::*;
use crate::core::{GameState, GameplaySet};

/// NPC plugin - handles NPC followers.
pub struct NpcPlugin;

impl Plugin for NpcPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<SetFollowPlayer>()
            .add_systems(
                Update,
                (capture_follower_home, apply_follow_requests)
                    .chain()
                    .in_set(GameplaySet::Behaviour),
            )
            .add_systems(
                FixedUpdate,
                steer_followers
                    .before(PhysicsSet::SyncBackend)
                    .run_if(in_state(GameState::Playing)),
            );
    }
}
