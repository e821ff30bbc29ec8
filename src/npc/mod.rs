//! NPC module - NPC movement behaviours.

mod follower;
mod plugin;

pub use follower::{follow_offset, move_towards, NpcFollower, SetFollowPlayer};
pub use plugin::NpcPlugin;
