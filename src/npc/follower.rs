//! NPCs that trail the player or return to their post.

use bevy::prelude::*;
use bevy_rapier2d::prelude::*;

use crate::core::Suspended;

/// Steering behaviour for a physics-driven NPC.
#[derive(Component, Debug, Clone)]
pub struct NpcFollower {
    /// Player to follow when following is on
    pub player: Option<Entity>,
    pub follow_player: bool,
    /// Units per second while moving
    pub move_speed: f32,
    /// Velocity change per second; 0 snaps straight to the desired velocity
    pub max_acceleration: f32,
    /// Horizontal distance kept from the player, on whichever side the NPC is
    pub x_offset: f32,
    pub y_offset: f32,
    /// Distance at which the NPC counts as arrived
    pub arrive_radius: f32,
    /// Entity whose sprite flips with motion; None uses the NPC itself
    pub sprite: Option<Entity>,
    /// True when the unflipped art faces left
    pub base_art_faces_left: bool,
    home: Option<Vec2>,
    last_direction: Vec2,
}

impl Default for NpcFollower {
    fn default() -> Self {
        Self {
            player: None,
            follow_player: false,
            move_speed: 3.5,
            max_acceleration: 12.0,
            x_offset: 1.5,
            y_offset: 0.0,
            arrive_radius: 0.05,
            sprite: None,
            base_art_faces_left: true,
            home: None,
            last_direction: Vec2::X,
        }
    }
}

impl NpcFollower {
    pub fn following(player: Entity) -> Self {
        Self {
            player: Some(player),
            follow_player: true,
            ..default()
        }
    }

    /// Position captured when the follower was spawned.
    pub fn home(&self) -> Option<Vec2> {
        self.home
    }
}

/// Turns following on or off for one NPC.
#[derive(Event, Debug, Clone, Copy)]
pub struct SetFollowPlayer {
    pub npc: Entity,
    pub follow: bool,
}

/// Offset from the player, mirrored to the side the NPC is standing on.
pub fn follow_offset(npc_x: f32, target_x: f32, x_offset: f32, y_offset: f32) -> Vec2 {
    let side = if npc_x < target_x { -1.0 } else { 1.0 };
    Vec2::new(x_offset * side, y_offset)
}

/// Move `current` toward `target` by at most `max_delta`.
pub fn move_towards(current: Vec2, target: Vec2, max_delta: f32) -> Vec2 {
    let delta = target - current;
    let distance = delta.length();
    if distance <= max_delta || distance <= f32::EPSILON {
        target
    } else {
        current + delta / distance * max_delta
    }
}

/// Whether the sprite should be flipped for the given horizontal motion.
pub fn facing_flip(x_velocity: f32, last_direction_x: f32, base_art_faces_left: bool) -> bool {
    let x = if x_velocity != 0.0 { x_velocity } else { last_direction_x };
    let moving_left = x < 0.0;
    if base_art_faces_left {
        !moving_left
    } else {
        moving_left
    }
}

/// Remember where each follower started.
pub fn capture_follower_home(mut query: Query<(&Transform, &mut NpcFollower), Added<NpcFollower>>) {
    for (transform, mut follower) in query.iter_mut() {
        follower.home = Some(transform.translation.truncate());
    }
}

/// Apply follow/unfollow requests.
pub fn apply_follow_requests(mut requests: EventReader<SetFollowPlayer>, mut query: Query<&mut NpcFollower>) {
    for request in requests.read() {
        if let Ok(mut follower) = query.get_mut(request.npc) {
            follower.follow_player = request.follow;
        }
    }
}

/// Steer followers toward their target each physics step.
pub fn steer_followers(
    time: Res<Time>,
    targets: Query<&Transform, Without<NpcFollower>>,
    mut followers: Query<(Entity, &Transform, &mut NpcFollower, &mut Velocity), Without<Suspended>>,
    mut sprites: Query<&mut Sprite>,
) {
    let dt = time.delta_secs();

    for (entity, transform, mut follower, mut velocity) in followers.iter_mut() {
        let position = transform.translation.truncate();

        let player_position = follower
            .player
            .filter(|_| follower.follow_player)
            .and_then(|player| targets.get(player).ok())
            .map(|player_transform| player_transform.translation.truncate());

        let desired_position = match player_position {
            Some(target) => target + follow_offset(position.x, target.x, follower.x_offset, follower.y_offset),
            None => follower.home.unwrap_or(position),
        };

        let to_target = desired_position - position;
        let desired_velocity = if to_target.length() <= follower.arrive_radius {
            Vec2::ZERO
        } else {
            to_target.normalize() * follower.move_speed
        };

        velocity.linvel = if follower.max_acceleration > 0.0 {
            move_towards(velocity.linvel, desired_velocity, follower.max_acceleration * dt)
        } else {
            desired_velocity
        };

        let sprite_entity = follower.sprite.unwrap_or(entity);
        if let Ok(mut sprite) = sprites.get_mut(sprite_entity) {
            let flip = facing_flip(velocity.linvel.x, follower.last_direction.x, follower.base_art_faces_left);
            if sprite.flip_x != flip {
                sprite.flip_x = flip;
            }
        }
        if velocity.linvel.length_squared() > 0.0001 {
            follower.last_direction = velocity.linvel;
        }
    }
}
