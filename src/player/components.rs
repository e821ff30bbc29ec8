//! Player-related components.

use bevy::prelude::*;

/// Animator boolean raised while the player walks.
pub const WALKING_PARAM: &str = "isPlayerWalking";

/// Marker component for the player entity.
#[derive(Component)]
pub struct Player;

/// Horizontal movement state of the player.
#[derive(Component, Debug, Clone)]
pub struct PlayerMovement {
    /// Current speed in units per second
    pub speed: f32,
    /// Speed the player spawned with; modifiers scale from this
    pub original_speed: f32,
    /// Input magnitude above which the player counts as walking
    pub walk_threshold: f32,
    /// Raw horizontal input sampled this frame, -1.0..=1.0
    pub horizontal_input: f32,
}

impl Default for PlayerMovement {
    fn default() -> Self {
        Self::new(5.0, 0.01)
    }
}

impl PlayerMovement {
    pub fn new(speed: f32, walk_threshold: f32) -> Self {
        Self {
            speed,
            original_speed: speed,
            walk_threshold,
            horizontal_input: 0.0,
        }
    }

    /// Scale speed from the original, e.g. while pushing a wheelchair.
    pub fn modify_speed(&mut self, multiplier: f32) {
        self.speed = self.original_speed * multiplier;
    }

    pub fn reset_speed(&mut self) {
        self.speed = self.original_speed;
    }

    pub fn is_walking(&self) -> bool {
        self.horizontal_input.abs() > self.walk_threshold
    }

    /// Facing for the sprite: `Some(true)` flips left, `Some(false)` faces
    /// right, `None` keeps whatever it was.
    pub fn facing_flip(&self) -> Option<bool> {
        if self.horizontal_input > self.walk_threshold {
            Some(false)
        } else if self.horizontal_input < -self.walk_threshold {
            Some(true)
        } else {
            None
        }
    }
}
