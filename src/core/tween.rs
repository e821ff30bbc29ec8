//! Smooth 2D translation and easing curves.

use bevy::prelude::*;

/// Easing functions for normalized `t` in 0.0..=1.0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Easing {
    #[default]
    Linear,
    QuadIn,
    QuadOut,
    /// Hermite smoothstep, slow start and end
    SmoothStep,
}

impl Easing {
    pub fn apply(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Easing::Linear => t,
            Easing::QuadIn => t * t,
            Easing::QuadOut => t * (2.0 - t),
            Easing::SmoothStep => t * t * (3.0 - 2.0 * t),
        }
    }
}

/// Glides an entity's translation toward a 2D target, keeping its z.
#[derive(Component, Debug, Clone)]
pub struct SmoothTranslation {
    /// Target position (None = stay put)
    pub target: Option<Vec2>,
    /// Interpolation speed multiplier (higher = faster)
    pub speed: f32,
}

impl Default for SmoothTranslation {
    fn default() -> Self {
        Self {
            target: None,
            speed: 4.0,
        }
    }
}

impl SmoothTranslation {
    pub fn new(speed: f32) -> Self {
        Self { target: None, speed }
    }
}

/// System that interpolates translations toward their targets.
pub fn update_smooth_translations(time: Res<Time>, mut query: Query<(&mut Transform, &SmoothTranslation)>) {
    let dt = time.delta_secs();

    for (mut transform, smooth) in query.iter_mut() {
        let Some(target) = smooth.target else {
            continue;
        };
        let t = (smooth.speed * dt).min(1.0);
        let current = transform.translation.truncate();
        let next = current.lerp(target, t);
        transform.translation.x = next.x;
        transform.translation.y = next.y;
    }
}
