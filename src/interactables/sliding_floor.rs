//! Conveyor floors that drag tagged bodies to the left.

use bevy::prelude::*;
use bevy_rapier2d::prelude::*;

use crate::core::{ActorTag, Suspended, PLAYER_TAG};

/// Conveyor belt on a solid floor. `half_extents` mirror the floor collider.
#[derive(Component, Debug, Clone)]
#[require(BeltRiders)]
pub struct SlidingFloor {
    pub target_tag: String,
    /// Extra leftward speed the belt pushes toward, units per second
    pub max_belt_speed: f32,
    /// Velocity change per second the belt may apply
    pub belt_acceleration: f32,
    pub half_extents: Vec2,
    /// Thickness of the detection box above the floor top
    pub sensor_height: f32,
    /// Gap between the floor top and the detection box
    pub sensor_offset: f32,
    pub draw_gizmos: bool,
}

impl Default for SlidingFloor {
    fn default() -> Self {
        Self {
            target_tag: PLAYER_TAG.to_string(),
            max_belt_speed: 3.0,
            belt_acceleration: 25.0,
            half_extents: Vec2::new(2.0, 0.25),
            sensor_height: 0.12,
            sensor_offset: 0.02,
            draw_gizmos: true,
        }
    }
}

impl SlidingFloor {
    /// Center and full size of the detection box for a floor centered at `floor_center`.
    pub fn sensor_box(&self, floor_center: Vec2) -> (Vec2, Vec2) {
        let top = floor_center.y + self.half_extents.y;
        let center = Vec2::new(floor_center.x, top + self.sensor_offset + self.sensor_height * 0.5);
        let size = Vec2::new(self.half_extents.x * 2.0, self.sensor_height);
        (center, size)
    }
}

/// Horizontal impulse nudging a body moving at `vx` toward `-max_speed`,
/// changing its velocity by at most `acceleration * dt`.
pub fn belt_impulse(vx: f32, mass: f32, max_speed: f32, acceleration: f32, dt: f32) -> f32 {
    let limit = acceleration * dt;
    let delta_v = (-max_speed - vx).clamp(-limit, limit);
    mass * delta_v
}

/// Bodies found in a belt's detection box during the last fixed step.
#[derive(Component, Debug, Clone, Default)]
pub struct BeltRiders(pub Vec<Entity>);

/// Refresh every active belt's riders from the physics world.
pub fn detect_belt_riders(
    contexts: Query<&RapierContext>,
    mut floors: Query<(Entity, &SlidingFloor, &GlobalTransform, &mut BeltRiders), Without<Suspended>>,
) {
    let Ok(context) = contexts.get_single() else {
        return;
    };

    for (floor_entity, floor, transform, mut riders) in floors.iter_mut() {
        let (center, size) = floor.sensor_box(transform.translation().truncate());
        let sensor = Collider::cuboid(size.x * 0.5, size.y * 0.5);
        let filter = QueryFilter::new().exclude_collider(floor_entity).exclude_sensors();

        riders.0.clear();
        context.intersections_with_shape(center, 0.0, &sensor, filter, |entity| {
            riders.0.push(entity);
            true
        });
    }
}

/// Push tagged riders toward the belt speed.
///
/// Runs once per fixed step, right before the physics step consumes the
/// queued impulses, so each step sees at most one belt impulse per body.
pub fn push_belt_riders(
    time: Res<Time>,
    floors: Query<(&SlidingFloor, &BeltRiders), Without<Suspended>>,
    mut bodies: Query<(&ActorTag, &Velocity, &ReadMassProperties, &mut ExternalImpulse)>,
) {
    let dt = time.delta_secs();
    if dt <= 0.0 {
        return;
    }

    for (floor, riders) in floors.iter() {
        for &entity in &riders.0 {
            let Ok((tag, velocity, mass, mut impulse)) = bodies.get_mut(entity) else {
                continue;
            };
            if !tag.is(&floor.target_tag) {
                continue;
            }
            impulse.impulse.x += belt_impulse(
                velocity.linvel.x,
                mass.get().mass,
                floor.max_belt_speed,
                floor.belt_acceleration,
                dt,
            );
        }
    }
}

/// Outline each belt's detection box.
pub fn draw_belt_sensors(mut gizmos: Gizmos, floors: Query<(&SlidingFloor, &GlobalTransform)>) {
    for (floor, transform) in floors.iter() {
        if !floor.draw_gizmos {
            continue;
        }
        let (center, size) = floor.sensor_box(transform.translation().truncate());
        gizmos.rect_2d(Isometry2d::from_translation(center), size, Color::srgb(0.0, 1.0, 0.0));
    }
}
