//! Interactables module - environment behaviours the player and NPCs trip.

mod lift;
mod light_charger;
mod plugin;
mod pressure_plate;
mod sliding_floor;
mod wheelchair;

pub use lift::{LiftCabin, LiftManager, LIFT_UP_PARAM};
pub use light_charger::{stage_for, LightCharger, MAX_STAGE};
pub use plugin::InteractablesPlugin;
pub use pressure_plate::{Door, PressurePlate};
pub use sliding_floor::{belt_impulse, draw_belt_sensors, BeltRiders, SlidingFloor};
pub use wheelchair::WheelChair;
