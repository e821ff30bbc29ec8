//! Named animation parameters written by gameplay, read by the animation host.
//!
//! Gameplay never drives sprite sheets or clips itself. It flips booleans
//! like `isUp` or `isPlayerWalking` and pulses triggers like `Open`, and
//! whatever animates the entity reacts to them.

use bevy::prelude::*;
use std::collections::{HashMap, HashSet};

/// Parameter table of an animated entity.
#[derive(Component, Debug, Default, Clone)]
pub struct AnimatorParams {
    bools: HashMap<String, bool>,
    triggers: HashSet<String>,
}

impl AnimatorParams {
    /// Builder used at spawn to seed a boolean.
    pub fn with_bool(mut self, name: impl Into<String>, value: bool) -> Self {
        self.bools.insert(name.into(), value);
        self
    }

    pub fn set_bool(&mut self, name: &str, value: bool) {
        match self.bools.get_mut(name) {
            Some(current) => *current = value,
            None => {
                self.bools.insert(name.to_string(), value);
            }
        }
    }

    /// Unset booleans read as false.
    pub fn get_bool(&self, name: &str) -> bool {
        self.bools.get(name).copied().unwrap_or(false)
    }

    /// Pulse a trigger; it stays pending until consumed.
    pub fn set_trigger(&mut self, name: &str) {
        self.triggers.insert(name.to_string());
    }

    pub fn is_triggered(&self, name: &str) -> bool {
        self.triggers.contains(name)
    }

    /// Consume a pending trigger, returning whether it was set.
    pub fn consume_trigger(&mut self, name: &str) -> bool {
        self.triggers.remove(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn triggers_are_consumed_once() {
        let mut params = AnimatorParams::default();
        params.set_trigger("Open");
        params.set_trigger("Open");
        assert!(params.consume_trigger("Open"));
        assert!(!params.consume_trigger("Open"));
    }

    #[test]
    fn bools_default_to_false() {
        let mut params = AnimatorParams::default().with_bool("isUp", true);
        assert!(params.get_bool("isUp"));
        assert!(!params.get_bool("isPlayerWalking"));
        params.set_bool("isUp", false);
        assert!(!params.get_bool("isUp"));
    }
}
