//! Default attributes of living kinds.
//!
//! Living entities carry numeric attributes (health, speed, ...). An
//! injection for a living kind installs an `AttributeSupplier` with the
//! host in phase 1; non-living kinds cannot have one.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

/// Name of an attribute in the host's attribute registry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Attribute(pub &'static str);

impl Attribute {
    pub const ARMOR: Attribute = Attribute("minecraft:armor");
    pub const ARMOR_TOUGHNESS: Attribute = Attribute("minecraft:armor_toughness");
    pub const ATTACK_DAMAGE: Attribute = Attribute("minecraft:attack_damage");
    pub const FOLLOW_RANGE: Attribute = Attribute("minecraft:follow_range");
    pub const GRAVITY: Attribute = Attribute("minecraft:gravity");
    pub const KNOCKBACK_RESISTANCE: Attribute = Attribute("minecraft:knockback_resistance");
    pub const MAX_ABSORPTION: Attribute = Attribute("minecraft:max_absorption");
    pub const MAX_HEALTH: Attribute = Attribute("minecraft:max_health");
    pub const MOVEMENT_SPEED: Attribute = Attribute("minecraft:movement_speed");
    pub const SAFE_FALL_DISTANCE: Attribute = Attribute("minecraft:safe_fall_distance");
    pub const SCALE: Attribute = Attribute("minecraft:scale");
    pub const STEP_HEIGHT: Attribute = Attribute("minecraft:step_height");

    #[must_use]
    pub fn name(&self) -> &'static str {
        self.0
    }
}

impl std::fmt::Display for Attribute {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.0)
    }
}

/// Base values of a kind's attributes.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AttributeSupplier {
    values: FxHashMap<Attribute, f64>,
}

impl AttributeSupplier {
    /// An empty supplier.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// What every living entity starts with.
    #[must_use]
    pub fn living_defaults() -> Self {
        Self::new()
            .with(Attribute::MAX_HEALTH, 20.0)
            .with(Attribute::KNOCKBACK_RESISTANCE, 0.0)
            .with(Attribute::MOVEMENT_SPEED, 0.7)
            .with(Attribute::ARMOR, 0.0)
            .with(Attribute::ARMOR_TOUGHNESS, 0.0)
            .with(Attribute::MAX_ABSORPTION, 0.0)
            .with(Attribute::STEP_HEIGHT, 0.6)
            .with(Attribute::SCALE, 1.0)
            .with(Attribute::GRAVITY, 0.08)
            .with(Attribute::SAFE_FALL_DISTANCE, 3.0)
    }

    /// Living defaults plus what a mob with AI needs.
    #[must_use]
    pub fn mob_defaults() -> Self {
        Self::living_defaults().with(Attribute::FOLLOW_RANGE, 16.0)
    }

    /// Set `attribute`, replacing an earlier value.
    #[must_use]
    pub fn with(mut self, attribute: Attribute, value: f64) -> Self {
        self.values.insert(attribute, value);
        self
    }

    #[must_use]
    pub fn get(&self, attribute: Attribute) -> Option<f64> {
        self.values.get(&attribute).copied()
    }

    #[must_use]
    pub fn has(&self, attribute: Attribute) -> bool {
        self.values.contains_key(&attribute)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Attribute, f64)> + '_ {
        self.values.iter().map(|(a, v)| (*a, *v))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_living_defaults() {
        let attrs = AttributeSupplier::living_defaults();
        assert_eq!(attrs.get(Attribute::MAX_HEALTH), Some(20.0));
        assert!(!attrs.has(Attribute::FOLLOW_RANGE));
        assert!(AttributeSupplier::mob_defaults().has(Attribute::FOLLOW_RANGE));
    }

    #[test]
    fn test_with_overrides() {
        let attrs = AttributeSupplier::living_defaults()
            .with(Attribute::MAX_HEALTH, 10.0)
            .with(Attribute::MOVEMENT_SPEED, 0.25);

        assert_eq!(attrs.get(Attribute::MAX_HEALTH), Some(10.0));
        assert_eq!(attrs.get(Attribute::MOVEMENT_SPEED), Some(0.25));
        assert_eq!(attrs.len(), AttributeSupplier::living_defaults().len());
    }
}
