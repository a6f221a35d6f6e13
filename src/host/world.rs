//! World context handed over by the host: where an entity is spawning and
//! what the biome there looks like.

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

use crate::core::Key;

/// A spawn position with the environment facts variant rules look at.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Location {
    /// World (dimension) key.
    pub world: Key,
    /// Biome at the position.
    pub biome: Key,
    pub x: f64,
    pub y: f64,
    pub z: f64,
    /// Temperature the host computed at the block position.
    pub temperature: f64,
}

impl Location {
    /// Origin of `world` in `biome`, temperature 0.5.
    pub fn new(world: Key, biome: Key) -> Self {
        Self {
            world,
            biome,
            x: 0.0,
            y: 0.0,
            z: 0.0,
            temperature: 0.5,
        }
    }

    #[must_use]
    pub fn at(mut self, x: f64, y: f64, z: f64) -> Self {
        self.x = x;
        self.y = y;
        self.z = z;
        self
    }

    #[must_use]
    pub fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = temperature;
        self
    }

    /// Block coordinates of the position.
    #[must_use]
    pub fn block(&self) -> (i64, i64, i64) {
        (
            self.x.floor() as i64,
            self.y.floor() as i64,
            self.z.floor() as i64,
        )
    }
}

/// A biome as seen during world setup.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Biome {
    pub key: Key,
    pub base_temperature: f32,
    pub tags: FxHashSet<Key>,
}

impl Biome {
    pub fn new(key: Key, base_temperature: f32) -> Self {
        Self {
            key,
            base_temperature,
            tags: FxHashSet::default(),
        }
    }

    #[must_use]
    pub fn with_tag(mut self, tag: Key) -> Self {
        self.tags.insert(tag);
        self
    }

    #[must_use]
    pub fn has_tag(&self, tag: &Key) -> bool {
        self.tags.contains(tag)
    }
}
