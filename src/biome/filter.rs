//! Biome predicates.
//!
//! Filters compose with `and`/`or`/`not` over three atoms: base temperature
//! range, tag membership, and exact key membership.

use serde::{Deserialize, Serialize};

use crate::core::Key;
use crate::host::Biome;

/// Inclusive temperature interval. Either bound may be infinite.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TemperatureRange {
    pub min: f64,
    pub max: f64,
}

impl TemperatureRange {
    /// Temperatures at or below 0.5.
    pub const COLD: TemperatureRange = TemperatureRange::new(f64::NEG_INFINITY, 0.5);
    /// Temperatures between 0.5 and 0.9.
    pub const TEMPERATE: TemperatureRange = TemperatureRange::new(0.5, 0.9);
    /// Temperatures at or above 0.9.
    pub const WARM: TemperatureRange = TemperatureRange::new(0.9, f64::INFINITY);

    #[must_use]
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// `[min, +inf)`
    #[must_use]
    pub const fn at_least(min: f64) -> Self {
        Self::new(min, f64::INFINITY)
    }

    /// `(-inf, max]`
    #[must_use]
    pub const fn at_most(max: f64) -> Self {
        Self::new(f64::NEG_INFINITY, max)
    }

    #[must_use]
    pub fn contains(&self, temperature: f64) -> bool {
        self.min <= temperature && temperature <= self.max
    }
}

/// A predicate over biomes.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum BiomeFilter {
    /// Every filter matches. Empty is true.
    And(Vec<BiomeFilter>),
    /// At least one filter matches. Empty is false.
    Or(Vec<BiomeFilter>),
    Not(Box<BiomeFilter>),
    /// Base temperature in range.
    BaseTemperature(TemperatureRange),
    /// Biome carries the tag.
    Tag(Key),
    /// Biome key is one of these.
    Keys(Vec<Key>),
}

impl BiomeFilter {
    pub fn and(filters: impl IntoIterator<Item = BiomeFilter>) -> Self {
        Self::And(filters.into_iter().collect())
    }

    pub fn or(filters: impl IntoIterator<Item = BiomeFilter>) -> Self {
        Self::Or(filters.into_iter().collect())
    }

    #[allow(clippy::should_implement_trait)]
    pub fn not(filter: BiomeFilter) -> Self {
        Self::Not(Box::new(filter))
    }

    pub fn base_temperature(range: TemperatureRange) -> Self {
        Self::BaseTemperature(range)
    }

    pub fn tag(tag: Key) -> Self {
        Self::Tag(tag)
    }

    pub fn keys(keys: impl IntoIterator<Item = Key>) -> Self {
        Self::Keys(keys.into_iter().collect())
    }

    /// Biomes tagged `minecraft:is_overworld`.
    pub fn overworld() -> Self {
        Self::Tag(Key::from_static("minecraft", "is_overworld"))
    }

    /// Biomes tagged `minecraft:is_nether`.
    pub fn nether() -> Self {
        Self::Tag(Key::from_static("minecraft", "is_nether"))
    }

    /// Biomes tagged `minecraft:is_end`.
    pub fn end() -> Self {
        Self::Tag(Key::from_static("minecraft", "is_end"))
    }

    /// Evaluate against `biome`. Combinators short-circuit.
    #[must_use]
    pub fn test(&self, biome: &Biome) -> bool {
        match self {
            BiomeFilter::And(filters) => filters.iter().all(|f| f.test(biome)),
            BiomeFilter::Or(filters) => filters.iter().any(|f| f.test(biome)),
            BiomeFilter::Not(filter) => !filter.test(biome),
            BiomeFilter::BaseTemperature(range) => {
                range.contains(f64::from(biome.base_temperature))
            }
            BiomeFilter::Tag(tag) => biome.has_tag(tag),
            BiomeFilter::Keys(keys) => keys.contains(&biome.key),
        }
    }
}
