//! Natural-spawn rules and the per-biome spawn tables they feed.
//!
//! A `SpawnRule` is evaluated once per biome during world setup. A match
//! yields `SpawnData`, which is appended to the biome's `MobSpawnSettings`
//! under the injection's mob category.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::host::{Biome, EntityType};
use crate::inject::MobCategory;

use super::filter::BiomeFilter;

/// Spawn spacing cost.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct MobCost {
    pub charge: f64,
    pub energy_budget: f64,
}

impl MobCost {
    #[must_use]
    pub const fn new(charge: f64, energy_budget: f64) -> Self {
        Self {
            charge,
            energy_budget,
        }
    }
}

/// Natural-spawn parameters for one biome.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SpawnData {
    pub weight: u32,
    pub min_group_size: u32,
    pub max_group_size: u32,
    pub cost: Option<MobCost>,
}

impl SpawnData {
    #[must_use]
    pub const fn new(weight: u32, min_group_size: u32, max_group_size: u32) -> Self {
        Self {
            weight,
            min_group_size,
            max_group_size,
            cost: None,
        }
    }

    /// Groups of exactly `group_size`.
    #[must_use]
    pub const fn fixed(weight: u32, group_size: u32) -> Self {
        Self::new(weight, group_size, group_size)
    }

    #[must_use]
    pub const fn with_cost(mut self, charge: f64, energy_budget: f64) -> Self {
        self.cost = Some(MobCost::new(charge, energy_budget));
        self
    }

    /// Spawner entry for `entity_type`.
    #[must_use]
    pub fn to_spawner(&self, entity_type: EntityType) -> WeightedSpawner {
        WeightedSpawner {
            entity_type,
            weight: self.weight,
            min_group_size: self.min_group_size,
            max_group_size: self.max_group_size,
        }
    }
}

/// Decides whether, and how, a kind spawns naturally in a biome.
///
/// Every rule can decline, so `first_match` has no reachability check.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub enum SpawnRule {
    /// Never spawns.
    #[default]
    Never,
    /// Spawns with `data` where `filter` matches.
    IfBiome { filter: BiomeFilter, data: SpawnData },
    /// First rule that matches, left to right.
    FirstMatch(Vec<SpawnRule>),
}

impl SpawnRule {
    pub fn never() -> Self {
        Self::Never
    }

    pub fn if_biome(filter: BiomeFilter, data: SpawnData) -> Self {
        Self::IfBiome { filter, data }
    }

    pub fn first_match(rules: impl IntoIterator<Item = SpawnRule>) -> Self {
        Self::FirstMatch(rules.into_iter().collect())
    }

    /// Spawn data for `biome`, or `None` if the kind does not spawn there.
    #[must_use]
    pub fn apply(&self, biome: &Biome) -> Option<SpawnData> {
        match self {
            SpawnRule::Never => None,
            SpawnRule::IfBiome { filter, data } => filter.test(biome).then_some(*data),
            SpawnRule::FirstMatch(rules) => rules.iter().find_map(|rule| rule.apply(biome)),
        }
    }
}

/// One weighted entry of a biome spawn list.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeightedSpawner {
    pub entity_type: EntityType,
    pub weight: u32,
    pub min_group_size: u32,
    pub max_group_size: u32,
}

/// A biome's spawn lists and spawn costs.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MobSpawnSettings {
    spawners: FxHashMap<MobCategory, Vec<WeightedSpawner>>,
    costs: FxHashMap<EntityType, MobCost>,
}

impl MobSpawnSettings {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append to the list of `category`.
    pub fn add_spawner(&mut self, category: MobCategory, spawner: WeightedSpawner) {
        self.spawners.entry(category).or_default().push(spawner);
    }

    #[must_use]
    pub fn spawners(&self, category: MobCategory) -> &[WeightedSpawner] {
        self.spawners.get(&category).map_or(&[], Vec::as_slice)
    }

    pub fn set_cost(&mut self, entity_type: EntityType, cost: MobCost) {
        self.costs.insert(entity_type, cost);
    }

    #[must_use]
    pub fn cost(&self, entity_type: EntityType) -> Option<&MobCost> {
        self.costs.get(&entity_type)
    }

    /// Add `entity_type` per `data`: spawner under `category`, plus the cost if any.
    pub fn inject(&mut self, category: MobCategory, entity_type: EntityType, data: &SpawnData) {
        self.add_spawner(category, data.to_spawner(entity_type));
        if let Some(cost) = data.cost {
            self.set_cost(entity_type, cost);
        }
    }

    /// Total weight of a category's list.
    #[must_use]
    pub fn total_weight(&self, category: MobCategory) -> u32 {
        self.spawners(category).iter().map(|s| s.weight).sum()
    }
}
