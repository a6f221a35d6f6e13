//! Mob categories and synthetic type properties.

use serde::{Deserialize, Serialize};

use crate::host::{Dimensions, NativeType};

/// Spawn category of a kind. Biome spawn lists are grouped by it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum MobCategory {
    Monster,
    Creature,
    Ambient,
    Axolotls,
    UndergroundWaterCreature,
    WaterCreature,
    WaterAmbient,
    #[default]
    Misc,
}

impl MobCategory {
    /// Whether the host keeps far-away members of this category loaded.
    #[must_use]
    pub fn is_persistent(self) -> bool {
        matches!(self, MobCategory::Creature | MobCategory::Misc)
    }
}

/// Properties of a synthetic type, as installed with the host.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TypeProperties {
    pub dimensions: Dimensions,
    /// Chunks within which clients track the entity.
    pub client_tracking_range: u8,
    /// Ticks between position updates.
    pub update_interval: u8,
    pub fire_immune: bool,
    /// Whether the summon command may create it.
    pub summonable: bool,
    pub can_spawn_far_from_player: bool,
}

/// Builds `TypeProperties`, seeded from the backing type.
///
/// An injection's type customizer receives this builder after the backing
/// type's dimensions and tracking range have been copied in.
#[derive(Clone, Debug, PartialEq)]
pub struct TypeBuilder {
    properties: TypeProperties,
}

impl TypeBuilder {
    /// Copy size, eye height and tracking range from `backing`.
    #[must_use]
    pub fn from_backing(backing: &NativeType, category: MobCategory) -> Self {
        Self {
            properties: TypeProperties {
                dimensions: backing.dimensions,
                client_tracking_range: backing.tracking_range,
                update_interval: 3,
                fire_immune: false,
                summonable: true,
                can_spawn_far_from_player: category.is_persistent(),
            },
        }
    }

    /// Hitbox size; eye height rescales to 85% of the height.
    #[must_use]
    pub fn sized(mut self, width: f32, height: f32) -> Self {
        self.properties.dimensions = Dimensions::scalable(width, height);
        self
    }

    #[must_use]
    pub fn eye_height(mut self, eye_height: f32) -> Self {
        self.properties.dimensions.eye_height = eye_height;
        self
    }

    #[must_use]
    pub fn client_tracking_range(mut self, range: u8) -> Self {
        self.properties.client_tracking_range = range;
        self
    }

    #[must_use]
    pub fn update_interval(mut self, ticks: u8) -> Self {
        self.properties.update_interval = ticks;
        self
    }

    #[must_use]
    pub fn fire_immune(mut self) -> Self {
        self.properties.fire_immune = true;
        self
    }

    #[must_use]
    pub fn no_summon(mut self) -> Self {
        self.properties.summonable = false;
        self
    }

    #[must_use]
    pub fn can_spawn_far_from_player(mut self) -> Self {
        self.properties.can_spawn_far_from_player = true;
        self
    }

    #[must_use]
    pub fn build(self) -> TypeProperties {
        self.properties
    }
}
