//! Host-side installation points.
//!
//! The injector pushes what it synthesizes into the host through these
//! traits: the host's own type registry in phase 1, then the client-facing
//! conversion layer and the biome spawn tables in phase 2. A real server
//! implements them over its internals; `InMemoryHost` implements them over
//! plain maps.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::biome::MobSpawnSettings;
use crate::core::Key;
use crate::error::HostError;
use crate::inject::AttributeSupplier;
use crate::registry::SyntheticType;

use super::entity::{EntityClass, EntityId, HostEntity};
use super::types::NativeType;
use super::world::Biome;

/// The host's public-facing object wrapping an entity.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PublicEntity {
    pub entity_id: EntityId,
    /// Name of the wrapper class the host exposes to plugins.
    pub facade: String,
}

impl PublicEntity {
    pub fn new(entity_id: EntityId, facade: impl Into<String>) -> Self {
        Self {
            entity_id,
            facade: facade.into(),
        }
    }
}

/// Type-erased conversion to the public-facing object.
///
/// Returns `None` when handed an entity of another class.
pub type ConvertFn = Arc<dyn Fn(&dyn HostEntity) -> Option<PublicEntity> + Send + Sync>;

/// The host's own entity type registry.
pub trait TypeRegistry {
    /// Whether the host can read persisted data of `backing` entities.
    fn has_data_fixer(&self, backing: &NativeType) -> bool;

    /// Install a synthetic type, reusing the backing type's data fixer.
    fn register_type(
        &mut self,
        synthetic: &SyntheticType,
        attributes: Option<&AttributeSupplier>,
    ) -> Result<(), HostError>;
}

/// The host's client-facing object layer.
pub trait ConversionLayer {
    /// Make `key` resolve to `backing` in the public type registry.
    fn register_alias(&mut self, key: &Key, backing: &NativeType);

    /// Conversion table for entities whose public type is `backing`.
    ///
    /// The host tries the entries in order and uses the first whose class
    /// matches, falling back to its native conversion.
    fn register_conversions(
        &mut self,
        backing: &NativeType,
        conversions: Vec<(EntityClass, ConvertFn)>,
    );

    /// Locale → display name under `description_id`.
    fn register_translations(&mut self, description_id: &str, names: &BTreeMap<String, String>);
}

/// Access to every biome's spawn settings during world setup.
pub trait BiomeRegistry {
    fn biome_count(&self) -> usize;

    fn for_each_biome(&mut self, f: &mut dyn FnMut(&Biome, &mut MobSpawnSettings));
}
