//! An in-memory host.
//!
//! Implements every installation trait over plain maps, for tests and for
//! embedding the injector without a real server.

use std::collections::BTreeMap;

use log::debug;
use rustc_hash::{FxHashMap, FxHashSet};

use crate::biome::MobSpawnSettings;
use crate::core::Key;
use crate::error::HostError;
use crate::inject::{AttributeSupplier, TypeProperties};
use crate::registry::SyntheticType;

use super::catalogue::Catalogue;
use super::entity::{EntityClass, HostEntity};
use super::sink::{BiomeRegistry, ConversionLayer, ConvertFn, PublicEntity, TypeRegistry};
use super::types::{EntityType, NativeType, NativeTypeId, SyntheticTypeId};
use super::world::Biome;

/// What the host recorded for an installed synthetic type.
#[derive(Clone, Debug)]
pub struct RegisteredType {
    pub id: SyntheticTypeId,
    pub backing: NativeType,
    pub properties: TypeProperties,
    pub attributes: Option<AttributeSupplier>,
}

/// Host double backed by maps.
#[derive(Default)]
pub struct InMemoryHost {
    catalogue: Catalogue,
    data_fixers: FxHashSet<NativeTypeId>,
    types: FxHashMap<Key, RegisteredType>,
    type_keys: FxHashMap<SyntheticTypeId, Key>,
    aliases: FxHashMap<Key, NativeTypeId>,
    conversions: FxHashMap<NativeTypeId, Vec<(EntityClass, ConvertFn)>>,
    translations: FxHashMap<String, FxHashMap<String, String>>,
    biomes: Vec<(Biome, MobSpawnSettings)>,
}

impl InMemoryHost {
    /// A host over `catalogue`, with a data fixer for every type in it.
    #[must_use]
    pub fn new(catalogue: Catalogue) -> Self {
        let data_fixers = catalogue.iter().map(|t| t.id).collect();
        Self {
            catalogue,
            data_fixers,
            ..Self::default()
        }
    }

    /// A host over the vanilla reference catalogue.
    #[must_use]
    pub fn vanilla() -> Self {
        Self::new(Catalogue::vanilla())
    }

    /// Add a biome with an empty spawn table.
    #[must_use]
    pub fn with_biome(self, biome: Biome) -> Self {
        self.with_biome_settings(biome, MobSpawnSettings::new())
    }

    /// Add a biome with pre-existing spawn settings.
    #[must_use]
    pub fn with_biome_settings(mut self, biome: Biome, settings: MobSpawnSettings) -> Self {
        self.biomes.push((biome, settings));
        self
    }

    /// Drop the data fixer of `backing`.
    #[must_use]
    pub fn without_data_fixer(mut self, backing: &NativeType) -> Self {
        self.data_fixers.remove(&backing.id);
        self
    }

    #[must_use]
    pub fn catalogue(&self) -> &Catalogue {
        &self.catalogue
    }

    #[must_use]
    pub fn registered_type(&self, key: &Key) -> Option<&RegisteredType> {
        self.types.get(key)
    }

    #[must_use]
    pub fn registered_count(&self) -> usize {
        self.types.len()
    }

    /// Backing type a public key resolves to.
    #[must_use]
    pub fn alias(&self, key: &Key) -> Option<&NativeType> {
        self.aliases.get(key).and_then(|id| self.catalogue.get(*id))
    }

    #[must_use]
    pub fn translate(&self, locale: &str, description_id: &str) -> Option<&str> {
        self.translations
            .get(locale)
            .and_then(|names| names.get(description_id))
            .map(String::as_str)
    }

    #[must_use]
    pub fn spawn_settings(&self, biome: &Key) -> Option<&MobSpawnSettings> {
        self.biomes
            .iter()
            .find(|(b, _)| &b.key == biome)
            .map(|(_, settings)| settings)
    }

    /// Public-facing object for `entity`.
    ///
    /// Injected entities go through the conversion table of their backing
    /// type. Everything else gets the native facade named after its type.
    #[must_use]
    pub fn convert(&self, entity: &dyn HostEntity) -> Option<PublicEntity> {
        let backing = match entity.entity_type() {
            EntityType::Native(id) => id,
            EntityType::Synthetic(id) => {
                let key = self.type_keys.get(&id)?;
                self.types.get(key)?.backing.id
            }
        };

        let converted = self.conversions.get(&backing).and_then(|table| {
            table
                .iter()
                .find(|(class, _)| class.is_instance(entity))
                .and_then(|(_, convert)| convert(entity))
        });

        converted.or_else(|| {
            self.catalogue
                .get(backing)
                .map(|native| PublicEntity::new(entity.entity_id(), native.key))
        })
    }
}

impl TypeRegistry for InMemoryHost {
    fn has_data_fixer(&self, backing: &NativeType) -> bool {
        self.data_fixers.contains(&backing.id)
    }

    fn register_type(
        &mut self,
        synthetic: &SyntheticType,
        attributes: Option<&AttributeSupplier>,
    ) -> Result<(), HostError> {
        if self.types.contains_key(synthetic.key()) {
            return Err(HostError::Rejected {
                key: synthetic.key().clone(),
                reason: "a type with this key is already registered".to_string(),
            });
        }
        if !self.has_data_fixer(synthetic.backing()) {
            return Err(HostError::MissingDataFixer {
                backing: synthetic.backing().key,
            });
        }

        debug!("Host registered type {} as {}", synthetic.key(), synthetic.id().raw());
        self.type_keys.insert(synthetic.id(), synthetic.key().clone());
        self.types.insert(
            synthetic.key().clone(),
            RegisteredType {
                id: synthetic.id(),
                backing: *synthetic.backing(),
                properties: synthetic.properties().clone(),
                attributes: attributes.cloned(),
            },
        );
        Ok(())
    }
}

impl ConversionLayer for InMemoryHost {
    fn register_alias(&mut self, key: &Key, backing: &NativeType) {
        self.aliases.insert(key.clone(), backing.id);
    }

    fn register_conversions(
        &mut self,
        backing: &NativeType,
        conversions: Vec<(EntityClass, ConvertFn)>,
    ) {
        self.conversions.entry(backing.id).or_default().extend(conversions);
    }

    fn register_translations(&mut self, description_id: &str, names: &BTreeMap<String, String>) {
        for (locale, name) in names {
            self.translations
                .entry(locale.clone())
                .or_default()
                .insert(description_id.to_string(), name.clone());
        }
    }
}

impl BiomeRegistry for InMemoryHost {
    fn biome_count(&self) -> usize {
        self.biomes.len()
    }

    fn for_each_biome(&mut self, f: &mut dyn FnMut(&Biome, &mut MobSpawnSettings)) {
        for (biome, settings) in &mut self.biomes {
            f(biome, settings);
        }
    }
}
