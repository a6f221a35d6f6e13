//! The read-only registry produced by the last start-up phase.

use std::path::PathBuf;
use std::sync::Arc;

use crate::core::{InjectorConfig, Key, VariantRng};
use crate::error::{ConfigError, InjectError};
use crate::host::{
    EntityClass, EntityKind, EntityType, HostEntity, Location, NativeType,
    PersistentDataContainer,
};
use crate::identity::{self, Initialized};
use crate::inject::Injection;
use crate::protocol::ProtocolShim;
use crate::variant::ModelSource;

use super::phase::Phase;
use super::stages::InjectionTable;
use super::synthetic::SyntheticType;

/// A model file a host delivers to the renderer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ModelAsset {
    /// `<model name>.bbmodel`
    pub file_name: String,
    pub source: ModelSource,
}

impl ModelAsset {
    /// Where the file lands under `root`.
    #[must_use]
    pub fn path_under(&self, root: &std::path::Path) -> PathBuf {
        root.join(&self.file_name)
    }
}

/// Every injection and synthetic type, immutable.
///
/// Safe to share across threads once built. Lookups are by entity class,
/// by key and by type.
pub struct FrozenRegistry {
    config: InjectorConfig,
    table: InjectionTable,
    types: Vec<SyntheticType>,
    shim: ProtocolShim,
}

impl FrozenRegistry {
    pub(crate) fn new(
        config: InjectorConfig,
        table: InjectionTable,
        types: Vec<SyntheticType>,
    ) -> Self {
        let hide = config.model_integration_loaded() && config.hide_backing_entity;
        let shim = ProtocolShim::new(&types, hide);
        Self {
            config,
            table,
            types,
            shim,
        }
    }

    pub fn phase(&self) -> Phase {
        Phase::Injected
    }

    pub fn config(&self) -> &InjectorConfig {
        &self.config
    }

    /// Injections in registration order.
    pub fn injections(&self) -> &[Arc<Injection>] {
        self.table.as_slice()
    }

    /// Synthetic types, indexed by their id.
    pub fn types(&self) -> &[SyntheticType] {
        &self.types
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// The wire-boundary table over this registry's types.
    pub fn shim(&self) -> &ProtocolShim {
        &self.shim
    }

    pub fn injection_by_class(&self, class: EntityClass) -> Option<&Arc<Injection>> {
        self.table
            .index_of_class(class)
            .map(|i| &self.table.as_slice()[i])
    }

    pub fn injection_of<T: EntityKind>(&self) -> Option<&Arc<Injection>> {
        self.injection_by_class(EntityClass::of::<T>())
    }

    pub fn injection_by_key(&self, key: &Key) -> Option<&Arc<Injection>> {
        self.table
            .index_of_key(key)
            .map(|i| &self.table.as_slice()[i])
    }

    pub fn injection_by_type(&self, entity_type: EntityType) -> Option<&Arc<Injection>> {
        self.index_of_type(entity_type)
            .map(|i| &self.table.as_slice()[i])
    }

    pub fn type_by_class(&self, class: EntityClass) -> Option<&SyntheticType> {
        self.table.index_of_class(class).map(|i| &self.types[i])
    }

    pub fn type_of<T: EntityKind>(&self) -> Option<&SyntheticType> {
        self.type_by_class(EntityClass::of::<T>())
    }

    pub fn type_by_key(&self, key: &Key) -> Option<&SyntheticType> {
        self.table.index_of_key(key).map(|i| &self.types[i])
    }

    /// True for the synthetic type of a registered injection.
    pub fn is_injected(&self, entity_type: EntityType) -> bool {
        self.index_of_type(entity_type).is_some()
    }

    /// Backing type of a registered synthetic type.
    pub fn backing_type(&self, entity_type: EntityType) -> Option<&NativeType> {
        match entity_type {
            EntityType::Synthetic(id) => self.shim.backing(id),
            EntityType::Native(_) => None,
        }
    }

    fn index_of_type(&self, entity_type: EntityType) -> Option<usize> {
        let id = entity_type.as_synthetic()?;
        let index = id.raw() as usize;
        self.types
            .get(index)
            .filter(|t| t.id() == id)
            .map(|_| index)
    }

    fn require(&self, entity_type: EntityType) -> Result<usize, ConfigError> {
        self.index_of_type(entity_type)
            .ok_or_else(|| ConfigError::NotInjected {
                what: entity_type.to_string(),
            })
    }

    /// Model files of every bound variant of every injection.
    pub fn model_assets(&self) -> Vec<ModelAsset> {
        self.injections()
            .iter()
            .flat_map(|injection| injection.variants().iter())
            .map(|variant| ModelAsset {
                file_name: format!("{}.bbmodel", variant.model_name()),
                source: variant.model().clone(),
            })
            .collect()
    }

    /// Construct a fresh instance of `entity_type` and set up its identity.
    pub fn construct(
        &self,
        entity_type: EntityType,
        location: &Location,
        rng: &mut VariantRng,
    ) -> Result<Box<dyn HostEntity>, InjectError> {
        let index = self.require(entity_type)?;
        let injection = &self.table.as_slice()[index];
        let mut entity = injection.construct(&self.types[index], location)?;
        identity::initialize(entity.as_mut(), injection, &self.config, rng)?;
        Ok(entity)
    }

    /// [`construct`](Self::construct) by injection key.
    pub fn spawn(
        &self,
        key: &Key,
        location: &Location,
        rng: &mut VariantRng,
    ) -> Result<Box<dyn HostEntity>, InjectError> {
        let synthetic = self.type_by_key(key).ok_or_else(|| ConfigError::NotInjected {
            what: key.to_string(),
        })?;
        self.construct(synthetic.entity_type(), location, rng)
    }

    /// Typed [`construct`](Self::construct) for a registered class.
    pub fn spawn_as<T: EntityKind>(
        &self,
        location: &Location,
        rng: &mut VariantRng,
    ) -> Result<Box<T>, InjectError> {
        let class = EntityClass::of::<T>();
        let synthetic = self.type_by_class(class).ok_or_else(|| ConfigError::NotInjected {
            what: class.name().to_string(),
        })?;
        let entity = self.construct(synthetic.entity_type(), location, rng)?;
        let found = entity.class_name().to_string();
        entity.into_any().downcast::<T>().map_err(|_| {
            ConfigError::EntityClassMismatch {
                expected: class.name(),
                found,
            }
            .into()
        })
    }

    /// Reconstruct a saved instance from its persistent store.
    ///
    /// The saved variant is kept; the variant rule only runs if the store
    /// never got one.
    pub fn reload(
        &self,
        entity_type: EntityType,
        location: &Location,
        saved: &PersistentDataContainer,
        rng: &mut VariantRng,
    ) -> Result<Box<dyn HostEntity>, InjectError> {
        let index = self.require(entity_type)?;
        let injection = &self.table.as_slice()[index];
        let mut entity = injection.construct(&self.types[index], location)?;
        entity.persistent_data_mut().merge(saved);
        identity::initialize(entity.as_mut(), injection, &self.config, rng)?;
        Ok(entity)
    }

    /// Identity setup for an instance the host constructed itself.
    pub fn initialize(
        &self,
        entity: &mut dyn HostEntity,
        rng: &mut VariantRng,
    ) -> Result<Initialized, InjectError> {
        let index = self.require(entity.entity_type())?;
        identity::initialize(entity, &self.table.as_slice()[index], &self.config, rng)
    }
}

impl std::fmt::Debug for FrozenRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FrozenRegistry")
            .field("types", &self.types)
            .field("shim", &self.shim)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::any::Any;
    use std::path::Path;

    use super::*;
    use crate::core::ModelIntegration;
    use crate::host::catalogue::PIG;
    use crate::host::{EntityBase, InMemoryHost, PublicEntity, SyntheticTypeId};
    use crate::registry::stages::OpenRegistry;
    use crate::variant::UnboundVariant;

    struct Capybara {
        base: EntityBase,
    }

    impl HostEntity for Capybara {
        fn base(&self) -> &EntityBase {
            &self.base
        }
        fn base_mut(&mut self) -> &mut EntityBase {
            &mut self.base
        }
        fn as_any(&self) -> &dyn Any {
            self
        }
        fn into_any(self: Box<Self>) -> Box<dyn Any> {
            self
        }
    }

    impl EntityKind for Capybara {
        const LIVING: bool = true;
    }

    fn key() -> Key {
        Key::parse("pack:capybara").unwrap()
    }

    fn frozen(config: InjectorConfig) -> FrozenRegistry {
        let mut open = OpenRegistry::new(config);
        open.register_injection(
            Injection::builder(
                key(),
                |base| Capybara { base },
                |e: &Capybara| PublicEntity::new(e.entity_id(), "Capybara"),
                PIG,
            )
            .with_variant(UnboundVariant::bundled("warm", "warm.bbmodel").unwrap())
            .build()
            .unwrap(),
        )
        .unwrap();

        let mut host = InMemoryHost::vanilla();
        open.resolve()
            .unwrap()
            .inject_types(&mut host)
            .unwrap()
            .inject_host(&mut host)
    }

    #[test]
    fn test_lookups_agree() {
        let registry = frozen(InjectorConfig::new());
        let synthetic = registry.type_of::<Capybara>().unwrap();
        let entity_type = synthetic.entity_type();

        assert_eq!(registry.type_by_key(&key()), Some(synthetic));
        let by_type = registry.injection_by_type(entity_type).unwrap();
        assert!(Arc::ptr_eq(by_type, registry.injection_of::<Capybara>().unwrap()));
        assert!(Arc::ptr_eq(by_type, registry.injection_by_key(&key()).unwrap()));
        assert_eq!(registry.backing_type(entity_type), Some(&PIG));
        assert_eq!(registry.phase(), Phase::Injected);
    }

    #[test]
    fn test_foreign_types_not_injected() {
        let registry = frozen(InjectorConfig::new());
        let stranger = EntityType::Synthetic(SyntheticTypeId(7));

        assert!(!registry.is_injected(PIG.entity_type()));
        assert!(!registry.is_injected(stranger));
        assert_eq!(registry.backing_type(PIG.entity_type()), None);

        let err = registry
            .construct(stranger, &Location::new(key(), key()), &mut VariantRng::new(1))
            .err()
            .unwrap();
        assert!(matches!(
            err,
            InjectError::Config(ConfigError::NotInjected { .. })
        ));
    }

    #[test]
    fn test_hide_needs_loaded_renderer() {
        let loaded = ModelIntegration::loaded("vendor:model");

        assert!(!frozen(InjectorConfig::new()).shim().hides_backing());
        assert!(frozen(InjectorConfig::new().with_model_integration(loaded.clone()))
            .shim()
            .hides_backing());
        assert!(!frozen(
            InjectorConfig::new()
                .with_model_integration(loaded)
                .with_hide_backing_entity(false)
        )
        .shim()
        .hides_backing());
    }

    #[test]
    fn test_model_asset_path() {
        let assets = frozen(InjectorConfig::new()).model_assets();
        assert_eq!(assets.len(), 1);
        assert_eq!(
            assets[0].path_under(Path::new("models")),
            Path::new("models/injector.pack.capybara.warm.bbmodel")
        );
    }
}
