//! The start-up half of the registry typestate.
//!
//! ```text
//! OpenRegistry       REGISTRATION
//!   │ resolve
//!   ▼
//! ResolvedRegistry   PRE_INJECTION
//!   │ inject_types
//!   ▼
//! TypedRegistry      INJECTION_PHASE_1
//!   │ inject_host
//!   ▼
//! FrozenRegistry     INJECTED
//! ```
//!
//! Every transition consumes the previous stage, so registering into a
//! resolved registry or querying types before phase 1 does not compile.

use std::fmt::Display;
use std::sync::Arc;

use log::{debug, info, warn};
use rustc_hash::FxHashMap;

use crate::core::{InjectorConfig, Key};
use crate::error::{ConfigError, HostError, InjectError};
use crate::host::{
    BiomeRegistry, ConversionLayer, ConvertFn, EntityClass, NativeType, NativeTypeId,
    SyntheticTypeId, TypeRegistry,
};
use crate::inject::Injection;

use super::frozen::FrozenRegistry;
use super::synthetic::SyntheticType;

/// Deferred producer of an injection, resolved at PRE_INJECTION.
pub type InjectionSupplier = Box<dyn FnOnce() -> Result<Injection, ConfigError> + Send>;

pub(crate) const PHASE_COUNT: u8 = 3;

pub(crate) fn phase_info(config: &InjectorConfig, phase: u8, message: impl Display) {
    if config.log_level.normal() {
        info!("[Phase {phase}/{PHASE_COUNT}] {message}");
    }
}

pub(crate) fn plural(count: usize) -> &'static str {
    if count == 1 {
        "entity"
    } else {
        "entities"
    }
}

/// Injections in registration order, indexed by key, by entity class and
/// by bound model name.
#[derive(Clone, Default)]
pub(crate) struct InjectionTable {
    injections: Vec<Arc<Injection>>,
    by_key: FxHashMap<Key, usize>,
    by_class: FxHashMap<EntityClass, usize>,
    by_model: FxHashMap<String, usize>,
}

impl InjectionTable {
    /// Append `injection`, refusing a key, class or model name that is
    /// already taken. Nothing is indexed unless every check passes.
    pub(crate) fn insert(&mut self, injection: Injection) -> Result<(), ConfigError> {
        if self.by_key.contains_key(injection.key()) {
            return Err(ConfigError::DuplicateKey {
                key: injection.key().clone(),
            });
        }
        let class = injection.entity_class();
        if self.by_class.contains_key(&class) {
            return Err(ConfigError::DuplicateEntityClass { class: class.name() });
        }
        // Keys and variant ids may both contain '.', so `a.b` + `c` and
        // `a` + `b.c` bind to the same name.
        for variant in injection.variants().iter() {
            if let Some(&other) = self.by_model.get(variant.model_name()) {
                return Err(ConfigError::DuplicateModelName {
                    name: variant.model_name().to_string(),
                    key: injection.key().clone(),
                    other: self.injections[other].key().clone(),
                });
            }
        }

        let index = self.injections.len();
        self.by_key.insert(injection.key().clone(), index);
        self.by_class.insert(class, index);
        for variant in injection.variants().iter() {
            self.by_model.insert(variant.model_name().to_string(), index);
        }
        self.injections.push(Arc::new(injection));
        Ok(())
    }

    pub(crate) fn as_slice(&self) -> &[Arc<Injection>] {
        &self.injections
    }

    pub(crate) fn len(&self) -> usize {
        self.injections.len()
    }

    pub(crate) fn index_of_key(&self, key: &Key) -> Option<usize> {
        self.by_key.get(key).copied()
    }

    pub(crate) fn index_of_class(&self, class: EntityClass) -> Option<usize> {
        self.by_class.get(&class).copied()
    }
}

/// Accepts registrations. The only stage that can grow.
///
/// Eagerly registered injections keep their call order and precede the
/// deferred ones, which resolve in their own call order.
pub struct OpenRegistry {
    config: InjectorConfig,
    table: InjectionTable,
    deferred: Vec<InjectionSupplier>,
}

impl OpenRegistry {
    #[must_use]
    pub fn new(config: InjectorConfig) -> Self {
        Self {
            config,
            table: InjectionTable::default(),
            deferred: Vec::new(),
        }
    }

    pub fn config(&self) -> &InjectorConfig {
        &self.config
    }

    /// Queue a supplier. It runs when the registry resolves.
    pub fn register(
        &mut self,
        supplier: impl FnOnce() -> Result<Injection, ConfigError> + Send + 'static,
    ) {
        self.deferred.push(Box::new(supplier));
    }

    /// Add a built injection now. A duplicate key or class fails here and
    /// leaves the earlier registration in place.
    pub fn register_injection(&mut self, injection: Injection) -> Result<(), ConfigError> {
        self.table.insert(injection)
    }

    /// Registrations so far, deferred ones included.
    pub fn len(&self) -> usize {
        self.table.len() + self.deferred.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Run every deferred supplier and close the registration window.
    pub fn resolve(self) -> Result<ResolvedRegistry, ConfigError> {
        let OpenRegistry {
            config,
            mut table,
            deferred,
        } = self;

        for supplier in deferred {
            table.insert(supplier()?)?;
        }

        if config.log_level.verbose() {
            debug!("Resolved {} {}", table.len(), plural(table.len()));
        }

        Ok(ResolvedRegistry { config, table })
    }
}

impl Default for OpenRegistry {
    fn default() -> Self {
        Self::new(InjectorConfig::default())
    }
}

/// All injections known, no types installed yet.
pub struct ResolvedRegistry {
    config: InjectorConfig,
    table: InjectionTable,
}

impl ResolvedRegistry {
    pub fn config(&self) -> &InjectorConfig {
        &self.config
    }

    pub fn injections(&self) -> &[Arc<Injection>] {
        self.table.as_slice()
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.len() == 0
    }

    /// Phase 1: create one synthetic type per injection and install it,
    /// with its default attributes, into the host's type registry.
    ///
    /// Synthetic ids follow registration order.
    pub fn inject_types<H: TypeRegistry + ?Sized>(
        self,
        host: &mut H,
    ) -> Result<TypedRegistry, InjectError> {
        let ResolvedRegistry { config, table } = self;

        if table.len() == 0 {
            if config.log_level.normal() {
                warn!("There are no entities to inject");
            }
        } else {
            phase_info(
                &config,
                1,
                format!("Injecting {} {}", table.len(), plural(table.len())),
            );
        }

        let mut types = Vec::with_capacity(table.len());
        for (index, injection) in table.as_slice().iter().enumerate() {
            let backing = injection.backing_type();
            if !host.has_data_fixer(backing) {
                return Err(HostError::MissingDataFixer { backing: backing.key }.into());
            }

            let synthetic = SyntheticType::for_injection(SyntheticTypeId(index as u32), injection);
            host.register_type(&synthetic, injection.default_attributes())?;
            let installed = injection.install_type(synthetic).clone();

            if config.log_level.verbose() {
                debug!(
                    "Registered type {} as {}",
                    installed,
                    installed.entity_type()
                );
            }
            types.push(installed);
        }

        phase_info(&config, 1, "Types registered");
        Ok(TypedRegistry {
            config,
            table,
            types,
        })
    }
}

/// Synthetic types installed. Spawn tables and conversions still pending.
pub struct TypedRegistry {
    config: InjectorConfig,
    table: InjectionTable,
    types: Vec<SyntheticType>,
}

impl TypedRegistry {
    pub fn config(&self) -> &InjectorConfig {
        &self.config
    }

    pub fn injections(&self) -> &[Arc<Injection>] {
        self.table.as_slice()
    }

    /// Types in synthetic-id order.
    pub fn types(&self) -> &[SyntheticType] {
        &self.types
    }

    /// Phase 2: inject spawners into every biome, then alias each key to its
    /// backing type, install conversions and display names, and freeze.
    pub fn inject_host<H: ConversionLayer + BiomeRegistry + ?Sized>(
        self,
        host: &mut H,
    ) -> FrozenRegistry {
        let TypedRegistry {
            config,
            table,
            types,
        } = self;
        let injections = table.as_slice();

        phase_info(
            &config,
            2,
            format!("Injecting spawns into {} biomes", host.biome_count()),
        );
        let mut spawners = 0usize;
        host.for_each_biome(&mut |biome, settings| {
            for (injection, synthetic) in injections.iter().zip(&types) {
                if let Some(data) = injection.spawn_rule().apply(biome) {
                    settings.inject(injection.category(), synthetic.entity_type(), &data);
                    spawners += 1;
                    if config.log_level.verbose() {
                        debug!("Spawning {} in {}", synthetic.key(), biome.key);
                    }
                }
            }
        });
        phase_info(&config, 2, format!("Added {spawners} spawners"));

        let mut conversions: Vec<(NativeType, Vec<(EntityClass, ConvertFn)>)> = Vec::new();
        let mut by_backing: FxHashMap<NativeTypeId, usize> = FxHashMap::default();
        for (injection, synthetic) in injections.iter().zip(&types) {
            let backing = synthetic.backing();
            host.register_alias(synthetic.key(), backing);
            if !injection.display_names().is_empty() {
                host.register_translations(&synthetic.description_id(), injection.display_names());
            }

            let slot = *by_backing.entry(backing.id).or_insert_with(|| {
                conversions.push((*backing, Vec::new()));
                conversions.len() - 1
            });
            conversions[slot]
                .1
                .push((injection.entity_class(), Arc::clone(injection.convert_fn())));
        }
        for (backing, entries) in conversions {
            if config.log_level.verbose() {
                debug!("{} conversion(s) for {}", entries.len(), backing);
            }
            host.register_conversions(&backing, entries);
        }
        phase_info(&config, 3, "Conversion layer updated");

        FrozenRegistry::new(config, table, types)
    }
}

#[cfg(test)]
mod tests {
    use std::any::Any;

    use super::*;
    use crate::host::catalogue::{COW, PIG};
    use crate::host::{EntityBase, EntityKind, HostEntity, InMemoryHost, PublicEntity};
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

    struct Yak {
        base: EntityBase,
    }

    impl HostEntity for Yak {
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

    impl EntityKind for Yak {
        const LIVING: bool = true;
    }

    fn capybara(key: &str) -> Injection {
        Injection::builder(
            Key::parse(key).unwrap(),
            |base| Capybara { base },
            |e: &Capybara| PublicEntity::new(e.entity_id(), "Capybara"),
            PIG,
        )
        .build()
        .unwrap()
    }

    fn yak() -> Injection {
        Injection::builder(
            Key::parse("pack:yak").unwrap(),
            |base| Yak { base },
            |e: &Yak| PublicEntity::new(e.entity_id(), "Yak"),
            COW,
        )
        .with_display_name("en_us", "Yak")
        .build()
        .unwrap()
    }

    #[test]
    fn test_duplicate_key_keeps_first() {
        let mut open = OpenRegistry::default();
        open.register_injection(capybara("pack:capybara")).unwrap();

        let err = open.register_injection(yak_with_key("pack:capybara"));
        assert!(matches!(err, Err(ConfigError::DuplicateKey { .. })));
        assert_eq!(open.len(), 1);
    }

    fn yak_with_key(key: &str) -> Injection {
        Injection::builder(
            Key::parse(key).unwrap(),
            |base| Yak { base },
            |e: &Yak| PublicEntity::new(e.entity_id(), "Yak"),
            COW,
        )
        .build()
        .unwrap()
    }

    #[test]
    fn test_colliding_model_name_rejected() {
        let mut open = OpenRegistry::default();
        let dotted = Injection::builder(
            Key::parse("pack:a.b").unwrap(),
            |base| Capybara { base },
            |e: &Capybara| PublicEntity::new(e.entity_id(), "Capybara"),
            PIG,
        )
        .with_variant(UnboundVariant::bundled("c", "c.bbmodel").unwrap())
        .build()
        .unwrap();
        let short = Injection::builder(
            Key::parse("pack:a").unwrap(),
            |base| Yak { base },
            |e: &Yak| PublicEntity::new(e.entity_id(), "Yak"),
            COW,
        )
        .with_variant(UnboundVariant::bundled("b.c", "bc.bbmodel").unwrap())
        .build()
        .unwrap();

        open.register_injection(dotted).unwrap();
        let err = open.register_injection(short).unwrap_err();
        assert_eq!(
            err,
            ConfigError::DuplicateModelName {
                name: "injector.pack.a.b.c".into(),
                key: Key::parse("pack:a").unwrap(),
                other: Key::parse("pack:a.b").unwrap(),
            }
        );
        assert_eq!(open.len(), 1);

        // The refused injection left no trace in the indexes.
        open.register_injection(yak_with_key("pack:a")).unwrap();
        assert_eq!(open.len(), 2);
    }

    #[test]
    fn test_duplicate_class_rejected() {
        let mut open = OpenRegistry::default();
        open.register_injection(capybara("pack:capybara")).unwrap();

        let err = open.register_injection(capybara("pack:other"));
        assert!(matches!(err, Err(ConfigError::DuplicateEntityClass { .. })));
    }

    #[test]
    fn test_deferred_duplicate_fails_resolve() {
        let mut open = OpenRegistry::default();
        open.register(|| Ok(capybara("pack:capybara")));
        open.register(|| Ok(capybara("pack:capybara")));
        assert_eq!(open.len(), 2);

        assert!(matches!(
            open.resolve(),
            Err(ConfigError::DuplicateKey { .. })
        ));
    }

    #[test]
    fn test_deferred_supplier_error_propagates() {
        let mut open = OpenRegistry::default();
        open.register(|| Err(ConfigError::InvalidVariantId { id: "X".into() }));

        assert!(matches!(
            open.resolve(),
            Err(ConfigError::InvalidVariantId { .. })
        ));
    }

    #[test]
    fn test_ids_follow_registration_order() {
        let mut open = OpenRegistry::default();
        open.register(|| Ok(yak()));
        open.register_injection(capybara("pack:capybara")).unwrap();

        let mut host = InMemoryHost::vanilla();
        let typed = open.resolve().unwrap().inject_types(&mut host).unwrap();

        let keys: Vec<_> = typed.types().iter().map(|t| t.key().to_string()).collect();
        assert_eq!(keys, ["pack:capybara", "pack:yak"]);
        assert_eq!(typed.types()[1].id(), SyntheticTypeId(1));
        assert_eq!(host.registered_count(), 2);
    }

    #[test]
    fn test_missing_data_fixer_fails_phase_one() {
        let mut open = OpenRegistry::default();
        open.register_injection(capybara("pack:capybara")).unwrap();

        let mut host = InMemoryHost::vanilla().without_data_fixer(&PIG);
        let err = open.resolve().unwrap().inject_types(&mut host);
        assert!(matches!(
            err,
            Err(InjectError::Host(HostError::MissingDataFixer { backing: "minecraft:pig" }))
        ));
    }

    #[test]
    fn test_inject_host_installs_alias_and_translations() {
        let mut open = OpenRegistry::default();
        open.register_injection(yak()).unwrap();

        let mut host = InMemoryHost::vanilla();
        let frozen = open
            .resolve()
            .unwrap()
            .inject_types(&mut host)
            .unwrap()
            .inject_host(&mut host);

        let key = Key::parse("pack:yak").unwrap();
        assert_eq!(host.alias(&key), Some(&COW));
        assert_eq!(host.translate("en_us", "entity.pack.yak"), Some("Yak"));
        assert_eq!(frozen.len(), 1);
    }

    #[test]
    fn test_empty_registry_still_freezes() {
        let mut host = InMemoryHost::vanilla();
        let frozen = OpenRegistry::default()
            .resolve()
            .unwrap()
            .inject_types(&mut host)
            .unwrap()
            .inject_host(&mut host);

        assert!(frozen.is_empty());
        assert_eq!(host.registered_count(), 0);
    }
}
