//! The injection descriptor and its builder.

use std::collections::BTreeMap;
use std::sync::{Arc, OnceLock};

use crate::biome::SpawnRule;
use crate::core::Key;
use crate::error::ConfigError;
use crate::host::{
    ConvertFn, EntityBase, EntityClass, EntityKind, HostEntity, Location, NativeType, PublicEntity,
};
use crate::registry::SyntheticType;
use crate::variant::{UnboundVariant, VariantMap, VariantRule};

use super::attributes::AttributeSupplier;
use super::category::{MobCategory, TypeBuilder};

/// Type-erased construction callback.
pub type EntityFactory = Arc<dyn Fn(EntityBase) -> Box<dyn HostEntity> + Send + Sync>;

/// Hook adjusting the synthetic type's properties in phase 1.
pub type TypeCustomizer = Arc<dyn Fn(TypeBuilder) -> TypeBuilder + Send + Sync>;

fn liveness(living: bool) -> &'static str {
    if living {
        "living"
    } else {
        "non-living"
    }
}

/// Immutable descriptor of one injected entity kind.
///
/// Created through [`InjectionBuilder`]. Key and entity class identify an
/// injection; the registry rejects a second injection sharing either.
pub struct Injection {
    key: Key,
    class: EntityClass,
    factory: EntityFactory,
    convert: ConvertFn,
    backing: NativeType,
    category: MobCategory,
    customizer: Option<TypeCustomizer>,
    attributes: Option<AttributeSupplier>,
    variants: VariantMap,
    variant_rule: VariantRule,
    spawn_rule: SpawnRule,
    display_names: BTreeMap<String, String>,
    synthetic: OnceLock<SyntheticType>,
}

impl Injection {
    /// Start building an injection for entity class `T`.
    pub fn builder<T, F, C>(
        key: Key,
        factory: F,
        convert: C,
        backing: NativeType,
    ) -> InjectionBuilder
    where
        T: EntityKind,
        F: Fn(EntityBase) -> T + Send + Sync + 'static,
        C: Fn(&T) -> PublicEntity + Send + Sync + 'static,
    {
        InjectionBuilder::new(key, factory, convert, backing)
    }

    #[must_use]
    pub fn key(&self) -> &Key {
        &self.key
    }

    #[must_use]
    pub fn entity_class(&self) -> EntityClass {
        self.class
    }

    #[must_use]
    pub fn backing_type(&self) -> &NativeType {
        &self.backing
    }

    #[must_use]
    pub fn category(&self) -> MobCategory {
        self.category
    }

    #[must_use]
    pub fn is_living(&self) -> bool {
        self.class.is_living()
    }

    /// Attributes installed for the synthetic type. Always `None` for
    /// non-living kinds.
    #[must_use]
    pub fn default_attributes(&self) -> Option<&AttributeSupplier> {
        self.attributes.as_ref()
    }

    #[must_use]
    pub fn variants(&self) -> &VariantMap {
        &self.variants
    }

    #[must_use]
    pub fn variant_rule(&self) -> &VariantRule {
        &self.variant_rule
    }

    #[must_use]
    pub fn spawn_rule(&self) -> &SpawnRule {
        &self.spawn_rule
    }

    /// Locale → display name.
    #[must_use]
    pub fn display_names(&self) -> &BTreeMap<String, String> {
        &self.display_names
    }

    #[must_use]
    pub fn convert_fn(&self) -> &ConvertFn {
        &self.convert
    }

    /// Run the type customizer over `builder`.
    #[must_use]
    pub fn customize(&self, builder: TypeBuilder) -> TypeBuilder {
        match &self.customizer {
            Some(customizer) => customizer(builder),
            None => builder,
        }
    }

    /// The synthetic type, once phase 1 created it.
    pub fn synthetic_type(&self) -> Result<&SyntheticType, ConfigError> {
        self.synthetic.get().ok_or_else(|| ConfigError::NotInjected {
            what: self.key.to_string(),
        })
    }

    /// Record the synthetic type. The first call wins; later calls return
    /// the type already recorded.
    pub(crate) fn install_type(&self, synthetic: SyntheticType) -> &SyntheticType {
        self.synthetic.get_or_init(|| synthetic)
    }

    /// Host construction callback: a fresh instance of this kind.
    ///
    /// `synthetic` must be this injection's own type. The instance comes
    /// back uninitialized; identity setup is a separate step.
    pub fn construct(
        &self,
        synthetic: &SyntheticType,
        location: &Location,
    ) -> Result<Box<dyn HostEntity>, ConfigError> {
        let own = self.synthetic_type()?;
        if own.id() != synthetic.id() {
            return Err(ConfigError::WrongEntityType {
                key: self.key.clone(),
                found: synthetic.key().to_string(),
            });
        }
        Ok((self.factory)(EntityBase::new(own.entity_type(), location)))
    }
}

impl std::fmt::Debug for Injection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Injection")
            .field("key", &self.key)
            .field("class", &self.class.name())
            .field("backing", &self.backing.key)
            .field("category", &self.category)
            .field("variants", &self.variants.id_strings())
            .finish()
    }
}

/// Builder for [`Injection`].
///
/// Defaults: category `Misc`, no type customizer, living defaults as
/// attributes for living kinds, no variants, the `first` variant rule and
/// the `never` spawn rule.
#[must_use]
pub struct InjectionBuilder {
    key: Key,
    class: EntityClass,
    factory: EntityFactory,
    convert: ConvertFn,
    backing: NativeType,
    category: MobCategory,
    customizer: Option<TypeCustomizer>,
    attributes: Option<AttributeSupplier>,
    variants: Vec<UnboundVariant>,
    variant_rule: VariantRule,
    spawn_rule: SpawnRule,
    display_names: BTreeMap<String, String>,
}

impl InjectionBuilder {
    /// The required parts: key, factory, conversion and backing type.
    pub fn new<T, F, C>(key: Key, factory: F, convert: C, backing: NativeType) -> Self
    where
        T: EntityKind,
        F: Fn(EntityBase) -> T + Send + Sync + 'static,
        C: Fn(&T) -> PublicEntity + Send + Sync + 'static,
    {
        let factory: EntityFactory =
            Arc::new(move |base: EntityBase| -> Box<dyn HostEntity> { Box::new(factory(base)) });
        let convert: ConvertFn = Arc::new(move |entity: &dyn HostEntity| {
            entity.as_any().downcast_ref::<T>().map(&convert)
        });

        Self {
            key,
            class: EntityClass::of::<T>(),
            factory,
            convert,
            backing,
            category: MobCategory::default(),
            customizer: None,
            attributes: None,
            variants: Vec::new(),
            variant_rule: VariantRule::default(),
            spawn_rule: SpawnRule::default(),
            display_names: BTreeMap::new(),
        }
    }

    pub fn key(&self) -> &Key {
        &self.key
    }

    pub fn entity_class(&self) -> EntityClass {
        self.class
    }

    pub fn with_category(mut self, category: MobCategory) -> Self {
        self.category = category;
        self
    }

    pub fn with_type_customizer(
        mut self,
        customizer: impl Fn(TypeBuilder) -> TypeBuilder + Send + Sync + 'static,
    ) -> Self {
        self.customizer = Some(Arc::new(customizer));
        self
    }

    /// Replace the default attributes. Living kinds only; checked at build.
    pub fn with_default_attributes(mut self, attributes: AttributeSupplier) -> Self {
        self.attributes = Some(attributes);
        self
    }

    pub fn with_variant(mut self, variant: UnboundVariant) -> Self {
        self.variants.push(variant);
        self
    }

    /// Replace all variants added so far.
    pub fn with_variants(mut self, variants: impl IntoIterator<Item = UnboundVariant>) -> Self {
        self.variants = variants.into_iter().collect();
        self
    }

    pub fn with_variant_rule(mut self, rule: VariantRule) -> Self {
        self.variant_rule = rule;
        self
    }

    pub fn with_spawn_rule(mut self, rule: SpawnRule) -> Self {
        self.spawn_rule = rule;
        self
    }

    pub fn with_display_name(mut self, locale: impl Into<String>, name: impl Into<String>) -> Self {
        self.display_names.insert(locale.into(), name.into());
        self
    }

    /// Validate and produce the immutable injection.
    ///
    /// Fails if the backing type's liveness differs from the entity
    /// class's, if attributes were set on a non-living kind, or if two
    /// variants share an id.
    pub fn build(self) -> Result<Injection, ConfigError> {
        let living = self.class.is_living();
        if living != self.backing.living {
            return Err(ConfigError::LivenessMismatch {
                key: self.key,
                class: self.class.name(),
                class_kind: liveness(living),
                backing: self.backing.key,
                backing_kind: liveness(self.backing.living),
            });
        }

        let attributes = match (living, self.attributes) {
            (false, Some(_)) => {
                return Err(ConfigError::AttributesOnNonLiving {
                    class: self.class.name(),
                })
            }
            (false, None) => None,
            (true, Some(attributes)) => Some(attributes),
            (true, None) => Some(AttributeSupplier::living_defaults()),
        };

        let variants = VariantMap::bind(&self.key, self.variants)?;

        Ok(Injection {
            key: self.key,
            class: self.class,
            factory: self.factory,
            convert: self.convert,
            backing: self.backing,
            category: self.category,
            customizer: self.customizer,
            attributes,
            variants,
            variant_rule: self.variant_rule,
            spawn_rule: self.spawn_rule,
            display_names: self.display_names,
            synthetic: OnceLock::new(),
        })
    }
}
