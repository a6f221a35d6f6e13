//! Injection descriptors.
//!
//! An [`Injection`] binds a custom entity class to a backing type from the
//! host catalogue, together with its variants, variant rule, spawn rule and
//! display names. It is built once, before the registry freezes, and never
//! changes afterwards.
//!
//! ```
//! use std::any::Any;
//! use entity_injector::core::Key;
//! use entity_injector::host::catalogue::PIG;
//! use entity_injector::host::{EntityBase, EntityKind, HostEntity, PublicEntity};
//! use entity_injector::inject::{Injection, MobCategory};
//! use entity_injector::variant::{UnboundVariant, VariantRule};
//!
//! struct Capybara {
//!     base: EntityBase,
//! }
//!
//! impl HostEntity for Capybara {
//!     fn base(&self) -> &EntityBase { &self.base }
//!     fn base_mut(&mut self) -> &mut EntityBase { &mut self.base }
//!     fn as_any(&self) -> &dyn Any { self }
//!     fn into_any(self: Box<Self>) -> Box<dyn Any> { self }
//! }
//!
//! impl EntityKind for Capybara {
//!     const LIVING: bool = true;
//! }
//!
//! let injection = Injection::builder(
//!     Key::parse("pack:capybara").unwrap(),
//!     |base| Capybara { base },
//!     |e: &Capybara| PublicEntity::new(e.entity_id(), "Capybara"),
//!     PIG,
//! )
//! .with_category(MobCategory::Creature)
//! .with_variant(UnboundVariant::bundled("warm", "capybara_warm.bbmodel").unwrap())
//! .with_variant_rule(VariantRule::always("warm"))
//! .with_display_name("en_us", "Capybara")
//! .build()
//! .unwrap();
//!
//! assert_eq!(injection.variants().len(), 1);
//! ```

pub mod attributes;
pub mod category;
pub mod injection;

pub use attributes::{Attribute, AttributeSupplier};
pub use category::{MobCategory, TypeBuilder, TypeProperties};
pub use injection::{EntityFactory, Injection, InjectionBuilder, TypeCustomizer};
