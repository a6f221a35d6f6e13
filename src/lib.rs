//! # entity-injector
//!
//! Adds new entity kinds to a game server whose type catalogue is closed,
//! without breaking unmodified clients.
//!
//! ## Design Principles
//!
//! 1. **Shadow identities**: Every injected kind gets a synthetic type the
//!    server uses internally and a native backing type it shows clients.
//!    `EntityType` is a sum of the two; anything leaving the server is
//!    lowered to the native side first.
//!
//! 2. **Freeze before use**: Registration is open only during start-up. The
//!    registry is a typestate that ends immutable, so lookups never race
//!    with writes.
//!
//! 3. **Write identity once**: An instance's kind and variant go into its
//!    persistent store at first construction and are only read afterwards.
//!
//! ## Modules
//!
//! - `core`: Namespaced keys, variant RNG, configuration
//! - `host`: The host boundary (type catalogue, entities, persistence, sinks)
//! - `biome`: Biome filters, spawn data and spawn rules
//! - `variant`: Variants and variant rules
//! - `inject`: Injection descriptors and their builder
//! - `registry`: Lifecycle phases, typestate registries, the `Injector` driver
//! - `protocol`: Type lowering and data filtering at the wire boundary
//! - `identity`: Persisted per-instance identity

pub mod biome;
pub mod core;
pub mod error;
pub mod host;
pub mod identity;
pub mod inject;
pub mod protocol;
pub mod registry;
pub mod variant;

// Re-export commonly used types
pub use crate::core::{InjectorConfig, Key, LogLevel, ModelIntegration, VariantRng};

pub use crate::error::{ConfigError, HostError, InjectError, LifecycleError};

pub use crate::host::{
    Biome, EntityBase, EntityClass, EntityKind, EntityType, HostEntity, Location, NativeType,
    NativeTypeId, PersistentDataContainer, PublicEntity, SyntheticTypeId,
};

pub use crate::biome::{BiomeFilter, MobCost, SpawnData, SpawnRule, TemperatureRange};

pub use crate::variant::{BoundVariant, ModelSource, UnboundVariant, VariantId, VariantRule};

pub use crate::inject::{AttributeSupplier, Injection, InjectionBuilder, MobCategory};

pub use crate::registry::{FrozenRegistry, Injector, OpenRegistry, Phase, SyntheticType};

pub use crate::protocol::{DataValue, ProtocolShim};

pub use crate::identity::{IdentityState, NO_MODEL};
