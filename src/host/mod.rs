//! The host boundary.
//!
//! Everything the injector needs from the game server it runs inside: the
//! closed type catalogue, the entity object model, world context, the
//! per-entity persistent store, and the installation points the injector
//! writes into. The host's behaviour (AI, physics, the full wire protocol)
//! stays on the other side of these interfaces.

pub mod catalogue;
pub mod entity;
pub mod memory;
pub mod persistence;
pub mod sink;
pub mod types;
pub mod world;

pub use catalogue::Catalogue;
pub use entity::{EntityBase, EntityClass, EntityId, EntityKind, HostEntity};
pub use memory::{InMemoryHost, RegisteredType};
pub use persistence::{PersistentDataContainer, PersistentValue};
pub use sink::{BiomeRegistry, ConversionLayer, ConvertFn, PublicEntity, TypeRegistry};
pub use types::{Dimensions, EntityType, NativeType, NativeTypeId, SyntheticTypeId};
pub use world::{Biome, Location};
