//! The slice of the host's entity object model this crate touches.
//!
//! An injected kind is a Rust type implementing [`EntityKind`]. The crate
//! never looks into behaviour; it only needs an instance's identity, its
//! location, and its persistent store.

use std::any::{Any, TypeId};
use std::sync::atomic::{AtomicU32, Ordering};

use serde::{Deserialize, Serialize};

use super::persistence::PersistentDataContainer;
use super::types::EntityType;
use super::world::Location;

static NEXT_ENTITY_ID: AtomicU32 = AtomicU32::new(1);

/// Runtime id of an entity instance, unique per process.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(pub u32);

impl EntityId {
    /// Allocate the next id.
    #[must_use]
    pub fn next() -> Self {
        Self(NEXT_ENTITY_ID.fetch_add(1, Ordering::Relaxed))
    }
}

impl std::fmt::Display for EntityId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Entity({})", self.0)
    }
}

/// State every host entity carries.
#[derive(Clone, Debug)]
pub struct EntityBase {
    pub id: EntityId,
    pub entity_type: EntityType,
    pub location: Location,
    pub data: PersistentDataContainer,
}

impl EntityBase {
    /// A fresh instance with a newly allocated id and an empty store.
    pub fn new(entity_type: EntityType, location: &Location) -> Self {
        Self {
            id: EntityId::next(),
            entity_type,
            location: location.clone(),
            data: PersistentDataContainer::new(),
        }
    }
}

/// An entity instance, object safe.
pub trait HostEntity: Any + Send {
    fn base(&self) -> &EntityBase;

    fn base_mut(&mut self) -> &mut EntityBase;

    fn as_any(&self) -> &dyn Any;

    fn into_any(self: Box<Self>) -> Box<dyn Any>;

    /// Name of the concrete class.
    fn class_name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }

    fn entity_id(&self) -> EntityId {
        self.base().id
    }

    /// The type the instance was constructed with.
    fn entity_type(&self) -> EntityType {
        self.base().entity_type
    }

    fn location(&self) -> &Location {
        &self.base().location
    }

    fn persistent_data(&self) -> &PersistentDataContainer {
        &self.base().data
    }

    fn persistent_data_mut(&mut self) -> &mut PersistentDataContainer {
        &mut self.base_mut().data
    }
}

/// A concrete entity class.
pub trait EntityKind: HostEntity + Sized {
    /// Whether the class is a living entity (has health, attributes, AI).
    const LIVING: bool;
}

/// Runtime identity of an entity class.
#[derive(Clone, Copy, Debug)]
pub struct EntityClass {
    type_id: TypeId,
    name: &'static str,
    living: bool,
}

impl EntityClass {
    #[must_use]
    pub fn of<T: EntityKind>() -> Self {
        Self {
            type_id: TypeId::of::<T>(),
            name: std::any::type_name::<T>(),
            living: T::LIVING,
        }
    }

    #[must_use]
    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    #[must_use]
    pub fn is_living(&self) -> bool {
        self.living
    }

    /// True if `entity` is an instance of this class.
    #[must_use]
    pub fn is_instance(&self, entity: &dyn HostEntity) -> bool {
        entity.as_any().type_id() == self.type_id
    }
}

impl PartialEq for EntityClass {
    fn eq(&self, other: &Self) -> bool {
        self.type_id == other.type_id
    }
}

impl Eq for EntityClass {}

impl std::hash::Hash for EntityClass {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.type_id.hash(state);
    }
}

impl std::fmt::Display for EntityClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name)
    }
}
