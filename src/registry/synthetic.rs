//! Synthetic types.

use crate::core::Key;
use crate::host::{EntityType, NativeType, SyntheticTypeId};
use crate::inject::{Injection, MobCategory, TypeBuilder, TypeProperties};

/// The server-side type of an injected kind. Never sent to clients.
///
/// Created once per injection in phase 1. Its properties start as a copy of
/// the backing type's and then pass through the injection's customizer.
#[derive(Clone, Debug, PartialEq)]
pub struct SyntheticType {
    id: SyntheticTypeId,
    key: Key,
    backing: NativeType,
    category: MobCategory,
    properties: TypeProperties,
    living: bool,
}

impl SyntheticType {
    #[must_use]
    pub fn for_injection(id: SyntheticTypeId, injection: &Injection) -> Self {
        let builder = TypeBuilder::from_backing(injection.backing_type(), injection.category());
        Self {
            id,
            key: injection.key().clone(),
            backing: *injection.backing_type(),
            category: injection.category(),
            properties: injection.customize(builder).build(),
            living: injection.is_living(),
        }
    }

    #[must_use]
    pub fn id(&self) -> SyntheticTypeId {
        self.id
    }

    #[must_use]
    pub fn entity_type(&self) -> EntityType {
        EntityType::Synthetic(self.id)
    }

    #[must_use]
    pub fn key(&self) -> &Key {
        &self.key
    }

    /// The protocol-legal type clients see instead.
    #[must_use]
    pub fn backing(&self) -> &NativeType {
        &self.backing
    }

    #[must_use]
    pub fn category(&self) -> MobCategory {
        self.category
    }

    #[must_use]
    pub fn properties(&self) -> &TypeProperties {
        &self.properties
    }

    #[must_use]
    pub fn is_living(&self) -> bool {
        self.living
    }

    /// Translation key of the display name.
    #[must_use]
    pub fn description_id(&self) -> String {
        self.key.description_id()
    }
}

impl std::fmt::Display for SyntheticType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} (backed by {})", self.key, self.backing)
    }
}
