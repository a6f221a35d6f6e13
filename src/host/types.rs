//! Type identities.
//!
//! The host owns a closed catalogue of `NativeType`s that unmodified clients
//! understand. Injected kinds get a `SyntheticTypeId` that only the server
//! knows. `EntityType` is the sum of both; anything leaving the server must
//! be lowered from `Synthetic` to `Native` first (see `protocol`).

use serde::{Deserialize, Serialize};

/// Index of a type in the host's closed catalogue.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NativeTypeId(pub u16);

impl NativeTypeId {
    #[must_use]
    pub const fn new(id: u16) -> Self {
        Self(id)
    }

    #[must_use]
    pub const fn raw(self) -> u16 {
        self.0
    }
}

/// Identity of an injected kind, assigned at freeze in registration order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SyntheticTypeId(pub u32);

impl SyntheticTypeId {
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

/// Any entity type the server can hold.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityType {
    /// A member of the host catalogue. Safe to send.
    Native(NativeTypeId),
    /// An injected kind. Never sent.
    Synthetic(SyntheticTypeId),
}

impl EntityType {
    #[must_use]
    pub fn is_synthetic(self) -> bool {
        matches!(self, EntityType::Synthetic(_))
    }

    #[must_use]
    pub fn as_native(self) -> Option<NativeTypeId> {
        match self {
            EntityType::Native(id) => Some(id),
            EntityType::Synthetic(_) => None,
        }
    }

    #[must_use]
    pub fn as_synthetic(self) -> Option<SyntheticTypeId> {
        match self {
            EntityType::Synthetic(id) => Some(id),
            EntityType::Native(_) => None,
        }
    }
}

impl From<NativeTypeId> for EntityType {
    fn from(id: NativeTypeId) -> Self {
        EntityType::Native(id)
    }
}

impl From<SyntheticTypeId> for EntityType {
    fn from(id: SyntheticTypeId) -> Self {
        EntityType::Synthetic(id)
    }
}

impl std::fmt::Display for EntityType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EntityType::Native(id) => write!(f, "Native({})", id.0),
            EntityType::Synthetic(id) => write!(f, "Synthetic({})", id.0),
        }
    }
}

/// Hitbox size.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Dimensions {
    pub width: f32,
    pub height: f32,
    pub eye_height: f32,
}

impl Dimensions {
    #[must_use]
    pub const fn new(width: f32, height: f32, eye_height: f32) -> Self {
        Self {
            width,
            height,
            eye_height,
        }
    }

    /// Eye height at the vanilla default of 85% of the height.
    #[must_use]
    pub fn scalable(width: f32, height: f32) -> Self {
        Self::new(width, height, height * 0.85)
    }
}

/// A type from the host's closed catalogue.
///
/// `data_fields` is the number of synchronized data slots (ids
/// `0..data_fields`) a client decodes for this type.
#[derive(Clone, Copy, Debug)]
pub struct NativeType {
    pub id: NativeTypeId,
    pub key: &'static str,
    pub living: bool,
    pub dimensions: Dimensions,
    pub tracking_range: u8,
    pub data_fields: u8,
}

impl NativeType {
    #[must_use]
    pub const fn living(
        id: u16,
        key: &'static str,
        dimensions: Dimensions,
        tracking_range: u8,
        data_fields: u8,
    ) -> Self {
        Self {
            id: NativeTypeId(id),
            key,
            living: true,
            dimensions,
            tracking_range,
            data_fields,
        }
    }

    #[must_use]
    pub const fn non_living(
        id: u16,
        key: &'static str,
        dimensions: Dimensions,
        tracking_range: u8,
        data_fields: u8,
    ) -> Self {
        Self {
            id: NativeTypeId(id),
            key,
            living: false,
            dimensions,
            tracking_range,
            data_fields,
        }
    }

    #[must_use]
    pub fn entity_type(&self) -> EntityType {
        EntityType::Native(self.id)
    }

    /// True if clients decode data slot `id` for this type.
    #[must_use]
    pub fn knows_data_field(&self, id: u8) -> bool {
        id < self.data_fields
    }
}

impl PartialEq for NativeType {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for NativeType {}

impl std::hash::Hash for NativeType {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl std::fmt::Display for NativeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entity_type_tags() {
        let native = EntityType::from(NativeTypeId::new(95));
        let synthetic = EntityType::from(SyntheticTypeId::new(0));

        assert!(!native.is_synthetic());
        assert!(synthetic.is_synthetic());
        assert_eq!(native.as_native(), Some(NativeTypeId(95)));
        assert_eq!(synthetic.as_native(), None);
        assert_eq!(synthetic.as_synthetic(), Some(SyntheticTypeId(0)));
    }

    #[test]
    fn test_native_equality_by_id() {
        let a = NativeType::living(1, "a:a", Dimensions::scalable(1.0, 1.0), 10, 15);
        let b = NativeType::living(1, "b:b", Dimensions::scalable(2.0, 2.0), 8, 16);
        assert_eq!(a, b);
    }

    #[test]
    fn test_knows_data_field() {
        let t = NativeType::non_living(2, "x:y", Dimensions::new(0.0, 0.0, 0.0), 0, 8);
        assert!(t.knows_data_field(7));
        assert!(!t.knows_data_field(8));
    }
}
