//! The host's closed type catalogue.
//!
//! A reference subset of vanilla types that backing types are usually picked
//! from. Real hosts build a `Catalogue` from their own registry.

use rustc_hash::FxHashMap;

use super::types::{Dimensions, NativeType, NativeTypeId};

// Synchronized data slots: Entity 0..=7, LivingEntity adds 8..=14, Mob 15,
// AgeableMob 16, then per-type fields.
pub const ARMOR_STAND: NativeType =
    NativeType::living(5, "minecraft:armor_stand", Dimensions::new(0.5, 1.975, 1.7775), 10, 22);
pub const ARROW: NativeType =
    NativeType::non_living(6, "minecraft:arrow", Dimensions::new(0.5, 0.5, 0.13), 4, 11);
pub const BAT: NativeType =
    NativeType::living(8, "minecraft:bat", Dimensions::new(0.5, 0.9, 0.45), 5, 17);
pub const BLOCK_DISPLAY: NativeType =
    NativeType::non_living(12, "minecraft:block_display", Dimensions::new(0.0, 0.0, 0.0), 10, 24);
pub const CHICKEN: NativeType =
    NativeType::living(25, "minecraft:chicken", Dimensions::new(0.4, 0.7, 0.644), 10, 18);
pub const COD: NativeType =
    NativeType::living(27, "minecraft:cod", Dimensions::new(0.5, 0.3, 0.195), 4, 17);
pub const COW: NativeType =
    NativeType::living(29, "minecraft:cow", Dimensions::new(0.9, 1.4, 1.3), 10, 18);
pub const ITEM_DISPLAY: NativeType =
    NativeType::non_living(67, "minecraft:item_display", Dimensions::new(0.0, 0.0, 0.0), 10, 25);
pub const MARKER: NativeType =
    NativeType::non_living(80, "minecraft:marker", Dimensions::new(0.0, 0.0, 0.0), 0, 8);
pub const PIG: NativeType =
    NativeType::living(95, "minecraft:pig", Dimensions::new(0.9, 0.9, 0.765), 10, 20);
pub const SALMON: NativeType =
    NativeType::living(104, "minecraft:salmon", Dimensions::new(0.7, 0.4, 0.26), 4, 18);
pub const SHEEP: NativeType =
    NativeType::living(106, "minecraft:sheep", Dimensions::new(0.9, 1.3, 1.235), 10, 18);
pub const SILVERFISH: NativeType =
    NativeType::living(109, "minecraft:silverfish", Dimensions::new(0.4, 0.3, 0.13), 8, 16);
pub const SKELETON: NativeType =
    NativeType::living(110, "minecraft:skeleton", Dimensions::new(0.6, 1.99, 1.74), 8, 17);
pub const ZOMBIE: NativeType =
    NativeType::living(145, "minecraft:zombie", Dimensions::new(0.6, 1.95, 1.74), 8, 19);

/// Lookup over a set of native types.
#[derive(Clone, Debug, Default)]
pub struct Catalogue {
    types: FxHashMap<NativeTypeId, NativeType>,
    by_key: FxHashMap<&'static str, NativeTypeId>,
}

impl Catalogue {
    /// An empty catalogue.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The reference vanilla subset.
    #[must_use]
    pub fn vanilla() -> Self {
        [
            ARMOR_STAND,
            ARROW,
            BAT,
            BLOCK_DISPLAY,
            CHICKEN,
            COD,
            COW,
            ITEM_DISPLAY,
            MARKER,
            PIG,
            SALMON,
            SHEEP,
            SILVERFISH,
            SKELETON,
            ZOMBIE,
        ]
        .into_iter()
        .collect()
    }

    /// Add a type. A type with the same id is replaced.
    pub fn insert(&mut self, native: NativeType) {
        self.by_key.insert(native.key, native.id);
        self.types.insert(native.id, native);
    }

    #[must_use]
    pub fn get(&self, id: NativeTypeId) -> Option<&NativeType> {
        self.types.get(&id)
    }

    #[must_use]
    pub fn by_key(&self, key: &str) -> Option<&NativeType> {
        self.by_key.get(key).and_then(|id| self.types.get(id))
    }

    #[must_use]
    pub fn contains(&self, id: NativeTypeId) -> bool {
        self.types.contains_key(&id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.types.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &NativeType> {
        self.types.values()
    }
}

impl FromIterator<NativeType> for Catalogue {
    fn from_iter<I: IntoIterator<Item = NativeType>>(iter: I) -> Self {
        let mut catalogue = Self::new();
        for native in iter {
            catalogue.insert(native);
        }
        catalogue
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vanilla_lookup() {
        let catalogue = Catalogue::vanilla();
        assert_eq!(catalogue.get(PIG.id), Some(&PIG));
        assert_eq!(catalogue.by_key("minecraft:marker"), Some(&MARKER));
        assert!(catalogue.by_key("minecraft:capybara").is_none());
    }

    #[test]
    fn test_living_split() {
        let catalogue = Catalogue::vanilla();
        let living = catalogue.iter().filter(|t| t.living).count();
        assert_eq!(living, 11);
        assert_eq!(catalogue.len() - living, 4);
    }

    #[test]
    fn test_living_types_cover_living_slots() {
        for native in Catalogue::vanilla().iter().filter(|t| t.living) {
            assert!(native.data_fields >= 15, "{native} lacks living data slots");
        }
    }
}
