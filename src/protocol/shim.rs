//! Synthetic → backing type lowering at the wire boundary.

use rustc_hash::FxHashMap;
use smallvec::SmallVec;

use crate::error::ConfigError;
use crate::host::{EntityType, NativeType, NativeTypeId, SyntheticTypeId};
use crate::registry::SyntheticType;

use super::data::{DataValue, BASE_DATA_FIELDS, FLAGS_FIELD, LIVING_DATA_FIELDS};

#[derive(Clone, Copy, Debug)]
struct Lowering {
    backing: NativeType,
    living: bool,
}

/// Frozen synthetic → backing table consulted by every egress path.
///
/// Built once when the registry freezes. Every lookup is a single hash
/// probe.
#[derive(Clone, Debug, Default)]
pub struct ProtocolShim {
    remap: FxHashMap<SyntheticTypeId, Lowering>,
    hide_backing: bool,
}

impl ProtocolShim {
    /// Table over `types`. With `hide_backing` every filtered data list of
    /// an injected entity carries the invisible flag.
    pub fn new<'a>(types: impl IntoIterator<Item = &'a SyntheticType>, hide_backing: bool) -> Self {
        let remap = types
            .into_iter()
            .map(|t| {
                (
                    t.id(),
                    Lowering {
                        backing: *t.backing(),
                        living: t.is_living(),
                    },
                )
            })
            .collect();
        Self {
            remap,
            hide_backing,
        }
    }

    /// The backing type of a registered synthetic type, anything else
    /// unchanged.
    #[must_use]
    pub fn remap_type(&self, entity_type: EntityType) -> EntityType {
        match entity_type {
            EntityType::Synthetic(id) => self
                .remap
                .get(&id)
                .map_or(entity_type, |l| l.backing.entity_type()),
            EntityType::Native(_) => entity_type,
        }
    }

    /// Lower to a type clients understand. An unregistered synthetic type
    /// has nothing to lower to and fails.
    pub fn lower(&self, entity_type: EntityType) -> Result<NativeTypeId, ConfigError> {
        match entity_type {
            EntityType::Native(id) => Ok(id),
            EntityType::Synthetic(id) => self
                .remap
                .get(&id)
                .map(|l| l.backing.id)
                .ok_or_else(|| ConfigError::NotInjected {
                    what: entity_type.to_string(),
                }),
        }
    }

    #[must_use]
    pub fn backing(&self, id: SyntheticTypeId) -> Option<&NativeType> {
        self.remap.get(&id).map(|l| &l.backing)
    }

    #[must_use]
    pub fn hides_backing(&self) -> bool {
        self.hide_backing
    }

    pub fn len(&self) -> usize {
        self.remap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.remap.is_empty()
    }

    /// Strip the slots the backing type's clients cannot decode.
    ///
    /// Only the shared entity slots (plus the living ones for living kinds)
    /// that the backing type also declares survive, in their original
    /// order and unchanged. Values of types the shim does not know pass
    /// through untouched.
    pub fn filter_entity_data(
        &self,
        entity_type: EntityType,
        values: impl IntoIterator<Item = DataValue>,
    ) -> SmallVec<[DataValue; 8]> {
        let lowering = match entity_type {
            EntityType::Synthetic(id) => self.remap.get(&id),
            EntityType::Native(_) => None,
        };
        let Some(lowering) = lowering else {
            return values.into_iter().collect();
        };

        let limit = if lowering.living {
            LIVING_DATA_FIELDS
        } else {
            BASE_DATA_FIELDS
        };
        let mut kept: SmallVec<[DataValue; 8]> = values
            .into_iter()
            .filter(|v| v.id < limit && lowering.backing.knows_data_field(v.id))
            .collect();

        if self.hide_backing {
            match kept.iter_mut().find(|v| v.id == FLAGS_FIELD) {
                Some(flags) => flags.force_invisible(),
                None => {
                    let mut flags = DataValue::flags(0);
                    flags.force_invisible();
                    kept.push(flags);
                }
            }
        }

        kept
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::catalogue::{MARKER, PIG};
    use crate::protocol::data::{DataPayload, INVISIBLE_FLAG};

    fn shim(hide: bool) -> ProtocolShim {
        let mut remap = FxHashMap::default();
        remap.insert(
            SyntheticTypeId(0),
            Lowering {
                backing: PIG,
                living: true,
            },
        );
        remap.insert(
            SyntheticTypeId(1),
            Lowering {
                backing: MARKER,
                living: false,
            },
        );
        ProtocolShim {
            remap,
            hide_backing: hide,
        }
    }

    fn slots(ids: &[u8]) -> Vec<DataValue> {
        ids.iter()
            .map(|&id| DataValue::new(id, DataPayload::Int(i32::from(id))))
            .collect()
    }

    #[test]
    fn test_remap_known_and_unknown() {
        let shim = shim(false);
        let synthetic = EntityType::Synthetic(SyntheticTypeId(0));
        assert_eq!(shim.remap_type(synthetic), PIG.entity_type());

        let stranger = EntityType::Synthetic(SyntheticTypeId(7));
        assert_eq!(shim.remap_type(stranger), stranger);
        assert_eq!(shim.remap_type(PIG.entity_type()), PIG.entity_type());
    }

    #[test]
    fn test_lower_rejects_unregistered_synthetic() {
        let shim = shim(false);
        assert_eq!(
            shim.lower(EntityType::Synthetic(SyntheticTypeId(1))),
            Ok(MARKER.id)
        );
        assert!(shim.lower(EntityType::Synthetic(SyntheticTypeId(9))).is_err());
    }

    #[test]
    fn test_filter_living_keeps_order() {
        let shim = shim(false);
        let out = shim.filter_entity_data(
            EntityType::Synthetic(SyntheticTypeId(0)),
            slots(&[9, 2, 17, 14, 15, 0]),
        );
        let ids: Vec<_> = out.iter().map(|v| v.id).collect();
        assert_eq!(ids, [9, 2, 14, 0]);
    }

    #[test]
    fn test_filter_non_living_drops_living_slots() {
        let shim = shim(false);
        let out = shim.filter_entity_data(
            EntityType::Synthetic(SyntheticTypeId(1)),
            slots(&[0, 7, 8, 12]),
        );
        let ids: Vec<_> = out.iter().map(|v| v.id).collect();
        assert_eq!(ids, [0, 7]);
    }

    #[test]
    fn test_filter_passes_native_through() {
        let shim = shim(true);
        let out = shim.filter_entity_data(PIG.entity_type(), slots(&[3, 19, 40]));
        assert_eq!(out.len(), 3);
    }

    #[test]
    fn test_hide_appends_flags() {
        let shim = shim(true);
        let out = shim.filter_entity_data(EntityType::Synthetic(SyntheticTypeId(0)), slots(&[2]));
        assert_eq!(out.len(), 2);
        assert_eq!(out[1], DataValue::flags(INVISIBLE_FLAG));
    }

    #[test]
    fn test_hide_sets_existing_flag() {
        let shim = shim(true);
        let out = shim.filter_entity_data(
            EntityType::Synthetic(SyntheticTypeId(0)),
            vec![DataValue::flags(0x01), DataValue::new(1, DataPayload::Int(300))],
        );
        assert_eq!(out[0], DataValue::flags(0x21));
        assert_eq!(out[1], DataValue::new(1, DataPayload::Int(300)));
    }
}
