//! Synchronized entity data as it travels in `SetEntityDataPacket`.

use serde::{Deserialize, Serialize};

/// Shared flags byte every entity carries in slot 0.
pub const FLAGS_FIELD: u8 = 0;

/// Bit of the flags byte that makes the entity invisible.
pub const INVISIBLE_FLAG: u8 = 0x20;

/// Slots every entity has (`0..8`).
pub const BASE_DATA_FIELDS: u8 = 8;

/// Slots every living entity has (`0..15`).
pub const LIVING_DATA_FIELDS: u8 = 15;

/// Value of one slot.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum DataPayload {
    Byte(u8),
    Int(i32),
    Float(f32),
    Bool(bool),
    String(String),
    OptionalString(Option<String>),
}

/// One slot id with its value.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DataValue {
    pub id: u8,
    pub value: DataPayload,
}

impl DataValue {
    #[must_use]
    pub fn new(id: u8, value: DataPayload) -> Self {
        Self { id, value }
    }

    /// Slot 0 holding `flags`.
    #[must_use]
    pub fn flags(flags: u8) -> Self {
        Self::new(FLAGS_FIELD, DataPayload::Byte(flags))
    }

    /// Set the invisible bit if this is the flags slot.
    pub(crate) fn force_invisible(&mut self) {
        if self.id != FLAGS_FIELD {
            return;
        }
        match &mut self.value {
            DataPayload::Byte(flags) => *flags |= INVISIBLE_FLAG,
            other => *other = DataPayload::Byte(INVISIBLE_FLAG),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_force_invisible_keeps_other_bits() {
        let mut value = DataValue::flags(0x01);
        value.force_invisible();
        assert_eq!(value.value, DataPayload::Byte(0x21));
    }

    #[test]
    fn test_force_invisible_ignores_other_slots() {
        let mut value = DataValue::new(3, DataPayload::Bool(false));
        value.force_invisible();
        assert_eq!(value.value, DataPayload::Bool(false));
    }
}
