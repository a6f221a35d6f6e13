//! Client-bound messages that carry a type identity.
//!
//! Each message stores a `NativeTypeId`, never an `EntityType`, so the only
//! way to build one for an injected entity is through [`ProtocolShim`].

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::error::{ConfigError, HostError};
use crate::host::{EntityId, EntityType, HostEntity, NativeTypeId};

use super::data::DataValue;
use super::shim::ProtocolShim;

/// Spawns an entity on the client.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AddEntityPacket {
    pub entity_id: EntityId,
    pub type_id: NativeTypeId,
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl AddEntityPacket {
    pub fn new(shim: &ProtocolShim, entity: &dyn HostEntity) -> Result<Self, ConfigError> {
        let location = entity.location();
        Ok(Self {
            entity_id: entity.entity_id(),
            type_id: shim.lower(entity.entity_type())?,
            x: location.x,
            y: location.y,
            z: location.z,
        })
    }
}

/// Hover info for an entity in a chat component.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EntityTooltipInfo {
    pub type_id: NativeTypeId,
    pub entity_id: EntityId,
    pub name: Option<String>,
}

impl EntityTooltipInfo {
    pub fn new(
        shim: &ProtocolShim,
        entity: &dyn HostEntity,
        name: Option<String>,
    ) -> Result<Self, ConfigError> {
        Ok(Self {
            type_id: shim.lower(entity.entity_type())?,
            entity_id: entity.entity_id(),
            name,
        })
    }
}

/// Synchronized data update.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SetEntityDataPacket {
    pub entity_id: EntityId,
    pub values: SmallVec<[DataValue; 8]>,
}

impl SetEntityDataPacket {
    /// Filtered through the shim for `entity_type`.
    pub fn new(
        shim: &ProtocolShim,
        entity_id: EntityId,
        entity_type: EntityType,
        values: impl IntoIterator<Item = DataValue>,
    ) -> Self {
        Self {
            entity_id,
            values: shim.filter_entity_data(entity_type, values),
        }
    }
}

/// Every client-bound message the shim guards.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum ClientboundPacket {
    AddEntity(AddEntityPacket),
    Tooltip(EntityTooltipInfo),
    SetEntityData(SetEntityDataPacket),
}

impl ClientboundPacket {
    /// Type carried by the message, if any.
    #[must_use]
    pub fn type_id(&self) -> Option<NativeTypeId> {
        match self {
            ClientboundPacket::AddEntity(p) => Some(p.type_id),
            ClientboundPacket::Tooltip(p) => Some(p.type_id),
            ClientboundPacket::SetEntityData(_) => None,
        }
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, HostError> {
        Ok(bincode::serialize(self)?)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, HostError> {
        Ok(bincode::deserialize(bytes)?)
    }
}

impl From<AddEntityPacket> for ClientboundPacket {
    fn from(p: AddEntityPacket) -> Self {
        ClientboundPacket::AddEntity(p)
    }
}

impl From<EntityTooltipInfo> for ClientboundPacket {
    fn from(p: EntityTooltipInfo) -> Self {
        ClientboundPacket::Tooltip(p)
    }
}

impl From<SetEntityDataPacket> for ClientboundPacket {
    fn from(p: SetEntityDataPacket) -> Self {
        ClientboundPacket::SetEntityData(p)
    }
}
