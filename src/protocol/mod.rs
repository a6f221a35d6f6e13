//! The wire boundary.
//!
//! Clients only know the host's native types. Every client-bound message
//! that names a type is built through a [`ProtocolShim`], which lowers a
//! synthetic type to its backing type and strips synchronized data slots the
//! backing type's clients cannot decode.

pub mod data;
pub mod packets;
pub mod shim;

pub use data::{DataPayload, DataValue, INVISIBLE_FLAG};
pub use packets::{AddEntityPacket, ClientboundPacket, EntityTooltipInfo, SetEntityDataPacket};
pub use shim::ProtocolShim;
