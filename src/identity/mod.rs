//! Persisted per-instance identity.
//!
//! Each injected instance carries its kind and chosen variant in its own
//! persistent store. They are written once, the first time the instance is
//! constructed, and only read afterwards: reconstructing a saved instance
//! never runs the variant rule again, so a creature keeps its appearance
//! across reloads.

pub mod init;
pub mod state;

pub use init::{initialize, Initialized};
pub use state::{
    migrate, IdentityState, Migration, StoredVariant, CURRENT_DATA_VERSION, DATA_VERSION_FIELD,
    KIND_ID_FIELD, NO_MODEL, PENDING_MODEL_FIELD, VARIANT_FIELD,
};
