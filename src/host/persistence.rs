//! Per-entity persistent key-value store.
//!
//! The host saves this container with the entity and hands it back on
//! reload. Backed by `im::OrdMap` so snapshotting an entity for a save is
//! O(1).

use im::OrdMap;
use serde::{Deserialize, Serialize};

use crate::error::HostError;

/// A stored value.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PersistentValue {
    String(String),
    Int(i64),
}

impl PersistentValue {
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            PersistentValue::String(s) => Some(s),
            PersistentValue::Int(_) => None,
        }
    }

    #[must_use]
    pub fn as_int(&self) -> Option<i64> {
        match self {
            PersistentValue::Int(v) => Some(*v),
            PersistentValue::String(_) => None,
        }
    }
}

impl From<String> for PersistentValue {
    fn from(v: String) -> Self {
        PersistentValue::String(v)
    }
}

impl From<&str> for PersistentValue {
    fn from(v: &str) -> Self {
        PersistentValue::String(v.to_string())
    }
}

impl From<i64> for PersistentValue {
    fn from(v: i64) -> Self {
        PersistentValue::Int(v)
    }
}

/// Namespaced field name → value.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistentDataContainer {
    fields: OrdMap<String, PersistentValue>,
}

impl PersistentDataContainer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn get(&self, field: &str) -> Option<&PersistentValue> {
        self.fields.get(field)
    }

    #[must_use]
    pub fn get_string(&self, field: &str) -> Option<&str> {
        self.get(field).and_then(PersistentValue::as_str)
    }

    #[must_use]
    pub fn get_int(&self, field: &str) -> Option<i64> {
        self.get(field).and_then(PersistentValue::as_int)
    }

    #[must_use]
    pub fn has(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    pub fn set(&mut self, field: impl Into<String>, value: impl Into<PersistentValue>) {
        self.fields.insert(field.into(), value.into());
    }

    pub fn remove(&mut self, field: &str) -> Option<PersistentValue> {
        self.fields.remove(field)
    }

    /// Copy every field of `other` into this container.
    pub fn merge(&mut self, other: &PersistentDataContainer) {
        for (field, value) in other.fields.iter() {
            self.fields.insert(field.clone(), value.clone());
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn fields(&self) -> impl Iterator<Item = (&String, &PersistentValue)> {
        self.fields.iter()
    }

    /// Encode for the host's save file.
    pub fn to_bytes(&self) -> Result<Vec<u8>, HostError> {
        Ok(bincode::serialize(self)?)
    }

    /// Decode what `to_bytes` produced.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, HostError> {
        Ok(bincode::deserialize(bytes)?)
    }
}
