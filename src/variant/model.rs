//! Variant definitions and binding.
//!
//! An `UnboundVariant` is a standalone (id, model) pair. Binding it to an
//! injection key is a one-way, pure transform producing a `BoundVariant`
//! whose model name is `<injection prefix>.<id>`. The registry refuses an
//! injection whose model names collide with one already registered, so the
//! name is unique across a registry:
//!
//! ```
//! use entity_injector::core::Key;
//! use entity_injector::variant::UnboundVariant;
//!
//! let key = Key::parse("pack:capybara").unwrap();
//! let warm = UnboundVariant::bundled("warm", "models/capybara_warm.bbmodel").unwrap();
//! let bound = warm.bind(&key);
//!
//! assert_eq!(bound.id().as_str(), "warm");
//! assert_eq!(bound.injection(), &key);
//! assert_eq!(bound.model_name(), "injector.pack.capybara.warm");
//! ```

use std::borrow::Borrow;
use std::path::PathBuf;

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::core::key::is_valid_namespace;
use crate::core::Key;
use crate::error::ConfigError;

/// Variant identifier, `[a-z0-9_.-]+`, unique within one injection.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct VariantId(String);

impl VariantId {
    pub fn new(id: impl Into<String>) -> Result<Self, ConfigError> {
        let id = id.into();
        if !is_valid_namespace(&id) {
            return Err(ConfigError::InvalidVariantId { id });
        }
        Ok(Self(id))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for VariantId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for VariantId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for VariantId {
    type Error = ConfigError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<&str> for VariantId {
    type Error = ConfigError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<VariantId> for String {
    fn from(id: VariantId) -> Self {
        id.0
    }
}

/// Where a variant's model resource lives. Opaque to this crate.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ModelSource {
    Url(String),
    File(PathBuf),
    /// A resource shipped inside the registering plugin.
    Bundled(String),
}

/// A variant not yet associated with an injection.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UnboundVariant {
    id: VariantId,
    model: ModelSource,
}

impl UnboundVariant {
    pub fn new(id: &str, model: ModelSource) -> Result<Self, ConfigError> {
        Ok(Self {
            id: VariantId::new(id)?,
            model,
        })
    }

    pub fn from_url(id: &str, url: impl Into<String>) -> Result<Self, ConfigError> {
        Self::new(id, ModelSource::Url(url.into()))
    }

    pub fn from_file(id: &str, path: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        Self::new(id, ModelSource::File(path.into()))
    }

    pub fn bundled(id: &str, resource: impl Into<String>) -> Result<Self, ConfigError> {
        Self::new(id, ModelSource::Bundled(resource.into()))
    }

    #[must_use]
    pub fn id(&self) -> &VariantId {
        &self.id
    }

    #[must_use]
    pub fn model(&self) -> &ModelSource {
        &self.model
    }

    /// Associate with `injection`, deriving the model name `<prefix>.<id>`.
    #[must_use]
    pub fn bind(&self, injection: &Key) -> BoundVariant {
        BoundVariant {
            model_name: format!("{}.{}", injection.model_prefix(), self.id),
            id: self.id.clone(),
            model: self.model.clone(),
            injection: injection.clone(),
        }
    }
}

/// A variant associated with exactly one injection.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BoundVariant {
    id: VariantId,
    model: ModelSource,
    injection: Key,
    model_name: String,
}

impl BoundVariant {
    #[must_use]
    pub fn id(&self) -> &VariantId {
        &self.id
    }

    #[must_use]
    pub fn model(&self) -> &ModelSource {
        &self.model
    }

    /// Key of the injection this variant belongs to.
    #[must_use]
    pub fn injection(&self) -> &Key {
        &self.injection
    }

    /// Model name handed to the renderer. Unique within a registry.
    #[must_use]
    pub fn model_name(&self) -> &str {
        &self.model_name
    }

    /// The unbound form this was created from.
    #[must_use]
    pub fn unbind(&self) -> UnboundVariant {
        UnboundVariant {
            id: self.id.clone(),
            model: self.model.clone(),
        }
    }
}

/// Bound variants of one injection, in insertion order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct VariantMap {
    variants: Vec<BoundVariant>,
    index: FxHashMap<VariantId, usize>,
}

impl VariantMap {
    /// An empty map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind every variant to `injection`. A repeated id is an error.
    pub fn bind(
        injection: &Key,
        variants: impl IntoIterator<Item = UnboundVariant>,
    ) -> Result<Self, ConfigError> {
        let mut map = Self::new();
        for variant in variants {
            if map.contains(variant.id().as_str()) {
                return Err(ConfigError::DuplicateVariant {
                    key: injection.clone(),
                    id: variant.id().to_string(),
                });
            }
            map.index.insert(variant.id().clone(), map.variants.len());
            map.variants.push(variant.bind(injection));
        }
        Ok(map)
    }

    #[must_use]
    pub fn get(&self, id: &str) -> Option<&BoundVariant> {
        self.index.get(id).map(|&i| &self.variants[i])
    }

    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// The first variant in insertion order.
    #[must_use]
    pub fn first(&self) -> Option<&BoundVariant> {
        self.variants.first()
    }

    /// Variant at insertion position `index`.
    #[must_use]
    pub fn get_index(&self, index: usize) -> Option<&BoundVariant> {
        self.variants.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &BoundVariant> {
        self.variants.iter()
    }

    pub fn ids(&self) -> impl Iterator<Item = &VariantId> {
        self.variants.iter().map(BoundVariant::id)
    }

    /// Ids as plain strings, for error reports.
    #[must_use]
    pub fn id_strings(&self) -> Vec<String> {
        self.ids().map(ToString::to_string).collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.variants.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.variants.is_empty()
    }
}

impl<'a> IntoIterator for &'a VariantMap {
    type Item = &'a BoundVariant;
    type IntoIter = std::slice::Iter<'a, BoundVariant>;

    fn into_iter(self) -> Self::IntoIter {
        self.variants.iter()
    }
}
