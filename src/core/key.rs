//! Namespaced identifiers.
//!
//! Every injected kind, biome, world and biome tag is named by a `Key` of the
//! form `namespace:value`. Keys are the durable identity of an injection: the
//! string form is written into persisted entity data, so its format must not
//! change between versions.
//!
//! ```
//! use entity_injector::core::Key;
//!
//! let key = Key::parse("pack:capybara").unwrap();
//! assert_eq!(key.namespace(), "pack");
//! assert_eq!(key.value(), "capybara");
//! assert_eq!(key.to_string(), "pack:capybara");
//! assert_eq!(key.model_prefix(), "injector.pack.capybara");
//! ```

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Namespace used when a key is parsed without one.
pub const DEFAULT_NAMESPACE: &str = "minecraft";

/// Root segment of every derived model name.
pub const MODEL_PREFIX_ROOT: &str = "injector";

/// A `namespace:value` identifier.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Key {
    namespace: String,
    value: String,
}

impl Key {
    /// Create a key from its two halves.
    pub fn new(
        namespace: impl Into<String>,
        value: impl Into<String>,
    ) -> Result<Self, ConfigError> {
        let namespace = namespace.into();
        let value = value.into();
        if !is_valid_namespace(&namespace) {
            return Err(ConfigError::InvalidKey {
                input: format!("{namespace}:{value}"),
                reason: "namespace must match [a-z0-9_.-]+",
            });
        }
        if !is_valid_value(&value) {
            return Err(ConfigError::InvalidKey {
                input: format!("{namespace}:{value}"),
                reason: "value must match [a-z0-9_.-/]+",
            });
        }
        Ok(Self { namespace, value })
    }

    /// Parse `namespace:value`, or `value` in the default namespace.
    pub fn parse(input: &str) -> Result<Self, ConfigError> {
        match input.split_once(':') {
            Some((namespace, value)) => Self::new(namespace, value),
            None => Self::new(DEFAULT_NAMESPACE, input),
        }
    }

    /// Key in the default namespace.
    pub fn minecraft(value: &str) -> Result<Self, ConfigError> {
        Self::new(DEFAULT_NAMESPACE, value)
    }

    /// Unchecked constructor for literals known to be valid.
    pub(crate) fn from_static(namespace: &'static str, value: &'static str) -> Self {
        debug_assert!(is_valid_namespace(namespace) && is_valid_value(value));
        Self {
            namespace: namespace.to_string(),
            value: value.to_string(),
        }
    }

    #[must_use]
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Prefix of the model names of this key's variants.
    #[must_use]
    pub fn model_prefix(&self) -> String {
        format!("{MODEL_PREFIX_ROOT}.{}.{}", self.namespace, self.value)
    }

    /// Translation key the host uses for this kind's display name.
    #[must_use]
    pub fn description_id(&self) -> String {
        format!("entity.{}.{}", self.namespace, self.value.replace('/', "."))
    }
}

impl std::fmt::Display for Key {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.namespace, self.value)
    }
}

impl std::str::FromStr for Key {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Key {
    type Error = ConfigError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Key> for String {
    fn from(key: Key) -> Self {
        key.to_string()
    }
}

/// `[a-z0-9_.-]+`
#[must_use]
pub fn is_valid_namespace(s: &str) -> bool {
    !s.is_empty()
        && s
            .bytes()
            .all(|b| matches!(b, b'a'..=b'z' | b'0'..=b'9' | b'_' | b'.' | b'-'))
}

/// `[a-z0-9_.-/]+`
#[must_use]
pub fn is_valid_value(s: &str) -> bool {
    !s.is_empty()
        && s
            .bytes()
            .all(|b| matches!(b, b'a'..=b'z' | b'0'..=b'9' | b'_' | b'.' | b'-' | b'/'))
}
