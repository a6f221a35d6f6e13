//! Error types.
//!
//! Every failure in this crate is fatal to the collaborator that caused it:
//! a duplicate key, a rule naming an unknown variant, or a lookup issued
//! before the registry is frozen all indicate a programming mistake. The
//! errors are returned at the point of detection so the host can abort
//! start-up instead of running with a half-registered kind catalogue.

use thiserror::Error;

use crate::core::Key;
use crate::registry::Phase;

/// Mistakes in how a kind, variant or rule was configured.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ConfigError {
    /// Two injections share a key.
    #[error("Duplicate registered injection with key: '{key}'")]
    DuplicateKey { key: Key },

    /// Two injections share an entity class.
    #[error("Duplicate registered injection with entity class: '{class}'")]
    DuplicateEntityClass { class: &'static str },

    /// Living entity class backed by a non-living type, or the reverse.
    #[error(
        "Liveness mismatch for '{key}': entity class '{class}' is {class_kind}, \
         backing type '{backing}' is {backing_kind}"
    )]
    LivenessMismatch {
        key: Key,
        class: &'static str,
        class_kind: &'static str,
        backing: &'static str,
        backing_kind: &'static str,
    },

    /// Default attributes were supplied for a non-living kind.
    #[error("'{class}' is not a living entity. Only living entities can have attributes.")]
    AttributesOnNonLiving { class: &'static str },

    /// A namespaced key failed to parse.
    #[error("Invalid key '{input}': {reason}")]
    InvalidKey { input: String, reason: &'static str },

    /// A variant id contains characters outside `[a-z0-9_.-]`.
    #[error("Entity variant id can only contain [a-z0-9_.-], got '{id}'")]
    InvalidVariantId { id: String },

    /// The same variant id was added twice to one injection.
    #[error("Duplicate variant id '{id}' for entity '{key}'")]
    DuplicateVariant { key: Key, id: String },

    /// Two variants of different injections bind to the same model name.
    #[error("Model name '{name}' of entity '{key}' is already used by entity '{other}'")]
    DuplicateModelName { name: String, key: Key, other: Key },

    /// A rule references ids the injection does not declare.
    #[error("Unknown variant(s) {unknown:?} for entity '{key}'. Known variants: {known:?}")]
    UnknownVariant {
        key: Key,
        unknown: Vec<String>,
        known: Vec<String>,
    },

    /// A rule returned a variant bound to another injection.
    #[error(
        "Provided entity variant is registered for a different entity: \
         {found} instead of {expected}"
    )]
    ForeignVariant { expected: Key, found: Key },

    /// The construction callback was given another injection's type.
    #[error("Provided entity type is not the real entity type of '{key}': {found}")]
    WrongEntityType { key: Key, found: String },

    /// A constructed instance is not of the injection's entity class.
    #[error("Injection for type '{expected}', but entity is of type '{found}'")]
    EntityClassMismatch {
        expected: &'static str,
        found: String,
    },

    /// A total rule sits before the end of a first-match chain.
    #[error("Rule at position {index} of {len} always matches; the rules after it are unreachable")]
    UnreachableRule { index: usize, len: usize },

    /// A weighted rule has no positive weight.
    #[error("Weighted variant rule for entity '{key}' has no positive weight")]
    EmptyWeights { key: Key },

    /// A lookup named a type, class or key the registry does not know.
    #[error("'{what}' is not an injected entity")]
    NotInjected { what: String },
}

/// Operations issued in the wrong lifecycle phase.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum LifecycleError {
    /// The operation is not legal in the current phase.
    #[error("Cannot {operation} in phase {phase}")]
    WrongPhase {
        operation: &'static str,
        phase: Phase,
    },

    /// A previous transition failed; the injector accepts nothing further.
    #[error("Injection aborted during phase {phase}")]
    Aborted { phase: Phase },
}

/// Failures reported by the host side of the boundary.
#[derive(Debug, Error)]
pub enum HostError {
    /// The host has no persistence reader for a backing type.
    #[error("No data fixer registered for backing type: '{backing}'")]
    MissingDataFixer { backing: &'static str },

    /// The host refused a synthetic type (already present, registry sealed, ...).
    #[error("Host rejected type '{key}': {reason}")]
    Rejected { key: Key, reason: String },

    /// Persisted entity data could not be decoded.
    #[error("Corrupt persistent data: {0}")]
    Corrupt(#[from] bincode::Error),

    /// The configuration document could not be parsed.
    #[error("Invalid configuration: {0}")]
    Config(#[from] serde_json::Error),
}

/// Umbrella error for operations crossing several concerns.
#[derive(Debug, Error)]
pub enum InjectError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Lifecycle(#[from] LifecycleError),

    #[error(transparent)]
    Host(#[from] HostError),
}

impl InjectError {
    /// The configuration error, if this is one.
    #[must_use]
    pub fn as_config(&self) -> Option<&ConfigError> {
        match self {
            InjectError::Config(e) => Some(e),
            _ => None,
        }
    }

    /// The lifecycle error, if this is one.
    #[must_use]
    pub fn as_lifecycle(&self) -> Option<&LifecycleError> {
        match self {
            InjectError::Lifecycle(e) => Some(e),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrong_phase_names_phase() {
        let err = LifecycleError::WrongPhase {
            operation: "register injections",
            phase: Phase::Injected,
        };
        assert_eq!(err.to_string(), "Cannot register injections in phase INJECTED");
    }

    #[test]
    fn test_umbrella_conversion() {
        let err: InjectError = ConfigError::InvalidVariantId { id: "Bad".into() }.into();
        assert!(err.as_config().is_some());
        assert!(err.as_lifecycle().is_none());
    }
}
