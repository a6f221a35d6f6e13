//! Persisted identity fields and how to read them back.

use log::{error, warn};

use crate::core::Key;
use crate::error::ConfigError;
use crate::host::{PersistentDataContainer, PersistentValue};
use crate::variant::VariantId;

/// Key of the injection that built the instance.
pub const KIND_ID_FIELD: &str = "injector:kind_id";

/// Chosen variant id, or [`NO_MODEL`].
pub const VARIANT_FIELD: &str = "injector:variant";

/// Layout version of the fields above.
pub const DATA_VERSION_FIELD: &str = "injector:data_version";

/// Model name waiting for the renderer to be installed.
pub const PENDING_MODEL_FIELD: &str = "injector:pending_model";

/// Stored in [`VARIANT_FIELD`] when the rule chose nothing. Upper case, so
/// it can never be a variant id.
pub const NO_MODEL: &str = "NO_MODEL";

pub const CURRENT_DATA_VERSION: i64 = 1;

/// Value found in [`VARIANT_FIELD`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StoredVariant {
    Id(VariantId),
    /// The no-model sentinel.
    NoModel,
    /// Not a valid variant id, or not a string. Kept as found.
    Unrecognized(PersistentValue),
}

impl StoredVariant {
    /// Classify a stored value. Never fails: saved worlds outlive the
    /// release that wrote them.
    #[must_use]
    pub fn read(value: &PersistentValue) -> Self {
        match value.as_str() {
            Some(NO_MODEL) => StoredVariant::NoModel,
            Some(id) => VariantId::new(id)
                .map(StoredVariant::Id)
                .unwrap_or_else(|_| StoredVariant::Unrecognized(value.clone())),
            None => StoredVariant::Unrecognized(value.clone()),
        }
    }

    #[must_use]
    pub fn id(&self) -> Option<&VariantId> {
        match self {
            StoredVariant::Id(id) => Some(id),
            _ => None,
        }
    }
}

/// Where an instance stands in its one-time identity setup.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum IdentityState {
    /// Nothing persisted yet.
    Unidentified,
    /// Kind written, variant not chosen.
    VariantPending { kind: Key },
    /// Some value is stored in [`VARIANT_FIELD`], whatever it is.
    VariantResolved { kind: Key, variant: StoredVariant },
}

impl IdentityState {
    /// Read the state from a persistent store. Only a corrupt kind fails.
    pub fn of(data: &PersistentDataContainer) -> Result<Self, ConfigError> {
        let Some(kind) = data.get_string(KIND_ID_FIELD) else {
            return Ok(IdentityState::Unidentified);
        };
        let kind = Key::parse(kind)?;

        Ok(match data.get(VARIANT_FIELD) {
            None => IdentityState::VariantPending { kind },
            Some(value) => IdentityState::VariantResolved {
                kind,
                variant: StoredVariant::read(value),
            },
        })
    }

    #[must_use]
    pub fn kind(&self) -> Option<&Key> {
        match self {
            IdentityState::Unidentified => None,
            IdentityState::VariantPending { kind }
            | IdentityState::VariantResolved { kind, .. } => Some(kind),
        }
    }

    /// The stored variant id, if it is one.
    #[must_use]
    pub fn variant(&self) -> Option<&VariantId> {
        self.stored().and_then(StoredVariant::id)
    }

    #[must_use]
    pub fn stored(&self) -> Option<&StoredVariant> {
        match self {
            IdentityState::VariantResolved { variant, .. } => Some(variant),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_resolved(&self) -> bool {
        matches!(self, IdentityState::VariantResolved { .. })
    }
}

/// What happened to [`DATA_VERSION_FIELD`] while initializing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Migration {
    /// First construction, current version written.
    Fresh,
    UpToDate,
    /// A reconstructed instance had no version. Nothing can be migrated.
    Missing,
    /// Bumped from an older version.
    Migrated { from: i64 },
    /// Written by a newer release. Left alone.
    Newer { found: i64 },
}

/// Check and update the data version of a reconstructed instance.
pub fn migrate(data: &mut PersistentDataContainer) -> Migration {
    let kind = data.get_string(KIND_ID_FIELD).unwrap_or("?").to_string();
    match data.get_int(DATA_VERSION_FIELD) {
        None => {
            error!("Missing data version for '{kind}', cannot migrate persistent data");
            Migration::Missing
        }
        Some(CURRENT_DATA_VERSION) => Migration::UpToDate,
        Some(found) if found > CURRENT_DATA_VERSION => {
            warn!(
                "Data version {found} of '{kind}' is newer than {CURRENT_DATA_VERSION}, \
                 leaving it unchanged"
            );
            Migration::Newer { found }
        }
        Some(from) => {
            data.set(DATA_VERSION_FIELD, CURRENT_DATA_VERSION);
            Migration::Migrated { from }
        }
    }
}
