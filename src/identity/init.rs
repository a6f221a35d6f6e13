//! One-time identity setup of a freshly constructed instance.

use log::{debug, warn};

use crate::core::{InjectorConfig, VariantRng};
use crate::error::{ConfigError, InjectError};
use crate::host::{HostEntity, PersistentDataContainer};
use crate::inject::Injection;
use crate::variant::{BoundVariant, SpawnContext};

use super::state::{
    migrate, IdentityState, Migration, StoredVariant, CURRENT_DATA_VERSION, DATA_VERSION_FIELD,
    KIND_ID_FIELD, NO_MODEL, PENDING_MODEL_FIELD, VARIANT_FIELD,
};

/// Outcome of [`initialize`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Initialized {
    /// Identity after setup. Always `VariantResolved`, even when the stored
    /// value is not a variant id.
    pub state: IdentityState,
    /// True if the variant rule ran, false if a persisted variant was reused.
    pub first_spawn: bool,
    pub migration: Migration,
    /// True if a parked model name moved into the renderer's field.
    pub model_applied: bool,
}

/// Set up the persisted identity of `entity`, built by `injection`.
///
/// Writes the injection key. If the store already holds a variant (the
/// instance is being reconstructed) the variant rule is not run again: the
/// data version is migrated and a parked model is handed to the renderer if
/// it has been installed since. Otherwise the rule picks a variant, which
/// is written with the current data version.
pub fn initialize(
    entity: &mut dyn HostEntity,
    injection: &Injection,
    config: &InjectorConfig,
    rng: &mut VariantRng,
) -> Result<Initialized, InjectError> {
    let synthetic = injection.synthetic_type()?;
    if entity.entity_type() != synthetic.entity_type() {
        return Err(ConfigError::WrongEntityType {
            key: injection.key().clone(),
            found: entity.entity_type().to_string(),
        }
        .into());
    }
    let class = injection.entity_class();
    if !class.is_instance(entity) {
        return Err(ConfigError::EntityClassMismatch {
            expected: class.name(),
            found: entity.class_name().to_string(),
        }
        .into());
    }

    let data = entity.persistent_data_mut();
    if let Some(previous) = data.get_string(KIND_ID_FIELD) {
        if previous != injection.key().to_string() {
            warn!("Entity of kind '{previous}' reconstructed as '{}'", injection.key());
        }
    }
    data.set(KIND_ID_FIELD, injection.key().to_string());

    if data.has(VARIANT_FIELD) {
        let migration = migrate(data);
        let model_applied = apply_pending_model(data, config);
        let state = IdentityState::of(data)?;
        match state.stored() {
            Some(StoredVariant::Id(variant))
                if !injection.variants().contains(variant.as_str()) =>
            {
                warn!(
                    "Persisted variant '{variant}' of '{}' is no longer declared",
                    injection.key()
                );
            }
            Some(StoredVariant::Unrecognized(value)) => {
                warn!(
                    "Persisted variant {value:?} of '{}' is not a variant id, keeping it",
                    injection.key()
                );
            }
            _ => {}
        }
        return Ok(Initialized {
            state,
            first_spawn: false,
            migration,
            model_applied,
        });
    }

    let location = entity.location().clone();
    let ctx = SpawnContext::new(&location, synthetic, injection);
    let chosen = injection
        .variant_rule()
        .apply(injection.variants(), &ctx, rng)?;

    let data = entity.persistent_data_mut();
    let model_applied = match &chosen {
        Some(variant) => write_variant(data, injection, variant, config)?,
        None => {
            data.set(VARIANT_FIELD, NO_MODEL);
            data.remove(PENDING_MODEL_FIELD);
            if let Some(field) = config.tracking_field() {
                data.remove(field);
            }
            false
        }
    };
    data.set(DATA_VERSION_FIELD, CURRENT_DATA_VERSION);

    if config.log_level.verbose() {
        debug!(
            "Assigned variant {} to {} ({})",
            chosen.as_ref().map_or(NO_MODEL, |v| v.id().as_str()),
            entity.entity_id(),
            injection.key()
        );
    }

    Ok(Initialized {
        state: IdentityState::of(entity.persistent_data())?,
        first_spawn: true,
        migration: Migration::Fresh,
        model_applied,
    })
}

/// Persist `variant`. Returns true if the renderer got the model name now.
fn write_variant(
    data: &mut PersistentDataContainer,
    injection: &Injection,
    variant: &BoundVariant,
    config: &InjectorConfig,
) -> Result<bool, ConfigError> {
    if variant.injection() != injection.key() {
        return Err(ConfigError::ForeignVariant {
            expected: injection.key().clone(),
            found: variant.injection().clone(),
        });
    }

    data.set(VARIANT_FIELD, variant.id().as_str());
    match config.tracking_field() {
        Some(field) if config.model_integration_loaded() => {
            data.set(field, variant.model_name());
            data.remove(PENDING_MODEL_FIELD);
            Ok(true)
        }
        _ => {
            data.set(PENDING_MODEL_FIELD, variant.model_name());
            Ok(false)
        }
    }
}

fn apply_pending_model(data: &mut PersistentDataContainer, config: &InjectorConfig) -> bool {
    if !config.model_integration_loaded() {
        return false;
    }
    let Some(field) = config.tracking_field() else {
        return false;
    };
    match data.remove(PENDING_MODEL_FIELD) {
        Some(pending) => {
            data.set(field, pending);
            true
        }
        None => false,
    }
}
