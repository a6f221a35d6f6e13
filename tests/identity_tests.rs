//! Persisted identity integration tests.
//!
//! Save/reload is simulated by encoding an instance's persistent store with
//! `to_bytes`, decoding it, and handing it to `reload`.

mod common;

use common::*;
use entity_injector::core::{InjectorConfig, ModelIntegration, VariantRng};
use entity_injector::host::{InMemoryHost, PersistentDataContainer, PersistentValue};
use entity_injector::identity::{
    IdentityState, Migration, StoredVariant, CURRENT_DATA_VERSION, DATA_VERSION_FIELD, NO_MODEL,
    PENDING_MODEL_FIELD, VARIANT_FIELD,
};
use entity_injector::registry::{FrozenRegistry, Injector};
use entity_injector::variant::{UnboundVariant, VariantRule};
use proptest::prelude::*;
use std::sync::Arc;

const TRACKING: &str = "model_renderer:tracking_id";

fn freeze(config: InjectorConfig, rule: VariantRule) -> Arc<FrozenRegistry> {
    init_logger();
    let mut injector = Injector::new(config);
    injector
        .register_injection(
            capybara_builder()
                .with_variant(UnboundVariant::bundled("albino", "albino.bbmodel").unwrap())
                .with_variant_rule(rule)
                .build()
                .unwrap(),
        )
        .unwrap();
    injector.freeze(&mut InMemoryHost::vanilla()).unwrap()
}

fn save(data: &PersistentDataContainer) -> PersistentDataContainer {
    let bytes = data.to_bytes().unwrap();
    PersistentDataContainer::from_bytes(&bytes).unwrap()
}

proptest! {
    /// A random rule never re-rolls a saved instance, whatever the seed.
    #[test]
    fn prop_reload_keeps_variant(spawn_seed in any::<u64>(), reload_seed in any::<u64>()) {
        let registry = freeze(InjectorConfig::new(), VariantRule::random());
        let capybara = registry.type_of::<Capybara>().unwrap().entity_type();

        let mut rng = VariantRng::new(spawn_seed);
        let entity = registry.construct(capybara, &location(0.7), &mut rng).unwrap();
        let first = entity.persistent_data().get_string(VARIANT_FIELD).map(str::to_string);
        prop_assert!(first.is_some());

        let mut rng = VariantRng::new(reload_seed);
        let saved = save(entity.persistent_data());
        let again = registry.reload(capybara, &location(0.7), &saved, &mut rng).unwrap();
        let twice = registry
            .reload(capybara, &location(0.7), &save(again.persistent_data()), &mut rng)
            .unwrap();

        prop_assert_eq!(again.persistent_data().get_string(VARIANT_FIELD), first.as_deref());
        prop_assert_eq!(twice.persistent_data().get_string(VARIANT_FIELD), first.as_deref());
    }
}

#[test]
fn test_reload_reports_reconstruction() {
    let registry = freeze(InjectorConfig::new(), VariantRule::first());
    let capybara = registry.type_of::<Capybara>().unwrap().entity_type();
    let mut rng = VariantRng::new(1);

    let entity = registry.construct(capybara, &location(0.5), &mut rng).unwrap();
    let saved = save(entity.persistent_data());

    let mut fresh = registry
        .construct(capybara, &location(0.5), &mut rng)
        .unwrap();
    fresh.persistent_data_mut().merge(&saved);
    let out = registry.initialize(fresh.as_mut(), &mut rng).unwrap();

    assert!(!out.first_spawn);
    assert_eq!(out.migration, Migration::UpToDate);
    assert_eq!(out.state.variant().map(|v| v.as_str()), Some("warm"));
}

#[test]
fn test_sentinel_survives_reload() {
    let registry = freeze(InjectorConfig::new(), VariantRule::none());
    let capybara = registry.type_of::<Capybara>().unwrap().entity_type();
    let mut rng = VariantRng::new(1);

    let entity = registry.construct(capybara, &location(0.5), &mut rng).unwrap();
    assert_eq!(entity.persistent_data().get_string(VARIANT_FIELD), Some(NO_MODEL));

    let again = registry
        .reload(capybara, &location(0.5), &save(entity.persistent_data()), &mut rng)
        .unwrap();
    let state = IdentityState::of(again.persistent_data()).unwrap();
    assert!(state.is_resolved());
    assert_eq!(state.variant(), None);
}

/// Values written by other releases load as they are and are never re-rolled.
#[test]
fn test_foreign_variant_value_survives_reload() {
    let registry = freeze(InjectorConfig::new(), VariantRule::first());
    let capybara = registry.type_of::<Capybara>().unwrap().entity_type();
    let mut rng = VariantRng::new(1);

    let entity = registry.construct(capybara, &location(0.5), &mut rng).unwrap();

    let mut saved = save(entity.persistent_data());
    saved.set(VARIANT_FIELD, "NONE");
    let mut fresh = registry.construct(capybara, &location(0.5), &mut rng).unwrap();
    *fresh.persistent_data_mut() = saved.clone();
    let out = registry.initialize(fresh.as_mut(), &mut rng).unwrap();
    assert!(!out.first_spawn);
    assert!(out.state.is_resolved());
    assert_eq!(out.state.variant(), None);
    assert_eq!(fresh.persistent_data().get_string(VARIANT_FIELD), Some("NONE"));

    let again = registry.reload(capybara, &location(0.5), &saved, &mut rng).unwrap();
    assert_eq!(again.persistent_data().get_string(VARIANT_FIELD), Some("NONE"));

    saved.set(VARIANT_FIELD, 3i64);
    let mut fresh = registry.construct(capybara, &location(0.5), &mut rng).unwrap();
    *fresh.persistent_data_mut() = saved;
    let out = registry.initialize(fresh.as_mut(), &mut rng).unwrap();
    assert!(!out.first_spawn);
    assert_eq!(
        out.state.stored(),
        Some(&StoredVariant::Unrecognized(PersistentValue::Int(3)))
    );
    assert_eq!(fresh.persistent_data().get(VARIANT_FIELD), Some(&PersistentValue::Int(3)));
}

/// A variant chosen without a renderer is parked, then applied once one is
/// installed.
#[test]
fn test_pending_model_applied_on_reload() {
    let unloaded = InjectorConfig::new()
        .with_model_integration(ModelIntegration::unloaded(TRACKING));
    let loaded = InjectorConfig::new()
        .with_model_integration(ModelIntegration::loaded(TRACKING));

    let before = freeze(unloaded, VariantRule::always("albino"));
    let capybara = before.type_of::<Capybara>().unwrap().entity_type();
    let mut rng = VariantRng::new(1);

    let entity = before.construct(capybara, &location(0.5), &mut rng).unwrap();
    let data = entity.persistent_data();
    assert_eq!(
        data.get_string(PENDING_MODEL_FIELD),
        Some("injector.pack.capybara.albino")
    );
    assert!(!data.has(TRACKING));

    let after = freeze(loaded, VariantRule::always("albino"));
    let mut reloaded = after
        .construct(capybara, &location(0.5), &mut rng)
        .unwrap();
    reloaded.persistent_data_mut().merge(&save(data));
    // Simulate the store as loaded from disk, before identity setup
    reloaded.persistent_data_mut().remove(TRACKING);
    let out = after.initialize(reloaded.as_mut(), &mut rng).unwrap();

    assert!(out.model_applied);
    let data = reloaded.persistent_data();
    assert_eq!(data.get_string(TRACKING), Some("injector.pack.capybara.albino"));
    assert!(!data.has(PENDING_MODEL_FIELD));
}

#[test]
fn test_old_data_version_migrated() {
    let registry = freeze(InjectorConfig::new(), VariantRule::first());
    let capybara = registry.type_of::<Capybara>().unwrap().entity_type();
    let mut rng = VariantRng::new(1);

    let entity = registry.construct(capybara, &location(0.5), &mut rng).unwrap();
    let mut saved = save(entity.persistent_data());
    saved.set(DATA_VERSION_FIELD, 0i64);

    let again = registry.reload(capybara, &location(0.5), &saved, &mut rng).unwrap();
    assert_eq!(
        again.persistent_data().get_int(DATA_VERSION_FIELD),
        Some(CURRENT_DATA_VERSION)
    );
}

#[test]
fn test_missing_data_version_kept_missing() {
    let registry = freeze(InjectorConfig::new(), VariantRule::first());
    let capybara = registry.type_of::<Capybara>().unwrap().entity_type();
    let mut rng = VariantRng::new(1);

    let entity = registry.construct(capybara, &location(0.5), &mut rng).unwrap();
    let mut saved = save(entity.persistent_data());
    saved.remove(DATA_VERSION_FIELD);

    let mut fresh = registry.construct(capybara, &location(0.5), &mut rng).unwrap();
    *fresh.persistent_data_mut() = saved;
    let out = registry.initialize(fresh.as_mut(), &mut rng).unwrap();

    assert_eq!(out.migration, Migration::Missing);
    assert!(!fresh.persistent_data().has(DATA_VERSION_FIELD));
    assert_eq!(fresh.persistent_data().get_string(VARIANT_FIELD), Some("warm"));
}

#[test]
fn test_unknown_variant_fails_at_spawn() {
    let registry = freeze(InjectorConfig::new(), VariantRule::weighted([("ghost", 1)]));
    let capybara = registry.type_of::<Capybara>().unwrap().entity_type();
    let mut rng = VariantRng::new(1);

    let err = registry
        .construct(capybara, &location(0.5), &mut rng)
        .err()
        .unwrap();
    assert!(err.to_string().contains("ghost"));
}
