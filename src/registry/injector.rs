//! Runtime-checked driver over the registry typestate.
//!
//! Hosts that hold the injector in one long-lived place (a plugin object, a
//! server singleton) cannot thread the typestate through their start-up
//! code. `Injector` keeps the current stage behind a [`Phase`] and answers
//! an out-of-phase call with [`LifecycleError`] instead.

use std::sync::Arc;

use log::{debug, error};

use crate::core::{InjectorConfig, Key, VariantRng};
use crate::error::{ConfigError, InjectError, LifecycleError};
use crate::host::{
    BiomeRegistry, ConversionLayer, EntityType, HostEntity, Location, PersistentDataContainer,
    TypeRegistry,
};
use crate::inject::Injection;

use super::frozen::FrozenRegistry;
use super::phase::Phase;
use super::stages::{OpenRegistry, ResolvedRegistry, TypedRegistry};
use super::synthetic::SyntheticType;

enum Stage {
    Open(OpenRegistry),
    Resolved(ResolvedRegistry),
    Typed(TypedRegistry),
    Frozen(Arc<FrozenRegistry>),
    /// A transition failed, or one is in progress.
    Aborted,
}

/// Registration and start-up driver with a runtime phase check.
///
/// ```
/// use entity_injector::core::InjectorConfig;
/// use entity_injector::host::InMemoryHost;
/// use entity_injector::registry::{Injector, Phase};
///
/// let mut injector = Injector::new(InjectorConfig::new().with_variant_seed(1));
/// assert_eq!(injector.phase(), Phase::Registration);
/// assert!(injector.types().is_err());
///
/// let mut host = InMemoryHost::vanilla();
/// injector.freeze(&mut host).unwrap();
/// assert_eq!(injector.phase(), Phase::Injected);
/// assert!(injector.types().unwrap().is_empty());
/// ```
pub struct Injector {
    stage: Stage,
    phase: Phase,
    rng: VariantRng,
}

impl Injector {
    #[must_use]
    pub fn new(config: InjectorConfig) -> Self {
        let rng = VariantRng::from_seed_or_entropy(config.variant_seed);
        if config.log_level.verbose() {
            debug!("Variant RNG seed: {}", rng.seed());
        }
        Self {
            stage: Stage::Open(OpenRegistry::new(config)),
            phase: Phase::Registration,
            rng,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// True after a failed transition.
    pub fn is_aborted(&self) -> bool {
        matches!(self.stage, Stage::Aborted)
    }

    fn refuse(&self, operation: &'static str) -> LifecycleError {
        match self.stage {
            Stage::Aborted => LifecycleError::Aborted { phase: self.phase },
            _ => LifecycleError::WrongPhase {
                operation,
                phase: self.phase,
            },
        }
    }

    /// Queue a supplier, resolved when registration closes.
    pub fn register(
        &mut self,
        supplier: impl FnOnce() -> Result<Injection, ConfigError> + Send + 'static,
    ) -> Result<(), LifecycleError> {
        match &mut self.stage {
            Stage::Open(open) => {
                open.register(supplier);
                Ok(())
            }
            _ => Err(self.refuse("register injections")),
        }
    }

    /// Register a built injection, checking key and class right away.
    pub fn register_injection(&mut self, injection: Injection) -> Result<(), InjectError> {
        match &mut self.stage {
            Stage::Open(open) => Ok(open.register_injection(injection)?),
            _ => Err(self.refuse("register injections").into()),
        }
    }

    /// Close registration (PRE_INJECTION) and resolve deferred suppliers.
    pub fn resolve(&mut self) -> Result<(), InjectError> {
        match std::mem::replace(&mut self.stage, Stage::Aborted) {
            Stage::Open(open) => {
                self.phase = Phase::PreInjection;
                match open.resolve() {
                    Ok(resolved) => {
                        self.stage = Stage::Resolved(resolved);
                        Ok(())
                    }
                    Err(e) => Err(self.abort(e.into())),
                }
            }
            other => {
                self.stage = other;
                Err(self.refuse("resolve registrations").into())
            }
        }
    }

    /// Phase 1 against `host`'s type registry.
    pub fn inject_types<H: TypeRegistry + ?Sized>(
        &mut self,
        host: &mut H,
    ) -> Result<(), InjectError> {
        match std::mem::replace(&mut self.stage, Stage::Aborted) {
            Stage::Resolved(resolved) => {
                self.phase = Phase::InjectionPhase1;
                match resolved.inject_types(host) {
                    Ok(typed) => {
                        self.stage = Stage::Typed(typed);
                        Ok(())
                    }
                    Err(e) => Err(self.abort(e)),
                }
            }
            other => {
                self.stage = other;
                Err(self.refuse("inject types").into())
            }
        }
    }

    /// Phase 2 against `host`'s spawn tables and conversion layer. Freezes
    /// the registry.
    pub fn inject_host<H: ConversionLayer + BiomeRegistry + ?Sized>(
        &mut self,
        host: &mut H,
    ) -> Result<(), InjectError> {
        match std::mem::replace(&mut self.stage, Stage::Aborted) {
            Stage::Typed(typed) => {
                self.phase = Phase::InjectionPhase2;
                let frozen = typed.inject_host(host);
                self.stage = Stage::Frozen(Arc::new(frozen));
                self.phase = Phase::Injected;
                Ok(())
            }
            other => {
                self.stage = other;
                Err(self.refuse("inject into host").into())
            }
        }
    }

    /// Run every remaining transition.
    pub fn freeze<H>(&mut self, host: &mut H) -> Result<Arc<FrozenRegistry>, InjectError>
    where
        H: TypeRegistry + ConversionLayer + BiomeRegistry + ?Sized,
    {
        if self.phase == Phase::Registration {
            self.resolve()?;
        }
        if self.phase == Phase::PreInjection {
            self.inject_types(host)?;
        }
        if self.phase == Phase::InjectionPhase1 {
            self.inject_host(host)?;
        }
        Ok(Arc::clone(self.registry()?))
    }

    fn abort(&mut self, e: InjectError) -> InjectError {
        error!("Entity injection failed in phase {}: {e}", self.phase);
        self.stage = Stage::Aborted;
        e
    }

    /// The frozen registry. Only valid once INJECTED.
    pub fn registry(&self) -> Result<&Arc<FrozenRegistry>, LifecycleError> {
        match &self.stage {
            Stage::Frozen(registry) => Ok(registry),
            _ => Err(self.refuse("query the registry")),
        }
    }

    /// Every injection. Only valid once INJECTED.
    pub fn injections(&self) -> Result<&[Arc<Injection>], LifecycleError> {
        match &self.stage {
            Stage::Frozen(registry) => Ok(registry.injections()),
            _ => Err(self.refuse("query injections")),
        }
    }

    /// Every synthetic type. Only valid once INJECTED.
    pub fn types(&self) -> Result<&[SyntheticType], LifecycleError> {
        match &self.stage {
            Stage::Frozen(registry) => Ok(registry.types()),
            _ => Err(self.refuse("query types")),
        }
    }

    /// Spawn a fresh instance of the injection under `key`.
    pub fn spawn(
        &mut self,
        key: &Key,
        location: &Location,
    ) -> Result<Box<dyn HostEntity>, InjectError> {
        let registry = Arc::clone(self.registry()?);
        registry.spawn(key, location, &mut self.rng)
    }

    /// Construct a fresh instance of `entity_type`.
    pub fn construct(
        &mut self,
        entity_type: EntityType,
        location: &Location,
    ) -> Result<Box<dyn HostEntity>, InjectError> {
        let registry = Arc::clone(self.registry()?);
        registry.construct(entity_type, location, &mut self.rng)
    }

    /// Reconstruct a saved instance.
    pub fn reload(
        &mut self,
        entity_type: EntityType,
        location: &Location,
        saved: &PersistentDataContainer,
    ) -> Result<Box<dyn HostEntity>, InjectError> {
        let registry = Arc::clone(self.registry()?);
        registry.reload(entity_type, location, saved, &mut self.rng)
    }
}

impl Default for Injector {
    fn default() -> Self {
        Self::new(InjectorConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::InMemoryHost;

    #[test]
    fn test_refused_call_keeps_stage() {
        let mut injector = Injector::default();
        let err = injector.inject_types(&mut InMemoryHost::vanilla()).unwrap_err();

        assert_eq!(
            err.as_lifecycle(),
            Some(&LifecycleError::WrongPhase {
                operation: "inject types",
                phase: Phase::Registration,
            })
        );
        assert_eq!(injector.phase(), Phase::Registration);
        assert!(!injector.is_aborted());
        assert!(injector.register(|| Err(ConfigError::NotInjected { what: "x".into() })).is_ok());
    }

    #[test]
    fn test_failed_transition_aborts() {
        let mut injector = Injector::default();
        injector
            .register(|| Err(ConfigError::InvalidVariantId { id: "X".into() }))
            .unwrap();

        assert!(injector.resolve().is_err());
        assert!(injector.is_aborted());
        assert_eq!(injector.phase(), Phase::PreInjection);
        assert_eq!(
            injector.register(|| Err(ConfigError::NotInjected { what: "x".into() })),
            Err(LifecycleError::Aborted {
                phase: Phase::PreInjection
            })
        );
        assert!(injector.freeze(&mut InMemoryHost::vanilla()).is_err());
    }

    #[test]
    fn test_freeze_twice_returns_same_registry() {
        let mut injector = Injector::new(InjectorConfig::new().with_variant_seed(3));
        let mut host = InMemoryHost::vanilla();

        let first = injector.freeze(&mut host).unwrap();
        let second = injector.freeze(&mut host).unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(injector.rng.seed(), 3);
    }
}
