//! The injection registry and its start-up lifecycle.
//!
//! Registration is open until the host closes it. After that the registry
//! walks through three installation steps, each consuming the previous
//! stage, and ends as an immutable [`FrozenRegistry`]:
//!
//! 1. resolve deferred registrations and reject duplicate keys or classes,
//! 2. create one [`SyntheticType`] per injection and install it into the
//!    host's type registry,
//! 3. inject spawners into biomes and install aliases, conversions and
//!    display names into the host's client-facing layer.
//!
//! Hosts that cannot carry the typestate use the [`Injector`] driver, which
//! performs the same steps behind a runtime [`Phase`] check.

pub mod frozen;
pub mod injector;
pub mod phase;
pub mod stages;
pub mod synthetic;

pub use frozen::{FrozenRegistry, ModelAsset};
pub use injector::Injector;
pub use phase::Phase;
pub use stages::{InjectionSupplier, OpenRegistry, ResolvedRegistry, TypedRegistry};
pub use synthetic::SyntheticType;
