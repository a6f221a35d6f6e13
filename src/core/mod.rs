//! Core types shared by every subsystem: namespaced keys, the variant RNG
//! and injector configuration.

pub mod config;
pub mod key;
pub mod rng;

pub use config::{InjectorConfig, LogLevel, ModelIntegration};
pub use key::Key;
pub use rng::VariantRng;
