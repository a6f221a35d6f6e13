//! Injector configuration.
//!
//! Hosts build an `InjectorConfig` in code or load it from a JSON document:
//!
//! ```
//! use entity_injector::core::{InjectorConfig, LogLevel};
//!
//! let config = InjectorConfig::from_json_str(r#"{
//!     "log_level": "verbose",
//!     "model_integration": { "loaded": true, "tracking_field": "models:tracking_id" },
//!     "variant_seed": 42
//! }"#).unwrap();
//!
//! assert_eq!(config.log_level, LogLevel::Verbose);
//! assert!(config.model_integration_loaded());
//! assert!(config.hide_backing_entity);
//! ```

use serde::{Deserialize, Serialize};

use crate::error::HostError;

/// How much the injector reports through the `log` facade.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum LogLevel {
    /// Errors only.
    Quiet,
    /// Phase progress.
    #[default]
    Normal,
    /// Phase progress plus one line per injection.
    Verbose,
}

impl LogLevel {
    /// True for `Normal` and `Verbose`.
    #[must_use]
    pub fn normal(self) -> bool {
        self >= LogLevel::Normal
    }

    /// True for `Verbose`.
    #[must_use]
    pub fn verbose(self) -> bool {
        self == LogLevel::Verbose
    }

    /// Matching filter for hosts that set up a logger from this config.
    #[must_use]
    pub fn to_level_filter(self) -> log::LevelFilter {
        match self {
            LogLevel::Quiet => log::LevelFilter::Error,
            LogLevel::Normal => log::LevelFilter::Info,
            LogLevel::Verbose => log::LevelFilter::Debug,
        }
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            LogLevel::Quiet => "QUIET",
            LogLevel::Normal => "NORMAL",
            LogLevel::Verbose => "VERBOSE",
        })
    }
}

impl TryFrom<String> for LogLevel {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.to_ascii_uppercase().as_str() {
            "QUIET" => Ok(LogLevel::Quiet),
            "NORMAL" => Ok(LogLevel::Normal),
            "VERBOSE" => Ok(LogLevel::Verbose),
            _ => Err(format!("unknown log level '{value}'")),
        }
    }
}

impl From<LogLevel> for String {
    fn from(level: LogLevel) -> Self {
        level.to_string()
    }
}

/// The optional model-rendering integration.
///
/// The integration is an opaque sink: the injector only writes a model name
/// into `tracking_field` of an entity's persistent data and the renderer
/// picks it up from there.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelIntegration {
    /// Whether the renderer is installed right now.
    pub loaded: bool,

    /// Vendor-specific persistent field holding the model name.
    #[serde(default = "ModelIntegration::default_tracking_field")]
    pub tracking_field: String,
}

impl ModelIntegration {
    fn default_tracking_field() -> String {
        "model_renderer:tracking_id".to_string()
    }

    /// An installed renderer reading `tracking_field`.
    pub fn loaded(tracking_field: impl Into<String>) -> Self {
        Self {
            loaded: true,
            tracking_field: tracking_field.into(),
        }
    }

    /// A renderer known by field name but not installed yet.
    pub fn unloaded(tracking_field: impl Into<String>) -> Self {
        Self {
            loaded: false,
            tracking_field: tracking_field.into(),
        }
    }
}

/// Injector-wide settings.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InjectorConfig {
    /// Progress reporting.
    pub log_level: LogLevel,

    /// Model renderer, if the host knows about one.
    pub model_integration: Option<ModelIntegration>,

    /// Force the backing entity invisible while a renderer draws the model.
    pub hide_backing_entity: bool,

    /// Seed for variant selection. `None` seeds from entropy.
    pub variant_seed: Option<u64>,
}

impl Default for InjectorConfig {
    fn default() -> Self {
        Self {
            log_level: LogLevel::Normal,
            model_integration: None,
            hide_backing_entity: true,
            variant_seed: None,
        }
    }
}

impl InjectorConfig {
    /// Default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a JSON document. Missing fields take their defaults.
    pub fn from_json_str(json: &str) -> Result<Self, HostError> {
        Ok(serde_json::from_str(json)?)
    }

    #[must_use]
    pub fn with_log_level(mut self, level: LogLevel) -> Self {
        self.log_level = level;
        self
    }

    #[must_use]
    pub fn with_model_integration(mut self, integration: ModelIntegration) -> Self {
        self.model_integration = Some(integration);
        self
    }

    #[must_use]
    pub fn with_hide_backing_entity(mut self, hide: bool) -> Self {
        self.hide_backing_entity = hide;
        self
    }

    #[must_use]
    pub fn with_variant_seed(mut self, seed: u64) -> Self {
        self.variant_seed = Some(seed);
        self
    }

    /// True if a renderer is configured and installed.
    #[must_use]
    pub fn model_integration_loaded(&self) -> bool {
        self.model_integration.as_ref().is_some_and(|m| m.loaded)
    }

    /// The renderer's tracking field, whether or not it is loaded.
    #[must_use]
    pub fn tracking_field(&self) -> Option<&str> {
        self.model_integration
            .as_ref()
            .map(|m| m.tracking_field.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = InjectorConfig::default();
        assert_eq!(config.log_level, LogLevel::Normal);
        assert!(!config.model_integration_loaded());
        assert_eq!(config.tracking_field(), None);
    }

    #[test]
    fn test_log_level_case_insensitive() {
        let config = InjectorConfig::from_json_str(r#"{ "log_level": "Quiet" }"#).unwrap();
        assert_eq!(config.log_level, LogLevel::Quiet);
        assert!(!config.log_level.normal());

        assert!(InjectorConfig::from_json_str(r#"{ "log_level": "loud" }"#).is_err());
    }

    #[test]
    fn test_log_level_ordering() {
        assert!(LogLevel::Verbose.normal());
        assert!(LogLevel::Verbose.verbose());
        assert!(!LogLevel::Normal.verbose());
        assert_eq!(LogLevel::Quiet.to_level_filter(), log::LevelFilter::Error);
    }

    #[test]
    fn test_unloaded_integration_keeps_field() {
        let config = InjectorConfig::new()
            .with_model_integration(ModelIntegration::unloaded("vendor:model"));
        assert!(!config.model_integration_loaded());
        assert_eq!(config.tracking_field(), Some("vendor:model"));
    }

    #[test]
    fn test_json_roundtrip() {
        let config = InjectorConfig::new()
            .with_log_level(LogLevel::Verbose)
            .with_variant_seed(9)
            .with_hide_backing_entity(false);

        let json = serde_json::to_string(&config).unwrap();
        assert!(json.contains("\"VERBOSE\""));
        assert_eq!(InjectorConfig::from_json_str(&json).unwrap(), config);
    }

    #[test]
    fn test_integration_default_field() {
        let config =
            InjectorConfig::from_json_str(r#"{ "model_integration": { "loaded": false } }"#)
                .unwrap();
        assert_eq!(config.tracking_field(), Some("model_renderer:tracking_id"));
    }
}
