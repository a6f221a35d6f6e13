//! Variant selection rules.
//!
//! A `VariantRule` picks the variant of a freshly constructed instance. It
//! returns `Ok(None)` for "no match" (the instance gets no model) and an
//! error when it references a variant id the injection does not declare.
//! Unknown ids are caught when the rule runs, not when it is built.
//!
//! First-match chains refuse a rule that always matches anywhere but last,
//! since everything after it could never run:
//!
//! ```
//! use entity_injector::biome::TemperatureRange;
//! use entity_injector::error::ConfigError;
//! use entity_injector::variant::VariantRule;
//!
//! let ok = VariantRule::first_match([
//!     VariantRule::if_temperature(TemperatureRange::at_least(0.9), "warm"),
//!     VariantRule::if_temperature(TemperatureRange::at_most(0.5), "cold"),
//!     VariantRule::always("warm"),
//! ]);
//! assert!(ok.is_ok());
//!
//! let err = VariantRule::first_match([
//!     VariantRule::always("warm"),
//!     VariantRule::if_temperature(TemperatureRange::at_most(0.5), "cold"),
//! ]);
//! assert!(matches!(err, Err(ConfigError::UnreachableRule { index: 0, len: 2 })));
//! ```

use std::sync::Arc;

use crate::biome::TemperatureRange;
use crate::core::{Key, VariantRng};
use crate::error::ConfigError;
use crate::host::Location;
use crate::inject::Injection;
use crate::registry::SyntheticType;

use super::model::{BoundVariant, VariantMap};

/// Read-only view of the spawning instance handed to a rule.
#[derive(Clone, Copy)]
pub struct SpawnContext<'a> {
    pub location: &'a Location,
    pub synthetic_type: &'a SyntheticType,
    pub injection: &'a Injection,
}

impl<'a> SpawnContext<'a> {
    pub fn new(
        location: &'a Location,
        synthetic_type: &'a SyntheticType,
        injection: &'a Injection,
    ) -> Self {
        Self {
            location,
            synthetic_type,
            injection,
        }
    }

    #[must_use]
    pub fn world(&self) -> &Key {
        &self.location.world
    }

    #[must_use]
    pub fn biome(&self) -> &Key {
        &self.location.biome
    }

    #[must_use]
    pub fn temperature(&self) -> f64 {
        self.location.temperature
    }
}

/// User-supplied selection logic.
pub type CustomRuleFn =
    dyn Fn(&VariantMap, &SpawnContext<'_>) -> Option<BoundVariant> + Send + Sync;

/// Picks a variant for a spawning instance.
#[derive(Clone, Default)]
pub enum VariantRule {
    /// No variant.
    None,
    /// First variant in declaration order.
    #[default]
    First,
    /// Uniform draw over the listed ids, or over all variants if empty.
    Random(Vec<String>),
    /// Draw proportional to weight. Zero-weight ids are never drawn.
    Weighted(Vec<(String, u32)>),
    /// Always the given id.
    Always(String),
    /// `id` when the biome is one of `biomes`.
    IfBiome { biomes: Vec<Key>, id: String },
    /// `id` when the world is one of `worlds`.
    IfWorld { worlds: Vec<Key>, id: String },
    /// `id` when the temperature at the spawn position is in `range`.
    IfTemperature { range: TemperatureRange, id: String },
    /// First rule that matches, left to right. Built by
    /// [`FirstMatchBuilder`] or the switch constructors.
    FirstMatch(RuleChain),
    /// Custom logic. `total` declares that it never returns no-match.
    Custom { rule: Arc<CustomRuleFn>, total: bool },
}

impl VariantRule {
    pub fn none() -> Self {
        Self::None
    }

    pub fn first() -> Self {
        Self::First
    }

    /// Uniform over every declared variant.
    pub fn random() -> Self {
        Self::Random(Vec::new())
    }

    /// Uniform over the listed ids.
    pub fn random_of<S: Into<String>>(ids: impl IntoIterator<Item = S>) -> Self {
        Self::Random(ids.into_iter().map(Into::into).collect())
    }

    pub fn weighted<S: Into<String>>(weights: impl IntoIterator<Item = (S, u32)>) -> Self {
        Self::Weighted(weights.into_iter().map(|(id, w)| (id.into(), w)).collect())
    }

    pub fn always(id: impl Into<String>) -> Self {
        Self::Always(id.into())
    }

    pub fn if_biome(biomes: impl IntoIterator<Item = Key>, id: impl Into<String>) -> Self {
        Self::IfBiome {
            biomes: biomes.into_iter().collect(),
            id: id.into(),
        }
    }

    pub fn if_world(worlds: impl IntoIterator<Item = Key>, id: impl Into<String>) -> Self {
        Self::IfWorld {
            worlds: worlds.into_iter().collect(),
            id: id.into(),
        }
    }

    pub fn if_temperature(range: TemperatureRange, id: impl Into<String>) -> Self {
        Self::IfTemperature {
            range,
            id: id.into(),
        }
    }

    /// Custom rule that may return no-match.
    pub fn custom<F>(rule: F) -> Self
    where
        F: Fn(&VariantMap, &SpawnContext<'_>) -> Option<BoundVariant> + Send + Sync + 'static,
    {
        Self::Custom {
            rule: Arc::new(rule),
            total: false,
        }
    }

    /// Custom rule that always returns a variant.
    pub fn custom_total<F>(rule: F) -> Self
    where
        F: Fn(&VariantMap, &SpawnContext<'_>) -> Option<BoundVariant> + Send + Sync + 'static,
    {
        Self::Custom {
            rule: Arc::new(rule),
            total: true,
        }
    }

    /// First-match chain. Fails if a total rule is not last.
    pub fn first_match(rules: impl IntoIterator<Item = VariantRule>) -> Result<Self, ConfigError> {
        FirstMatchBuilder::new().rules(rules).build()
    }

    /// Switch on the biome key, falling back to `fallback`.
    pub fn by_biome<S: Into<String>>(
        table: impl IntoIterator<Item = (S, Vec<Key>)>,
        fallback: Option<&str>,
    ) -> Self {
        Self::switch(
            table
                .into_iter()
                .map(|(id, biomes)| Self::if_biome(biomes, id)),
            fallback,
        )
    }

    /// Switch on the world key, falling back to `fallback`.
    pub fn by_world<S: Into<String>>(
        table: impl IntoIterator<Item = (S, Vec<Key>)>,
        fallback: Option<&str>,
    ) -> Self {
        Self::switch(
            table
                .into_iter()
                .map(|(id, worlds)| Self::if_world(worlds, id)),
            fallback,
        )
    }

    /// Switch on temperature ranges in order, falling back to `fallback`.
    pub fn by_temperature<S: Into<String>>(
        table: impl IntoIterator<Item = (S, TemperatureRange)>,
        fallback: Option<&str>,
    ) -> Self {
        Self::switch(
            table
                .into_iter()
                .map(|(id, range)| Self::if_temperature(range, id)),
            fallback,
        )
    }

    // The arms are all conditional, so the chain needs no reachability check.
    fn switch(arms: impl Iterator<Item = VariantRule>, fallback: Option<&str>) -> Self {
        let mut rules: Vec<VariantRule> = arms.collect();
        if let Some(fallback) = fallback {
            rules.push(Self::always(fallback));
        }
        Self::FirstMatch(RuleChain(rules))
    }

    /// True if the rule never returns no-match on a non-empty variant map.
    #[must_use]
    pub fn is_total(&self) -> bool {
        match self {
            VariantRule::First
            | VariantRule::Random(_)
            | VariantRule::Weighted(_)
            | VariantRule::Always(_) => true,
            VariantRule::None
            | VariantRule::IfBiome { .. }
            | VariantRule::IfWorld { .. }
            | VariantRule::IfTemperature { .. } => false,
            VariantRule::FirstMatch(chain) => chain.0.last().is_some_and(VariantRule::is_total),
            VariantRule::Custom { total, .. } => *total,
        }
    }

    /// Pick a variant from `variants` for the instance described by `ctx`.
    pub fn apply(
        &self,
        variants: &VariantMap,
        ctx: &SpawnContext<'_>,
        rng: &mut VariantRng,
    ) -> Result<Option<BoundVariant>, ConfigError> {
        match self {
            VariantRule::None => Ok(None),
            VariantRule::First => Ok(variants.first().cloned()),
            VariantRule::Random(ids) if ids.is_empty() => {
                if variants.is_empty() {
                    return Ok(None);
                }
                Ok(variants.get_index(rng.gen_index(variants.len())).cloned())
            }
            VariantRule::Random(ids) => {
                require_known(variants, ctx, ids.iter().map(String::as_str))?;
                Ok(variants.get(&ids[rng.gen_index(ids.len())]).cloned())
            }
            VariantRule::Weighted(weights) => {
                require_known(variants, ctx, weights.iter().map(|(id, _)| id.as_str()))?;
                let counts: Vec<u32> = weights.iter().map(|(_, w)| *w).collect();
                let index = rng.choose_weighted(&counts).ok_or_else(|| ConfigError::EmptyWeights {
                    key: ctx.injection.key().clone(),
                })?;
                Ok(variants.get(&weights[index].0).cloned())
            }
            VariantRule::Always(id) => Ok(Some(require(variants, ctx, id)?.clone())),
            VariantRule::IfBiome { biomes, id } => {
                let variant = require(variants, ctx, id)?;
                Ok(biomes.contains(ctx.biome()).then(|| variant.clone()))
            }
            VariantRule::IfWorld { worlds, id } => {
                let variant = require(variants, ctx, id)?;
                Ok(worlds.contains(ctx.world()).then(|| variant.clone()))
            }
            VariantRule::IfTemperature { range, id } => {
                let variant = require(variants, ctx, id)?;
                Ok(range.contains(ctx.temperature()).then(|| variant.clone()))
            }
            VariantRule::FirstMatch(chain) => {
                for rule in chain.rules() {
                    if let Some(variant) = rule.apply(variants, ctx, rng)? {
                        return Ok(Some(variant));
                    }
                }
                Ok(None)
            }
            VariantRule::Custom { rule, .. } => Ok(rule(variants, ctx)),
        }
    }
}

fn unknown_variant(
    variants: &VariantMap,
    ctx: &SpawnContext<'_>,
    unknown: Vec<String>,
) -> ConfigError {
    ConfigError::UnknownVariant {
        key: ctx.injection.key().clone(),
        unknown,
        known: variants.id_strings(),
    }
}

fn require<'v>(
    variants: &'v VariantMap,
    ctx: &SpawnContext<'_>,
    id: &str,
) -> Result<&'v BoundVariant, ConfigError> {
    variants
        .get(id)
        .ok_or_else(|| unknown_variant(variants, ctx, vec![id.to_string()]))
}

fn require_known<'i>(
    variants: &VariantMap,
    ctx: &SpawnContext<'_>,
    ids: impl Iterator<Item = &'i str>,
) -> Result<(), ConfigError> {
    let unknown: Vec<String> = ids
        .filter(|id| !variants.contains(id))
        .map(ToString::to_string)
        .collect();
    if unknown.is_empty() {
        Ok(())
    } else {
        Err(unknown_variant(variants, ctx, unknown))
    }
}

impl std::fmt::Debug for VariantRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VariantRule::None => f.write_str("None"),
            VariantRule::First => f.write_str("First"),
            VariantRule::Random(ids) => f.debug_tuple("Random").field(ids).finish(),
            VariantRule::Weighted(weights) => f.debug_tuple("Weighted").field(weights).finish(),
            VariantRule::Always(id) => f.debug_tuple("Always").field(id).finish(),
            VariantRule::IfBiome { biomes, id } => f
                .debug_struct("IfBiome")
                .field("biomes", biomes)
                .field("id", id)
                .finish(),
            VariantRule::IfWorld { worlds, id } => f
                .debug_struct("IfWorld")
                .field("worlds", worlds)
                .field("id", id)
                .finish(),
            VariantRule::IfTemperature { range, id } => f
                .debug_struct("IfTemperature")
                .field("range", range)
                .field("id", id)
                .finish(),
            VariantRule::FirstMatch(chain) => {
                f.debug_tuple("FirstMatch").field(&chain.0).finish()
            }
            VariantRule::Custom { total, .. } => {
                f.debug_struct("Custom").field("total", total).finish_non_exhaustive()
            }
        }
    }
}

/// Ordered rules of a first-match chain.
///
/// Only this crate can assemble one, so every chain has passed the
/// reachability check or opted out of it:
///
/// ```compile_fail
/// use entity_injector::variant::{RuleChain, VariantRule};
///
/// let chain = RuleChain(vec![VariantRule::always("a"), VariantRule::always("b")]);
/// ```
#[derive(Clone, Debug, Default)]
pub struct RuleChain(Vec<VariantRule>);

impl RuleChain {
    #[must_use]
    pub fn rules(&self) -> &[VariantRule] {
        &self.0
    }
}

/// Builds a first-match chain.
///
/// A total rule anywhere but last is rejected unless `allow_unreachable`
/// is called.
#[derive(Clone, Debug, Default)]
#[must_use]
pub struct FirstMatchBuilder {
    rules: Vec<VariantRule>,
    allow_unreachable: bool,
}

impl FirstMatchBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a rule.
    pub fn then(mut self, rule: VariantRule) -> Self {
        self.rules.push(rule);
        self
    }

    pub fn rules(mut self, rules: impl IntoIterator<Item = VariantRule>) -> Self {
        self.rules.extend(rules);
        self
    }

    /// Keep rules after a total rule even though they can never run.
    pub fn allow_unreachable(mut self) -> Self {
        self.allow_unreachable = true;
        self
    }

    pub fn build(self) -> Result<VariantRule, ConfigError> {
        if !self.allow_unreachable {
            let len = self.rules.len();
            if let Some(index) = self.rules[..len.saturating_sub(1)]
                .iter()
                .position(VariantRule::is_total)
            {
                return Err(ConfigError::UnreachableRule { index, len });
            }
        }
        Ok(VariantRule::FirstMatch(RuleChain(self.rules)))
    }
}
