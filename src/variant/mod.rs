//! Variants and variant selection.
//!
//! A variant is a named model alternative of one injected kind. Variants
//! are declared unbound, bound to their injection when it is built, and
//! chosen per instance by a [`VariantRule`] the first time the instance is
//! constructed.

pub mod model;
pub mod rule;

pub use model::{BoundVariant, ModelSource, UnboundVariant, VariantId, VariantMap};
pub use rule::{CustomRuleFn, FirstMatchBuilder, RuleChain, SpawnContext, VariantRule};
