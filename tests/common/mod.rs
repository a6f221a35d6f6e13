//! Shared fixtures: entity kinds, keys, locations and the capybara injection.

#![allow(dead_code)]

use std::any::Any;

use entity_injector::biome::TemperatureRange;
use entity_injector::core::Key;
use entity_injector::host::catalogue::{COW, MARKER, PIG};
use entity_injector::host::{EntityBase, EntityKind, HostEntity, Location, PublicEntity};
use entity_injector::inject::{InjectionBuilder, MobCategory};
use entity_injector::variant::{UnboundVariant, VariantRule};
use entity_injector::Injection;

macro_rules! entity_kind {
    ($name:ident, $living:expr) => {
        pub struct $name {
            pub base: EntityBase,
        }

        impl HostEntity for $name {
            fn base(&self) -> &EntityBase {
                &self.base
            }
            fn base_mut(&mut self) -> &mut EntityBase {
                &mut self.base
            }
            fn as_any(&self) -> &dyn Any {
                self
            }
            fn into_any(self: Box<Self>) -> Box<dyn Any> {
                self
            }
        }

        impl EntityKind for $name {
            const LIVING: bool = $living;
        }
    };
}

entity_kind!(Capybara, true);
entity_kind!(Yak, true);
entity_kind!(Lantern, false);

pub fn init_logger() {
    let _ = env_logger::Builder::new()
        .is_test(true)
        .filter_level(log::LevelFilter::Debug)
        .try_init();
}

pub fn key(s: &str) -> Key {
    Key::parse(s).unwrap()
}

pub fn location(temperature: f64) -> Location {
    Location::new(key("overworld"), key("plains")).with_temperature(temperature)
}

/// warm if ≥ 0.9, cold if ≤ 0.5, warm otherwise.
pub fn capybara_rule() -> VariantRule {
    VariantRule::first_match([
        VariantRule::if_temperature(TemperatureRange::at_least(0.9), "warm"),
        VariantRule::if_temperature(TemperatureRange::at_most(0.5), "cold"),
        VariantRule::always("warm"),
    ])
    .unwrap()
}

pub fn capybara_builder() -> InjectionBuilder {
    Injection::builder(
        key("pack:capybara"),
        |base| Capybara { base },
        |e: &Capybara| PublicEntity::new(e.entity_id(), "Capybara"),
        PIG,
    )
    .with_category(MobCategory::Creature)
    .with_variants([
        UnboundVariant::bundled("warm", "capybara_warm.bbmodel").unwrap(),
        UnboundVariant::from_url("cold", "https://models.example/capybara_cold.bbmodel").unwrap(),
    ])
    .with_variant_rule(capybara_rule())
    .with_display_name("en_us", "Capybara")
}

pub fn capybara() -> Injection {
    capybara_builder().build().unwrap()
}

pub fn yak(key_str: &str) -> Injection {
    Injection::builder(
        key(key_str),
        |base| Yak { base },
        |e: &Yak| PublicEntity::new(e.entity_id(), "Yak"),
        COW,
    )
    .build()
    .unwrap()
}

pub fn lantern() -> Injection {
    Injection::builder(
        key("pack:lantern"),
        |base| Lantern { base },
        |e: &Lantern| PublicEntity::new(e.entity_id(), "Lantern"),
        MARKER,
    )
    .with_variant(UnboundVariant::bundled("lit", "lantern_lit.bbmodel").unwrap())
    .build()
    .unwrap()
}
