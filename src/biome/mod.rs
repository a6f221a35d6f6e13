//! Biome filters and natural-spawn rules.
//!
//! Pure data and predicate logic, consulted only while the host sets up
//! biome spawn tables:
//!
//! ```
//! use entity_injector::biome::{BiomeFilter, SpawnData, SpawnRule, TemperatureRange};
//! use entity_injector::core::Key;
//! use entity_injector::host::Biome;
//!
//! let rule = SpawnRule::if_biome(
//!     BiomeFilter::and([
//!         BiomeFilter::overworld(),
//!         BiomeFilter::base_temperature(TemperatureRange::WARM),
//!     ]),
//!     SpawnData::new(8, 2, 4),
//! );
//!
//! let savanna = Biome::new(Key::parse("savanna").unwrap(), 2.0)
//!     .with_tag(Key::parse("is_overworld").unwrap());
//! assert_eq!(rule.apply(&savanna).map(|d| d.weight), Some(8));
//! ```

pub mod filter;
pub mod spawn;

pub use filter::{BiomeFilter, TemperatureRange};
pub use spawn::{MobCost, MobSpawnSettings, SpawnData, SpawnRule, WeightedSpawner};
