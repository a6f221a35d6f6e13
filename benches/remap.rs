//! Egress-path cost: type lowering and entity data filtering.

use std::any::Any;

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use entity_injector::core::{InjectorConfig, Key, ModelIntegration};
use entity_injector::host::catalogue::PIG;
use entity_injector::host::{
    EntityBase, EntityKind, EntityType, HostEntity, InMemoryHost, PublicEntity, SyntheticTypeId,
};
use entity_injector::protocol::{DataPayload, DataValue};
use entity_injector::registry::{Injector, SyntheticType};
use entity_injector::Injection;

struct Capybara {
    base: EntityBase,
}

impl HostEntity for Capybara {
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

impl EntityKind for Capybara {
    const LIVING: bool = true;
}

fn capybara() -> Injection {
    Injection::builder(
        Key::parse("pack:capybara").unwrap(),
        |base| Capybara { base },
        |e: &Capybara| PublicEntity::new(e.entity_id(), "Capybara"),
        PIG,
    )
    .build()
    .unwrap()
}

fn bench_remap(c: &mut Criterion) {
    let config = InjectorConfig::new()
        .with_model_integration(ModelIntegration::loaded("model_renderer:tracking_id"));
    let mut injector = Injector::new(config);
    injector.register_injection(capybara()).unwrap();
    let registry = injector.freeze(&mut InMemoryHost::vanilla()).unwrap();
    let shim = registry.shim();

    let synthetic = registry.types()[0].entity_type();
    let stranger = EntityType::Synthetic(SyntheticTypeId(1_000));

    c.bench_function("remap_type registered", |b| {
        b.iter(|| shim.remap_type(black_box(synthetic)))
    });

    c.bench_function("remap_type passthrough", |b| {
        b.iter(|| shim.remap_type(black_box(PIG.entity_type())))
    });

    c.bench_function("lower unknown", |b| {
        b.iter(|| shim.lower(black_box(stranger)).is_err())
    });

    let values: Vec<DataValue> = (0..20u8)
        .map(|id| DataValue::new(id, DataPayload::Int(i32::from(id))))
        .collect();

    c.bench_function("filter_entity_data 20 slots", |b| {
        b.iter(|| shim.filter_entity_data(black_box(synthetic), values.iter().cloned()))
    });
}

fn bench_shim_build(c: &mut Criterion) {
    let injection = capybara();
    let types: Vec<SyntheticType> = (0..256)
        .map(|id| SyntheticType::for_injection(SyntheticTypeId(id), &injection))
        .collect();

    c.bench_function("ProtocolShim::new 256 types", |b| {
        b.iter(|| entity_injector::ProtocolShim::new(black_box(&types), true))
    });
}

criterion_group!(benches, bench_remap, bench_shim_build);
criterion_main!(benches);
