mod common;

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use noise_composer::prelude::*;

/// `n` presets, each layering up to `fan_in` earlier ones.
fn make_store(n: usize, fan_in: usize) -> PresetStore {
    let mut store = PresetStore::new();
    for i in 0..n {
        let layers: Vec<String> = (i.saturating_sub(fan_in)..i).map(|j| format!("P{}", j)).collect();
        let key = format!("k{}", i);
        let read_keys: Vec<String> = (i.saturating_sub(fan_in)..=i).map(|j| format!("k{}", j)).collect();

        let definition = PresetDefinition::new()
            .layers(layers)
            .settings(move |scope| Ok(params! { key.as_str() => scope.random() }))
            .generator(move |settings, scope| {
                let mut params = Params::new();
                for k in &read_keys {
                    params.insert(k.clone(), settings.read(k)?.clone());
                }
                params.insert("freq".into(), Value::from(scope.randint(2, 8)));
                Ok(params)
            })
            .post(|_, scope| Ok(vec![scope.effect("refract", params! { "displacement" => 0.5 })?]));

        if let Err(e) = store.define(format!("P{}", i), definition) {
            panic!("bench store setup failed: {e}");
        }
    }
    store
}

fn bake_benches(c: &mut Criterion) {
    let mut group = c.benchmark_group("bake/layered");
    let catalog = common::bench_catalog();

    for &n in &[8usize, 64, 256] {
        for &fan_in in &[1usize, 3] {
            let store = make_store(n, fan_in);
            let baker = Baker::new(BakeConfig::default(), &store, &catalog);
            group.throughput(common::elements_throughput(n));

            group.bench_with_input(
                BenchmarkId::new(format!("fan_in_{}", fan_in), n),
                &n,
                |b, _| {
                    b.iter(|| {
                        let registries = baker.bake_seeded(0xC0FFEE);
                        black_box(registries.is_ok());
                    });
                },
            );
        }
    }

    group.finish();
}

fn validate_benches(c: &mut Criterion) {
    let mut group = c.benchmark_group("bake/validate");

    for &n in &[64usize, 1024] {
        let store = make_store(n, 3);
        group.throughput(common::elements_throughput(n));

        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, _| {
            b.iter(|| {
                black_box(store.layer_order().is_ok());
            });
        });
    }

    group.finish();
}

criterion_group! {
    name = benches;
    config = common::default_criterion();
    targets = bake_benches, validate_benches
}
criterion_main!(benches);
