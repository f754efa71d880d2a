use std::time::Duration;

use criterion::{Criterion, Throughput};
use noise_composer::prelude::*;

pub const SAMPLE_SIZE: usize = 20;
pub const WARM_UP: Duration = Duration::from_secs(1);
pub const MEASUREMENT_TIME: Duration = Duration::from_secs(2);

pub fn default_criterion() -> Criterion {
    Criterion::default()
        .configure_from_args()
        .sample_size(SAMPLE_SIZE)
        .warm_up_time(WARM_UP)
        .measurement_time(MEASUREMENT_TIME)
}

/// Throughput counted in presets or effect steps.
pub fn elements_throughput(elements: usize) -> Throughput {
    Throughput::Elements(elements.max(1) as u64)
}

/// `refract` passes tensors through; `shift` adds its displacement to every sample.
pub fn bench_catalog() -> EffectCatalog {
    let mut catalog = EffectCatalog::with_capacity(2);
    catalog.register_fn("refract", ["displacement"], |t, _, _, _, _| Ok(t));
    catalog.register_fn("shift", ["displacement"], |t: Tensor, _, _, _, params: &Params| {
        let d = params
            .get("displacement")
            .and_then(Value::as_f64)
            .unwrap_or(0.0) as f32;
        Ok(t.map(|v| v + d))
    });
    catalog
}
