use noise_composer::prelude::*;
use noise_composer_examples::{demo_catalog, demo_presets, init_tracing};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::info;

fn main() -> anyhow::Result<()> {
    init_tracing();
    let seed = match std::env::args().nth(1) {
        Some(arg) => arg.parse()?,
        None => 2025,
    };

    let store = demo_presets()?;
    let catalog = demo_catalog();
    let baker = Baker::try_new(BakeConfig::default(), &store, &catalog)?;

    let mut rng = StdRng::seed_from_u64(seed);
    let mut sink = FnSink::new(|event| {
        if let BakeEvent::PresetBaked {
            name,
            is_generator,
            is_effect,
        } = event
        {
            info!("{name}: generator={is_generator} effect={is_effect}");
        }
    });
    let registries = baker.bake_with_events(&mut rng, &mut sink)?;

    println!("Generators (seed {seed}):");
    for (name, preset) in registries.generators() {
        let params: Vec<String> = preset
            .generator_kwargs
            .iter()
            .map(|(k, v)| format!("{k}={v}"))
            .collect();
        println!("  {name:<18} {}", params.join(" "));
    }

    println!("Effects:");
    for (name, preset) in registries.effects() {
        let steps: Vec<&str> = preset.post_effects.iter().map(EffectStep::name).collect();
        println!("  {name:<18} {}", steps.join(" -> "));
    }

    Ok(())
}
