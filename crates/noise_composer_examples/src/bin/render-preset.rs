//! Renders a generator preset, optionally followed by an effect preset.
//!
//! Usage: `render-preset [generator] [effect] [seed]`
use noise_composer::prelude::*;
use noise_composer_examples::{demo_catalog, demo_presets, init_tracing, save_png, ValueNoiseSynth};
use tracing::info;

fn main() -> anyhow::Result<()> {
    init_tracing();
    let mut args = std::env::args().skip(1);
    let generator = args.next().unwrap_or_else(|| "multires".to_string());
    let effect = args.next().filter(|name| name != "-");
    let seed: u64 = match args.next() {
        Some(arg) => arg.parse()?,
        None => 2025,
    };

    let store = demo_presets()?;
    let catalog = demo_catalog();
    let registries = Baker::try_new(BakeConfig::default(), &store, &catalog)?.bake_seeded(seed)?;

    let shape = Shape::new(256, 512, 3);
    let synth = ValueNoiseSynth::new(seed as u32);
    let preset = registries.generator(&generator)?;
    info!("Rendering {} with {:?}.", preset, preset.generator_kwargs);
    let mut tensor = preset.render(&synth, shape, 0.0, 1.0)?;

    let mut file_name = generator.clone();
    if let Some(effect) = effect {
        let effect_preset = registries.effect(&effect)?;
        tensor = apply_post_chain(&effect_preset.post_effects, tensor, shape, 0.0, 1.0)?;
        file_name = format!("{generator}+{effect}");
    }

    save_png(&tensor, format!("{file_name}.png"))?;
    Ok(())
}
