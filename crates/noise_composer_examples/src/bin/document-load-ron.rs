use anyhow::Context;
use noise_composer::prelude::*;
use noise_composer_examples::{demo_catalog, demo_presets, init_tracing, save_png, ValueNoiseSynth};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::info;

fn main() -> anyhow::Result<()> {
    init_tracing();
    let path = format!("{}/assets/presets.ron", env!("CARGO_MANIFEST_DIR"));
    let source = std::fs::read_to_string(&path).with_context(|| format!("reading {path}"))?;

    // Document presets layer on the code-defined library.
    let mut store = demo_presets()?;
    let loaded = store.load_ron(&source)?;
    info!("Loaded {} presets from {}.", loaded, path);

    let catalog = demo_catalog();
    let mut rng = StdRng::seed_from_u64(2025);
    let registries = bake_all(&store, &catalog, &mut rng)?;

    let shape = Shape::new(256, 512, 3);
    let synth = ValueNoiseSynth::new(2025);
    for name in ["glass-noir", "dense-multires"] {
        let tensor = registries.generator(name)?.render(&synth, shape, 0.0, 1.0)?;
        save_png(&tensor, format!("{name}.png"))?;
    }

    let base = registries.generator("multires")?.render(&synth, shape, 0.0, 1.0)?;
    let wash = registries.effect("neon-wash")?;
    let tensor = apply_post_chain(&wash.post_effects, base, shape, 0.0, 1.0)?;
    save_png(&tensor, "neon-wash.png")?;

    Ok(())
}
