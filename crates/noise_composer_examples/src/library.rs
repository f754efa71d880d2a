//! A small preset library exercising layering, stashing, and nested preset references.
use noise_composer::prelude::*;

use crate::catalog::palette_names;

const GLASS_MASK_KEY: &str = "stained_glass_mask";

/// Builds the demo preset store.
///
/// `basic` and the presets layered on it are generators. `stained-glass` is both a
/// generator and an effect. Everything else is an effect.
pub fn demo_presets() -> Result<PresetStore> {
    let mut store = PresetStore::new();

    store.define(
        "maybe-palette",
        PresetDefinition::new()
            .settings(|scope| {
                let palette_name = scope.random_member(palette_names())?;
                Ok(params! {
                    "palette_name" => palette_name,
                    "palette_on" => scope.coin_flip(),
                })
            })
            .post(|settings, scope| {
                if !settings.read_as::<bool>("palette_on")? {
                    return Ok(vec![]);
                }
                let name = settings.read("palette_name")?.clone();
                Ok(vec![scope.effect("palette", params! { "name" => name })?])
            }),
    )?;

    store.define(
        "normalize",
        PresetDefinition::new().post(|_, scope| Ok(vec![scope.effect("normalize", params! {})?])),
    )?;

    store.define(
        "basic",
        PresetDefinition::new()
            .layers(["maybe-palette", "normalize"])
            .settings(|scope| Ok(params! { "ridges" => scope.random() < 0.25 }))
            .generator(|settings, scope| {
                let freq = vec![scope.randint(2, 4), scope.randint(2, 4)];
                Ok(params! {
                    "freq" => freq,
                    "ridges" => settings.read("ridges")?.clone(),
                })
            }),
    )?;

    store.define(
        "multires",
        PresetDefinition::new()
            .layers(["basic"])
            .generator(|_, scope| Ok(params! { "octaves" => scope.randint(4, 8) })),
    )?;

    store.define(
        "aberration",
        PresetDefinition::new()
            .settings(|scope| {
                Ok(params! { "aberration_displacement" => 0.0125 + scope.random() * 0.00625 })
            })
            .post(|settings, scope| {
                let displacement = settings.read("aberration_displacement")?.clone();
                Ok(vec![scope.effect(
                    "aberration",
                    params! { "displacement" => displacement },
                )?])
            }),
    )?;

    store.define(
        "bloom",
        PresetDefinition::new()
            .settings(|scope| Ok(params! { "bloom_alpha" => 0.075 + scope.random() * 0.0625 }))
            .post(|settings, scope| {
                let alpha = settings.read("bloom_alpha")?.clone();
                Ok(vec![scope.effect("bloom", params! { "alpha" => alpha })?])
            }),
    )?;

    store.define(
        "dither",
        PresetDefinition::new()
            .settings(|scope| Ok(params! { "dither_alpha" => 0.1 + scope.random() * 0.05 }))
            .post(|settings, scope| {
                let alpha = settings.read("dither_alpha")?.clone();
                Ok(vec![scope.effect("dither", params! { "alpha" => alpha })?])
            }),
    )?;

    store.define(
        "random-hue",
        PresetDefinition::new().post(|_, scope| {
            let amount = scope.random();
            Ok(vec![scope.effect("adjust_hue", params! { "amount" => amount })?])
        }),
    )?;

    store.define(
        "vignette-bright",
        PresetDefinition::new()
            .settings(|scope| {
                Ok(params! {
                    "vignette_alpha" => 0.333 + scope.random() * 0.333,
                    "vignette_brightness" => 1.0,
                })
            })
            .post(vignette_post),
    )?;

    store.define(
        "vignette-dark",
        PresetDefinition::new()
            .settings(|scope| {
                Ok(params! {
                    "vignette_alpha" => 0.5 + scope.random() * 0.25,
                    "vignette_brightness" => 0.0,
                })
            })
            .post(vignette_post),
    )?;

    store.define(
        "refract-octaves",
        PresetDefinition::new()
            .settings(|scope| {
                Ok(params! {
                    "refract_range" => 0.5 + scope.random() * 0.25,
                    "refract_signed_range" => false,
                    "refract_y_from_offset" => true,
                })
            })
            .octaves(|settings, scope| {
                let params = params! {
                    "displacement" => settings.read("refract_range")?.clone(),
                    "signed_range" => settings.read("refract_signed_range")?.clone(),
                    "y_from_offset" => settings.read("refract_y_from_offset")?.clone(),
                };
                Ok(vec![scope.effect("refract", params)?])
            }),
    )?;

    store.define(
        "warped-multires",
        PresetDefinition::new().layers(["multires", "refract-octaves"]),
    )?;

    // The settings thunk draws the cell mask once; the post thunk recalls the same draw.
    store.define(
        "stained-glass",
        PresetDefinition::new()
            .layers(["basic"])
            .settings(|scope| {
                let drawn = scope.random_member(["hex", "square", "triangle"])?;
                let mask = scope.stash(GLASS_MASK_KEY, drawn);
                Ok(params! {
                    "cell_mask" => mask,
                    "voronoi_diagram_type" => "range",
                    "voronoi_refract" => 0.125 + scope.random() * 0.125,
                })
            })
            .generator(|settings, _| {
                Ok(params! {
                    "mask" => settings.read("cell_mask")?.clone(),
                    "diagram" => settings.read("voronoi_diagram_type")?.clone(),
                })
            })
            .post(|settings, scope| {
                let displacement = settings.read("voronoi_refract")?.clone();
                let mask = scope.stashed(GLASS_MASK_KEY)?;
                let params = params! {
                    "displacement" => displacement,
                    "signed_range" => mask.as_str() != Some("square"),
                };
                Ok(vec![scope.effect("refract", params)?])
            }),
    )?;

    store.define(
        "grainy-glow",
        PresetDefinition::new()
            .layers(["bloom"])
            .post(|_, scope| {
                let dither = scope.preset_with("dither", params! { "dither_alpha" => 0.05 })?;
                let amount = 0.05 + scope.random() * 0.05;
                Ok(vec![
                    dither,
                    scope.effect("adjust_brightness", params! { "amount" => amount })?,
                ])
            }),
    )?;

    Ok(store)
}

fn vignette_post(settings: &mut Settings, scope: &mut Scope<'_>) -> Result<Vec<EffectStep>> {
    let params = params! {
        "alpha" => settings.read("vignette_alpha")?.clone(),
        "brightness" => settings.read("vignette_brightness")?.clone(),
    };
    Ok(vec![scope.effect("vignette", params)?])
}
