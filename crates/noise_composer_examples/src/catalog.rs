//! Small CPU effects used by the demo presets.
use noise_composer::prelude::*;

/// Named three-stop gradients, darkest first.
pub const PALETTES: [(&str, [[f32; 3]; 3]); 4] = [
    (
        "ember",
        [[0.08, 0.02, 0.02], [0.85, 0.25, 0.05], [1.0, 0.85, 0.4]],
    ),
    (
        "glacier",
        [[0.02, 0.05, 0.12], [0.2, 0.5, 0.75], [0.9, 0.97, 1.0]],
    ),
    (
        "moss",
        [[0.03, 0.07, 0.02], [0.3, 0.5, 0.15], [0.85, 0.9, 0.6]],
    ),
    (
        "neon",
        [[0.1, 0.0, 0.2], [0.9, 0.1, 0.6], [0.2, 1.0, 0.9]],
    ),
];

pub fn palette_names() -> impl Iterator<Item = &'static str> {
    PALETTES.iter().map(|(name, _)| *name)
}

fn param_or<T: FromValue>(params: &Params, key: &str, default: T) -> Result<T> {
    match params.get(key) {
        Some(value) => value.expect_as(key),
        None => Ok(default),
    }
}

/// Deterministic per-pixel hash in `[0, 1)`.
pub(crate) fn hash01(x: usize, y: usize, salt: u32) -> f32 {
    let mut h = (x as u32).wrapping_mul(0x8da6_b343)
        ^ (y as u32).wrapping_mul(0xd816_3841)
        ^ salt.wrapping_mul(0xcb1a_b31f);
    h ^= h >> 13;
    h = h.wrapping_mul(0x5bd1_e995);
    h ^= h >> 15;
    (h >> 8) as f32 / (1u32 << 24) as f32
}

fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

fn brightness(tensor: Tensor, _: Shape, _: f32, _: f32, params: &Params) -> Result<Tensor> {
    let amount: f32 = param_or(params, "amount", 0.125)?;
    Ok(tensor.map(|v| (v + amount).clamp(0.0, 1.0)))
}

fn hue(mut tensor: Tensor, shape: Shape, _: f32, _: f32, params: &Params) -> Result<Tensor> {
    let amount: f32 = param_or(params, "amount", 0.25)?;
    if shape.channels < 3 {
        return Ok(tensor);
    }
    // Rotates the RGB triple around the gray axis.
    let turns = amount * std::f32::consts::TAU;
    let (sin, cos) = turns.sin_cos();
    let k = (1.0 - cos) / 3.0;
    let s = sin / 3f32.sqrt();
    for y in 0..shape.height {
        for x in 0..shape.width {
            let [r, g, b] = [0, 1, 2].map(|c| tensor.get(y, x, c));
            let rotated = [
                r * (cos + k) + g * (k - s) + b * (k + s),
                r * (k + s) + g * (cos + k) + b * (k - s),
                r * (k - s) + g * (k + s) + b * (cos + k),
            ];
            for (c, v) in rotated.into_iter().enumerate() {
                tensor.set(y, x, c, v.clamp(0.0, 1.0));
            }
        }
    }
    Ok(tensor)
}

fn refract(tensor: Tensor, shape: Shape, _: f32, _: f32, params: &Params) -> Result<Tensor> {
    let displacement: f32 = param_or(params, "displacement", 0.5)?;
    let signed_range: bool = param_or(params, "signed_range", true)?;
    let y_from_offset: bool = param_or(params, "y_from_offset", false)?;

    let mut out = Tensor::zeros(shape);
    let (w, h) = (shape.width as f32, shape.height as f32);
    for y in 0..shape.height {
        for x in 0..shape.width {
            let mut dx = tensor.get(y, x, 0);
            let mut dy = if y_from_offset {
                tensor.get((y + shape.height / 2) % shape.height, (x + shape.width / 2) % shape.width, 0)
            } else {
                tensor.get(y, x, shape.channels.min(2) - 1)
            };
            if signed_range {
                dx = dx * 2.0 - 1.0;
                dy = dy * 2.0 - 1.0;
            }
            let sx = (x as f32 + dx * displacement * w).rem_euclid(w) as usize;
            let sy = (y as f32 + dy * displacement * h).rem_euclid(h) as usize;
            for c in 0..shape.channels {
                out.set(y, x, c, tensor.get(sy.min(shape.height - 1), sx.min(shape.width - 1), c));
            }
        }
    }
    Ok(out)
}

fn aberration(tensor: Tensor, shape: Shape, _: f32, _: f32, params: &Params) -> Result<Tensor> {
    let displacement: f32 = param_or(params, "displacement", 0.005)?;
    let offset = (displacement * shape.width as f32).round() as isize;
    let mut out = tensor.clone();
    if shape.channels < 3 || offset == 0 {
        return Ok(out);
    }
    let w = shape.width as isize;
    for y in 0..shape.height {
        for x in 0..shape.width {
            let left = (x as isize - offset).rem_euclid(w) as usize;
            let right = (x as isize + offset).rem_euclid(w) as usize;
            out.set(y, x, 0, tensor.get(y, left, 0));
            out.set(y, x, 2, tensor.get(y, right, 2));
        }
    }
    Ok(out)
}

fn dither(mut tensor: Tensor, shape: Shape, time: f32, _: f32, params: &Params) -> Result<Tensor> {
    let alpha: f32 = param_or(params, "alpha", 0.1)?;
    let salt = (time * 1000.0) as u32;
    for y in 0..shape.height {
        for x in 0..shape.width {
            let noise = hash01(x, y, salt) - 0.5;
            for c in 0..shape.channels {
                let v = tensor.get(y, x, c) + noise * alpha;
                tensor.set(y, x, c, v.clamp(0.0, 1.0));
            }
        }
    }
    Ok(tensor)
}

fn palette(mut tensor: Tensor, shape: Shape, _: f32, _: f32, params: &Params) -> Result<Tensor> {
    let name: String = param_or(params, "name", PALETTES[0].0.to_string())?;
    let Some((_, stops)) = PALETTES.iter().find(|(n, _)| *n == name) else {
        return Err(Error::InvalidValue {
            key: "name".into(),
            expected: format!("one of {}", palette_names().collect::<Vec<_>>().join(", ")),
        });
    };
    if shape.channels < 3 {
        return Ok(tensor);
    }
    for y in 0..shape.height {
        for x in 0..shape.width {
            let luma = (0..3).map(|c| tensor.get(y, x, c)).sum::<f32>() / 3.0;
            let (lo, hi, t) = if luma < 0.5 {
                (stops[0], stops[1], luma * 2.0)
            } else {
                (stops[1], stops[2], (luma - 0.5) * 2.0)
            };
            for c in 0..3 {
                tensor.set(y, x, c, lerp(lo[c], hi[c], t));
            }
        }
    }
    Ok(tensor)
}

fn vignette(mut tensor: Tensor, shape: Shape, _: f32, _: f32, params: &Params) -> Result<Tensor> {
    let alpha: f32 = param_or(params, "alpha", 0.5)?;
    let brightness: f32 = param_or(params, "brightness", 0.0)?;
    let (cy, cx) = (shape.height as f32 * 0.5, shape.width as f32 * 0.5);
    let max = (cx * cx + cy * cy).sqrt().max(f32::EPSILON);
    for y in 0..shape.height {
        for x in 0..shape.width {
            let (dy, dx) = (y as f32 + 0.5 - cy, x as f32 + 0.5 - cx);
            let edge = ((dx * dx + dy * dy).sqrt() / max).powi(2) * alpha;
            for c in 0..shape.channels {
                let v = tensor.get(y, x, c);
                tensor.set(y, x, c, lerp(v, brightness, edge));
            }
        }
    }
    Ok(tensor)
}

fn bloom(tensor: Tensor, _: Shape, _: f32, _: f32, params: &Params) -> Result<Tensor> {
    let alpha: f32 = param_or(params, "alpha", 0.5)?;
    Ok(tensor.map(|v| lerp(v, (v + v * v).min(1.0), alpha)))
}

/// Catalog holding every effect the demo presets refer to.
pub fn demo_catalog() -> EffectCatalog {
    let mut catalog = EffectCatalog::with_capacity(9);
    catalog.register_fn("adjust_brightness", ["amount"], brightness);
    catalog.register_fn("adjust_hue", ["amount"], hue);
    catalog.register_fn(
        "refract",
        ["displacement", "signed_range", "y_from_offset"],
        refract,
    );
    catalog.register_fn("aberration", ["displacement"], aberration);
    catalog.register_fn("dither", ["alpha"], dither);
    catalog.register_fn("palette", ["name"], palette);
    catalog.register_fn("normalize", [] as [&str; 0], |t, _, _, _, _| Ok(t.normalize()));
    catalog.register_fn("vignette", ["alpha", "brightness"], vignette);
    catalog.register_fn("bloom", ["alpha"], bloom);
    catalog
}
