//! Multi-octave value noise driving a preset's effect pipelines.
use noise_composer::prelude::*;
use tracing::{debug, warn};

use crate::catalog::hash01;

/// Upper bound on `octaves`; each octave doubles the lattice frequency.
const MAX_OCTAVES: u32 = 12;

const KNOWN_PARAMS: [&str; 5] = ["diagram", "freq", "mask", "octaves", "ridges"];

/// Generator parameters understood by [`ValueNoiseSynth`].
#[derive(Clone, Debug, PartialEq)]
struct NoiseParams {
    freq: [u32; 2],
    octaves: u32,
    ridges: bool,
    salt: u32,
    cells: bool,
}

impl NoiseParams {
    fn from_params(params: &Params) -> Result<Self> {
        for key in params.keys() {
            if !KNOWN_PARAMS.contains(&key.as_str()) {
                warn!("Ignoring unknown generator parameter '{}'.", key);
            }
        }

        let freq = match params.get("freq") {
            None => [3, 3],
            Some(Value::List(items)) if items.len() == 2 => {
                [positive(&items[0], "freq")?, positive(&items[1], "freq")?]
            }
            Some(value) => {
                let f = positive(value, "freq")?;
                [f, f]
            }
        };

        let octaves = match params.get("octaves") {
            None => 1,
            Some(value) => positive(value, "octaves")?,
        };
        if octaves > MAX_OCTAVES {
            return Err(Error::InvalidValue {
                key: "octaves".into(),
                expected: format!("at most {MAX_OCTAVES}"),
            });
        }

        // Every octave doubles the lattice; the finest one must still fit.
        let scale = 1u32 << (octaves - 1);
        if freq.iter().any(|f| f.checked_mul(scale).is_none()) {
            return Err(Error::InvalidValue {
                key: "freq".into(),
                expected: format!("a frequency that stays below 2^32 across {octaves} octaves"),
            });
        }

        let ridges = match params.get("ridges") {
            None => false,
            Some(value) => value.expect_as("ridges")?,
        };
        let salt = match params.get("mask") {
            None => 0,
            Some(value) => fnv1a(&value.expect_as::<String>("mask")?),
        };

        Ok(Self {
            freq,
            octaves,
            ridges,
            salt,
            cells: params.get("diagram").is_some_and(Value::is_truthy),
        })
    }
}

fn positive(value: &Value, key: &str) -> Result<u32> {
    let n: i64 = value.expect_as(key)?;
    u32::try_from(n)
        .ok()
        .filter(|n| *n > 0)
        .ok_or_else(|| Error::InvalidValue {
            key: key.to_string(),
            expected: "a positive integer".into(),
        })
}

fn fnv1a(s: &str) -> u32 {
    s.bytes()
        .fold(0x811c_9dc5, |h, b| (h ^ b as u32).wrapping_mul(0x0100_0193))
}

fn smoothstep(t: f32) -> f32 {
    t * t * (3.0 - 2.0 * t)
}

/// A CPU [`Synthesizer`] summing octaves of tileable value noise.
///
/// Octave `n` samples a lattice at `freq * 2^(n-1)`, runs the octave effects on it, and
/// contributes with weight `1 / 2^n`. The sum is normalized before post effects run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ValueNoiseSynth {
    pub seed: u32,
}

impl ValueNoiseSynth {
    pub fn new(seed: u32) -> Self {
        Self { seed }
    }

    fn layer(&self, shape: Shape, freq: [u32; 2], salt: u32, params: &NoiseParams) -> Tensor {
        let mut tensor = Tensor::zeros(shape);
        let [fy, fx] = freq.map(|f| f as usize);
        for c in 0..shape.channels {
            let salt = salt.wrapping_add(c as u32 * 0x9e37);
            for y in 0..shape.height {
                let v = y as f32 / shape.height as f32 * fy as f32;
                let (y0, ty) = (v.floor() as usize % fy, smoothstep(v.fract()));
                let y1 = (y0 + 1) % fy;
                for x in 0..shape.width {
                    let u = x as f32 / shape.width as f32 * fx as f32;
                    let (x0, tx) = (u.floor() as usize % fx, smoothstep(u.fract()));
                    let x1 = (x0 + 1) % fx;

                    let top = lerp(hash01(x0, y0, salt), hash01(x1, y0, salt), tx);
                    let bottom = lerp(hash01(x0, y1, salt), hash01(x1, y1, salt), tx);
                    let mut sample = lerp(top, bottom, ty);
                    if params.ridges {
                        sample = 1.0 - (sample * 2.0 - 1.0).abs();
                    }
                    if params.cells {
                        sample = (sample * 4.0).floor() / 4.0;
                    }
                    tensor.set(y, x, c, sample);
                }
            }
        }
        tensor
    }
}

fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

impl Synthesizer for ValueNoiseSynth {
    fn synthesize(
        &self,
        shape: Shape,
        octave_effects: &[EffectStep],
        post_effects: &[EffectStep],
        time: f32,
        speed: f32,
        generator_params: &Params,
    ) -> Result<Tensor> {
        let params = NoiseParams::from_params(generator_params)?;
        debug!(
            "Synthesizing {} octaves at base frequency {:?}.",
            params.octaves, params.freq
        );

        let mut sum = Tensor::zeros(shape);
        for octave in 1..=params.octaves {
            let multiplier = (1u32 << octave) as f32;
            let freq = params.freq.map(|f| f << (octave - 1));
            let salt = self.seed ^ params.salt ^ octave.wrapping_mul(0x27d4_eb2d);

            let layer = self.layer(shape, freq, salt, &params);
            let layer = apply_octave_chain(octave_effects, layer, shape, time, speed, octave)?;
            for (acc, v) in sum.data.iter_mut().zip(&layer.data) {
                *acc += v / multiplier;
            }
        }

        apply_post_chain(post_effects, sum.normalize(), shape, time, speed)
    }
}
