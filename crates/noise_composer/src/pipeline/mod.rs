//! Render-time effect pipelines.
//!
//! An effect sequence holds [`EffectStep`]s: concrete bound effects, or references to whole
//! resolved presets whose own sequences are applied in their place. Octave sequences add one
//! rule on top of post sequences: a bound `displacement` is divided by `2^octave` for each
//! invocation, without touching the stored value.
use std::sync::Arc;

use tracing::trace;

use crate::effect::BoundEffect;
use crate::error::Result;
use crate::preset::ResolvedPreset;
use crate::tensor::{Shape, Tensor};

pub mod synth;

pub use synth::Synthesizer;

/// Parameter attenuated per octave.
pub const DISPLACEMENT_KEY: &str = "displacement";

/// One element of an octave or post effect sequence.
#[derive(Clone, Debug, PartialEq)]
pub enum EffectStep {
    Effect(BoundEffect),
    PresetRef(Arc<ResolvedPreset>),
}

impl EffectStep {
    /// Effect name, or the referenced preset's name.
    pub fn name(&self) -> &str {
        match self {
            EffectStep::Effect(effect) => effect.name(),
            EffectStep::PresetRef(preset) => &preset.name,
        }
    }

    /// Applies the step after octave reduction. Preset references apply their post effects.
    pub fn apply_post(&self, tensor: Tensor, shape: Shape, time: f32, speed: f32) -> Result<Tensor> {
        match self {
            EffectStep::Effect(effect) => effect.invoke(tensor, shape, time, speed),
            EffectStep::PresetRef(preset) => {
                apply_post_chain(&preset.post_effects, tensor, shape, time, speed)
            }
        }
    }

    /// Applies the step within octave `octave`. Preset references apply their octave effects.
    pub fn apply_octave(
        &self,
        tensor: Tensor,
        shape: Shape,
        time: f32,
        speed: f32,
        octave: u32,
    ) -> Result<Tensor> {
        match self {
            EffectStep::Effect(effect) => {
                attenuate(effect, octave)?.invoke(tensor, shape, time, speed)
            }
            EffectStep::PresetRef(preset) => {
                apply_octave_chain(&preset.octave_effects, tensor, shape, time, speed, octave)
            }
        }
    }
}

impl From<BoundEffect> for EffectStep {
    fn from(value: BoundEffect) -> Self {
        EffectStep::Effect(value)
    }
}

impl From<ResolvedPreset> for EffectStep {
    fn from(value: ResolvedPreset) -> Self {
        EffectStep::PresetRef(Arc::new(value))
    }
}

/// Threads `tensor` through every step's post application, in order.
pub fn apply_post_chain(
    steps: &[EffectStep],
    tensor: Tensor,
    shape: Shape,
    time: f32,
    speed: f32,
) -> Result<Tensor> {
    steps.iter().try_fold(tensor, |tensor, step| {
        step.apply_post(tensor, shape, time, speed)
    })
}

/// Threads `tensor` through every step's octave application, in order.
pub fn apply_octave_chain(
    steps: &[EffectStep],
    tensor: Tensor,
    shape: Shape,
    time: f32,
    speed: f32,
    octave: u32,
) -> Result<Tensor> {
    steps.iter().try_fold(tensor, |tensor, step| {
        step.apply_octave(tensor, shape, time, speed, octave)
    })
}

/// Returns a copy of `effect` with any bound displacement divided by `2^octave`.
///
/// Effects without a displacement are returned unchanged. A displacement that is not a
/// number fails with [`crate::error::Error::InvalidValue`].
pub fn attenuate(effect: &BoundEffect, octave: u32) -> Result<BoundEffect> {
    let Some(value) = effect.param(DISPLACEMENT_KEY) else {
        return Ok(effect.clone());
    };

    let displacement = value.expect_as::<f64>(DISPLACEMENT_KEY)?;
    let attenuated = displacement / 2f64.powf(f64::from(octave));
    trace!(
        "Attenuating {} displacement {} -> {} at octave {}.",
        effect.name(),
        displacement,
        attenuated,
        octave
    );
    effect.with_param(DISPLACEMENT_KEY, attenuated)
}

/// Flattens a post sequence into the concrete effects it would invoke, in order.
pub fn unroll_post(steps: &[EffectStep]) -> Vec<BoundEffect> {
    let mut out = Vec::new();
    for step in steps {
        match step {
            EffectStep::Effect(effect) => out.push(effect.clone()),
            EffectStep::PresetRef(preset) => out.extend(unroll_post(&preset.post_effects)),
        }
    }
    out
}

/// Flattens an octave sequence into the attenuated effects it would invoke at `octave`.
pub fn unroll_octave(steps: &[EffectStep], octave: u32) -> Result<Vec<BoundEffect>> {
    let mut out = Vec::new();
    for step in steps {
        match step {
            EffectStep::Effect(effect) => out.push(attenuate(effect, octave)?),
            EffectStep::PresetRef(preset) => {
                out.extend(unroll_octave(&preset.octave_effects, octave)?)
            }
        }
    }
    Ok(out)
}
