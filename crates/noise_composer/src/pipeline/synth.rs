use crate::error::Result;
use crate::pipeline::EffectStep;
use crate::tensor::{Shape, Tensor};
use crate::value::Params;

/// Noise synthesis entry point consumed by [`crate::preset::ResolvedPreset::render`].
///
/// Implementations build the noise basis from `generator_params`, apply `octave_effects` once
/// per octave (see [`crate::pipeline::apply_octave_chain`]) and `post_effects` once after the
/// octaves are reduced (see [`crate::pipeline::apply_post_chain`]).
pub trait Synthesizer {
    fn synthesize(
        &self,
        shape: Shape,
        octave_effects: &[EffectStep],
        post_effects: &[EffectStep],
        time: f32,
        speed: f32,
        generator_params: &Params,
    ) -> Result<Tensor>;
}
