//! Fully resolved presets.
use std::fmt;

use tracing::error;

use crate::error::{Error, Result};
use crate::pipeline::{EffectStep, Synthesizer};
use crate::preset::definition::{Slot, SlotValue};
use crate::preset::rollup::rollup;
use crate::preset::scope::Scope;
use crate::preset::settings::Settings;
use crate::tensor::{Shape, Tensor};
use crate::value::Params;

/// A preset with every slot rolled up and every thunk evaluated.
#[derive(Clone, Debug, PartialEq)]
pub struct ResolvedPreset {
    pub name: String,
    /// Merged settings, with the record of which keys were read during resolution.
    pub settings: Settings,
    /// Keyword parameters for the noise synthesizer.
    pub generator_kwargs: Params,
    /// Steps applied once per octave.
    pub octave_effects: Vec<EffectStep>,
    /// Steps applied once after the octaves are reduced.
    pub post_effects: Vec<EffectStep>,
    is_generator: bool,
    is_effect: bool,
}

impl ResolvedPreset {
    /// Resolves preset `name`: settings first, then `overrides`, then the generator, octaves and
    /// post slots, and finally the unused-settings check.
    pub(crate) fn resolve(
        name: &str,
        overrides: Option<Params>,
        scope: &mut Scope<'_>,
    ) -> Result<Self> {
        scope.store().require(name)?;
        scope.enter(name)?;
        let resolved = Self::resolve_slots(name, overrides, scope).map_err(|e| e.in_preset(name));
        scope.exit();
        resolved
    }

    fn resolve_slots(
        name: &str,
        overrides: Option<Params>,
        scope: &mut Scope<'_>,
    ) -> Result<Self> {
        let values = into_mapping(name, Slot::Settings, rollup(name, Slot::Settings, None, scope)?)?;
        let mut settings = Settings::new(values);
        if let Some(overrides) = overrides {
            settings.apply_overrides(overrides);
        }

        let generator_kwargs = into_mapping(
            name,
            Slot::Generator,
            rollup(name, Slot::Generator, Some(&mut settings), scope)?,
        )?;
        let octave_effects = into_sequence(
            name,
            Slot::Octaves,
            rollup(name, Slot::Octaves, Some(&mut settings), scope)?,
        )?;
        let post_effects = into_sequence(
            name,
            Slot::Post,
            rollup(name, Slot::Post, Some(&mut settings), scope)?,
        )?;

        let config = scope.config();
        settings.assert_fully_consumed(&config.unused_ok)?;

        let is_generator =
            !generator_kwargs.is_empty() || marker_set(&settings, &config.generator_marker);
        let is_effect = !is_generator || marker_set(&settings, &config.effect_marker);

        Ok(Self {
            name: name.to_string(),
            settings,
            generator_kwargs,
            octave_effects,
            post_effects,
            is_generator,
            is_effect,
        })
    }

    /// True when the preset can seed a noise basis: it has generator parameters or sets the
    /// diagram-type marker.
    pub fn is_generator(&self) -> bool {
        self.is_generator
    }

    /// True when the preset can be applied to an existing tensor: it is not a generator, or it
    /// sets the refract marker.
    pub fn is_effect(&self) -> bool {
        self.is_effect
    }

    /// Hands the preset's generator parameters and effect sequences to `synth`.
    pub fn render(
        &self,
        synth: &dyn Synthesizer,
        shape: Shape,
        time: f32,
        speed: f32,
    ) -> Result<Tensor> {
        synth
            .synthesize(
                shape,
                &self.octave_effects,
                &self.post_effects,
                time,
                speed,
                &self.generator_kwargs,
            )
            .inspect_err(|e| error!("Error rendering preset named {}: {}", self.name, e))
    }
}

impl fmt::Display for ResolvedPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<Preset \"{}\">", self.name)
    }
}

/// Markers count when present and truthy. Looking does not count as a read.
fn marker_set(settings: &Settings, key: &str) -> bool {
    settings.peek(key).is_some_and(|v| v.is_truthy())
}

fn into_mapping(name: &str, slot: Slot, value: SlotValue) -> Result<Params> {
    let found = value.kind();
    value.into_mapping().ok_or_else(|| Error::TypeMismatch {
        preset: name.to_string(),
        slot: slot.key().to_string(),
        expected: slot.kind().to_string(),
        found: found.to_string(),
    })
}

fn into_sequence(name: &str, slot: Slot, value: SlotValue) -> Result<Vec<EffectStep>> {
    let found = value.kind();
    value.into_sequence().ok_or_else(|| Error::TypeMismatch {
        preset: name.to_string(),
        slot: slot.key().to_string(),
        expected: slot.kind().to_string(),
        found: found.to_string(),
    })
}
