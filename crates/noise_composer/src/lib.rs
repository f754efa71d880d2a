#![forbid(unsafe_code)]
//! noise_composer: Composable, inheritable noise presets with access-tracked settings.
//!
//! Modules:
//! - value: dynamic setting and parameter values, plus the `params!` macro
//! - effect: effect functions, the effect catalog, and bound effects
//! - preset: definitions, layer rollup, settings tracking, stash, and resolution
//! - pipeline: render-time effect sequences and octave attenuation
//! - bake: bake passes, configuration, registries, and events
//!
//! For examples, see the `noise_composer_examples` crate.
pub mod bake;
pub mod effect;
pub mod error;
pub mod pipeline;
pub mod preset;
pub mod tensor;
pub mod value;

/// Convenient re-exports for common types. Import with `use noise_composer::prelude::*;`.
pub mod prelude {
    pub use crate::bake::{
        bake_all, BakeConfig, BakeEvent, Baker, EventSink, FnSink, Registries, VecSink,
    };
    pub use crate::effect::{BoundEffect, EffectCatalog, EffectDescriptor, EffectFn};
    pub use crate::error::{Error, Result};
    pub use crate::params;
    pub use crate::pipeline::{
        apply_octave_chain, apply_post_chain, attenuate, unroll_octave, unroll_post, EffectStep,
        Synthesizer,
    };
    #[cfg(feature = "serde")]
    pub use crate::preset::PresetDocument;
    pub use crate::preset::{
        PresetDefinition, PresetStore, ResolvedPreset, Scope, Settings, Slot, Stash, Thunk,
    };
    pub use crate::tensor::{Shape, Tensor};
    pub use crate::value::{FromValue, Params, Value};
}
