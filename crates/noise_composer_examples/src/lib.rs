#![forbid(unsafe_code)]

mod catalog;
mod library;
mod output;
mod synth;

pub use catalog::{demo_catalog, palette_names, PALETTES};
pub use library::demo_presets;
pub use output::{init_tracing, save_png};
pub use synth::ValueNoiseSynth;
