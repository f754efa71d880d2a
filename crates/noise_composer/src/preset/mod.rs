//! Preset definitions, inheritance rollup, and resolution.
//!
//! Presets are authored as [`PresetDefinition`]s: a list of parent layers and up to four
//! deferred slot thunks. A [`PresetStore`] keeps them in definition order. Resolving a preset
//! rolls each slot up through its layers, evaluates the thunks against a shared random
//! source, and checks that every setting was used, producing a [`ResolvedPreset`].
pub mod definition;
#[cfg(feature = "serde")]
pub mod document;
pub mod resolved;
pub(crate) mod rollup;
pub mod scope;
pub mod settings;
pub mod stash;
pub mod store;

pub use definition::{DefinitionEntry, PresetDefinition, Slot, SlotKind, SlotValue, Thunk};
#[cfg(feature = "serde")]
pub use document::{EntryDef, PresetDef, PresetDocument, StepDef};
pub use resolved::ResolvedPreset;
pub use scope::Scope;
pub use settings::Settings;
pub use stash::Stash;
pub use store::PresetStore;
