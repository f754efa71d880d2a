//! RON preset documents.
//!
//! A document lists presets in bake order. Each preset is a map from definition key to entry:
//!
//! ```ron
//! (
//!     presets: [
//!         (
//!             name: "basic",
//!             entries: {
//!                 "generator": Mapping({"freq": [2, 2]}),
//!             },
//!         ),
//!         (
//!             name: "rippled",
//!             entries: {
//!                 "layers": Layers(["basic"]),
//!                 "post": Steps([
//!                     Effect(name: "refract", params: {"displacement": 0.5}),
//!                     Preset("dither"),
//!                 ]),
//!             },
//!         ),
//!     ],
//! )
//! ```
//!
//! Documents carry no random draws. Mappings become thunks returning a copy; step lists are deferred
//! so effects bind against the catalog and nested presets resolve at bake time.
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::preset::definition::{DefinitionEntry, PresetDefinition, Thunk, LAYERS_KEY};
use crate::preset::store::PresetStore;
use crate::value::Params;

/// A list of preset definitions in bake order.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct PresetDocument {
    pub presets: Vec<PresetDef>,
}

/// One named preset within a [`PresetDocument`].
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PresetDef {
    pub name: String,
    pub entries: BTreeMap<String, EntryDef>,
}

/// Value of one definition key.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub enum EntryDef {
    Layers(Vec<String>),
    Mapping(Params),
    Steps(Vec<StepDef>),
}

/// One element of an effect sequence.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub enum StepDef {
    Effect {
        name: String,
        #[serde(default)]
        params: Params,
    },
    Preset(String),
}

impl PresetDocument {
    pub fn from_ron(source: &str) -> Result<Self> {
        ron::from_str(source).map_err(|e| Error::Parse(e.to_string()))
    }

    /// Defines every preset of the document in `store`, in document order.
    ///
    /// Stops at the first invalid preset; presets before it stay defined.
    pub fn load_into(self, store: &mut PresetStore) -> Result<usize> {
        let count = self.presets.len();
        for preset in self.presets {
            let definition = preset.to_definition()?;
            store.define(preset.name, definition)?;
        }
        Ok(count)
    }
}

impl PresetDef {
    /// Converts the entries into a [`PresetDefinition`], rejecting unknown keys.
    pub fn to_definition(&self) -> Result<PresetDefinition> {
        let entries = self
            .entries
            .iter()
            .map(|(key, entry)| {
                entry_runtime(&self.name, key, entry).map(|entry| (key.as_str(), entry))
            })
            .collect::<Result<Vec<_>>>()?;

        PresetDefinition::from_entries(&self.name, entries)
    }
}

fn entry_runtime(preset: &str, key: &str, entry: &EntryDef) -> Result<DefinitionEntry> {
    match entry {
        EntryDef::Layers(layers) => Ok(DefinitionEntry::Layers(layers.clone())),
        EntryDef::Mapping(params) => {
            let params = params.clone();
            Ok(DefinitionEntry::Thunk(Thunk::nullary(move |_| Ok(params.clone()))))
        }
        EntryDef::Steps(_) if key == LAYERS_KEY => Err(Error::TypeMismatch {
            preset: preset.to_string(),
            slot: key.to_string(),
            expected: "list of layer names".to_string(),
            found: "list of effect steps".to_string(),
        }),
        EntryDef::Steps(steps) => {
            let steps = steps.clone();
            Ok(DefinitionEntry::Thunk(Thunk::nullary(move |scope| {
                steps
                    .iter()
                    .map(|step| match step {
                        StepDef::Effect { name, params } => scope.effect(name, params.clone()),
                        StepDef::Preset(name) => scope.preset(name),
                    })
                    .collect::<Result<Vec<_>>>()
            })))
        }
    }
}

impl PresetStore {
    /// Parses a RON [`PresetDocument`] and defines its presets. Returns how many were added.
    pub fn load_ron(&mut self, source: &str) -> Result<usize> {
        PresetDocument::from_ron(source)?.load_into(self)
    }
}
