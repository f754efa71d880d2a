use std::collections::BTreeMap;
use std::sync::Arc;

use crate::error::{Error, Result};
use crate::preset::ResolvedPreset;

/// The generator and effect registries produced by one bake pass.
///
/// A preset that is both a generator and an effect is stored once and shared by both maps.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Registries {
    generators: BTreeMap<String, Arc<ResolvedPreset>>,
    effects: BTreeMap<String, Arc<ResolvedPreset>>,
}

impl Registries {
    pub fn new() -> Self {
        Self::default()
    }

    /// Files `preset` under every registry its classification allows.
    pub(crate) fn insert(&mut self, preset: ResolvedPreset) {
        let preset = Arc::new(preset);
        if preset.is_generator() {
            self.generators.insert(preset.name.clone(), preset.clone());
        }
        if preset.is_effect() {
            self.effects.insert(preset.name.clone(), preset);
        }
    }

    pub fn generators(&self) -> &BTreeMap<String, Arc<ResolvedPreset>> {
        &self.generators
    }

    pub fn effects(&self) -> &BTreeMap<String, Arc<ResolvedPreset>> {
        &self.effects
    }

    /// Looks up a generator preset, failing with [`Error::UnknownPreset`].
    pub fn generator(&self, name: &str) -> Result<&Arc<ResolvedPreset>> {
        self.generators.get(name).ok_or_else(|| Error::UnknownPreset {
            name: name.to_string(),
        })
    }

    /// Looks up an effect preset, failing with [`Error::UnknownPreset`].
    pub fn effect(&self, name: &str) -> Result<&Arc<ResolvedPreset>> {
        self.effects.get(name).ok_or_else(|| Error::UnknownPreset {
            name: name.to_string(),
        })
    }

    /// Looks a preset up in either registry.
    pub fn get(&self, name: &str) -> Option<&Arc<ResolvedPreset>> {
        self.generators.get(name).or_else(|| self.effects.get(name))
    }

    /// Generator preset names in sorted order.
    pub fn generator_names(&self) -> impl Iterator<Item = &str> {
        self.generators.keys().map(String::as_str)
    }

    /// Effect preset names in sorted order.
    pub fn effect_names(&self) -> impl Iterator<Item = &str> {
        self.effects.keys().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.generators.is_empty() && self.effects.is_empty()
    }
}
