//! Append-only store of named preset definitions.
//!
//! Definitions iterate in the order they were added; that order is the bake order, and
//! therefore decides which preset consumes which part of the random stream.
//! [`PresetStore::validate`] checks the layer graph up front: every layer must name a
//! stored preset and the graph must be acyclic.
use std::collections::HashMap;

use tracing::trace;

use crate::error::{Error, Result};
use crate::preset::definition::{DefinitionEntry, PresetDefinition};

/// Named preset definitions in insertion order.
#[derive(Clone, Debug, Default)]
pub struct PresetStore {
    order: Vec<String>,
    definitions: HashMap<String, PresetDefinition>,
}

impl PresetStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Adds a definition. Names are unique; redefining fails with [`Error::DuplicatePreset`].
    pub fn define(
        &mut self,
        name: impl Into<String>,
        definition: PresetDefinition,
    ) -> Result<&mut Self> {
        let name = name.into();
        if self.definitions.contains_key(&name) {
            return Err(Error::DuplicatePreset { name });
        }

        trace!("Defining preset '{}' with layers {:?}.", name, definition.layers);
        self.order.push(name.clone());
        self.definitions.insert(name, definition);
        Ok(self)
    }

    /// Adds a definition built from string-keyed raw entries.
    pub fn define_entries<I, K>(&mut self, name: impl Into<String>, entries: I) -> Result<&mut Self>
    where
        I: IntoIterator<Item = (K, DefinitionEntry)>,
        K: AsRef<str>,
    {
        let name = name.into();
        let definition = PresetDefinition::from_entries(&name, entries)?;
        self.define(name, definition)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.definitions.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<&PresetDefinition> {
        self.definitions.get(name)
    }

    /// Like [`PresetStore::get`], but fails with [`Error::UnknownPreset`].
    pub fn require(&self, name: &str) -> Result<&PresetDefinition> {
        self.get(name).ok_or_else(|| Error::UnknownPreset {
            name: name.to_string(),
        })
    }

    /// Preset names in definition order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    /// `(name, definition)` pairs in definition order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &PresetDefinition)> {
        self.order
            .iter()
            .filter_map(|name| self.definitions.get(name).map(|d| (name.as_str(), d)))
    }

    /// Checks that every layer resolves and that the layer graph is acyclic.
    pub fn validate(&self) -> Result<()> {
        for (name, definition) in self.iter() {
            for layer in &definition.layers {
                if !self.contains(layer) {
                    return Err(Error::MissingLayer {
                        preset: name.to_string(),
                        layer: layer.clone(),
                    });
                }
            }
        }

        self.layer_order().map(|_| ())
    }

    /// Preset names ordered so every preset comes after all of its layers.
    ///
    /// Fails with [`Error::CyclicLayers`] naming one offending cycle.
    pub fn layer_order(&self) -> Result<Vec<String>> {
        let mut indeg: HashMap<&str, usize> = HashMap::new();
        let mut dependents: HashMap<&str, HashMap<&str, usize>> = HashMap::new();

        for (name, definition) in self.iter() {
            let layers: Vec<&str> = definition
                .layers
                .iter()
                .map(String::as_str)
                .filter(|l| self.contains(l))
                .collect();
            indeg.insert(name, layers.len());

            for layer in layers {
                dependents
                    .entry(layer)
                    .or_default()
                    .entry(name)
                    .and_modify(|count| *count += 1)
                    .or_insert(1);
            }
        }

        // Seed in reverse definition order so pops come out in definition order.
        let mut q: Vec<&str> = self
            .names()
            .filter(|n| indeg.get(n).copied() == Some(0))
            .collect();
        q.reverse();
        let mut out: Vec<String> = Vec::with_capacity(self.len());

        while let Some(n) = q.pop() {
            out.push(n.to_string());

            if let Some(children) = dependents.get(n) {
                for (child, count) in children {
                    if let Some(e) = indeg.get_mut(child) {
                        *e = e.saturating_sub(*count);
                        if *e == 0 {
                            q.push(child);
                        }
                    }
                }
            }
        }

        if out.len() != self.len() {
            let remaining: Vec<&str> = self
                .names()
                .filter(|n| indeg.get(n).copied().unwrap_or(0) > 0)
                .collect();
            return Err(Error::CyclicLayers {
                chain: self.find_cycle(&remaining),
            });
        }

        Ok(out)
    }

    /// Walks parent links among `remaining` (presets left over by the topological sort)
    /// until a name repeats.
    fn find_cycle(&self, remaining: &[&str]) -> Vec<String> {
        let Some(start) = remaining.first() else {
            return Vec::new();
        };

        let mut path: Vec<&str> = vec![*start];
        let mut current = *start;
        loop {
            let next = self.get(current).and_then(|d| {
                d.layers
                    .iter()
                    .map(String::as_str)
                    .find(|l| remaining.contains(l))
            });

            let Some(next) = next else {
                return path.into_iter().map(str::to_owned).collect();
            };

            if let Some(pos) = path.iter().position(|p| *p == next) {
                let mut chain: Vec<String> = path[pos..].iter().map(|s| s.to_string()).collect();
                chain.push(next.to_string());
                return chain;
            }

            path.push(next);
            current = next;
        }
    }
}
