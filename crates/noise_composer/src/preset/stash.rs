//! Correlation memo shared by the thunks evaluated during one bake pass.
//!
//! A preset's settings thunk can draw a random value once, stash it, and have another
//! thunk of the same preset reuse it instead of drawing again. Keys are not scoped, so
//! callers pick keys unique to their preset.
use std::collections::HashMap;

use tracing::debug;

use crate::error::{Error, Result};
use crate::value::Value;

/// Key/value memo owned by a bake pass, or carried across passes by the caller.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Stash {
    values: HashMap<String, Value>,
}

impl Stash {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `value` under `key` and returns it.
    pub fn put(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Value {
        let key = key.into();
        let value = value.into();
        if let Some(previous) = self.values.insert(key.clone(), value.clone()) {
            if previous != value {
                debug!(
                    "Stash key '{}' overwritten ({} -> {}).",
                    key, previous, value
                );
            }
        }
        value
    }

    /// Returns the value stored under `key`.
    pub fn get(&self, key: &str) -> Result<Value> {
        self.values
            .get(key)
            .cloned()
            .ok_or_else(|| Error::MissingStashKey {
                key: key.to_string(),
            })
    }

    /// Stores and returns `value` when given, otherwise returns the stored value.
    pub fn stash(&mut self, key: &str, value: Option<Value>) -> Result<Value> {
        match value {
            Some(value) => Ok(self.put(key, value)),
            None => self.get(key),
        }
    }

    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn clear(&mut self) {
        self.values.clear();
    }
}
