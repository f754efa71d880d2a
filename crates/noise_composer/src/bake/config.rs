use std::collections::BTreeSet;

use crate::error::{Error, Result};

/// Settings keys that may go unread without failing the bake.
pub const DEFAULT_UNUSED_OK: [&str; 2] = ["speed", "palette_name"];

/// Setting that makes a preset generator-capable when truthy.
pub const DEFAULT_GENERATOR_MARKER: &str = "voronoi_diagram_type";

/// Setting that makes a generator preset effect-capable as well when truthy.
pub const DEFAULT_EFFECT_MARKER: &str = "voronoi_refract";

/// Configuration for baking presets.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq)]
pub struct BakeConfig {
    /// Settings keys exempt from the unused-key check.
    pub unused_ok: BTreeSet<String>,
    /// Setting that marks a preset as a generator.
    pub generator_marker: String,
    /// Setting that marks a generator preset as an effect too.
    pub effect_marker: String,
}

impl Default for BakeConfig {
    fn default() -> Self {
        Self {
            unused_ok: DEFAULT_UNUSED_OK.iter().map(|k| k.to_string()).collect(),
            generator_marker: DEFAULT_GENERATOR_MARKER.to_string(),
            effect_marker: DEFAULT_EFFECT_MARKER.to_string(),
        }
    }
}

impl BakeConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the unused-key allowlist.
    pub fn with_unused_ok<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.unused_ok = keys.into_iter().map(Into::into).collect();
        self
    }

    /// Adds one key to the unused-key allowlist.
    pub fn allow_unused(mut self, key: impl Into<String>) -> Self {
        self.unused_ok.insert(key.into());
        self
    }

    pub fn with_generator_marker(mut self, key: impl Into<String>) -> Self {
        self.generator_marker = key.into();
        self
    }

    pub fn with_effect_marker(mut self, key: impl Into<String>) -> Self {
        self.effect_marker = key.into();
        self
    }

    /// Validates the configuration, returning an error if invalid.
    pub fn validate(&self) -> Result<()> {
        if self.generator_marker.is_empty() {
            return Err(Error::InvalidConfig(
                "generator_marker must not be empty".into(),
            ));
        }
        if self.effect_marker.is_empty() {
            return Err(Error::InvalidConfig("effect_marker must not be empty".into()));
        }

        Ok(())
    }
}
