//! Raw preset definitions: parent layers plus up to four deferred slot thunks.
//!
//! A [`PresetDefinition`] never holds evaluated random values. Every slot is a [`Thunk`] that
//! the resolver evaluates at bake time, so the order in which presets draw from the shared
//! random source is controlled by the bake, not by the order definitions were written in.
use std::fmt;
use std::sync::Arc;

use crate::error::{Error, Result};
use crate::pipeline::EffectStep;
use crate::preset::scope::Scope;
use crate::preset::settings::Settings;
use crate::value::Params;

/// Key naming the parent layer list in raw definitions.
pub const LAYERS_KEY: &str = "layers";

/// Every top-level key a raw definition may use.
pub const ALLOWED_KEYS: [&str; 5] = [LAYERS_KEY, "settings", "generator", "octaves", "post"];

/// One of the four configuration slots of a preset.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Slot {
    Settings,
    Generator,
    Octaves,
    Post,
}

impl Slot {
    /// Slots in the order the resolver evaluates them.
    pub const ALL: [Slot; 4] = [Slot::Settings, Slot::Generator, Slot::Octaves, Slot::Post];

    /// Raw definition key for this slot.
    pub fn key(&self) -> &'static str {
        match self {
            Slot::Settings => "settings",
            Slot::Generator => "generator",
            Slot::Octaves => "octaves",
            Slot::Post => "post",
        }
    }

    pub fn from_key(key: &str) -> Option<Slot> {
        Slot::ALL.into_iter().find(|s| s.key() == key)
    }

    /// Container kind the slot resolves to.
    pub fn kind(&self) -> SlotKind {
        match self {
            Slot::Settings | Slot::Generator => SlotKind::Mapping,
            Slot::Octaves | Slot::Post => SlotKind::Sequence,
        }
    }

    /// Value used when a preset leaves the slot undefined.
    pub fn default_value(&self) -> SlotValue {
        match self.kind() {
            SlotKind::Mapping => SlotValue::Mapping(Params::new()),
            SlotKind::Sequence => SlotValue::Sequence(Vec::new()),
        }
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Container kind of a slot value.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SlotKind {
    Mapping,
    Sequence,
}

impl fmt::Display for SlotKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SlotKind::Mapping => f.write_str("mapping"),
            SlotKind::Sequence => f.write_str("sequence"),
        }
    }
}

/// An evaluated slot: a parameter mapping or an effect sequence.
#[derive(Clone, Debug, PartialEq)]
pub enum SlotValue {
    Mapping(Params),
    Sequence(Vec<EffectStep>),
}

impl SlotValue {
    pub fn kind(&self) -> SlotKind {
        match self {
            SlotValue::Mapping(_) => SlotKind::Mapping,
            SlotValue::Sequence(_) => SlotKind::Sequence,
        }
    }

    pub fn into_mapping(self) -> Option<Params> {
        match self {
            SlotValue::Mapping(params) => Some(params),
            SlotValue::Sequence(_) => None,
        }
    }

    pub fn into_sequence(self) -> Option<Vec<EffectStep>> {
        match self {
            SlotValue::Sequence(steps) => Some(steps),
            SlotValue::Mapping(_) => None,
        }
    }
}

impl From<Params> for SlotValue {
    fn from(value: Params) -> Self {
        SlotValue::Mapping(value)
    }
}

impl From<Vec<EffectStep>> for SlotValue {
    fn from(value: Vec<EffectStep>) -> Self {
        SlotValue::Sequence(value)
    }
}

type NullaryFn = dyn Fn(&mut Scope<'_>) -> Result<SlotValue> + Send + Sync;
type UnaryFn = dyn Fn(&mut Settings, &mut Scope<'_>) -> Result<SlotValue> + Send + Sync;

/// A slot value pending evaluation.
#[derive(Clone)]
pub enum Thunk {
    /// Closure taking no settings. The only form accepted by the settings slot.
    Nullary(Arc<NullaryFn>),
    /// Closure reading from the preset's rolled-up settings.
    Unary(Arc<UnaryFn>),
}

impl Thunk {
    pub fn nullary<F, T>(f: F) -> Self
    where
        F: Fn(&mut Scope<'_>) -> Result<T> + Send + Sync + 'static,
        T: Into<SlotValue>,
    {
        Thunk::Nullary(Arc::new(move |scope: &mut Scope<'_>| f(scope).map(Into::into)))
    }

    pub fn unary<F, T>(f: F) -> Self
    where
        F: Fn(&mut Settings, &mut Scope<'_>) -> Result<T> + Send + Sync + 'static,
        T: Into<SlotValue>,
    {
        Thunk::Unary(Arc::new(
            move |settings: &mut Settings, scope: &mut Scope<'_>| {
                f(settings, scope).map(Into::into)
            },
        ))
    }

    fn describe(&self) -> &'static str {
        match self {
            Thunk::Nullary(_) => "thunk taking no arguments",
            Thunk::Unary(_) => "thunk taking settings",
        }
    }

    /// Evaluates the thunk. `settings` is `None` only while resolving the settings slot itself.
    pub(crate) fn evaluate(
        &self,
        preset: &str,
        slot: Slot,
        settings: Option<&mut Settings>,
        scope: &mut Scope<'_>,
    ) -> Result<SlotValue> {
        match (self, settings) {
            (Thunk::Nullary(f), _) => f(scope),
            (Thunk::Unary(f), Some(settings)) => f(settings, scope),
            (Thunk::Unary(_), None) => Err(Error::TypeMismatch {
                preset: preset.to_string(),
                slot: slot.key().to_string(),
                expected: "thunk taking no arguments".to_string(),
                found: self.describe().to_string(),
            }),
        }
    }
}

impl fmt::Debug for Thunk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Thunk::Nullary(_) => f.write_str("Nullary(..)"),
            Thunk::Unary(_) => f.write_str("Unary(..)"),
        }
    }
}

/// A raw entry keyed by string, as found in loosely typed preset sources.
#[derive(Clone, Debug)]
pub enum DefinitionEntry {
    Layers(Vec<String>),
    Thunk(Thunk),
}

/// A named preset's raw definition.
#[derive(Clone, Debug, Default)]
pub struct PresetDefinition {
    pub layers: Vec<String>,
    pub settings: Option<Thunk>,
    pub generator: Option<Thunk>,
    pub octaves: Option<Thunk>,
    pub post: Option<Thunk>,
}

impl PresetDefinition {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parent layers, weakest first.
    pub fn layers<I, S>(mut self, layers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.layers = layers.into_iter().map(Into::into).collect();
        self
    }

    /// Thunk producing this preset's own settings mapping.
    pub fn settings<F, T>(mut self, f: F) -> Self
    where
        F: Fn(&mut Scope<'_>) -> Result<T> + Send + Sync + 'static,
        T: Into<SlotValue>,
    {
        self.settings = Some(Thunk::nullary(f));
        self
    }

    /// Thunk producing generator parameters from the rolled-up settings.
    pub fn generator<F, T>(mut self, f: F) -> Self
    where
        F: Fn(&mut Settings, &mut Scope<'_>) -> Result<T> + Send + Sync + 'static,
        T: Into<SlotValue>,
    {
        self.generator = Some(Thunk::unary(f));
        self
    }

    /// Thunk producing the per-octave effect sequence.
    pub fn octaves<F, T>(mut self, f: F) -> Self
    where
        F: Fn(&mut Settings, &mut Scope<'_>) -> Result<T> + Send + Sync + 'static,
        T: Into<SlotValue>,
    {
        self.octaves = Some(Thunk::unary(f));
        self
    }

    /// Thunk producing the post-reduction effect sequence.
    pub fn post<F, T>(mut self, f: F) -> Self
    where
        F: Fn(&mut Settings, &mut Scope<'_>) -> Result<T> + Send + Sync + 'static,
        T: Into<SlotValue>,
    {
        self.post = Some(Thunk::unary(f));
        self
    }

    /// Sets a slot to an arbitrary [`Thunk`].
    pub fn with_thunk(mut self, slot: Slot, thunk: Thunk) -> Self {
        *self.slot_mut(slot) = Some(thunk);
        self
    }

    /// Builds a definition from string-keyed entries, rejecting keys outside [`ALLOWED_KEYS`].
    pub fn from_entries<I, K>(preset: &str, entries: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, DefinitionEntry)>,
        K: AsRef<str>,
    {
        let mut definition = PresetDefinition::new();

        for (key, entry) in entries {
            let key = key.as_ref();
            match (key, entry) {
                (LAYERS_KEY, DefinitionEntry::Layers(layers)) => definition.layers = layers,
                (LAYERS_KEY, DefinitionEntry::Thunk(thunk)) => {
                    return Err(Error::TypeMismatch {
                        preset: preset.to_string(),
                        slot: LAYERS_KEY.to_string(),
                        expected: "list of layer names".to_string(),
                        found: thunk.describe().to_string(),
                    });
                }
                (key, entry) => {
                    let slot = Slot::from_key(key).ok_or_else(|| Error::InvalidKey {
                        preset: preset.to_string(),
                        key: key.to_string(),
                    })?;
                    match entry {
                        DefinitionEntry::Thunk(thunk) => *definition.slot_mut(slot) = Some(thunk),
                        DefinitionEntry::Layers(_) => {
                            return Err(Error::TypeMismatch {
                                preset: preset.to_string(),
                                slot: key.to_string(),
                                expected: "deferred slot value".to_string(),
                                found: "list of layer names".to_string(),
                            });
                        }
                    }
                }
            }
        }

        Ok(definition)
    }

    /// Returns the thunk stored for `slot`, if any.
    pub fn thunk(&self, slot: Slot) -> Option<&Thunk> {
        match slot {
            Slot::Settings => self.settings.as_ref(),
            Slot::Generator => self.generator.as_ref(),
            Slot::Octaves => self.octaves.as_ref(),
            Slot::Post => self.post.as_ref(),
        }
    }

    fn slot_mut(&mut self, slot: Slot) -> &mut Option<Thunk> {
        match slot {
            Slot::Settings => &mut self.settings,
            Slot::Generator => &mut self.generator,
            Slot::Octaves => &mut self.octaves,
            Slot::Post => &mut self.post,
        }
    }
}
