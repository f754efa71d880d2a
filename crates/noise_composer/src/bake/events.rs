//! Event types and sinks for observing bake passes.
//!
//! This module defines [`BakeEvent`] and a set of sinks to emit or collect events while
//! [`crate::bake::Baker::bake_with_events`] resolves a preset store.

/// Describes events emitted by a bake pass.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BakeEvent {
    /// Emitted after the store validated, before the first preset resolves.
    BakeStarted {
        /// Number of presets that will be resolved.
        preset_count: usize,
    },

    /// Emitted after a preset resolved and passed the unused-settings check.
    PresetBaked {
        name: String,
        is_generator: bool,
        is_effect: bool,
    },

    /// Emitted once every preset has been baked.
    BakeFinished {
        /// Number of presets in the generator registry.
        generators: usize,
        /// Number of presets in the effect registry.
        effects: usize,
    },
}

/// A generic event sink that accepts [`BakeEvent`]s.
pub trait EventSink {
    fn send(&mut self, event: BakeEvent);
}

/// A no-op event sink.
impl EventSink for () {
    #[inline]
    fn send(&mut self, _event: BakeEvent) {}
}

/// An event sink that forwards to a user-provided closure.
pub struct FnSink<F>
where
    F: FnMut(BakeEvent),
{
    f: F,
}

impl<F> FnSink<F>
where
    F: FnMut(BakeEvent),
{
    pub fn new(f: F) -> Self {
        Self { f }
    }
}

impl<F> EventSink for FnSink<F>
where
    F: FnMut(BakeEvent),
{
    #[inline]
    fn send(&mut self, event: BakeEvent) {
        (self.f)(event);
    }
}

/// An event sink that collects all events in a `Vec`.
#[derive(Debug, Default)]
pub struct VecSink {
    events: Vec<BakeEvent>,
}

impl VecSink {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn into_inner(self) -> Vec<BakeEvent> {
        self.events
    }

    pub fn as_slice(&self) -> &[BakeEvent] {
        &self.events
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

impl EventSink for VecSink {
    #[inline]
    fn send(&mut self, event: BakeEvent) {
        self.events.push(event);
    }
}
