//! Bake lifecycle: resolve every stored preset once per seed and publish the results.
//!
//! A bake pass validates the store's layer graph, then resolves each definition in store order
//! against one shared random source and one [`crate::preset::Stash`]. The first failing preset
//! aborts the pass, so callers never observe partially filled [`Registries`].
pub mod baker;
pub mod config;
pub mod events;
pub mod registry;

pub use baker::{bake_all, Baker};
pub use config::BakeConfig;
pub use events::{BakeEvent, EventSink, FnSink, VecSink};
pub use registry::Registries;
