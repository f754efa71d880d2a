//! Effect functions and the catalog that binds them to validated parameters.
//!
//! This module defines how external image effects plug into preset composition:
//! - Define custom effects by implementing [`EffectFn`] (closures implement it too).
//! - Register them with a declared parameter-name set in an [`EffectCatalog`].
//! - Bind parameters with [`EffectCatalog::bind`] to get a [`BoundEffect`].
use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::sync::Arc;

use tracing::debug;

use crate::error::{Error, Result};
use crate::tensor::{Shape, Tensor};
use crate::value::Params;

pub mod bound;

pub use bound::BoundEffect;

/// Trait for tensor transforms invoked by the effect pipeline.
///
/// `params` holds only the values bound for this invocation; implementors fall back to
/// their own defaults for anything missing.
pub trait EffectFn: Send + Sync {
    fn apply(
        &self,
        tensor: Tensor,
        shape: Shape,
        time: f32,
        speed: f32,
        params: &Params,
    ) -> Result<Tensor>;
}

impl<F> EffectFn for F
where
    F: Fn(Tensor, Shape, f32, f32, &Params) -> Result<Tensor> + Send + Sync,
{
    #[inline]
    fn apply(
        &self,
        tensor: Tensor,
        shape: Shape,
        time: f32,
        speed: f32,
        params: &Params,
    ) -> Result<Tensor> {
        self(tensor, shape, time, speed, params)
    }
}

/// A registered effect: its name, accepted parameter names, and implementation.
pub struct EffectDescriptor {
    pub name: String,
    pub params: BTreeSet<String>,
    pub func: Arc<dyn EffectFn>,
}

impl EffectDescriptor {
    /// Returns `true` if the effect declares a parameter named `param`.
    pub fn accepts(&self, param: &str) -> bool {
        self.params.contains(param)
    }
}

impl fmt::Debug for EffectDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EffectDescriptor")
            .field("name", &self.name)
            .field("params", &self.params)
            .finish_non_exhaustive()
    }
}

/// Registry of effects keyed by unique name.
#[non_exhaustive]
#[derive(Default)]
pub struct EffectCatalog {
    effects: HashMap<String, Arc<EffectDescriptor>>,
}

impl EffectCatalog {
    /// Creates a new, empty [`EffectCatalog`].
    pub fn new() -> Self {
        Self {
            effects: HashMap::new(),
        }
    }

    pub fn with_capacity(n: usize) -> Self {
        Self {
            effects: HashMap::with_capacity(n),
        }
    }

    /// Returns the number of registered effects.
    pub fn len(&self) -> usize {
        self.effects.len()
    }

    /// Returns `true` if there are no registered effects.
    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }

    /// Registers an effect implementation under `name`, replacing any previous entry.
    pub fn register<T, I, S>(&mut self, name: impl Into<String>, params: I, effect: T)
    where
        T: EffectFn + 'static,
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.register_arc(name, params, Arc::new(effect));
    }

    /// Registers a closure as an effect. Same as [`EffectCatalog::register`], but lets the
    /// compiler infer the closure's argument types.
    pub fn register_fn<F, I, S>(&mut self, name: impl Into<String>, params: I, f: F)
    where
        F: Fn(Tensor, Shape, f32, f32, &Params) -> Result<Tensor> + Send + Sync + 'static,
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.register_arc(name, params, Arc::new(f));
    }

    /// Registers an effect using an [`Arc`].
    pub fn register_arc<I, S>(
        &mut self,
        name: impl Into<String>,
        params: I,
        func: Arc<dyn EffectFn + 'static>,
    ) where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let name = name.into();
        let params: BTreeSet<String> = params.into_iter().map(Into::into).collect();
        debug!("Registering effect '{}' with params {:?}.", name, params);
        self.effects.insert(
            name.clone(),
            Arc::new(EffectDescriptor { name, params, func }),
        );
    }

    /// Checks if an effect with the given name exists.
    pub fn contains(&self, name: &str) -> bool {
        self.effects.contains_key(name)
    }

    /// Retrieves an effect descriptor by name.
    pub fn get(&self, name: &str) -> Option<&Arc<EffectDescriptor>> {
        self.effects.get(name)
    }

    /// Registered effect names in sorted order.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.effects.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Binds `params` to the named effect.
    ///
    /// Fails with [`Error::UnknownEffect`] for unregistered names and with
    /// [`Error::InvalidParameter`] for any key the effect does not declare.
    pub fn bind(&self, name: &str, params: Params) -> Result<BoundEffect> {
        let descriptor = self.effects.get(name).ok_or_else(|| Error::UnknownEffect {
            name: name.to_string(),
        })?;

        BoundEffect::new(descriptor.clone(), params)
    }
}
