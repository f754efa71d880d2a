//! Effects with a validated set of bound parameters.
use std::fmt;
use std::sync::Arc;

use crate::effect::EffectDescriptor;
use crate::error::{Error, Result};
use crate::tensor::{Shape, Tensor};
use crate::value::{Params, Value};

/// An effect plus the parameters bound to it, ready to run against a tensor.
///
/// Every bound key is a member of the effect's declared parameter set.
#[derive(Clone)]
pub struct BoundEffect {
    descriptor: Arc<EffectDescriptor>,
    params: Params,
}

impl BoundEffect {
    pub(crate) fn new(descriptor: Arc<EffectDescriptor>, params: Params) -> Result<Self> {
        if let Some(param) = params.keys().find(|k| !descriptor.accepts(k)) {
            return Err(Error::InvalidParameter {
                effect: descriptor.name.clone(),
                param: param.clone(),
            });
        }

        Ok(Self { descriptor, params })
    }

    /// Name of the underlying effect.
    pub fn name(&self) -> &str {
        &self.descriptor.name
    }

    pub fn params(&self) -> &Params {
        &self.params
    }

    pub fn param(&self, key: &str) -> Option<&Value> {
        self.params.get(key)
    }

    /// Returns a copy of this effect with `key` rebound to `value`. `self` is left untouched.
    pub fn with_param(&self, key: &str, value: impl Into<Value>) -> Result<Self> {
        let mut params = self.params.clone();
        params.insert(key.to_string(), value.into());
        Self::new(self.descriptor.clone(), params)
    }

    /// Runs the effect with the bound parameters.
    pub fn invoke(&self, tensor: Tensor, shape: Shape, time: f32, speed: f32) -> Result<Tensor> {
        self.descriptor
            .func
            .apply(tensor, shape, time, speed, &self.params)
    }
}

impl PartialEq for BoundEffect {
    fn eq(&self, other: &Self) -> bool {
        self.descriptor.name == other.descriptor.name && self.params == other.params
    }
}

impl fmt::Debug for BoundEffect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BoundEffect")
            .field("name", &self.descriptor.name)
            .field("params", &self.params)
            .finish()
    }
}

impl fmt::Display for BoundEffect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.descriptor.name)?;
        for (i, (k, v)) in self.params.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{k}={v}")?;
        }
        write!(f, ")")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::effect::EffectCatalog;
    use crate::params;

    fn catalog() -> EffectCatalog {
        let mut catalog = EffectCatalog::new();
        catalog.register_fn("refract", ["displacement", "y_from_offset"], |t, _, _, _, _| {
            Ok(t)
        });
        catalog
    }

    #[test]
    fn with_param_leaves_original_untouched() {
        let effect = catalog()
            .bind("refract", params! { "displacement" => 8 })
            .expect("bind succeeds");
        let derived = effect.with_param("displacement", 1.0).expect("declared param");

        assert_eq!(effect.param("displacement"), Some(&Value::Int(8)));
        assert_eq!(derived.param("displacement"), Some(&Value::Float(1.0)));
        assert_ne!(effect, derived);
    }

    #[test]
    fn with_param_validates_key() {
        let effect = catalog()
            .bind("refract", Params::new())
            .expect("bind succeeds");
        assert!(effect.with_param("strength", 1).is_err());
    }

    #[test]
    fn display_lists_params_in_key_order() {
        let effect = catalog()
            .bind(
                "refract",
                params! { "y_from_offset" => false, "displacement" => 0.5 },
            )
            .expect("bind succeeds");
        assert_eq!(
            effect.to_string(),
            "refract(displacement=0.5, y_from_offset=false)"
        );
    }
}
