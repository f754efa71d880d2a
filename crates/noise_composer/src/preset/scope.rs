//! Context handed to slot thunks while a preset is resolved.
//!
//! A [`Scope`] gives thunks access to the shared random source, the effect catalog, nested
//! preset resolution, and the bake pass [`Stash`]. All random helpers draw from the same
//! source in call order, so a fixed seed yields a fixed configuration.
use std::sync::Arc;

use rand::Rng as RngCore;

use crate::bake::BakeConfig;
use crate::effect::EffectCatalog;
use crate::error::{Error, Result};
use crate::pipeline::EffectStep;
use crate::preset::resolved::ResolvedPreset;
use crate::preset::stash::Stash;
use crate::preset::store::PresetStore;
use crate::value::{Params, Value};

/// Generate a random float in the range [0, 1).
#[inline]
pub(crate) fn rand01(rng: &mut dyn RngCore) -> f64 {
    (rng.next_u64() >> 11) as f64 * (1.0 / (1u64 << 53) as f64)
}

/// Generate a random integer in the inclusive range `[lo, hi]`. Returns `lo` when `hi <= lo`.
#[inline]
pub(crate) fn rand_inclusive(rng: &mut dyn RngCore, lo: i64, hi: i64) -> i64 {
    if hi <= lo {
        return lo;
    }
    let span = (hi as i128 - lo as i128 + 1) as u128;
    let offset = (rng.next_u64() as u128 * span) >> 64;
    (lo as i128 + offset as i128) as i64
}

pub struct Scope<'a> {
    store: &'a PresetStore,
    catalog: &'a EffectCatalog,
    config: &'a BakeConfig,
    rng: &'a mut dyn RngCore,
    stash: &'a mut Stash,
    resolving: Vec<String>,
}

impl<'a> Scope<'a> {
    pub(crate) fn new(
        store: &'a PresetStore,
        catalog: &'a EffectCatalog,
        config: &'a BakeConfig,
        rng: &'a mut dyn RngCore,
        stash: &'a mut Stash,
    ) -> Self {
        Self {
            store,
            catalog,
            config,
            rng,
            stash,
            resolving: Vec::new(),
        }
    }

    pub fn store(&self) -> &'a PresetStore {
        self.store
    }

    pub fn catalog(&self) -> &'a EffectCatalog {
        self.catalog
    }

    pub fn config(&self) -> &'a BakeConfig {
        self.config
    }

    /// The shared random source, for draws the helpers below don't cover.
    pub fn rng(&mut self) -> &mut dyn RngCore {
        &mut *self.rng
    }

    /// Uniform float in `[0, 1)`.
    pub fn random(&mut self) -> f64 {
        rand01(&mut *self.rng)
    }

    /// Uniform integer in the inclusive range `[lo, hi]`.
    pub fn randint(&mut self, lo: i64, hi: i64) -> i64 {
        rand_inclusive(&mut *self.rng, lo, hi)
    }

    pub fn coin_flip(&mut self) -> bool {
        self.randint(0, 1) == 1
    }

    /// Picks one member of `items`. Items are sorted first so the choice depends only on the
    /// random source, never on the order the caller collected them in.
    pub fn random_member<T, I>(&mut self, items: I) -> Result<T>
    where
        T: Ord,
        I: IntoIterator<Item = T>,
    {
        let mut items: Vec<T> = items.into_iter().collect();
        if items.is_empty() {
            return Err(Error::EmptyChoice);
        }
        items.sort();
        let index = self.randint(0, items.len() as i64 - 1) as usize;
        Ok(items.swap_remove(index))
    }

    /// Binds `params` to a catalog effect and wraps it as a pipeline step.
    pub fn effect(&self, name: &str, params: Params) -> Result<EffectStep> {
        self.catalog.bind(name, params).map(EffectStep::Effect)
    }

    /// Resolves another preset in full and wraps it as a pipeline step.
    pub fn preset(&mut self, name: &str) -> Result<EffectStep> {
        let preset = ResolvedPreset::resolve(name, None, self)?;
        Ok(EffectStep::PresetRef(Arc::new(preset)))
    }

    /// Like [`Scope::preset`], but replaces settings of the referenced preset with
    /// `overrides` before its other slots are evaluated.
    pub fn preset_with(&mut self, name: &str, overrides: Params) -> Result<EffectStep> {
        let preset = ResolvedPreset::resolve(name, Some(overrides), self)?;
        Ok(EffectStep::PresetRef(Arc::new(preset)))
    }

    /// Stores `value` under `key` for another thunk of this bake pass, returning it.
    pub fn stash(&mut self, key: &str, value: impl Into<Value>) -> Value {
        self.stash.put(key, value)
    }

    /// Recalls a value stored with [`Scope::stash`].
    pub fn stashed(&self, key: &str) -> Result<Value> {
        self.stash.get(key)
    }

    /// Marks `name` as being resolved, failing if it already is further up the call chain.
    pub(crate) fn enter(&mut self, name: &str) -> Result<()> {
        if self.resolving.iter().any(|n| n == name) {
            let mut chain = self.resolving.clone();
            chain.push(name.to_string());
            return Err(Error::CyclicLayers { chain });
        }
        self.resolving.push(name.to_string());
        Ok(())
    }

    pub(crate) fn exit(&mut self) {
        self.resolving.pop();
    }
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;

    struct FixedRng {
        value: u64,
    }

    impl rand::TryRng for FixedRng {
        type Error = std::convert::Infallible;

        fn try_next_u32(&mut self) -> std::result::Result<u32, Self::Error> {
            Ok((self.value >> 32) as u32)
        }

        fn try_next_u64(&mut self) -> std::result::Result<u64, Self::Error> {
            Ok(self.value)
        }

        fn try_fill_bytes(&mut self, dest: &mut [u8]) -> std::result::Result<(), Self::Error> {
            let bytes = self.value.to_le_bytes();
            for (i, b) in dest.iter_mut().enumerate() {
                *b = bytes[i % 8];
            }
            Ok(())
        }
    }

    fn with_scope<R>(rng: &mut dyn RngCore, f: impl FnOnce(&mut Scope<'_>) -> R) -> R {
        let store = PresetStore::new();
        let catalog = EffectCatalog::new();
        let config = BakeConfig::default();
        let mut stash = Stash::new();
        let mut scope = Scope::new(&store, &catalog, &config, rng, &mut stash);
        f(&mut scope)
    }

    #[test]
    fn rand01_stays_in_unit_range() {
        for value in [0, 1, u64::MAX / 2, u64::MAX - 1, u64::MAX] {
            let mut rng = FixedRng { value };
            let v = rand01(&mut rng);
            assert!((0.0..1.0).contains(&v), "rand01({value}) = {v}");
        }
    }

    #[test]
    fn rand_inclusive_hits_both_ends() {
        let mut low = FixedRng { value: 0 };
        let mut high = FixedRng { value: u64::MAX };
        assert_eq!(rand_inclusive(&mut low, 3, 5), 3);
        assert_eq!(rand_inclusive(&mut high, 3, 5), 5);
        assert_eq!(rand_inclusive(&mut high, 7, 7), 7);
        assert_eq!(rand_inclusive(&mut high, 9, 2), 9);
    }

    #[test]
    fn randint_stays_within_bounds() {
        let mut rng = StdRng::seed_from_u64(7);
        with_scope(&mut rng, |scope| {
            for _ in 0..200 {
                let v = scope.randint(-2, 2);
                assert!((-2..=2).contains(&v));
            }
        });
    }

    #[test]
    fn random_member_ignores_input_order() {
        let pick = |items: Vec<&'static str>| {
            let mut rng = StdRng::seed_from_u64(11);
            with_scope(&mut rng, |scope| scope.random_member(items).expect("non-empty"))
        };

        assert_eq!(
            pick(vec!["neon", "ash", "lava", "moss"]),
            pick(vec!["moss", "lava", "neon", "ash"])
        );
    }

    #[test]
    fn random_member_of_empty_collection_fails() {
        let mut rng = StdRng::seed_from_u64(1);
        let err = with_scope(&mut rng, |scope| {
            scope
                .random_member(Vec::<i64>::new())
                .expect_err("empty collection")
        });
        assert!(matches!(err, Error::EmptyChoice));
    }

    #[test]
    fn same_seed_same_draws() {
        let draws = |seed| {
            let mut rng = StdRng::seed_from_u64(seed);
            with_scope(&mut rng, |scope| {
                (scope.random(), scope.randint(0, 100), scope.coin_flip())
            })
        };
        assert_eq!(draws(42), draws(42));
    }

    #[test]
    fn stash_round_trips_within_scope() {
        let mut rng = StdRng::seed_from_u64(1);
        with_scope(&mut rng, |scope| {
            let drawn = scope.randint(0, 26);
            scope.stash("mask", drawn);
            assert_eq!(scope.stashed("mask").expect("stashed"), Value::Int(drawn));
            assert!(scope.stashed("other").is_err());
        });
    }

    #[test]
    fn enter_detects_reentry() {
        let mut rng = StdRng::seed_from_u64(1);
        with_scope(&mut rng, |scope| {
            scope.enter("a").expect("first entry");
            scope.enter("b").expect("second entry");
            let err = scope.enter("a").expect_err("re-entry");
            assert!(matches!(err, Error::CyclicLayers { ref chain } if chain == &["a", "b", "a"]));
            scope.exit();
            scope.exit();
            scope.enter("a").expect("entry after exit");
        });
    }
}
