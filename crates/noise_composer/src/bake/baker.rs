//! Bake passes: resolve every stored preset and publish the results.
use rand::rngs::StdRng;
use rand::{Rng as RngCore, SeedableRng};
use tracing::{debug, info};

use crate::bake::config::BakeConfig;
use crate::bake::events::{BakeEvent, EventSink};
use crate::bake::registry::Registries;
use crate::effect::EffectCatalog;
use crate::error::Result;
use crate::preset::{PresetStore, ResolvedPreset, Scope, Stash};
use crate::value::Params;

/// Resolves the presets of a store against an effect catalog.
pub struct Baker<'a> {
    /// Bake configuration applied to every pass.
    pub config: BakeConfig,
    /// Definitions to resolve, in bake order.
    pub store: &'a PresetStore,
    /// Effects available to preset thunks.
    pub catalog: &'a EffectCatalog,
}

impl<'a> Baker<'a> {
    pub fn try_new(
        config: BakeConfig,
        store: &'a PresetStore,
        catalog: &'a EffectCatalog,
    ) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            store,
            catalog,
        })
    }

    pub fn new(config: BakeConfig, store: &'a PresetStore, catalog: &'a EffectCatalog) -> Self {
        debug_assert!(
            !config.generator_marker.is_empty(),
            "generator_marker must not be empty"
        );
        debug_assert!(
            !config.effect_marker.is_empty(),
            "effect_marker must not be empty"
        );

        Self {
            config,
            store,
            catalog,
        }
    }

    /// Bakes every preset with a fresh stash, drawing from `rng` in store order.
    pub fn bake(&self, rng: &mut dyn RngCore) -> Result<Registries> {
        let mut stash = Stash::new();
        self.bake_internal(rng, &mut stash, &mut ())
    }

    /// Bakes with a caller-owned stash, so stashed values survive into later passes.
    pub fn bake_with_stash(&self, rng: &mut dyn RngCore, stash: &mut Stash) -> Result<Registries> {
        self.bake_internal(rng, stash, &mut ())
    }

    pub fn bake_with_events(
        &self,
        rng: &mut dyn RngCore,
        sink: &mut dyn EventSink,
    ) -> Result<Registries> {
        let mut stash = Stash::new();
        self.bake_internal(rng, &mut stash, sink)
    }

    /// Bakes from a fresh [`StdRng`] seeded with `seed`.
    pub fn bake_seeded(&self, seed: u64) -> Result<Registries> {
        let mut rng = StdRng::seed_from_u64(seed);
        self.bake(&mut rng)
    }

    /// Resolves a single preset outside a bake pass, applying `overrides` to its settings.
    pub fn resolve(
        &self,
        name: &str,
        overrides: Option<Params>,
        rng: &mut dyn RngCore,
    ) -> Result<ResolvedPreset> {
        let mut stash = Stash::new();
        let mut scope = Scope::new(self.store, self.catalog, &self.config, rng, &mut stash);
        ResolvedPreset::resolve(name, overrides, &mut scope)
    }

    fn bake_internal(
        &self,
        rng: &mut dyn RngCore,
        stash: &mut Stash,
        sink: &mut dyn EventSink,
    ) -> Result<Registries> {
        self.store.validate()?;
        sink.send(BakeEvent::BakeStarted {
            preset_count: self.store.len(),
        });

        let mut registries = Registries::new();
        let mut scope = Scope::new(self.store, self.catalog, &self.config, rng, stash);

        for name in self.store.names() {
            let preset = ResolvedPreset::resolve(name, None, &mut scope)?;
            debug!(
                "Baked preset '{}' (generator: {}, effect: {}).",
                preset.name,
                preset.is_generator(),
                preset.is_effect()
            );
            sink.send(BakeEvent::PresetBaked {
                name: preset.name.clone(),
                is_generator: preset.is_generator(),
                is_effect: preset.is_effect(),
            });
            registries.insert(preset);
        }

        let generators = registries.generators().len();
        let effects = registries.effects().len();
        info!(
            "Baked {} presets: {} generators, {} effects.",
            self.store.len(),
            generators,
            effects
        );
        sink.send(BakeEvent::BakeFinished {
            generators,
            effects,
        });

        Ok(registries)
    }
}

/// Bakes `store` with the default [`BakeConfig`].
pub fn bake_all(
    store: &PresetStore,
    catalog: &EffectCatalog,
    rng: &mut dyn RngCore,
) -> Result<Registries> {
    Baker::new(BakeConfig::default(), store, catalog).bake(rng)
}
