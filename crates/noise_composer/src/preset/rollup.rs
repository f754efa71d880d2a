//! Multi-layer inheritance merge for a single preset slot.
//!
//! A preset's own thunk is evaluated first, then its layers are folded in from last-listed to
//! first-listed. Each fold puts the parent underneath the accumulator, so for mappings the
//! earliest layer is the weakest and the preset's own keys are the strongest, and for
//! sequences the earliest layer's steps come first and the preset's own steps come last.
use tracing::trace;

use crate::error::{Error, Result};
use crate::preset::definition::{Slot, SlotValue};
use crate::preset::scope::Scope;
use crate::preset::settings::Settings;

/// Rolls `slot` of preset `name` up through its layer chain.
///
/// `settings` is the preset's rolled-up settings container and is handed to every thunk in
/// the chain, parents included. It is `None` only while the settings slot itself is rolled up.
pub(crate) fn rollup(
    name: &str,
    slot: Slot,
    settings: Option<&mut Settings>,
    scope: &mut Scope<'_>,
) -> Result<SlotValue> {
    let mut chain = Vec::new();
    rollup_layer(name, slot, settings, scope, &mut chain)
}

fn rollup_layer(
    name: &str,
    slot: Slot,
    mut settings: Option<&mut Settings>,
    scope: &mut Scope<'_>,
    chain: &mut Vec<String>,
) -> Result<SlotValue> {
    if chain.iter().any(|n| n == name) {
        let mut cycle = chain.clone();
        cycle.push(name.to_string());
        return Err(Error::CyclicLayers { chain: cycle });
    }

    let store = scope.store();
    let definition = store.require(name)?;
    chain.push(name.to_string());

    let own = match definition.thunk(slot) {
        Some(thunk) => thunk.evaluate(name, slot, settings.as_deref_mut(), scope)?,
        None => slot.default_value(),
    };

    if own.kind() != slot.kind() {
        return Err(Error::TypeMismatch {
            preset: name.to_string(),
            slot: slot.key().to_string(),
            expected: slot.kind().to_string(),
            found: own.kind().to_string(),
        });
    }

    trace!(
        "Rolling up '{}' {} over {} layer(s).",
        name,
        slot,
        definition.layers.len()
    );

    let mut merged = own;
    for layer in definition.layers.iter().rev() {
        if !store.contains(layer) {
            return Err(Error::MissingLayer {
                preset: name.to_string(),
                layer: layer.clone(),
            });
        }

        let parent = rollup_layer(layer, slot, settings.as_deref_mut(), scope, chain)?;
        merged = fold(name, slot, parent, merged)?;
    }

    chain.pop();
    Ok(merged)
}

/// Puts `parent` underneath `child`: child keys win, parent steps run first.
fn fold(name: &str, slot: Slot, parent: SlotValue, child: SlotValue) -> Result<SlotValue> {
    match (parent, child) {
        (SlotValue::Mapping(mut parent), SlotValue::Mapping(child)) => {
            parent.extend(child);
            Ok(SlotValue::Mapping(parent))
        }
        (SlotValue::Sequence(mut parent), SlotValue::Sequence(child)) => {
            parent.extend(child);
            Ok(SlotValue::Sequence(parent))
        }
        (parent, child) => Err(Error::TypeMismatch {
            preset: name.to_string(),
            slot: slot.key().to_string(),
            expected: child.kind().to_string(),
            found: parent.kind().to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;
    use crate::bake::BakeConfig;
    use crate::effect::EffectCatalog;
    use crate::params;
    use crate::pipeline::EffectStep;
    use crate::preset::definition::{PresetDefinition, Thunk};
    use crate::preset::stash::Stash;
    use crate::preset::store::PresetStore;
    use crate::value::Value;

    fn catalog() -> EffectCatalog {
        let mut catalog = EffectCatalog::new();
        for name in ["x", "y", "z"] {
            catalog.register_fn(name, ["amount"], |t, _, _, _, _| Ok(t));
        }
        catalog
    }

    fn roll(
        store: &PresetStore,
        name: &str,
        slot: Slot,
        settings: Option<&mut Settings>,
    ) -> Result<SlotValue> {
        let catalog = catalog();
        let config = BakeConfig::default();
        let mut rng = StdRng::seed_from_u64(0);
        let mut stash = Stash::new();
        let mut scope = Scope::new(store, &catalog, &config, &mut rng, &mut stash);
        rollup(name, slot, settings, &mut scope)
    }

    fn step_names(value: SlotValue) -> Vec<String> {
        value
            .into_sequence()
            .expect("sequence")
            .iter()
            .map(|step| match step {
                EffectStep::Effect(effect) => effect.name().to_string(),
                EffectStep::PresetRef(preset) => preset.name.clone(),
            })
            .collect()
    }

    #[test]
    fn later_layers_override_earlier_ones() {
        let mut store = PresetStore::new();
        store
            .define("a", PresetDefinition::new().settings(|_| Ok(params! { "k" => 1, "a_only" => true })))
            .expect("define a");
        store
            .define("b", PresetDefinition::new().settings(|_| Ok(params! { "k" => 2 })))
            .expect("define b");
        store
            .define("p", PresetDefinition::new().layers(["a", "b"]))
            .expect("define p");

        let merged = roll(&store, "p", Slot::Settings, None)
            .expect("rollup")
            .into_mapping()
            .expect("mapping");
        assert_eq!(merged.get("k"), Some(&Value::Int(2)));
        assert_eq!(merged.get("a_only"), Some(&Value::Bool(true)));
    }

    #[test]
    fn own_settings_override_every_layer() {
        let mut store = PresetStore::new();
        store
            .define("a", PresetDefinition::new().settings(|_| Ok(params! { "k" => 1 })))
            .expect("define a");
        store
            .define("b", PresetDefinition::new().settings(|_| Ok(params! { "k" => 2 })))
            .expect("define b");
        store
            .define(
                "p",
                PresetDefinition::new()
                    .layers(["a", "b"])
                    .settings(|_| Ok(params! { "k" => 3 })),
            )
            .expect("define p");

        let merged = roll(&store, "p", Slot::Settings, None)
            .expect("rollup")
            .into_mapping()
            .expect("mapping");
        assert_eq!(merged.get("k"), Some(&Value::Int(3)));
    }

    #[test]
    fn sequences_concatenate_in_layer_order() {
        let mut store = PresetStore::new();
        for (name, effect) in [("a", "x"), ("b", "y")] {
            store
                .define(
                    name,
                    PresetDefinition::new().post(move |_, scope| {
                        Ok(vec![scope.effect(effect, params! {})?])
                    }),
                )
                .expect("define layer");
        }
        store
            .define(
                "p",
                PresetDefinition::new()
                    .layers(["a", "b"])
                    .post(|_, scope| Ok(vec![scope.effect("z", params! {})?])),
            )
            .expect("define p");

        let mut settings = Settings::default();
        let post = roll(&store, "p", Slot::Post, Some(&mut settings)).expect("rollup");
        assert_eq!(step_names(post), vec!["x", "y", "z"]);
    }

    #[test]
    fn nested_layers_resolve_recursively() {
        let mut store = PresetStore::new();
        store
            .define("base", PresetDefinition::new().settings(|_| Ok(params! { "k" => 0, "depth" => 2 })))
            .expect("define base");
        store
            .define(
                "mid",
                PresetDefinition::new()
                    .layers(["base"])
                    .settings(|_| Ok(params! { "k" => 1 })),
            )
            .expect("define mid");
        store
            .define("top", PresetDefinition::new().layers(["mid"]))
            .expect("define top");

        let merged = roll(&store, "top", Slot::Settings, None)
            .expect("rollup")
            .into_mapping()
            .expect("mapping");
        assert_eq!(merged, params! { "k" => 1, "depth" => 2 });
    }

    #[test]
    fn parent_thunks_read_the_child_settings() {
        let mut store = PresetStore::new();
        store
            .define(
                "parent",
                PresetDefinition::new().generator(|settings, _| {
                    Ok(params! { "freq" => settings.read_as::<i64>("freq")? })
                }),
            )
            .expect("define parent");
        store
            .define("child", PresetDefinition::new().layers(["parent"]))
            .expect("define child");

        let mut settings = Settings::new(params! { "freq" => 7 });
        let generator = roll(&store, "child", Slot::Generator, Some(&mut settings))
            .expect("rollup")
            .into_mapping()
            .expect("mapping");
        assert_eq!(generator.get("freq"), Some(&Value::Int(7)));
        assert!(settings.was_accessed("freq"));
    }

    #[test]
    fn wrong_container_kind_is_a_type_mismatch() {
        let mut store = PresetStore::new();
        store
            .define(
                "bad",
                PresetDefinition::new().with_thunk(
                    Slot::Settings,
                    Thunk::nullary(|_| Ok(Vec::<EffectStep>::new())),
                ),
            )
            .expect("define bad");

        let err = roll(&store, "bad", Slot::Settings, None).expect_err("sequence for settings");
        assert!(matches!(
            err,
            Error::TypeMismatch { ref preset, ref slot, .. } if preset == "bad" && slot == "settings"
        ));
    }

    #[test]
    fn settings_thunk_taking_settings_is_rejected() {
        let mut store = PresetStore::new();
        store
            .define(
                "eager",
                PresetDefinition::new()
                    .with_thunk(Slot::Settings, Thunk::unary(|_, _| Ok(params! {}))),
            )
            .expect("define eager");

        let err = roll(&store, "eager", Slot::Settings, None).expect_err("unary settings thunk");
        matches!(err, Error::TypeMismatch { .. })
            .then_some(())
            .expect("expected TypeMismatch");
    }

    #[test]
    fn missing_layer_names_both_sides() {
        let mut store = PresetStore::new();
        store
            .define("p", PresetDefinition::new().layers(["nonexistent"]))
            .expect("define p");

        let err = roll(&store, "p", Slot::Settings, None).expect_err("missing layer");
        assert!(matches!(
            err,
            Error::MissingLayer { ref preset, ref layer } if preset == "p" && layer == "nonexistent"
        ));
    }

    #[test]
    fn cyclic_layers_fail_cleanly() {
        let mut store = PresetStore::new();
        store
            .define("a", PresetDefinition::new().layers(["b"]))
            .expect("define a");
        store
            .define("b", PresetDefinition::new().layers(["a"]))
            .expect("define b");

        let err = roll(&store, "a", Slot::Settings, None).expect_err("cycle");
        assert!(matches!(err, Error::CyclicLayers { ref chain } if chain == &["a", "b", "a"]));
    }

    #[test]
    fn diamond_layers_are_evaluated_per_path() {
        let mut store = PresetStore::new();
        store
            .define("base", PresetDefinition::new().post(|_, scope| Ok(vec![scope.effect("x", params! {})?])))
            .expect("define base");
        store
            .define("left", PresetDefinition::new().layers(["base"]))
            .expect("define left");
        store
            .define("right", PresetDefinition::new().layers(["base"]))
            .expect("define right");
        store
            .define("top", PresetDefinition::new().layers(["left", "right"]))
            .expect("define top");

        let mut settings = Settings::default();
        let post = roll(&store, "top", Slot::Post, Some(&mut settings)).expect("rollup");
        assert_eq!(step_names(post), vec!["x", "x"]);
    }
}
