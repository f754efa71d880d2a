//! Error types and result alias for the crate.
//!
//! This module defines [`enum@crate::error::Error`] and the crate-wide [Result] alias. Variants cover
//! preset lookup, raw definition validation, rollup failures, unused settings, effect binding,
//! stash lookups, configuration, and document parsing.
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[non_exhaustive]
#[derive(Debug, Error)]
pub enum Error {
    #[error("preset \"{name}\" was not found among the available presets")]
    UnknownPreset { name: String },

    #[error("preset \"{name}\" is already defined")]
    DuplicatePreset { name: String },

    #[error("not sure what to do with key \"{key}\" in preset \"{preset}\". Typo?")]
    InvalidKey { preset: String, key: String },

    #[error("preset \"{preset}\"'s parent named \"{layer}\" was not found among the available presets")]
    MissingLayer { preset: String, layer: String },

    #[error("preset \"{preset}\" key \"{slot}\" is a {found}, but we were expecting a {expected}")]
    TypeMismatch {
        preset: String,
        slot: String,
        expected: String,
        found: String,
    },

    #[error("{}", unused_keys_message(.keys))]
    UnusedSettingsKeys { keys: Vec<String> },

    #[error("settings key \"{key}\" is not defined")]
    UnknownSetting { key: String },

    #[error("value for \"{key}\" should be {expected}")]
    InvalidValue { key: String, expected: String },

    #[error("\"{name}\" is not a registered effect name")]
    UnknownEffect { name: String },

    #[error("effect \"{effect}\" does not accept a parameter named \"{param}\"")]
    InvalidParameter { effect: String, param: String },

    #[error("preset layers form a cycle: {}", .chain.join(" -> "))]
    CyclicLayers { chain: Vec<String> },

    #[error("nothing stashed under \"{key}\"")]
    MissingStashKey { key: String },

    #[error("cannot choose a random member from an empty collection")]
    EmptyChoice,

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("preset \"{preset}\": {source}")]
    Preset {
        preset: String,
        #[source]
        source: Box<Error>,
    },

    #[error("preset document parse error: {0}")]
    Parse(String),

    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Wraps `self` with the name of the preset being resolved.
    pub fn in_preset(self, preset: impl Into<String>) -> Self {
        Error::Preset {
            preset: preset.into(),
            source: Box::new(self),
        }
    }

    /// Returns the innermost error, skipping any [`Error::Preset`] wrappers.
    pub fn root(&self) -> &Error {
        match self {
            Error::Preset { source, .. } => source.root(),
            other => other,
        }
    }
}

fn unused_keys_message(keys: &[String]) -> String {
    match keys {
        [key] => format!("settings key \"{key}\" is unused. This is usually human error."),
        _ => format!(
            "settings keys {:?} are unused. This is usually human error.",
            keys
        ),
    }
}

impl From<String> for Error {
    fn from(value: String) -> Self {
        Error::Other(value)
    }
}

impl From<&str> for Error {
    fn from(value: &str) -> Self {
        Error::Other(value.to_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_string_uses_other_variant() {
        let err: Error = String::from("boom").into();
        matches!(err, Error::Other(_))
            .then_some(())
            .expect("expected Other variant");
    }

    #[test]
    fn unused_keys_message_has_singular_and_plural_forms() {
        let one = Error::UnusedSettingsKeys {
            keys: vec!["foo".into()],
        };
        assert_eq!(
            one.to_string(),
            "settings key \"foo\" is unused. This is usually human error."
        );

        let many = Error::UnusedSettingsKeys {
            keys: vec!["bar".into(), "foo".into()],
        };
        assert!(many.to_string().starts_with("settings keys [\"bar\", \"foo\"]"));
    }

    #[test]
    fn preset_wrapper_prefixes_name_and_exposes_root() {
        let err = Error::UnusedSettingsKeys {
            keys: vec!["foo".into()],
        }
        .in_preset("outer")
        .in_preset("outermost");

        assert!(err.to_string().starts_with("preset \"outermost\": preset \"outer\":"));
        assert!(matches!(err.root(), Error::UnusedSettingsKeys { keys } if keys == &["foo"]));
    }

    #[test]
    fn cycle_message_lists_chain() {
        let err = Error::CyclicLayers {
            chain: vec!["a".into(), "b".into(), "a".into()],
        };
        assert_eq!(err.to_string(), "preset layers form a cycle: a -> b -> a");
    }
}
