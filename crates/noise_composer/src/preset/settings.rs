//! Access-tracked settings container.
//!
//! Every successful [`Settings::read`] is recorded. Once all slots of a preset have been
//! resolved, [`Settings::assert_fully_consumed`] fails if any key was never read, catching keys
//! that are spelled differently where they are defined and where they are used.
use std::collections::BTreeSet;

use crate::error::{Error, Result};
use crate::value::{FromValue, Params, Value};

/// Rolled-up settings mapping that records which keys were read.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Settings {
    values: Params,
    accessed: BTreeSet<String>,
}

impl Settings {
    pub fn new(values: Params) -> Self {
        Self {
            values,
            accessed: BTreeSet::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    /// Reads `key`, recording the access. Missing keys fail with [`Error::UnknownSetting`].
    pub fn read(&mut self, key: &str) -> Result<&Value> {
        match self.values.get(key) {
            Some(value) => {
                if !self.accessed.contains(key) {
                    self.accessed.insert(key.to_string());
                }
                Ok(value)
            }
            None => Err(Error::UnknownSetting {
                key: key.to_string(),
            }),
        }
    }

    /// Reads `key` and converts it to `T`.
    pub fn read_as<T: FromValue>(&mut self, key: &str) -> Result<T> {
        self.read(key)?.expect_as(key)
    }

    /// Looks at `key` without recording an access.
    pub fn peek(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    /// Inserts caller-supplied overrides. Overridden keys count as present, not as read.
    pub fn apply_overrides(&mut self, overrides: Params) {
        self.values.extend(overrides);
    }

    pub fn was_accessed(&self, key: &str) -> bool {
        self.accessed.contains(key)
    }

    /// Keys never read and not exempted by `allowlist`, in sorted order.
    pub fn unaccessed<'a>(&'a self, allowlist: &'a BTreeSet<String>) -> Vec<&'a str> {
        self.values
            .keys()
            .filter(|k| !self.accessed.contains(*k) && !allowlist.contains(*k))
            .map(String::as_str)
            .collect()
    }

    /// Fails with [`Error::UnusedSettingsKeys`] if any key outside `allowlist` was never read.
    pub fn assert_fully_consumed(&self, allowlist: &BTreeSet<String>) -> Result<()> {
        let keys = self.unaccessed(allowlist);
        if keys.is_empty() {
            return Ok(());
        }

        Err(Error::UnusedSettingsKeys {
            keys: keys.into_iter().map(str::to_owned).collect(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params;

    fn allow(keys: &[&str]) -> BTreeSet<String> {
        keys.iter().map(|k| k.to_string()).collect()
    }

    #[test]
    fn read_records_access() {
        let mut settings = Settings::new(params! { "alpha" => 0.5, "beta" => 1 });
        assert!(!settings.was_accessed("alpha"));

        assert_eq!(settings.read("alpha").expect("present"), &Value::Float(0.5));
        assert!(settings.was_accessed("alpha"));
        assert!(!settings.was_accessed("beta"));
    }

    #[test]
    fn read_missing_key_fails_without_recording() {
        let mut settings = Settings::new(params! {});
        let err = settings.read("ghost").expect_err("missing key");
        assert!(matches!(err, Error::UnknownSetting { ref key } if key == "ghost"));
        assert!(!settings.was_accessed("ghost"));
    }

    #[test]
    fn peek_does_not_record_access() {
        let mut settings = Settings::new(params! { "alpha" => 0.5 });
        assert!(settings.peek("alpha").is_some());
        assert!(!settings.was_accessed("alpha"));
        assert_eq!(settings.unaccessed(&BTreeSet::new()), vec!["alpha"]);

        settings.read("alpha").expect("present");
        assert!(settings.unaccessed(&BTreeSet::new()).is_empty());
    }

    #[test]
    fn read_as_converts_and_tracks() {
        let mut settings = Settings::new(params! { "levels" => 3, "name" => "neon" });
        assert_eq!(settings.read_as::<i64>("levels").expect("int"), 3);
        assert_eq!(settings.read_as::<f64>("levels").expect("widens"), 3.0);
        assert!(settings.read_as::<bool>("name").is_err());
        assert!(settings.was_accessed("name"));
    }

    #[test]
    fn assert_fully_consumed_names_unused_keys() {
        let mut settings = Settings::new(params! { "foo" => 1, "bar" => 2, "speed" => 1.0 });
        settings.read("bar").expect("present");

        let err = settings
            .assert_fully_consumed(&allow(&["speed"]))
            .expect_err("foo unused");
        assert!(matches!(err, Error::UnusedSettingsKeys { ref keys } if keys == &["foo"]));

        settings.read("foo").expect("present");
        settings
            .assert_fully_consumed(&allow(&["speed"]))
            .expect("everything consumed");
    }

    #[test]
    fn allowlist_exempts_keys() {
        let settings = Settings::new(params! { "foo" => 1 });
        settings
            .assert_fully_consumed(&allow(&["foo"]))
            .expect("foo is allowed to be unused");
    }

    #[test]
    fn overrides_are_present_but_unread() {
        let mut settings = Settings::new(params! { "alpha" => 0.5 });
        settings.apply_overrides(params! { "alpha" => 0.9, "extra" => true });

        assert_eq!(settings.peek("alpha"), Some(&Value::Float(0.9)));
        assert!(settings.contains_key("extra"));
        assert_eq!(settings.unaccessed(&BTreeSet::new()), vec!["alpha", "extra"]);
    }

    #[test]
    fn empty_settings_are_trivially_consumed() {
        Settings::default()
            .assert_fully_consumed(&BTreeSet::new())
            .expect("nothing to consume");
    }
}
