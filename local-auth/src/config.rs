//! Environment variable access for settings loading.
//!
//! Settings never read `std::env` directly. The process environment is captured
//! once into an [`EnvVars`] snapshot and every field is resolved against it, so
//! a settings value always reflects a single consistent view of the environment.
//!
//! # Alias lists
//!
//! A field may be bound to several variable names. They are checked in order
//! and the first one holding a non-empty value wins. An empty value behaves
//! exactly like an unset one.
//!
//! # Invariants
//!
//! - A snapshot is immutable once built
//! - Lookups never return empty strings

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// Error returned when an environment value cannot be used.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// An environment variable is set but its value is not valid for the field.
    #[error("invalid value for {name}: {message}")]
    InvalidValue { name: String, message: String },
}

/// Immutable snapshot of environment variables.
///
/// `Debug` lists variable names only, since values routinely hold secrets.
#[derive(Clone, Default)]
pub struct EnvVars {
    vars: HashMap<String, String>,
}

impl EnvVars {
    /// Capture the current process environment.
    ///
    /// Variables whose name or value is not valid unicode are skipped.
    #[must_use]
    pub fn from_process() -> Self {
        std::env::vars_os()
            .filter_map(|(name, value)| Some((name.into_string().ok()?, value.into_string().ok()?)))
            .collect()
    }

    /// Look up a single variable, treating an empty value as unset.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.vars
            .get(name)
            .map(String::as_str)
            .filter(|value| !value.is_empty())
    }

    /// Resolve an alias list: the first name with a non-empty value wins.
    ///
    /// Returns the winning name together with its value.
    #[must_use]
    pub fn first_of<'a>(&self, names: &[&'a str]) -> Option<(&'a str, &str)> {
        names
            .iter()
            .find_map(|name| self.get(name).map(|value| (*name, value)))
    }

    /// Resolve an alias list and parse the winning value.
    ///
    /// Surrounding whitespace is ignored. Returns `Ok(None)` when none of the
    /// names is set. `expected` describes a valid value in the error message,
    /// e.g. "a non-negative integer".
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` naming the winning variable if its
    /// value does not parse as `T`.
    pub fn parse_first<T: FromStr>(
        &self,
        names: &[&str],
        expected: &str,
    ) -> Result<Option<T>, ConfigError> {
        let Some((name, value)) = self.first_of(names) else {
            return Ok(None);
        };
        value
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|_| ConfigError::InvalidValue {
                name: name.to_string(),
                message: format!("'{value}' must be {expected}"),
            })
    }

    /// Keep only the variables whose name starts with `prefix`.
    #[must_use]
    pub fn with_prefix(&self, prefix: &str) -> Self {
        self.vars
            .iter()
            .filter(|(name, _)| name.starts_with(prefix))
            .map(|(name, value)| (name.clone(), value.clone()))
            .collect()
    }

    /// Number of variables in the snapshot, including empty ones.
    #[must_use]
    pub fn len(&self) -> usize {
        self.vars.len()
    }

    /// Whether the snapshot holds no variables at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for EnvVars {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            vars: iter
                .into_iter()
                .map(|(name, value)| (name.into(), value.into()))
                .collect(),
        }
    }
}

impl fmt::Debug for EnvVars {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&str> = self.vars.keys().map(String::as_str).collect();
        names.sort_unstable();
        f.debug_struct("EnvVars").field("names", &names).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_display_invalid() {
        let error = ConfigError::InvalidValue {
            name: "TEST_VAR".to_string(),
            message: "bad value".to_string(),
        };
        assert_eq!(error.to_string(), "invalid value for TEST_VAR: bad value");
    }

    #[test]
    fn test_empty_value_is_unset() {
        let env: EnvVars = [("A", "")].into_iter().collect();
        assert_eq!(env.get("A"), None);
        assert_eq!(env.get("MISSING"), None);
    }

    #[test]
    fn test_first_of_respects_order() {
        let env: EnvVars = [("FIRST", "one"), ("SECOND", "two")].into_iter().collect();
        assert_eq!(env.first_of(&["FIRST", "SECOND"]), Some(("FIRST", "one")));
        assert_eq!(env.first_of(&["SECOND", "FIRST"]), Some(("SECOND", "two")));
    }

    #[test]
    fn test_first_of_skips_empty_alias() {
        let env: EnvVars = [("FIRST", ""), ("SECOND", "two")].into_iter().collect();
        assert_eq!(env.first_of(&["FIRST", "SECOND"]), Some(("SECOND", "two")));
    }

    #[test]
    fn test_first_of_none_set() {
        let env = EnvVars::default();
        assert_eq!(env.first_of(&["FIRST", "SECOND"]), None);
    }

    #[test]
    fn test_parse_first_reports_winning_name() {
        let env: EnvVars = [("LATER", "7"), ("EARLY", "seven")].into_iter().collect();
        let result = env.parse_first::<u32>(&["EARLY", "LATER"], "a number");
        match result {
            Err(ConfigError::InvalidValue { name, message }) => {
                assert_eq!(name, "EARLY");
                assert_eq!(message, "'seven' must be a number");
            }
            other => panic!("Expected InvalidValue, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_first_unset_is_none() {
        let env = EnvVars::default();
        assert_eq!(env.parse_first::<u32>(&["X"], "a number"), Ok(None));
    }

    #[test]
    fn test_parse_first_trims_whitespace() {
        let env: EnvVars = [("X", " 42\n")].into_iter().collect();
        assert_eq!(env.parse_first::<u32>(&["X"], "a number"), Ok(Some(42)));
    }

    #[test]
    fn test_from_process_captures_cargo_env() {
        let env = EnvVars::from_process();
        assert!(!env.is_empty());
        assert_eq!(env.get("CARGO_PKG_NAME"), Some("local-auth"));
    }

    #[test]
    fn test_with_prefix() {
        let env: EnvVars = [("OAUTH2_A", "1"), ("OAUTH2_B", "2"), ("OTHER", "3")]
            .into_iter()
            .collect();
        let filtered = env.with_prefix("OAUTH2_");
        assert_eq!(filtered.len(), 2);
        assert_eq!(filtered.get("OAUTH2_A"), Some("1"));
        assert_eq!(filtered.get("OTHER"), None);
    }

    #[test]
    fn test_debug_hides_values() {
        let env: EnvVars = [("SECRET_KEY", "hunter2")].into_iter().collect();
        let debug = format!("{env:?}");
        assert!(debug.contains("SECRET_KEY"));
        assert!(!debug.contains("hunter2"));
    }
}
