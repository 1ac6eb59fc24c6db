//! Backend configuration handed to a server helper at construction.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Option keys whose values are never printed.
const REDACTED_KEYS: &[&str] = &["credentials", "token", "api_key"];

/// Configuration for a server helper instance.
///
/// A flat map of option name to string value. Each helper documents the keys
/// it recognizes and ignores the rest.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackendConfig {
    /// Name the helper was selected by.
    pub name: String,
    /// Helper options.
    #[serde(flatten)]
    pub options: BTreeMap<String, String>,
}

impl BackendConfig {
    /// Create a new, empty configuration.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            options: BTreeMap::new(),
        }
    }

    /// Set an option.
    pub fn with_option(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.options.insert(key.into(), value.into());
        self
    }

    /// Look up an option.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.options.get(key).map(String::as_str)
    }

    /// Look up an option, treating an empty value as absent.
    pub fn get_non_empty(&self, key: &str) -> Option<&str> {
        self.get(key).filter(|v| !v.is_empty())
    }
}

impl fmt::Debug for BackendConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let options: BTreeMap<&str, &str> = self
            .options
            .iter()
            .map(|(k, v)| {
                if REDACTED_KEYS.contains(&k.as_str()) {
                    (k.as_str(), "[REDACTED]")
                } else {
                    (k.as_str(), v.as_str())
                }
            })
            .collect();

        f.debug_struct("BackendConfig")
            .field("name", &self.name)
            .field("options", &options)
            .finish()
    }
}
