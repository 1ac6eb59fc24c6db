//! Registry of server helpers by name.
//!
//! The [`HelperRegistry`] is populated explicitly at startup; adapters expose
//! a `register` function instead of registering themselves implicitly.

use std::sync::Arc;

use rustc_hash::FxHashMap;
use tracing::debug;

use crate::config::BackendConfig;
use crate::error::{RestError, RestResult};
use crate::helper::{ServerHelper, ServerHelperFactory};

/// Factory function type for registered helpers.
type HelperConstructor =
    Box<dyn Fn(BackendConfig) -> RestResult<Arc<dyn ServerHelper>> + Send + Sync>;

/// Central registry mapping helper names to constructors.
pub struct HelperRegistry {
    constructors: FxHashMap<String, HelperConstructor>,
}

impl HelperRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self {
            constructors: FxHashMap::default(),
        }
    }

    /// Register a helper type under `name`.
    pub fn register<H>(&mut self, name: impl Into<String>)
    where
        H: ServerHelperFactory + 'static,
    {
        let name = name.into();
        debug!("Registering server helper: {}", name);
        self.constructors.insert(
            name,
            Box::new(|config| {
                let helper = H::from_config(config)?;
                Ok(Arc::new(helper))
            }),
        );
    }

    /// Register a helper with a custom constructor.
    pub fn register_factory(
        &mut self,
        name: impl Into<String>,
        factory: impl Fn(BackendConfig) -> RestResult<Arc<dyn ServerHelper>> + Send + Sync + 'static,
    ) {
        let name = name.into();
        debug!("Registering server helper factory: {}", name);
        self.constructors.insert(name, Box::new(factory));
    }

    /// Create a helper by name.
    ///
    /// The configuration's `name` is set to `name` before construction.
    pub fn create(&self, name: &str, mut config: BackendConfig) -> RestResult<Arc<dyn ServerHelper>> {
        let factory = self.constructors.get(name).ok_or_else(|| {
            RestError::HelperUnavailable(format!("No server helper registered with name '{name}'"))
        })?;
        config.name = name.to_string();
        factory(config)
    }

    /// List all registered helper names.
    pub fn available_helpers(&self) -> Vec<String> {
        let mut names: Vec<_> = self.constructors.keys().cloned().collect();
        names.sort();
        names
    }

    /// Check if a helper is registered under `name`.
    pub fn has_helper(&self, name: &str) -> bool {
        self.constructors.contains_key(name)
    }
}

impl Default for HelperRegistry {
    fn default() -> Self {
        Self::new()
    }
}
