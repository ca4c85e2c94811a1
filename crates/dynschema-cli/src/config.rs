//! # CLI Configuration
//!
//! Optional file passed with `--config`. It only names the providers that
//! symbolic strings in schema definitions resolve to:
//!
//! ```yaml
//! providers:
//!   name_list: [a, b, c]
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;
use serde_json::Value;

use dynschema_core::Resolver;

use crate::load::load_document;

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CliConfig {
    /// Symbolic name to the literal definition it resolves to.
    #[serde(default)]
    pub providers: BTreeMap<String, Value>,
}

impl CliConfig {
    /// Load the config file, or the empty config when no path is given.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let value = load_document(path)?;
        let config: Self = serde_json::from_value(value)
            .with_context(|| format!("invalid config file {}", path.display()))?;
        tracing::debug!(
            config = %path.display(),
            providers = config.providers.len(),
            "loaded config"
        );
        Ok(config)
    }

    /// A resolver with one constant provider per configured name.
    pub fn resolver(&self) -> Resolver {
        let mut resolver = Resolver::new();
        for (name, value) in &self.providers {
            resolver.constant(name.clone(), value.clone().into());
        }
        resolver
    }
}
