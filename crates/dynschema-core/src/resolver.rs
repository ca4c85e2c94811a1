//! # Symbolic Resolver
//!
//! Maps symbolic names to [`Provider`]s. A deferrable schema field that
//! holds a string where a list, map, or number is expected names an entry
//! in the resolver; realization invokes that provider instead of evaluating
//! code. The caller decides what is reachable by what it registers.

use std::collections::HashMap;

use crate::definition::{Definition, Provider};
use crate::error::BoxError;

/// Registry of named providers, supplied at schema construction.
#[derive(Clone, Debug, Default)]
pub struct Resolver {
    providers: HashMap<String, Provider>,
}

impl Resolver {
    /// An empty resolver. Every symbolic name fails to resolve.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an infallible provider under `name`, replacing any
    /// previous registration.
    pub fn register<F>(&mut self, name: impl Into<String>, f: F) -> &mut Self
    where
        F: Fn() -> Definition + Send + Sync + 'static,
    {
        self.providers.insert(name.into(), Provider::new(f));
        self
    }

    /// Register a fallible provider under `name`.
    pub fn try_register<F>(&mut self, name: impl Into<String>, f: F) -> &mut Self
    where
        F: Fn() -> Result<Definition, BoxError> + Send + Sync + 'static,
    {
        self.providers.insert(name.into(), Provider::fallible(f));
        self
    }

    /// Register a fixed definition under `name`.
    pub fn constant(&mut self, name: impl Into<String>, definition: Definition) -> &mut Self {
        self.providers
            .insert(name.into(), Provider::constant(definition));
        self
    }

    pub fn get(&self, name: &str) -> Option<&Provider> {
        self.providers.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.providers.contains_key(name)
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.providers.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }
}
