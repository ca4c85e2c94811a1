//! # Schema Facade
//!
//! Owns the root node and the resolver. `validate` and `realize` are the
//! two entry points of the whole crate.

use std::sync::Arc;

use serde_json::Value;

use dynschema_core::{Definition, Resolver, SchemaError};

use crate::node::SchemaNode;
use crate::violations::Violations;

/// Positional path of the root node.
pub const ROOT_LEVEL: &str = "root";

/// A schema built from a raw definition.
///
/// Cheap to clone; clones share the node tree and its realization cache.
#[derive(Clone, Debug)]
pub struct Schema {
    root: Arc<SchemaNode>,
    resolver: Arc<Resolver>,
}

impl Schema {
    /// Build a schema with no named providers. Symbolic names in deferrable
    /// fields will fail to resolve.
    pub fn new(definition: impl Into<Definition>) -> Result<Self, SchemaError> {
        Self::with_resolver(definition, Resolver::new())
    }

    /// Build a schema whose symbolic names are looked up in `resolver`.
    pub fn with_resolver(definition: impl Into<Definition>, resolver: Resolver) -> Result<Self, SchemaError> {
        let resolver = Arc::new(resolver);
        let definition = definition.into();
        let root = SchemaNode::create(ROOT_LEVEL.to_string(), &definition, &resolver)?;
        tracing::debug!(
            path = %root.path(),
            node_type = %root.node_type(),
            providers = resolver.len(),
            "schema constructed"
        );
        Ok(Self {
            root: Arc::new(root),
            resolver,
        })
    }

    /// Validate `data`, returning every violation found.
    ///
    /// `Err` means the schema itself is broken: a deferred fragment could
    /// not be realized or a custom hook failed.
    pub fn validate(&self, data: &Value) -> Result<Violations, SchemaError> {
        self.root.validate(data)
    }

    /// Realize every reachable node and return the literal mirror of the
    /// definition.
    ///
    /// After this returns `Ok`, validation performs no further mutation
    /// and the schema may be shared freely across threads.
    pub fn realize(&self) -> Result<Value, SchemaError> {
        self.root.realize()
    }

    pub fn root(&self) -> &Arc<SchemaNode> {
        &self.root
    }

    pub fn resolver(&self) -> &Resolver {
        &self.resolver
    }
}
