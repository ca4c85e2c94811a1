//! # Error Hierarchy
//!
//! Structured error types for dynschema, built with `thiserror`.
//!
//! A [`SchemaError`] always means the *schema* is at fault: a malformed
//! definition, a deferred fragment that could not be resolved, or a custom
//! hook that failed. Problems with the *data* being validated are never
//! errors; they are returned as violation messages.
//!
//! Every variant carries the positional path of the node that raised it so
//! schema authors can locate the offending definition without guesswork.

use thiserror::Error;

/// Error type produced by user closures (providers and custom hooks).
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// A schema definition is malformed, incomplete, or type-inconsistent.
///
/// Raised during node construction and during realization. Fatal to the
/// schema that raised it; never recovered locally.
#[derive(Error, Debug)]
pub enum SchemaError {
    /// The `type` key names a node variant that does not exist.
    #[error("unknown type '{type_name}' at level {path}")]
    UnknownType {
        /// Positional path of the node.
        path: String,
        /// The unrecognized type tag.
        type_name: String,
    },

    /// The mandatory `display_name` key is absent.
    #[error("display_name is mandatory at level {path}")]
    MissingDisplayName {
        /// Positional path of the node.
        path: String,
    },

    /// Keys remained after the variant consumed everything it recognizes.
    #[error("invalid entries ({}) in schema at level {path} for type {node_type}", keys.join(","))]
    InvalidEntries {
        /// Positional path of the node.
        path: String,
        /// Type tag of the node being constructed.
        node_type: &'static str,
        /// The unrecognized keys, in declaration order.
        keys: Vec<String>,
    },

    /// A boolean-like option holds a value that is not boolean-like.
    #[error("invalid value for boolean field '{field}' at {path}: {value}")]
    InvalidBoolean {
        /// Positional path of the node.
        path: String,
        /// The option key.
        field: &'static str,
        /// Rendering of the rejected value.
        value: String,
    },

    /// A literal field holds a value of the wrong kind.
    #[error("field '{field}' at {path} expects {expected} but got {actual}")]
    InvalidField {
        /// Positional path of the node.
        path: String,
        /// The field key.
        field: &'static str,
        /// Description of the accepted shape.
        expected: &'static str,
        /// Kind of the value actually supplied.
        actual: String,
    },

    /// A lower bound exceeds its upper bound.
    #[error("{lower} can not be greater than {upper} at {path}")]
    InvertedBounds {
        /// Path including the display label.
        path: String,
        /// Key of the lower bound.
        lower: &'static str,
        /// Key of the upper bound.
        upper: &'static str,
    },

    /// `allowed_pattern` is not a valid regular expression.
    #[error("invalid allowed_pattern '{pattern}' at {path}: {reason}")]
    InvalidPattern {
        /// Path including the display label.
        path: String,
        /// The pattern source.
        pattern: String,
        /// Compiler diagnostic.
        reason: String,
    },

    /// A deferrable field holds something that is neither the expected
    /// literal, a provider, nor a symbolic name.
    #[error("don't know how to resolve '{field}' at {path} (expected {expected}, got {actual})")]
    UnresolvableFragment {
        /// Path including the display label.
        path: String,
        /// The field key.
        field: &'static str,
        /// Expected literal kind.
        expected: &'static str,
        /// Kind actually found.
        actual: &'static str,
    },

    /// A deferred fragment resolved to a value of the wrong kind.
    #[error("deferred '{field}' generated {actual}, which doesn't match the expected type {expected} at {path}")]
    FragmentTypeMismatch {
        /// Path including the display label.
        path: String,
        /// The field key.
        field: &'static str,
        /// Expected literal kind.
        expected: &'static str,
        /// Kind the provider produced.
        actual: &'static str,
    },

    /// A symbolic name has no provider registered with the resolver.
    #[error("no provider named '{name}' for '{field}' at {path}")]
    UnknownProvider {
        /// Path including the display label.
        path: String,
        /// The field key.
        field: &'static str,
        /// The symbolic name.
        name: String,
    },

    /// A provider returned an error.
    #[error("provider for '{field}' at {path} failed: {source}")]
    ProviderFailed {
        /// Path including the display label.
        path: String,
        /// The field key.
        field: &'static str,
        /// Error reported by the provider.
        #[source]
        source: BoxError,
    },

    /// A list node was declared without `value_schema`.
    #[error("value_schema is mandatory for list type at {path}")]
    MissingValueSchema {
        /// Path including the display label.
        path: String,
    },

    /// A known child maps to null but the map has no `value_schema`.
    #[error("name '{name}' defines no schema and there is no value_schema at {path}")]
    MissingChildSchema {
        /// Positional path of the map node.
        path: String,
        /// The known child name.
        name: String,
    },

    /// `allow_unknown_children` is set but there is no `value_schema`.
    #[error("allow_unknown_children is true without value_schema at {path}")]
    UnknownChildrenWithoutValueSchema {
        /// Positional path of the map node.
        path: String,
    },

    /// A custom validation hook returned an error.
    #[error("custom validation '{hook}' failed at {path}: {source}")]
    HookFailed {
        /// Path including the display label.
        path: String,
        /// Name of the hook.
        hook: String,
        /// Error reported by the hook.
        #[source]
        source: BoxError,
    },

    /// A definition that must be purely literal contains a closure.
    #[error("{context} must be a literal value, found {kind}")]
    NotLiteral {
        /// What was being converted.
        context: String,
        /// Kind of the non-literal part.
        kind: &'static str,
    },
}
