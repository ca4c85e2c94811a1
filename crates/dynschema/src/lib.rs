//! # dynschema — Declarative Validation of Loosely-Typed Data
//!
//! Validates nested maps, lists and scalars against a schema tree and
//! reports every problem found as a human-readable message instead of
//! stopping at the first one.
//!
//! ## Building a Schema
//!
//! A [`Schema`] is built from a [`Definition`]: a JSON-like tree where each
//! level declares a `type` (`any`, `string`, `number`, `boolean`, `list`,
//! `map`; default `map`), a mandatory `display_name`, and the options of
//! that type. Unknown keys are rejected at construction.
//!
//! ```
//! use dynschema::Schema;
//! use serde_json::json;
//!
//! let schema = Schema::new(json!({
//!     "display_name": "Person",
//!     "mandatory_children": ["name"],
//!     "known_children": {
//!         "name": {"type": "string", "display_name": "Name"},
//!         "age": {"type": "number", "display_name": "Age", "minimum_value": 0}
//!     }
//! }))?;
//!
//! let violations = schema.validate(&json!({"age": -1}))?;
//! assert_eq!(violations.messages(), [
//!     "Value -1 is smaller than 0 at root.age(Age)",
//!     "Values are required for name at root(Person)",
//! ]);
//! # Ok::<(), dynschema::SchemaError>(())
//! ```
//!
//! ## Deferred Fragments
//!
//! `known_children`, `value_schema`, `minimum_value`, `maximum_value` and
//! `allowed_values` may hold a [`Provider`] closure or a symbolic name
//! registered with a [`Resolver`] instead of a literal. They are resolved
//! the first time the node is used, exactly once, and the produced value
//! is type-checked.
//!
//! ## Presentation
//!
//! Each [`SchemaNode`] exposes a decoration glyph, its documentable
//! children and variant-specific doc tags for documentation renderers.
//!
//! ## Crate Policy
//!
//! - Depends only on `dynschema-core` internally.
//! - Bad data is never an error; a broken schema always is.
//! - A fully realized [`Schema`] is immutable and `Send + Sync`.

mod lazy;
pub mod node;
mod present;
pub mod schema;
mod validate;
pub mod violations;

pub use dynschema_core::{BoxError, CustomValidation, Definition, Provider, Resolver, SchemaError};
pub use node::{NodeType, SchemaNode};
pub use schema::{Schema, ROOT_LEVEL};
pub use violations::Violations;
