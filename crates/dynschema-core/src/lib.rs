//! # dynschema-core — Foundational Types
//!
//! The leaf crate of the workspace. Defines the raw input model that every
//! schema is built from and the error hierarchy shared by all crates.
//!
//! ## Key Types
//!
//! - [`Definition`]: a JSON-like tree that may also contain deferred
//!   fragments ([`Provider`]) and custom validation hooks
//!   ([`CustomValidation`]).
//! - [`Resolver`]: named providers injected at schema construction. Strings
//!   in deferrable fields are looked up here; nothing is ever evaluated as
//!   code.
//! - [`SchemaError`]: everything that can be wrong with a schema.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `dynschema` crates.
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.
//! - Everything here is `Send + Sync`.

pub mod definition;
pub mod error;
pub mod resolver;

pub use definition::{CustomValidation, Definition, Provider};
pub use error::{BoxError, SchemaError};
pub use resolver::Resolver;
