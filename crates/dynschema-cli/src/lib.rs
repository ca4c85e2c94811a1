//! # dynschema-cli — Command-Line Front End
//!
//! Provides the `dynschema` binary:
//!
//! - `dynschema validate --schema <FILE> <DOC>...` — validate documents and
//!   print a per-document report; exits 1 when any document fails.
//! - `dynschema realize --schema <FILE> [--format json|yaml]` — print the
//!   fully realized schema.
//!
//! Schema files, documents and the optional `--config` file may be YAML or
//! JSON. Symbolic names used in schema definitions are resolved through
//! the `providers` section of the config file.
//!
//! ```bash
//! dynschema --config providers.yaml validate --schema schema.yaml data/*.yaml
//! dynschema realize --schema schema.yaml --format yaml
//! ```

pub mod config;
pub mod load;
pub mod realize;
pub mod validate;
