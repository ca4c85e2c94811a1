//! # Validate Subcommand
//!
//! Validates one or more documents against a schema definition and prints
//! a report:
//!
//! ```text
//! OK: good.yaml
//! FAIL: bad.yaml
//!   Value -1 is smaller than 0 at root.age(Age)
//! ```

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;

use dynschema::{Resolver, Schema};

use crate::load::{load_document, load_schema};

/// Arguments for the `dynschema validate` subcommand.
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Schema definition file (YAML or JSON).
    #[arg(long, value_name = "FILE")]
    pub schema: PathBuf,

    /// Documents to validate.
    #[arg(value_name = "DOC", required = true)]
    pub documents: Vec<PathBuf>,
}

/// Execute the validate subcommand, writing the report to stdout.
///
/// Returns exit code: 0 when every document passed, 1 otherwise.
pub fn run_validate(args: &ValidateArgs, resolver: Resolver) -> Result<u8> {
    let stdout = std::io::stdout();
    validate_documents(args, resolver, &mut stdout.lock())
}

/// Validate every document in `args`, writing the report to `out`.
pub fn validate_documents<W: Write>(args: &ValidateArgs, resolver: Resolver, out: &mut W) -> Result<u8> {
    let schema = load_schema(&args.schema, resolver)?;
    let mut failed = 0usize;

    for path in &args.documents {
        if !report_document(&schema, path, out)? {
            failed += 1;
        }
    }

    tracing::info!(
        total = args.documents.len(),
        failed,
        "validation finished"
    );
    Ok(u8::from(failed > 0))
}

/// Returns whether the document passed.
fn report_document<W: Write>(schema: &Schema, path: &Path, out: &mut W) -> Result<bool> {
    let data = load_document(path)?;
    let violations = schema
        .validate(&data)
        .with_context(|| format!("schema failed while validating {}", path.display()))?;

    if violations.is_empty() {
        writeln!(out, "OK: {}", path.display())?;
        return Ok(true);
    }
    writeln!(out, "FAIL: {}", path.display())?;
    writeln!(out, "{violations}")?;
    Ok(false)
}
