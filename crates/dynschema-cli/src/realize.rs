//! # Realize Subcommand
//!
//! Resolves every deferred fragment of a schema and prints the literal
//! mirror. The output can be used as a schema definition on its own.

use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};

use dynschema::Resolver;

use crate::load::load_schema;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Json,
    Yaml,
}

/// Arguments for the `dynschema realize` subcommand.
#[derive(Args, Debug)]
pub struct RealizeArgs {
    /// Schema definition file (YAML or JSON).
    #[arg(long, value_name = "FILE")]
    pub schema: PathBuf,

    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
    pub format: OutputFormat,
}

/// Execute the realize subcommand, writing the mirror to stdout.
pub fn run_realize(args: &RealizeArgs, resolver: Resolver) -> Result<u8> {
    let stdout = std::io::stdout();
    realize_schema(args, resolver, &mut stdout.lock())
}

pub fn realize_schema<W: Write>(args: &RealizeArgs, resolver: Resolver, out: &mut W) -> Result<u8> {
    let schema = load_schema(&args.schema, resolver)?;
    let realized = schema
        .realize()
        .with_context(|| format!("failed to realize {}", args.schema.display()))?;

    let rendered = match args.format {
        OutputFormat::Json => serde_json::to_string_pretty(&realized)?,
        OutputFormat::Yaml => serde_yaml::to_string(&realized)?,
    };
    writeln!(out, "{}", rendered.trim_end())?;
    Ok(0)
}
