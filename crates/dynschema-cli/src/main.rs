//! # dynschema CLI entry point
//!
//! Parses command-line arguments, initializes logging and dispatches to
//! subcommand handlers.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use dynschema_cli::config::CliConfig;
use dynschema_cli::realize::{run_realize, RealizeArgs};
use dynschema_cli::validate::{run_validate, ValidateArgs};

/// Validate loosely-typed YAML/JSON documents against declarative schemas.
#[derive(Parser, Debug)]
#[command(name = "dynschema", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Path to configuration file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Validate documents against a schema definition.
    Validate(ValidateArgs),

    /// Print the fully realized schema.
    Realize(RealizeArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    tracing::debug!("dynschema CLI starting");

    let result = CliConfig::load(cli.config.as_deref()).and_then(|config| {
        let resolver = config.resolver();
        match cli.command {
            Commands::Validate(args) => run_validate(&args, resolver),
            Commands::Realize(args) => run_realize(&args, resolver),
        }
    });

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(1)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dynschema_cli::realize::OutputFormat;

    #[test]
    fn cli_parse_validate() {
        let cli = Cli::try_parse_from(["dynschema", "validate", "--schema", "s.yaml", "a.yaml", "b.json"]).unwrap();
        let Commands::Validate(args) = cli.command else {
            panic!("expected validate");
        };
        assert_eq!(args.schema, PathBuf::from("s.yaml"));
        assert_eq!(args.documents, [PathBuf::from("a.yaml"), PathBuf::from("b.json")]);
    }

    #[test]
    fn cli_parse_validate_requires_documents() {
        assert!(Cli::try_parse_from(["dynschema", "validate", "--schema", "s.yaml"]).is_err());
    }

    #[test]
    fn cli_parse_realize_default_format() {
        let cli = Cli::try_parse_from(["dynschema", "realize", "--schema", "s.yaml"]).unwrap();
        let Commands::Realize(args) = cli.command else {
            panic!("expected realize");
        };
        assert_eq!(args.format, OutputFormat::Json);
    }

    #[test]
    fn cli_parse_realize_yaml() {
        let cli = Cli::try_parse_from(["dynschema", "realize", "--schema", "s.yaml", "--format", "yaml"]).unwrap();
        if let Commands::Realize(args) = cli.command {
            assert_eq!(args.format, OutputFormat::Yaml);
        }
    }

    #[test]
    fn cli_parse_verbose_levels() {
        for (flag, level) in [("-v", 1), ("-vv", 2), ("-vvv", 3)] {
            let cli = Cli::try_parse_from(["dynschema", flag, "realize", "--schema", "s.yaml"]).unwrap();
            assert_eq!(cli.verbose, level);
        }
    }

    #[test]
    fn cli_parse_config_option() {
        let cli = Cli::try_parse_from(["dynschema", "realize", "--schema", "s.yaml", "--config", "c.yaml"]).unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("c.yaml")));
    }

    #[test]
    fn cli_parse_no_subcommand_errors() {
        assert!(Cli::try_parse_from(["dynschema"]).is_err());
    }
}
