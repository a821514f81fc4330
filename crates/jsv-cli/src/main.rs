//! # jsv CLI entry point
//!
//! Parses command-line arguments, loads the optional config file, and
//! dispatches to subcommand handlers.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use jsv_cli::check::{run_check, CheckArgs};
use jsv_cli::config::CliConfig;
use jsv_cli::validate::{run_validate, ValidateArgs};

/// jsv — draft-03 JSON Schema validator.
///
/// Compiles JSON Schema documents, resolves `$ref`s between schema files
/// by file name, and validates JSON or YAML documents against them.
#[derive(Parser, Debug)]
#[command(name = "jsv", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Path to configuration file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Skip the draft-03 meta-schema check when compiling schemas.
    #[arg(long, global = true)]
    no_meta_check: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Validate a JSON or YAML document against a schema.
    Validate(ValidateArgs),

    /// Check that schema files are well-formed.
    Check(CheckArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize tracing based on verbosity level.
    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    tracing::debug!("jsv CLI v{} starting", env!("CARGO_PKG_VERSION"));

    let config = match &cli.config {
        Some(path) => match CliConfig::load(path) {
            Ok(config) => config,
            Err(e) => {
                tracing::error!("{e:#}");
                return ExitCode::from(2);
            }
        },
        None => CliConfig::default(),
    }
    .with_overrides(cli.no_meta_check);

    let result = match cli.command {
        Commands::Validate(args) => run_validate(&args, &config),
        Commands::Check(args) => run_check(&args, &config),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(2)
        }
    }
}
