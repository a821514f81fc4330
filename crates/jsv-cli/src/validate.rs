//! # Validate Subcommand
//!
//! `jsv validate [--schema REF]... MAIN_SCHEMA DOCUMENT`
//!
//! Reference schemas (from the config file, then `--schema`) are loaded
//! first so the main schema's `$ref`s can name them by file name. The
//! document may be JSON or YAML.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use crate::config::CliConfig;
use crate::document::load_document;
use crate::schemas::SchemaSet;

/// Arguments for the `jsv validate` subcommand.
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Reference schema to preload for `$ref`. Repeatable.
    #[arg(short, long = "schema", value_name = "REF")]
    pub schemas: Vec<PathBuf>,

    /// Schema the document is validated against.
    #[arg(value_name = "MAIN_SCHEMA")]
    pub main_schema: PathBuf,

    /// JSON or YAML document to validate.
    #[arg(value_name = "DOCUMENT")]
    pub document: PathBuf,
}

/// Execute the validate subcommand.
///
/// Returns exit code: 0 when the document is valid, 1 when it is not.
/// Unloadable schemas or documents are operational errors.
pub fn run_validate(args: &ValidateArgs, config: &CliConfig) -> Result<u8> {
    let options = config.schema_options();
    let mut set = SchemaSet::new();
    for reference in config.schemas.iter().chain(&args.schemas) {
        set.load(reference, &options)?;
    }
    let schema = set.load(&args.main_schema, &options)?;

    tracing::debug!(
        schemas = set.len(),
        document = %args.document.display(),
        "validating document"
    );

    let document = load_document(&args.document)?;
    match schema.validate(&document) {
        Ok(()) => {
            println!("OK: {}", args.document.display());
            Ok(0)
        }
        Err(e) => {
            println!("FAIL: {} — {}", args.document.display(), e);
            println!(
                "  {}: instance {}, schema {}",
                e.kind.name(),
                e.pointer(),
                e.schema_path
            );
            Ok(1)
        }
    }
}
