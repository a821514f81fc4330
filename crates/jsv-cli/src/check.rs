//! # Check Subcommand
//!
//! `jsv check SCHEMA...` compiles each schema, meta-schema check
//! included unless disabled, and reports one line per file.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use crate::config::CliConfig;
use crate::schemas::SchemaSet;

/// Arguments for the `jsv check` subcommand.
#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Schema files to check.
    #[arg(value_name = "SCHEMA", required = true)]
    pub schemas: Vec<PathBuf>,
}

/// Execute the check subcommand.
///
/// Returns exit code: 0 when every schema is well-formed, 1 otherwise.
pub fn run_check(args: &CheckArgs, config: &CliConfig) -> Result<u8> {
    let options = config.schema_options();
    let mut set = SchemaSet::new();
    for reference in &config.schemas {
        set.load(reference, &options)?;
    }

    let total = args.schemas.len();
    let mut failures = 0usize;
    for path in &args.schemas {
        match set.load(path, &options) {
            Ok(_) => println!("OK: {}", path.display()),
            Err(e) => {
                failures += 1;
                println!("FAIL: {} — {e:#}", path.display());
            }
        }
    }

    println!("Schemas: {}/{} passed", total - failures, total);
    Ok(if failures > 0 { 1 } else { 0 })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_well_formed_returns_0() {
        let dir = tempfile::tempdir().unwrap();
        let a = dir.path().join("a.json");
        let b = dir.path().join("b.yaml");
        std::fs::write(&a, r#"{"type": "string"}"#).unwrap();
        std::fs::write(&b, "type: array\nitems:\n  type: integer\n").unwrap();
        let args = CheckArgs {
            schemas: vec![a, b],
        };
        assert_eq!(run_check(&args, &CliConfig::default()).unwrap(), 0);
    }

    #[test]
    fn one_malformed_returns_1() {
        let dir = tempfile::tempdir().unwrap();
        let good = dir.path().join("good.json");
        let bad = dir.path().join("bad.json");
        let broken = dir.path().join("broken.json");
        std::fs::write(&good, "{}").unwrap();
        std::fs::write(&bad, r#"{"minLength": -1}"#).unwrap();
        std::fs::write(&broken, "{").unwrap();
        let args = CheckArgs {
            schemas: vec![good, bad, broken],
        };
        assert_eq!(run_check(&args, &CliConfig::default()).unwrap(), 1);
    }

    #[test]
    fn unreadable_config_schema_is_an_operational_error() {
        let config = CliConfig {
            schemas: vec![PathBuf::from("/nonexistent/ref.json")],
            ..CliConfig::default()
        };
        let args = CheckArgs { schemas: vec![] };
        assert!(run_check(&args, &config).is_err());
    }
}
