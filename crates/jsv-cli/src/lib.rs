//! # jsv-cli — Command-Line Front-End for jsv-schema
//!
//! Loads schema files from disk, makes them resolvable to each other by
//! file name, and validates JSON or YAML documents against them.
//!
//! ## Subcommands
//!
//! - `jsv validate` — validate one document against a main schema, with
//!   any number of reference schemas preloaded for `$ref`.
//! - `jsv check` — compile schemas (meta-schema check included) and
//!   report which are well-formed.
//!
//! ```bash
//! jsv validate --schema address.json person.json alice.yaml
//! jsv check schemas/*.json
//! ```
//!
//! ## Exit Codes
//!
//! `0` success, `1` a document or schema failed, `2` operational error
//! (unreadable file, malformed config).

pub mod check;
pub mod config;
pub mod document;
pub mod schemas;
pub mod validate;

use std::path::{Path, PathBuf};

/// Resolve a path that may be relative to `base`.
///
/// Absolute paths are returned as-is. A relative path is joined onto
/// `base` when that file exists, and otherwise left relative to the
/// current directory.
pub fn resolve_path(path: &Path, base: &Path) -> PathBuf {
    if path.is_absolute() {
        return path.to_path_buf();
    }
    let based = base.join(path);
    if based.exists() {
        based
    } else {
        path.to_path_buf()
    }
}
