//! # CLI Configuration
//!
//! Optional YAML file passed with `--config`:
//!
//! ```yaml
//! check_meta_schema: true
//! schemas:
//!   - common/address.json
//!   - common/person.json
//! ```
//!
//! `schemas` are reference schemas loaded before any command runs;
//! relative entries are resolved against the config file's directory.
//! Command-line flags take precedence over the file.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use jsv_schema::SchemaOptions;

/// Contents of a `--config` file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    /// Check schemas against the draft-03 meta-schema before compiling.
    pub check_meta_schema: bool,
    /// Reference schemas to preload for `$ref`.
    pub schemas: Vec<PathBuf>,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            check_meta_schema: true,
            schemas: Vec::new(),
        }
    }
}

impl CliConfig {
    /// Read and parse a config file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("cannot read config {}", path.display()))?;
        let mut config: Self = serde_yaml::from_str(&content)
            .with_context(|| format!("invalid config {}", path.display()))?;

        let base = path.parent().unwrap_or_else(|| Path::new("."));
        config.schemas = config
            .schemas
            .iter()
            .map(|schema| crate::resolve_path(schema, base))
            .collect();

        tracing::debug!(
            config = %path.display(),
            schemas = config.schemas.len(),
            "loaded config"
        );
        Ok(config)
    }

    /// Apply command-line overrides.
    pub fn with_overrides(mut self, no_meta_check: bool) -> Self {
        if no_meta_check {
            self.check_meta_schema = false;
        }
        self
    }

    pub fn schema_options(&self) -> SchemaOptions {
        SchemaOptions::default().with_meta_check(self.check_meta_schema)
    }
}
