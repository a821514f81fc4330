//! Compile-time options for [`Schema`](crate::Schema).

use serde::{Deserialize, Serialize};

/// Options accepted by `Schema::compile_with`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchemaOptions {
    /// Validate the schema document against the draft-03 meta-schema
    /// before compiling it. Applies only when `$schema` is absent or names
    /// draft-03.
    pub check_meta_schema: bool,
}

impl Default for SchemaOptions {
    fn default() -> Self {
        Self {
            check_meta_schema: true,
        }
    }
}

impl SchemaOptions {
    pub fn with_meta_check(mut self, enabled: bool) -> Self {
        self.check_meta_schema = enabled;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn meta_check_is_on_by_default() {
        assert!(SchemaOptions::default().check_meta_schema);
        assert!(!SchemaOptions::default().with_meta_check(false).check_meta_schema);
    }

    #[test]
    fn missing_fields_take_defaults() {
        let options: SchemaOptions = serde_json::from_str("{}").unwrap();
        assert_eq!(options, SchemaOptions::default());
        let options: SchemaOptions =
            serde_json::from_str(r#"{"check_meta_schema": false}"#).unwrap();
        assert!(!options.check_meta_schema);
    }
}
