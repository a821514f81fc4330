//! # Document Loading
//!
//! Reads JSON or YAML files into `serde_json::Value`. The format is chosen
//! by extension: `.yaml` / `.yml` are YAML, everything else is JSON.

use std::path::Path;

use anyhow::{anyhow, Context, Result};
use serde_json::Value;

use jsv_schema::ParseError;

/// Load a JSON or YAML file.
pub fn load_document(path: &Path) -> Result<Value> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("cannot read {}", path.display()))?;

    if is_yaml(path) {
        let yaml: serde_yaml::Value = serde_yaml::from_str(&content)
            .with_context(|| format!("invalid YAML in {}", path.display()))?;
        yaml_to_json_value(&yaml)
            .map_err(|e| anyhow!("YAML-to-JSON conversion failed for {}: {e}", path.display()))
    } else {
        serde_json::from_str(&content).map_err(|e| {
            let parse = ParseError::from_json(&e, &content);
            anyhow!("invalid JSON in {}: {parse}", path.display())
        })
    }
}

fn is_yaml(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|ext| ext.to_str()),
        Some("yaml" | "yml")
    )
}

/// Convert a YAML value into the JSON data model.
///
/// Map keys must be scalars and become their text; tags are dropped.
/// Integers keep their integer identity so `integer` schemas accept them.
pub fn yaml_to_json_value(yaml: &serde_yaml::Value) -> Result<Value, String> {
    use serde_yaml::Value as Yaml;

    Ok(match yaml {
        Yaml::Null => Value::Null,
        Yaml::Bool(flag) => Value::Bool(*flag),
        Yaml::Number(number) => Value::Number(json_number(number)?),
        Yaml::String(text) => Value::String(text.clone()),
        Yaml::Sequence(items) => {
            Value::Array(items.iter().map(yaml_to_json_value).collect::<Result<_, String>>()?)
        }
        Yaml::Mapping(mapping) => Value::Object(
            mapping
                .iter()
                .map(|(key, value)| Ok((member_name(key)?, yaml_to_json_value(value)?)))
                .collect::<Result<_, String>>()?,
        ),
        Yaml::Tagged(tagged) => yaml_to_json_value(&tagged.value)?,
    })
}

fn json_number(number: &serde_yaml::Number) -> Result<serde_json::Number, String> {
    if let Some(signed) = number.as_i64() {
        return Ok(signed.into());
    }
    if let Some(unsigned) = number.as_u64() {
        return Ok(unsigned.into());
    }
    number
        .as_f64()
        .and_then(serde_json::Number::from_f64)
        .ok_or_else(|| format!("number {number} has no JSON representation"))
}

fn member_name(key: &serde_yaml::Value) -> Result<String, String> {
    match key {
        serde_yaml::Value::String(text) => Ok(text.clone()),
        serde_yaml::Value::Number(number) => Ok(number.to_string()),
        serde_yaml::Value::Bool(flag) => Ok(flag.to_string()),
        other => Err(format!("map key {other:?} is not a scalar")),
    }
}
