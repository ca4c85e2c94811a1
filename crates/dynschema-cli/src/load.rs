//! # Document Loading
//!
//! Reads schema definitions, data documents and config files from disk.
//! The format is chosen by extension: `.yaml` / `.yml` are YAML, anything
//! else is JSON. YAML is converted to `serde_json::Value` so the rest of
//! the tool only ever sees JSON values.

use std::path::Path;

use anyhow::{bail, Context, Result};
use serde_json::Value;

use dynschema::{Resolver, Schema};

/// Whether `path` should be parsed as YAML.
pub fn is_yaml(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("yaml") | Some("yml")
    )
}

/// Load a YAML or JSON file as a JSON value.
pub fn load_document(path: &Path) -> Result<Value> {
    let content =
        std::fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
    if is_yaml(path) {
        let yaml: serde_yaml::Value = serde_yaml::from_str(&content)
            .with_context(|| format!("failed to parse YAML in {}", path.display()))?;
        yaml_to_json_value(yaml).with_context(|| format!("unsupported YAML value in {}", path.display()))
    } else {
        serde_json::from_str(&content).with_context(|| format!("failed to parse JSON in {}", path.display()))
    }
}

/// Load a schema definition file and build a [`Schema`] from it.
pub fn load_schema(path: &Path, resolver: Resolver) -> Result<Schema> {
    let definition = load_document(path)?;
    let schema = Schema::with_resolver(definition, resolver)
        .with_context(|| format!("invalid schema definition in {}", path.display()))?;
    tracing::info!(
        schema = %path.display(),
        root = %schema.root().path(),
        "loaded schema"
    );
    Ok(schema)
}

/// Convert a YAML value to JSON.
///
/// Tags are stripped, scalar keys are stringified, and non-finite floats
/// are rejected since JSON cannot represent them.
pub fn yaml_to_json_value(yaml: serde_yaml::Value) -> Result<Value> {
    match yaml {
        serde_yaml::Value::Null => Ok(Value::Null),
        serde_yaml::Value::Bool(b) => Ok(Value::Bool(b)),
        serde_yaml::Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Ok(Value::from(i))
            } else if let Some(u) = n.as_u64() {
                Ok(Value::from(u))
            } else {
                let f = n.as_f64().unwrap_or(f64::NAN);
                match serde_json::Number::from_f64(f) {
                    Some(num) => Ok(Value::Number(num)),
                    None => bail!("non-finite number {n} has no JSON representation"),
                }
            }
        }
        serde_yaml::Value::String(s) => Ok(Value::String(s)),
        serde_yaml::Value::Sequence(seq) => {
            let items: Result<Vec<Value>> = seq.into_iter().map(yaml_to_json_value).collect();
            Ok(Value::Array(items?))
        }
        serde_yaml::Value::Mapping(map) => {
            let mut obj = serde_json::Map::new();
            for (k, v) in map {
                let key = match k {
                    serde_yaml::Value::String(s) => s,
                    serde_yaml::Value::Number(n) => n.to_string(),
                    serde_yaml::Value::Bool(b) => b.to_string(),
                    serde_yaml::Value::Null => "null".to_string(),
                    other => bail!("unsupported mapping key {other:?}"),
                };
                obj.insert(key, yaml_to_json_value(v)?);
            }
            Ok(Value::Object(obj))
        }
        serde_yaml::Value::Tagged(tagged) => yaml_to_json_value(tagged.value),
    }
}
