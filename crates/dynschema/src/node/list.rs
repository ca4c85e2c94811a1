//! List nodes: every element is validated against one `value_schema`,
//! with optional size limits and uniqueness.
//!
//! Duplicate detection hashes a canonical rendering of each element (object
//! keys sorted, compact separators), so maps that differ only in key order
//! are duplicates and detection stays O(n) in the number of elements.

use std::collections::HashSet;
use std::sync::Arc;

use indexmap::IndexMap;
use serde_json::{Map, Value};

use dynschema_core::{Resolver, SchemaError};

use super::fields::Fields;
use super::{node_literal, SchemaNode};
use crate::lazy::{FieldSpec, Lazy};
use crate::validate::display_value;

pub(crate) const KEYS: &[&str] = &["value_schema", "minimum_size", "maximum_size", "unique"];

#[derive(Debug)]
pub(crate) struct ListNode {
    value_schema: Lazy<Arc<SchemaNode>>,
    min_size: Option<usize>,
    max_size: Option<usize>,
    unique: Option<bool>,
}

#[derive(Clone, Debug)]
pub(crate) struct ListRules {
    pub(crate) value_schema: Arc<SchemaNode>,
    min_size: Option<usize>,
    max_size: Option<usize>,
    unique: Option<bool>,
}

fn value_schema_field(path: &str) -> FieldSpec<'_> {
    FieldSpec {
        name: "value_schema",
        expected: "map",
        path,
    }
}

fn element_level(level: &str) -> String {
    format!("{level}[i]")
}

impl ListNode {
    pub(crate) fn build(fields: &Fields<'_>, level: &str, resolver: &Arc<Resolver>) -> Result<Self, SchemaError> {
        let path = fields.path();
        let raw = fields
            .get("value_schema")
            .ok_or_else(|| SchemaError::MissingValueSchema {
                path: path.to_string(),
            })?;
        let value_schema = Lazy::classify(
            raw,
            &value_schema_field(path),
            node_literal(element_level(level), resolver),
        )?;

        let min_size = fields.size("minimum_size")?;
        let max_size = fields.size("maximum_size")?;
        if let (Some(min), Some(max)) = (min_size, max_size) {
            if min > max {
                return Err(SchemaError::InvertedBounds {
                    path: path.to_string(),
                    lower: "minimum_size",
                    upper: "maximum_size",
                });
            }
        }

        Ok(Self {
            value_schema,
            min_size,
            max_size,
            unique: fields.boolean("unique")?,
        })
    }

    pub(crate) fn deferred_fields(&self) -> usize {
        usize::from(self.value_schema.is_deferred())
    }

    pub(crate) fn resolve(&self, resolver: &Arc<Resolver>, path: &str, level: &str) -> Result<ListRules, SchemaError> {
        let value_schema = self.value_schema.resolve(
            resolver,
            &value_schema_field(path),
            node_literal(element_level(level), resolver),
        )?;
        Ok(ListRules {
            value_schema,
            min_size: self.min_size,
            max_size: self.max_size,
            unique: self.unique,
        })
    }
}

impl ListRules {
    pub(crate) fn check(&self, items: &[Value], path: &str, out: &mut Vec<String>) -> Result<(), SchemaError> {
        let len = items.len();
        if let Some(min) = self.min_size {
            if len < min {
                out.push(format!(
                    "Minimum size is set to {min}, but actual size is {len} at level {path}"
                ));
            }
        }
        if let Some(max) = self.max_size {
            if len > max {
                out.push(format!(
                    "Maximum size is set to {max}, but actual size is {len} at level {path}"
                ));
            }
        }

        for item in items {
            self.value_schema.validate_into(item, out)?;
        }

        if self.unique == Some(true) {
            let dups = duplicates(items);
            if !dups.is_empty() {
                out.push(format!(
                    "Duplicate(s) {} found for a unique list at {path}",
                    dups.join(",")
                ));
            }
        }
        Ok(())
    }

    pub(crate) fn realize_into(&self, attrs: &mut Map<String, Value>) -> Result<(), SchemaError> {
        attrs.insert("value_schema".to_string(), self.value_schema.realize()?);
        if let Some(min) = self.min_size {
            attrs.insert("minimum_size".to_string(), Value::from(min));
        }
        if let Some(max) = self.max_size {
            attrs.insert("maximum_size".to_string(), Value::from(max));
        }
        if let Some(unique) = self.unique {
            attrs.insert("unique".to_string(), Value::Bool(unique));
        }
        Ok(())
    }

    pub(crate) fn doc_tags(&self, tags: &mut IndexMap<String, String>) {
        let values = if self.unique == Some(true) {
            "Must be unique"
        } else {
            "May have duplicates"
        };
        tags.insert("values".to_string(), values.to_string());
        if let Some(min) = self.min_size {
            tags.insert("minimum size".to_string(), min.to_string());
        }
        if let Some(max) = self.max_size {
            tags.insert("maximum size".to_string(), max.to_string());
        }
    }
}

/// Each value that occurs more than once, reported once, in order of its
/// second occurrence.
fn duplicates(items: &[Value]) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut reported = HashSet::new();
    let mut dups = Vec::new();
    for item in items {
        let mut key = String::new();
        canonical_key(item, &mut key);
        if !seen.insert(key.clone()) && reported.insert(key) {
            dups.push(display_value(item));
        }
    }
    dups
}

/// Compact JSON with object keys in sorted order.
fn canonical_key(value: &Value, out: &mut String) {
    match value {
        Value::Array(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                canonical_key(item, out);
            }
            out.push(']');
        }
        Value::Object(entries) => {
            let mut keys: Vec<&String> = entries.keys().collect();
            keys.sort();
            out.push('{');
            for (i, key) in keys.into_iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                out.push_str(&Value::String(key.clone()).to_string());
                out.push(':');
                canonical_key(&entries[key.as_str()], out);
            }
            out.push('}');
        }
        scalar => out.push_str(&scalar.to_string()),
    }
}
