//! Number nodes with optional inclusive bounds.
//!
//! A bound of `0` is a real bound; only an absent key means "unbounded".

use std::cmp::Ordering;

use indexmap::IndexMap;
use serde_json::{Map, Number, Value};

use dynschema_core::{Resolver, SchemaError};

use super::fields::Fields;
use crate::lazy::{number_literal, FieldSpec, Lazy};

pub(crate) const KEYS: &[&str] = &["minimum_value", "maximum_value"];

#[derive(Debug)]
pub(crate) struct NumberNode {
    minimum: Option<Lazy<Number>>,
    maximum: Option<Lazy<Number>>,
}

#[derive(Clone, Debug)]
pub(crate) struct NumberRules {
    minimum: Option<Number>,
    maximum: Option<Number>,
}

fn field<'a>(name: &'static str, path: &'a str) -> FieldSpec<'a> {
    FieldSpec {
        name,
        expected: "number",
        path,
    }
}

/// Numeric ordering across integer and floating representations.
pub(crate) fn compare(a: &Number, b: &Number) -> Option<Ordering> {
    if let (Some(x), Some(y)) = (a.as_i64(), b.as_i64()) {
        return Some(x.cmp(&y));
    }
    if let (Some(x), Some(y)) = (a.as_u64(), b.as_u64()) {
        return Some(x.cmp(&y));
    }
    a.as_f64()?.partial_cmp(&b.as_f64()?)
}

fn check_bounds(minimum: Option<&Number>, maximum: Option<&Number>, path: &str) -> Result<(), SchemaError> {
    if let (Some(min), Some(max)) = (minimum, maximum) {
        if compare(min, max) == Some(Ordering::Greater) {
            return Err(SchemaError::InvertedBounds {
                path: path.to_string(),
                lower: "minimum_value",
                upper: "maximum_value",
            });
        }
    }
    Ok(())
}

impl NumberNode {
    pub(crate) fn build(fields: &Fields<'_>) -> Result<Self, SchemaError> {
        let path = fields.path();
        let read = |name: &'static str| {
            let spec = field(name, path);
            fields
                .get(name)
                .map(|raw| Lazy::classify(raw, &spec, number_literal))
                .transpose()
        };
        let minimum = read("minimum_value")?;
        let maximum = read("maximum_value")?;

        check_bounds(
            minimum.as_ref().and_then(Lazy::ready),
            maximum.as_ref().and_then(Lazy::ready),
            path,
        )?;

        Ok(Self { minimum, maximum })
    }

    pub(crate) fn deferred_fields(&self) -> usize {
        [&self.minimum, &self.maximum]
            .into_iter()
            .filter(|bound| matches!(bound, Some(lazy) if lazy.is_deferred()))
            .count()
    }

    pub(crate) fn resolve(&self, resolver: &Resolver, path: &str) -> Result<NumberRules, SchemaError> {
        let resolve = |lazy: &Option<Lazy<Number>>, name: &'static str| {
            lazy.as_ref()
                .map(|lazy| lazy.resolve(resolver, &field(name, path), number_literal))
                .transpose()
        };
        let minimum = resolve(&self.minimum, "minimum_value")?;
        let maximum = resolve(&self.maximum, "maximum_value")?;
        check_bounds(minimum.as_ref(), maximum.as_ref(), path)?;
        Ok(NumberRules { minimum, maximum })
    }
}

impl NumberRules {
    pub(crate) fn check(&self, data: &Number, path: &str, out: &mut Vec<String>) {
        if let Some(min) = &self.minimum {
            if compare(data, min) == Some(Ordering::Less) {
                out.push(format!("Value {data} is smaller than {min} at {path}"));
            }
        }
        if let Some(max) = &self.maximum {
            if compare(data, max) == Some(Ordering::Greater) {
                out.push(format!("Value {data} is greater than {max} at {path}"));
            }
        }
    }

    pub(crate) fn realize_into(&self, attrs: &mut Map<String, Value>) {
        if let Some(min) = &self.minimum {
            attrs.insert("minimum_value".to_string(), Value::Number(min.clone()));
        }
        if let Some(max) = &self.maximum {
            attrs.insert("maximum_value".to_string(), Value::Number(max.clone()));
        }
    }

    pub(crate) fn doc_tags(&self, tags: &mut IndexMap<String, String>) {
        if let Some(min) = &self.minimum {
            tags.insert("Minimum Value".to_string(), min.to_string());
        }
        if let Some(max) = &self.maximum {
            tags.insert("Maximum Value".to_string(), max.to_string());
        }
    }
}
