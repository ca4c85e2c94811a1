//! Map nodes: named children with their own schemas, a fallback
//! `value_schema`, mandatory names, and optionally a list of such maps.

use std::sync::Arc;

use indexmap::{IndexMap, IndexSet};
use serde_json::{Map, Value};

use dynschema_core::{Definition, Resolver, SchemaError};

use super::fields::Fields;
use super::{node_literal, SchemaNode};
use crate::lazy::{FieldSpec, Lazy};
use crate::validate::type_mismatch;

pub(crate) const KEYS: &[&str] = &[
    "value_schema",
    "known_children",
    "allow_unknown_children",
    "mandatory_children",
    "allow_list",
];

/// Child name to its schema. `None` means "permitted, validated against
/// the map's `value_schema`".
pub(crate) type KnownChildren = IndexMap<String, Option<Arc<SchemaNode>>>;

#[derive(Debug)]
pub(crate) struct MapNode {
    value_schema: Option<Lazy<Arc<SchemaNode>>>,
    known_children: Lazy<Arc<KnownChildren>>,
    allow_unknown_children: bool,
    mandatory_children: IndexSet<String>,
    allow_list: bool,
}

#[derive(Clone, Debug)]
pub(crate) struct MapRules {
    pub(crate) value_schema: Option<Arc<SchemaNode>>,
    pub(crate) known_children: Arc<KnownChildren>,
    allow_unknown_children: bool,
    mandatory_children: IndexSet<String>,
    allow_list: bool,
}

fn value_schema_field(path: &str) -> FieldSpec<'_> {
    FieldSpec {
        name: "value_schema",
        expected: "map",
        path,
    }
}

fn known_children_field(path: &str) -> FieldSpec<'_> {
    FieldSpec {
        name: "known_children",
        expected: "map",
        path,
    }
}

fn value_level(level: &str) -> String {
    format!("{level}.<name>")
}

fn children_literal<'a>(
    level: &'a str,
    path: &'a str,
    has_value_schema: bool,
    resolver: &'a Arc<Resolver>,
) -> impl FnOnce(&Definition) -> Option<Result<Arc<KnownChildren>, SchemaError>> + 'a {
    move |def| {
        let entries = def.as_map()?;
        Some(build_children(entries, level, path, has_value_schema, resolver).map(Arc::new))
    }
}

fn build_children(
    entries: &IndexMap<String, Definition>,
    level: &str,
    path: &str,
    has_value_schema: bool,
    resolver: &Arc<Resolver>,
) -> Result<KnownChildren, SchemaError> {
    let mut children = KnownChildren::with_capacity(entries.len());
    for (name, child) in entries {
        let node = match child {
            Definition::Null if has_value_schema => None,
            Definition::Null => {
                return Err(SchemaError::MissingChildSchema {
                    path: level.to_string(),
                    name: name.clone(),
                })
            }
            Definition::Map(_) => Some(Arc::new(SchemaNode::create(
                format!("{level}.{name}"),
                child,
                resolver,
            )?)),
            other => {
                return Err(SchemaError::InvalidField {
                    path: path.to_string(),
                    field: "known_children",
                    expected: "a map of schema definitions or null",
                    actual: other.kind().to_string(),
                })
            }
        };
        children.insert(name.clone(), node);
    }
    Ok(children)
}

impl MapNode {
    pub(crate) fn build(fields: &Fields<'_>, level: &str, resolver: &Arc<Resolver>) -> Result<Self, SchemaError> {
        let path = fields.path();
        let value_schema = fields
            .get("value_schema")
            .map(|raw| {
                Lazy::classify(
                    raw,
                    &value_schema_field(path),
                    node_literal(value_level(level), resolver),
                )
            })
            .transpose()?;
        let has_value_schema = value_schema.is_some();

        let known_children = match fields.get("known_children") {
            Some(raw) => Lazy::classify(
                raw,
                &known_children_field(path),
                children_literal(level, path, has_value_schema, resolver),
            )?,
            None => Lazy::Ready(Arc::new(KnownChildren::new())),
        };

        let allow_unknown_children = fields.boolean("allow_unknown_children")?.unwrap_or(false);
        if allow_unknown_children && !has_value_schema {
            return Err(SchemaError::UnknownChildrenWithoutValueSchema {
                path: level.to_string(),
            });
        }

        Ok(Self {
            value_schema,
            known_children,
            allow_unknown_children,
            mandatory_children: fields.string_set("mandatory_children")?,
            allow_list: fields.boolean("allow_list")?.unwrap_or(false),
        })
    }

    pub(crate) fn allow_list(&self) -> bool {
        self.allow_list
    }

    pub(crate) fn deferred_fields(&self) -> usize {
        usize::from(matches!(&self.value_schema, Some(lazy) if lazy.is_deferred()))
            + usize::from(self.known_children.is_deferred())
    }

    pub(crate) fn resolve(&self, resolver: &Arc<Resolver>, path: &str, level: &str) -> Result<MapRules, SchemaError> {
        let value_schema = self
            .value_schema
            .as_ref()
            .map(|lazy| {
                lazy.resolve(
                    resolver,
                    &value_schema_field(path),
                    node_literal(value_level(level), resolver),
                )
            })
            .transpose()?;
        let known_children = self.known_children.resolve(
            resolver,
            &known_children_field(path),
            children_literal(level, path, self.value_schema.is_some(), resolver),
        )?;

        Ok(MapRules {
            value_schema,
            known_children,
            allow_unknown_children: self.allow_unknown_children,
            mandatory_children: self.mandatory_children.clone(),
            allow_list: self.allow_list,
        })
    }
}

impl MapRules {
    /// With `allow_list`, a list is validated element by element and map
    /// level messages carry the element index.
    pub(crate) fn check(&self, data: &Value, path: &str, out: &mut Vec<String>) -> Result<(), SchemaError> {
        match data {
            Value::Array(items) if self.allow_list => {
                for (i, item) in items.iter().enumerate() {
                    let indexed = format!("{path}[{i}]");
                    match item {
                        Value::Object(entries) => self.check_entries(entries, &indexed, out)?,
                        other => out.push(type_mismatch("map", other, &indexed)),
                    }
                }
            }
            Value::Object(entries) => self.check_entries(entries, path, out)?,
            _ => {}
        }
        Ok(())
    }

    fn check_entries(&self, entries: &Map<String, Value>, path: &str, out: &mut Vec<String>) -> Result<(), SchemaError> {
        for (key, value) in entries {
            let known = self.known_children.get(key);
            if known.is_none() && !self.allow_unknown_children {
                out.push(format!("{key} is not allowed at level {path}"));
                if self.value_schema.is_none() {
                    continue;
                }
            }

            match known.and_then(Option::as_ref).or(self.value_schema.as_ref()) {
                Some(schema) => schema.validate_into(value, out)?,
                None => out.push(format!("No sub-schema found for {key} at {path}")),
            }
        }

        let missing: Vec<&str> = self
            .mandatory_children
            .iter()
            .filter(|name| !entries.contains_key(name.as_str()))
            .map(String::as_str)
            .collect();
        if !missing.is_empty() {
            out.push(format!(
                "Values are required for {} at {path}",
                missing.join(",")
            ));
        }
        Ok(())
    }

    pub(crate) fn realize_into(&self, attrs: &mut Map<String, Value>) -> Result<(), SchemaError> {
        if let Some(schema) = &self.value_schema {
            attrs.insert("value_schema".to_string(), schema.realize()?);
        }

        let mut children = Map::with_capacity(self.known_children.len());
        for (name, child) in self.known_children.iter() {
            let realized = match child {
                Some(node) => node.realize()?,
                None => Value::Null,
            };
            children.insert(name.clone(), realized);
        }
        attrs.insert("known_children".to_string(), Value::Object(children));

        attrs.insert(
            "mandatory_children".to_string(),
            Value::Array(self.mandatory_children.iter().cloned().map(Value::String).collect()),
        );
        attrs.insert(
            "allow_unknown_children".to_string(),
            Value::Bool(self.allow_unknown_children),
        );
        attrs.insert("allow_list".to_string(), Value::Bool(self.allow_list));
        Ok(())
    }

    pub(crate) fn doc_tags(&self, tags: &mut IndexMap<String, String>) {
        let unknown = if self.allow_unknown_children {
            "Allowed"
        } else {
            "Not Allowed"
        };
        tags.insert("Unknown children".to_string(), unknown.to_string());
        let list = if self.allow_list { "Yes" } else { "No" };
        tags.insert("Can be a list".to_string(), list.to_string());

        let additional: Vec<&str> = self
            .known_children
            .iter()
            .filter(|(_, child)| child.is_none())
            .map(|(name, _)| name.as_str())
            .collect();
        if !additional.is_empty() {
            tags.insert("Additional Children".to_string(), additional.join(", "));
        }
        if !self.mandatory_children.is_empty() {
            let names: Vec<&str> = self.mandatory_children.iter().map(String::as_str).collect();
            tags.insert("Must Provide".to_string(), names.join(","));
        }
    }
}
