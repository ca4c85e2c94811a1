//! # Schema Nodes
//!
//! One [`SchemaNode`] per level of a schema definition. The variant is
//! chosen once at construction from the `type` key (default `map`) and never
//! changes afterwards.
//!
//! Construction follows a recognized-keys contract: every variant declares
//! the keys it understands, and whatever is left over after the common and
//! variant keys have been read is a [`SchemaError::InvalidEntries`]. Typos
//! such as `alowed_values` therefore fail loudly.
//!
//! A node keeps its raw (possibly deferred) fields and computes its
//! resolved [`Rules`] on first use. The result is cached in a
//! [`OnceLock`], so once a node is realized no further mutation happens and
//! the node can be read from any number of threads.

pub(crate) mod any;
pub(crate) mod boolean;
pub(crate) mod fields;
pub(crate) mod list;
pub(crate) mod map;
pub(crate) mod number;
pub(crate) mod string;

use std::fmt;
use std::sync::{Arc, OnceLock};

use serde_json::{json, Map, Value};

use dynschema_core::{CustomValidation, Definition, Resolver, SchemaError};

use self::boolean::BooleanLabels;
use self::fields::Fields;
use self::list::{ListNode, ListRules};
use self::map::{MapNode, MapRules};
use self::number::{NumberNode, NumberRules};
use self::string::{StringNode, StringRules};

// ─── Node Type ──────────────────────────────────────────────────────

/// The six node variants, as named by the `type` key.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NodeType {
    Any,
    String,
    Number,
    Boolean,
    List,
    Map,
}

impl NodeType {
    /// Parse a `type` tag. Unknown tags yield `None`.
    pub fn parse(tag: &str) -> Option<Self> {
        match tag {
            "any" => Some(NodeType::Any),
            "string" => Some(NodeType::String),
            "number" => Some(NodeType::Number),
            "boolean" => Some(NodeType::Boolean),
            "list" => Some(NodeType::List),
            "map" => Some(NodeType::Map),
            _ => None,
        }
    }

    /// The `type` tag for this variant.
    pub fn as_str(self) -> &'static str {
        match self {
            NodeType::Any => "any",
            NodeType::String => "string",
            NodeType::Number => "number",
            NodeType::Boolean => "boolean",
            NodeType::List => "list",
            NodeType::Map => "map",
        }
    }

    fn keys(self) -> &'static [&'static str] {
        match self {
            NodeType::Any => any::KEYS,
            NodeType::String => string::KEYS,
            NodeType::Number => number::KEYS,
            NodeType::Boolean => boolean::KEYS,
            NodeType::List => list::KEYS,
            NodeType::Map => map::KEYS,
        }
    }
}

impl fmt::Display for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ─── Node Internals ─────────────────────────────────────────────────

/// Variant fields as declared, deferred fragments included.
#[derive(Debug)]
pub(crate) enum NodeKind {
    Any,
    String(StringNode),
    Number(NumberNode),
    Boolean(BooleanLabels),
    List(ListNode),
    Map(MapNode),
}

impl NodeKind {
    fn deferred_fields(&self) -> usize {
        match self {
            NodeKind::Any | NodeKind::Boolean(_) => 0,
            NodeKind::String(node) => node.deferred_fields(),
            NodeKind::Number(node) => node.deferred_fields(),
            NodeKind::List(node) => node.deferred_fields(),
            NodeKind::Map(node) => node.deferred_fields(),
        }
    }
}

/// Variant fields with every deferred fragment resolved.
#[derive(Clone, Debug)]
pub(crate) enum Rules {
    Any,
    String(StringRules),
    Number(NumberRules),
    Boolean(BooleanLabels),
    List(ListRules),
    Map(MapRules),
}

// ─── Schema Node ────────────────────────────────────────────────────

/// One level of a schema tree.
#[derive(Debug)]
pub struct SchemaNode {
    level: String,
    path: String,
    display_name: String,
    description: Option<String>,
    allow_none: bool,
    verbatim: Option<Value>,
    custom_validation: Option<CustomValidation>,
    kind: NodeKind,
    resolver: Arc<Resolver>,
    rules: OnceLock<Rules>,
}

impl SchemaNode {
    /// Build a node (and, recursively, its literal children) from one level
    /// of a definition. `level` is the positional path supplied by the
    /// parent.
    pub(crate) fn create(level: String, definition: &Definition, resolver: &Arc<Resolver>) -> Result<Self, SchemaError> {
        let entries = definition.as_map().ok_or_else(|| SchemaError::InvalidField {
            path: level.clone(),
            field: "definition",
            expected: "a map",
            actual: definition.kind().to_string(),
        })?;

        let header = Fields::new(entries, &level);
        let type_tag = header.string("type")?.unwrap_or_else(|| "map".to_string());
        let node_type = NodeType::parse(&type_tag).ok_or_else(|| SchemaError::UnknownType {
            path: level.clone(),
            type_name: type_tag.clone(),
        })?;
        let display_name = header
            .string("display_name")?
            .ok_or_else(|| SchemaError::MissingDisplayName { path: level.clone() })?;

        let path = format!("{level}({display_name})");
        let fields = Fields::new(entries, &path);

        let description = fields.string("description")?;
        let allow_none = fields.boolean("allow_none")?.unwrap_or(false);
        let verbatim = fields
            .get("verbatim")
            .map(|def| def.to_literal(&format!("verbatim at {path}")))
            .transpose()?;
        let custom_validation = match fields.get("custom_validation") {
            None => None,
            Some(Definition::Hook(hook)) => Some(hook.clone()),
            // a realized marker carries no behaviour
            Some(Definition::Map(marker)) if marker.contains_key("enabled") => None,
            Some(other) => return Err(fields.invalid("custom_validation", "a validation hook", other)),
        };

        let kind = match node_type {
            NodeType::Any => NodeKind::Any,
            NodeType::String => NodeKind::String(StringNode::build(&fields)?),
            NodeType::Number => NodeKind::Number(NumberNode::build(&fields)?),
            NodeType::Boolean => NodeKind::Boolean(BooleanLabels::build(&fields)?),
            NodeType::List => NodeKind::List(ListNode::build(&fields, &level, resolver)?),
            NodeType::Map => NodeKind::Map(MapNode::build(&fields, &level, resolver)?),
        };

        let leftovers = fields.leftovers(node_type.keys());
        if !leftovers.is_empty() {
            return Err(SchemaError::InvalidEntries {
                path: level,
                node_type: node_type.as_str(),
                keys: leftovers,
            });
        }

        Ok(Self {
            level,
            path,
            display_name,
            description,
            allow_none,
            verbatim,
            custom_validation,
            kind,
            resolver: Arc::clone(resolver),
            rules: OnceLock::new(),
        })
    }

    /// The variant of this node.
    pub fn node_type(&self) -> NodeType {
        match self.kind {
            NodeKind::Any => NodeType::Any,
            NodeKind::String(_) => NodeType::String,
            NodeKind::Number(_) => NodeType::Number,
            NodeKind::Boolean(_) => NodeType::Boolean,
            NodeKind::List(_) => NodeType::List,
            NodeKind::Map(_) => NodeType::Map,
        }
    }

    /// Positional path followed by the display label, e.g.
    /// `root.children.a(A NUM)`. Used in every message about this node.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Positional path without the display label.
    pub fn level(&self) -> &str {
        &self.level
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn allow_none(&self) -> bool {
        self.allow_none
    }

    pub fn verbatim(&self) -> Option<&Value> {
        self.verbatim.as_ref()
    }

    pub fn custom_validation(&self) -> Option<&CustomValidation> {
        self.custom_validation.as_ref()
    }

    /// Whether this node's deferred fields have been resolved.
    pub fn is_realized(&self) -> bool {
        self.rules.get().is_some()
    }

    /// Whether the data may be a list of maps (map nodes with `allow_list`).
    pub(crate) fn accepts_list_of_maps(&self) -> bool {
        matches!(&self.kind, NodeKind::Map(node) if node.allow_list())
    }

    /// Resolve every deferred field of this node, once.
    ///
    /// Providers run at most once per node when realization is not raced
    /// from several threads; `Schema::realize` before sharing a schema.
    pub(crate) fn rules(&self) -> Result<&Rules, SchemaError> {
        if let Some(rules) = self.rules.get() {
            return Ok(rules);
        }

        let resolver = &self.resolver;
        let resolved = match &self.kind {
            NodeKind::Any => Rules::Any,
            NodeKind::String(node) => Rules::String(node.resolve(resolver, &self.path)?),
            NodeKind::Number(node) => Rules::Number(node.resolve(resolver, &self.path)?),
            NodeKind::Boolean(labels) => Rules::Boolean(labels.clone()),
            NodeKind::List(node) => Rules::List(node.resolve(resolver, &self.path, &self.level)?),
            NodeKind::Map(node) => Rules::Map(node.resolve(resolver, &self.path, &self.level)?),
        };
        tracing::debug!(
            path = %self.path,
            node_type = %self.node_type(),
            deferred = self.kind.deferred_fields(),
            "realized schema node"
        );
        Ok(self.rules.get_or_init(|| resolved))
    }

    /// The literal mirror of this node and everything below it.
    ///
    /// The output contains no providers or hooks and can be fed back as a
    /// definition to build an equivalent schema.
    pub fn realize(&self) -> Result<Value, SchemaError> {
        let rules = self.rules()?;

        let mut attrs = Map::new();
        attrs.insert("display_name".to_string(), Value::String(self.display_name.clone()));
        if let Some(description) = &self.description {
            attrs.insert("description".to_string(), Value::String(description.clone()));
        }
        attrs.insert("type".to_string(), Value::String(self.node_type().as_str().to_string()));
        attrs.insert("allow_none".to_string(), Value::Bool(self.allow_none));
        if let Some(verbatim) = &self.verbatim {
            attrs.insert("verbatim".to_string(), verbatim.clone());
        }
        if let Some(hook) = &self.custom_validation {
            attrs.insert(
                "custom_validation".to_string(),
                json!({
                    "enabled": true,
                    "name": hook.name(),
                    "info": hook.info(),
                }),
            );
        }

        match rules {
            Rules::Any => {}
            Rules::String(rules) => rules.realize_into(&mut attrs),
            Rules::Number(rules) => rules.realize_into(&mut attrs),
            Rules::Boolean(labels) => labels.realize_into(&mut attrs),
            Rules::List(rules) => rules.realize_into(&mut attrs)?,
            Rules::Map(rules) => rules.realize_into(&mut attrs)?,
        }
        Ok(Value::Object(attrs))
    }
}

/// Shape check for node-valued fields: a map definition becomes a node at
/// `level`.
pub(crate) fn node_literal(
    level: String,
    resolver: &Arc<Resolver>,
) -> impl FnOnce(&Definition) -> Option<Result<Arc<SchemaNode>, SchemaError>> + '_ {
    move |def| match def {
        Definition::Map(_) => Some(SchemaNode::create(level, def, resolver).map(Arc::new)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn build(value: Value) -> Result<SchemaNode, SchemaError> {
        SchemaNode::create("root".to_string(), &Definition::from(value), &Arc::new(Resolver::new()))
    }

    #[test]
    fn type_defaults_to_map() {
        let node = build(json!({"display_name": "Top"})).unwrap();
        assert_eq!(node.node_type(), NodeType::Map);
        assert_eq!(node.path(), "root(Top)");
        assert_eq!(node.level(), "root");
    }

    #[test]
    fn unknown_type_rejected() {
        let err = build(json!({"type": "date", "display_name": "D"})).unwrap_err();
        assert!(matches!(err, SchemaError::UnknownType { ref type_name, .. } if type_name == "date"));
    }

    #[test]
    fn display_name_is_mandatory() {
        let err = build(json!({"type": "string"})).unwrap_err();
        assert!(matches!(err, SchemaError::MissingDisplayName { ref path } if path == "root"));
    }

    #[test]
    fn leftover_keys_rejected_with_names() {
        let err = build(json!({
            "type": "string",
            "display_name": "S",
            "alowed_values": ["a"]
        }))
        .unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid entries (alowed_values) in schema at level root for type string"
        );
    }

    #[test]
    fn variant_keys_do_not_leak_across_types() {
        let err = build(json!({
            "type": "number",
            "display_name": "N",
            "allowed_pattern": "x"
        }))
        .unwrap_err();
        assert!(matches!(err, SchemaError::InvalidEntries { node_type: "number", .. }));
    }

    #[test]
    fn list_requires_value_schema() {
        let err = build(json!({"type": "list", "display_name": "L"})).unwrap_err();
        assert!(matches!(err, SchemaError::MissingValueSchema { .. }));
    }

    #[test]
    fn inverted_bounds_rejected_at_construction() {
        let err = build(json!({
            "type": "number",
            "display_name": "N",
            "minimum_value": 10,
            "maximum_value": 1
        }))
        .unwrap_err();
        assert!(matches!(err, SchemaError::InvertedBounds { .. }));

        let err = build(json!({
            "type": "list",
            "display_name": "L",
            "value_schema": {"type": "any", "display_name": "A"},
            "minimum_size": 3,
            "maximum_size": 2
        }))
        .unwrap_err();
        assert!(matches!(err, SchemaError::InvertedBounds { lower: "minimum_size", .. }));
    }

    #[test]
    fn unknown_children_need_value_schema() {
        let err = build(json!({"display_name": "M", "allow_unknown_children": true})).unwrap_err();
        assert!(matches!(err, SchemaError::UnknownChildrenWithoutValueSchema { .. }));
    }

    #[test]
    fn null_known_child_needs_value_schema() {
        let err = build(json!({"display_name": "M", "known_children": {"a": null}})).unwrap_err();
        assert!(matches!(err, SchemaError::MissingChildSchema { ref name, .. } if name == "a"));
    }

    #[test]
    fn child_levels() {
        let node = build(json!({
            "display_name": "M",
            "value_schema": {"type": "list", "display_name": "Items",
                "value_schema": {"type": "string", "display_name": "Item"}},
            "known_children": {"a": {"type": "number", "display_name": "A NUM"}}
        }))
        .unwrap();
        let Rules::Map(rules) = node.rules().unwrap() else {
            panic!("expected map rules");
        };
        let a = rules.known_children["a"].as_ref().unwrap();
        assert_eq!(a.path(), "root.a(A NUM)");
        let items = rules.value_schema.as_ref().unwrap();
        assert_eq!(items.path(), "root.<name>(Items)");
        let Rules::List(list) = items.rules().unwrap() else {
            panic!("expected list rules");
        };
        assert_eq!(list.value_schema.path(), "root.<name>[i](Item)");
    }

    #[test]
    fn realization_is_cached() {
        let node = build(json!({"type": "any", "display_name": "A"})).unwrap();
        assert!(!node.is_realized());
        let first = node.realize().unwrap();
        assert!(node.is_realized());
        assert_eq!(node.realize().unwrap(), first);
        assert_eq!(first, json!({"display_name": "A", "type": "any", "allow_none": false}));
    }

    #[test]
    fn hook_marker_round_trips_as_no_hook() {
        let hook = CustomValidation::new("never", |_| Vec::new()).with_info("Never complains.");
        let def = Definition::map()
            .insert("type", "string")
            .insert("display_name", "S")
            .insert("custom_validation", hook);
        let node = SchemaNode::create("root".to_string(), &def, &Arc::new(Resolver::new())).unwrap();
        let realized = node.realize().unwrap();
        assert_eq!(
            realized["custom_validation"],
            json!({"enabled": true, "name": "never", "info": "Never complains."})
        );

        let rebuilt = build(realized).unwrap();
        assert!(rebuilt.custom_validation().is_none());
    }

    #[test]
    fn custom_validation_map_without_marker_rejected() {
        let err = build(json!({
            "type": "string",
            "display_name": "S",
            "custom_validation": {"foo": 1}
        }))
        .unwrap_err();
        assert!(matches!(err, SchemaError::InvalidField { field: "custom_validation", .. }));
    }

    #[test]
    fn non_map_definition_rejected() {
        let err = build(json!(["not", "a", "map"])).unwrap_err();
        assert!(matches!(err, SchemaError::InvalidField { field: "definition", .. }));
    }
}
