//! # Presentation Surface
//!
//! Read-only facts a documentation renderer needs about each node. The
//! renderer itself (templates, markup) lives outside this crate.

use std::sync::Arc;

use indexmap::IndexMap;

use dynschema_core::SchemaError;

use crate::node::{any, NodeType, Rules, SchemaNode};

impl SchemaNode {
    /// Short glyph identifying the variant.
    pub fn decoration(&self) -> &'static str {
        match self.node_type() {
            NodeType::Any => "*",
            NodeType::String => "a",
            NodeType::Number => "1",
            NodeType::Boolean => "✓",
            NodeType::List => "[ ]",
            NodeType::Map => "{ }",
        }
    }

    /// Lists and maps have children worth documenting.
    pub fn should_document_children(&self) -> bool {
        matches!(self.node_type(), NodeType::List | NodeType::Map)
    }

    /// `(label, child)` pairs in documentation order. Realizes the node.
    ///
    /// A list yields its element schema as `N/A`. A map yields its value
    /// schema as `<Name>` followed by every known child that has its own
    /// schema, in declaration order.
    pub fn documented_children(&self) -> Result<Vec<(String, Arc<SchemaNode>)>, SchemaError> {
        let children = match self.rules()? {
            Rules::List(rules) => vec![("N/A".to_string(), Arc::clone(&rules.value_schema))],
            Rules::Map(rules) => rules
                .value_schema
                .iter()
                .map(|schema| ("<Name>".to_string(), Arc::clone(schema)))
                .chain(
                    rules
                        .known_children
                        .iter()
                        .filter_map(|(name, child)| child.as_ref().map(|c| (name.clone(), Arc::clone(c)))),
                )
                .collect(),
            _ => Vec::new(),
        };
        Ok(children)
    }

    /// Variant-specific facts, keyed by tag name. Realizes the node.
    pub fn doc_tags(&self) -> Result<IndexMap<String, String>, SchemaError> {
        let mut tags = IndexMap::new();
        match self.rules()? {
            Rules::Any => any::doc_tags(&mut tags),
            Rules::String(rules) => rules.doc_tags(&mut tags),
            Rules::Number(rules) => rules.doc_tags(&mut tags),
            Rules::Boolean(labels) => labels.doc_tags(&mut tags),
            Rules::List(rules) => rules.doc_tags(&mut tags),
            Rules::Map(rules) => rules.doc_tags(&mut tags),
        }
        Ok(tags)
    }

    /// Link target: the positional path with `.` replaced by `_`.
    pub fn anchor(&self) -> String {
        self.level().replace('.', "_")
    }
}
