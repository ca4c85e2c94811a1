//! String nodes: optional allowed-value set and an optional pattern that
//! must match from the start of the string.

use indexmap::IndexMap;
use regex::Regex;
use serde_json::{Map, Value};

use dynschema_core::{Resolver, SchemaError};

use super::fields::Fields;
use crate::lazy::{string_list_literal, FieldSpec, Lazy};

pub(crate) const KEYS: &[&str] = &["allowed_values", "allowed_pattern"];

/// A compiled `allowed_pattern`, anchored at the start of the input.
#[derive(Clone, Debug)]
pub(crate) struct Pattern {
    source: String,
    regex: Regex,
}

impl Pattern {
    fn compile(source: &str, path: &str) -> Result<Self, SchemaError> {
        let invalid = |e: regex::Error| SchemaError::InvalidPattern {
            path: path.to_string(),
            pattern: source.to_string(),
            reason: e.to_string(),
        };
        // the bare source must parse on its own before it is wrapped
        Regex::new(source).map_err(invalid)?;
        let regex = Regex::new(&format!("^(?:{source})")).map_err(invalid)?;
        Ok(Self {
            source: source.to_string(),
            regex,
        })
    }

    pub(crate) fn source(&self) -> &str {
        &self.source
    }

    fn matches(&self, data: &str) -> bool {
        self.regex.is_match(data)
    }
}

#[derive(Debug)]
pub(crate) struct StringNode {
    allowed_values: Option<Lazy<Vec<String>>>,
    pattern: Option<Pattern>,
}

#[derive(Clone, Debug)]
pub(crate) struct StringRules {
    allowed_values: Vec<String>,
    pattern: Option<Pattern>,
}

fn allowed_values_field(path: &str) -> FieldSpec<'_> {
    FieldSpec {
        name: "allowed_values",
        expected: "list",
        path,
    }
}

impl StringNode {
    pub(crate) fn build(fields: &Fields<'_>) -> Result<Self, SchemaError> {
        let field = allowed_values_field(fields.path());
        let allowed_values = fields
            .get("allowed_values")
            .map(|raw| Lazy::classify(raw, &field, string_list_literal(&field)))
            .transpose()?;

        let pattern = match fields.string("allowed_pattern")? {
            Some(source) if !source.is_empty() => Some(Pattern::compile(&source, fields.path())?),
            _ => None,
        };

        Ok(Self {
            allowed_values,
            pattern,
        })
    }

    pub(crate) fn deferred_fields(&self) -> usize {
        usize::from(self.allowed_values.as_ref().is_some_and(Lazy::is_deferred))
    }

    pub(crate) fn resolve(&self, resolver: &Resolver, path: &str) -> Result<StringRules, SchemaError> {
        let field = allowed_values_field(path);
        let allowed_values = match &self.allowed_values {
            Some(lazy) => lazy.resolve(resolver, &field, string_list_literal(&field))?,
            None => Vec::new(),
        };
        Ok(StringRules {
            allowed_values,
            pattern: self.pattern.clone(),
        })
    }
}

impl StringRules {
    /// Both checks run independently; either, both, or neither may fire.
    pub(crate) fn check(&self, data: &str, path: &str, out: &mut Vec<String>) {
        if !self.allowed_values.is_empty() && !self.allowed_values.iter().any(|v| v == data) {
            out.push(format!(
                "{data} is not an allowed value for {path}. Expect it to be one of: {}",
                self.allowed_values.join(",")
            ));
        }

        if let Some(pattern) = &self.pattern {
            if !pattern.matches(data) {
                out.push(format!(
                    "{data} doesn't match expression {} at {path}",
                    pattern.source()
                ));
            }
        }
    }

    pub(crate) fn realize_into(&self, attrs: &mut Map<String, Value>) {
        if !self.allowed_values.is_empty() {
            attrs.insert(
                "allowed_values".to_string(),
                Value::Array(self.allowed_values.iter().cloned().map(Value::String).collect()),
            );
        }
        if let Some(pattern) = &self.pattern {
            attrs.insert(
                "allowed_pattern".to_string(),
                Value::String(pattern.source().to_string()),
            );
        }
    }

    pub(crate) fn doc_tags(&self, tags: &mut IndexMap<String, String>) {
        if !self.allowed_values.is_empty() {
            tags.insert("Allowed Values".to_string(), self.allowed_values.join(", "));
        }
        if let Some(pattern) = &self.pattern {
            tags.insert("Allowed Pattern".to_string(), pattern.source().to_string());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rules(allowed: &[&str], pattern: Option<&str>) -> StringRules {
        StringRules {
            allowed_values: allowed.iter().map(|s| s.to_string()).collect(),
            pattern: pattern.map(|p| Pattern::compile(p, "root(S)").unwrap()),
        }
    }

    #[test]
    fn pattern_matches_from_start_only() {
        let pattern = Pattern::compile("[a-z]+", "root(S)").unwrap();
        assert!(pattern.matches("abc123"));
        assert!(!pattern.matches("123abc"));
    }

    #[test]
    fn alternation_stays_anchored() {
        let pattern = Pattern::compile("foo|bar", "root(S)").unwrap();
        assert!(pattern.matches("barn"));
        assert!(!pattern.matches("xbar"));
    }

    #[test]
    fn invalid_pattern_is_a_schema_error() {
        let err = Pattern::compile("(unclosed", "root(S)").unwrap_err();
        assert!(matches!(err, SchemaError::InvalidPattern { .. }));
    }

    #[test]
    fn unbalanced_group_cannot_escape_anchor() {
        let err = Pattern::compile("a)|(b", "root(S)").unwrap_err();
        assert!(matches!(err, SchemaError::InvalidPattern { ref pattern, .. } if pattern == "a)|(b"));
    }

    #[test]
    fn both_checks_fire_independently() {
        let mut out = Vec::new();
        rules(&["a", "b"], Some("[a-z]")).check("9", "root(S)", &mut out);
        assert_eq!(out.len(), 2);
        assert_eq!(
            out[0],
            "9 is not an allowed value for root(S). Expect it to be one of: a,b"
        );
        assert_eq!(out[1], "9 doesn't match expression [a-z] at root(S)");
    }

    #[test]
    fn empty_allowed_values_accepts_anything() {
        let mut out = Vec::new();
        rules(&[], None).check("anything", "root(S)", &mut out);
        assert!(out.is_empty());
    }

    #[test]
    fn doc_tags_render_constraints() {
        let mut tags = IndexMap::new();
        rules(&["a", "b"], Some("^x")).doc_tags(&mut tags);
        assert_eq!(tags["Allowed Values"], "a, b");
        assert_eq!(tags["Allowed Pattern"], "^x");
    }
}
