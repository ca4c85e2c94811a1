//! Typed readers over one level of a raw definition.
//!
//! Each node variant declares the keys it recognizes. The factory reads
//! through [`Fields`] and then asks for the leftover keys instead of
//! mutating the definition.

use indexmap::{IndexMap, IndexSet};

use dynschema_core::{Definition, SchemaError};

/// Keys every node variant understands.
pub(crate) const COMMON_KEYS: &[&str] = &[
    "type",
    "display_name",
    "description",
    "allow_none",
    "verbatim",
    "custom_validation",
];

pub(crate) struct Fields<'a> {
    entries: &'a IndexMap<String, Definition>,
    path: &'a str,
}

impl<'a> Fields<'a> {
    pub(crate) fn new(entries: &'a IndexMap<String, Definition>, path: &'a str) -> Self {
        Self { entries, path }
    }

    pub(crate) fn path(&self) -> &'a str {
        self.path
    }

    /// The definition under `key`. Explicit nulls read as absent.
    pub(crate) fn get(&self, key: &str) -> Option<&'a Definition> {
        self.entries.get(key).filter(|d| !d.is_null())
    }

    pub(crate) fn string(&self, key: &'static str) -> Result<Option<String>, SchemaError> {
        match self.get(key) {
            None => Ok(None),
            Some(Definition::String(s)) => Ok(Some(s.clone())),
            Some(other) => Err(self.invalid(key, "a string", other)),
        }
    }

    /// A boolean-like option; see [`parse_bool_like`].
    pub(crate) fn boolean(&self, key: &'static str) -> Result<Option<bool>, SchemaError> {
        match self.get(key) {
            None => Ok(None),
            Some(def) => parse_bool_like(def).map(Some).ok_or_else(|| SchemaError::InvalidBoolean {
                path: self.path.to_string(),
                field: key,
                value: render(def),
            }),
        }
    }

    /// A non-negative integer.
    pub(crate) fn size(&self, key: &'static str) -> Result<Option<usize>, SchemaError> {
        match self.get(key) {
            None => Ok(None),
            Some(def) => def
                .as_number()
                .and_then(|n| n.as_u64())
                .and_then(|n| usize::try_from(n).ok())
                .map(Some)
                .ok_or_else(|| self.invalid(key, "a non-negative integer", def)),
        }
    }

    /// A list of strings, deduplicated, declaration order kept.
    pub(crate) fn string_set(&self, key: &'static str) -> Result<IndexSet<String>, SchemaError> {
        let Some(def) = self.get(key) else {
            return Ok(IndexSet::new());
        };
        let items = def
            .as_list()
            .ok_or_else(|| self.invalid(key, "a list of strings", def))?;
        items
            .iter()
            .map(|item| {
                item.as_str()
                    .map(str::to_string)
                    .ok_or_else(|| self.invalid(key, "a list of strings", item))
            })
            .collect()
    }

    /// Keys not in `COMMON_KEYS` or `recognized`, in declaration order.
    pub(crate) fn leftovers(&self, recognized: &[&str]) -> Vec<String> {
        self.entries
            .keys()
            .filter(|k| !COMMON_KEYS.contains(&k.as_str()) && !recognized.contains(&k.as_str()))
            .cloned()
            .collect()
    }

    pub(crate) fn invalid(&self, key: &'static str, expected: &'static str, found: &Definition) -> SchemaError {
        SchemaError::InvalidField {
            path: self.path.to_string(),
            field: key,
            expected,
            actual: found.kind().to_string(),
        }
    }
}

/// Interpret `true`/`false`, `1`/`0`, `"true"`/`"false"` and
/// `"True"`/`"False"` as booleans.
pub(crate) fn parse_bool_like(def: &Definition) -> Option<bool> {
    match def {
        Definition::Bool(b) => Some(*b),
        Definition::Number(n) => match n.as_f64() {
            Some(v) if v == 0.0 => Some(false),
            Some(v) if v == 1.0 => Some(true),
            _ => None,
        },
        Definition::String(s) => match s.as_str() {
            "true" | "True" => Some(true),
            "false" | "False" => Some(false),
            _ => None,
        },
        _ => None,
    }
}

fn render(def: &Definition) -> String {
    def.to_literal("boolean option")
        .map(|v| v.to_string())
        .unwrap_or_else(|_| def.kind().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn entries(value: serde_json::Value) -> IndexMap<String, Definition> {
        match Definition::from(value) {
            Definition::Map(map) => map,
            other => panic!("expected map, got {}", other.kind()),
        }
    }

    #[test]
    fn bool_like_values() {
        for (input, expected) in [
            (json!(true), Some(true)),
            (json!(0), Some(false)),
            (json!(1), Some(true)),
            (json!("True"), Some(true)),
            (json!("false"), Some(false)),
            (json!("yes"), None),
            (json!(2), None),
        ] {
            assert_eq!(parse_bool_like(&Definition::from(input.clone())), expected, "{input}");
        }
    }

    #[test]
    fn invalid_boolean_option() {
        let map = entries(json!({"unique": "maybe"}));
        let fields = Fields::new(&map, "root(List)");
        let err = fields.boolean("unique").unwrap_err();
        assert!(matches!(err, SchemaError::InvalidBoolean { field: "unique", .. }));
        assert!(err.to_string().contains("\"maybe\""));
    }

    #[test]
    fn null_reads_as_absent() {
        let map = entries(json!({"description": null, "minimum_size": null}));
        let fields = Fields::new(&map, "root");
        assert_eq!(fields.string("description").unwrap(), None);
        assert_eq!(fields.size("minimum_size").unwrap(), None);
    }

    #[test]
    fn negative_size_rejected() {
        let map = entries(json!({"minimum_size": -1}));
        let fields = Fields::new(&map, "root");
        assert!(matches!(
            fields.size("minimum_size"),
            Err(SchemaError::InvalidField { field: "minimum_size", .. })
        ));
    }

    #[test]
    fn string_set_dedups_in_order() {
        let map = entries(json!({"mandatory_children": ["b", "a", "b"]}));
        let fields = Fields::new(&map, "root");
        let set = fields.string_set("mandatory_children").unwrap();
        assert_eq!(set.into_iter().collect::<Vec<_>>(), ["b", "a"]);
    }

    #[test]
    fn leftovers_skip_common_and_recognized() {
        let map = entries(json!({
            "type": "string",
            "display_name": "S",
            "alowed_values": ["x"],
            "allowed_pattern": "^a",
            "colour": "red"
        }));
        let fields = Fields::new(&map, "root");
        assert_eq!(fields.leftovers(&["allowed_values", "allowed_pattern"]), ["alowed_values", "colour"]);
    }
}
