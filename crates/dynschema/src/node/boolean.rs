//! Boolean nodes. The labels are display-only; the type check already
//! constrains the data.

use indexmap::IndexMap;
use serde_json::{Map, Value};

use dynschema_core::SchemaError;

use super::fields::Fields;

pub(crate) const KEYS: &[&str] = &["true_value", "false_value"];

#[derive(Clone, Debug)]
pub(crate) struct BooleanLabels {
    true_value: String,
    false_value: String,
}

impl BooleanLabels {
    pub(crate) fn build(fields: &Fields<'_>) -> Result<Self, SchemaError> {
        Ok(Self {
            true_value: fields.string("true_value")?.unwrap_or_else(|| "True".to_string()),
            false_value: fields.string("false_value")?.unwrap_or_else(|| "False".to_string()),
        })
    }

    pub(crate) fn realize_into(&self, attrs: &mut Map<String, Value>) {
        attrs.insert("true_value".to_string(), Value::String(self.true_value.clone()));
        attrs.insert("false_value".to_string(), Value::String(self.false_value.clone()));
    }

    pub(crate) fn doc_tags(&self, tags: &mut IndexMap<String, String>) {
        tags.insert("True Value".to_string(), self.true_value.clone());
        tags.insert("False Value".to_string(), self.false_value.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dynschema_core::Definition;
    use serde_json::json;

    fn labels(value: serde_json::Value) -> Result<BooleanLabels, SchemaError> {
        let def = Definition::from(value);
        let map = def.as_map().cloned().unwrap_or_default();
        BooleanLabels::build(&Fields::new(&map, "root(B)"))
    }

    #[test]
    fn defaults() {
        let labels = labels(json!({})).unwrap();
        let mut attrs = Map::new();
        labels.realize_into(&mut attrs);
        assert_eq!(Value::Object(attrs), json!({"true_value": "True", "false_value": "False"}));
    }

    #[test]
    fn custom_labels_in_doc_tags() {
        let labels = labels(json!({"true_value": "On", "false_value": "Off"})).unwrap();
        let mut tags = IndexMap::new();
        labels.doc_tags(&mut tags);
        assert_eq!(tags["True Value"], "On");
        assert_eq!(tags["False Value"], "Off");
    }

    #[test]
    fn non_string_label_rejected() {
        assert!(matches!(
            labels(json!({"true_value": 1})),
            Err(SchemaError::InvalidField { field: "true_value", .. })
        ));
    }
}
