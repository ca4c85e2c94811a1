//! # Validation Engine
//!
//! Walks a node tree in lock-step with a data tree and accumulates
//! violation messages. Bad data never produces an `Err`; only a broken
//! schema does (a deferred fragment that cannot be realized, or a custom
//! hook that fails).
//!
//! Per node, in order:
//!
//! 1. Realize the node if it has not been realized yet.
//! 2. Null data yields nothing when `allow_none` is set and one violation
//!    otherwise.
//! 3. Data of the wrong kind yields one type-mismatch violation and stops
//!    there; no structural check runs on it.
//! 4. The variant's structural check runs, recursing into children.
//! 5. The custom hook, if any, runs on the data; each message it returns is
//!    prefixed with the hook name and suffixed with the node path.

use serde_json::Value;

use dynschema_core::SchemaError;

use crate::node::{Rules, SchemaNode};
use crate::violations::Violations;

impl SchemaNode {
    /// Validate `data` against this node and everything below it.
    pub fn validate(&self, data: &Value) -> Result<Violations, SchemaError> {
        let mut out = Vec::new();
        self.validate_into(data, &mut out)?;
        Ok(Violations::new(out))
    }

    pub(crate) fn validate_into(&self, data: &Value, out: &mut Vec<String>) -> Result<(), SchemaError> {
        let rules = self.rules()?;
        let path = self.path();
        tracing::trace!(path, data_kind = value_kind(data), "validating");

        if data.is_null() {
            if !self.allow_none() {
                out.push(format!("Null is not allowed at level {path}"));
            }
            return Ok(());
        }

        match (rules, data) {
            (Rules::Any, _) | (Rules::Boolean(_), Value::Bool(_)) => {}
            (Rules::String(rules), Value::String(s)) => rules.check(s, path, out),
            (Rules::Number(rules), Value::Number(n)) => rules.check(n, path, out),
            (Rules::List(rules), Value::Array(items)) => rules.check(items, path, out)?,
            (Rules::Map(rules), Value::Object(_)) => rules.check(data, path, out)?,
            (Rules::Map(rules), Value::Array(_)) if self.accepts_list_of_maps() => {
                rules.check(data, path, out)?
            }
            _ => {
                out.push(type_mismatch(self.expected_kind(), data, path));
                return Ok(());
            }
        }

        if let Some(hook) = self.custom_validation() {
            let messages = hook.check(data).map_err(|source| SchemaError::HookFailed {
                path: path.to_string(),
                hook: hook.name().to_string(),
                source,
            })?;
            out.extend(
                messages
                    .into_iter()
                    .map(|message| format!("{}: {message} at {path}", hook.name())),
            );
        }
        Ok(())
    }

    fn expected_kind(&self) -> &'static str {
        if self.accepts_list_of_maps() {
            "map or list"
        } else {
            self.node_type().as_str()
        }
    }
}

/// Kind name of a data value, as used in type-mismatch messages.
pub(crate) fn value_kind(data: &Value) -> &'static str {
    match data {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "list",
        Value::Object(_) => "map",
    }
}

pub(crate) fn type_mismatch(expected: &str, data: &Value, path: &str) -> String {
    format!(
        "Expecting value to be {expected} but got {} for {path}",
        value_kind(data)
    )
}

/// Strings render bare, everything else as compact JSON.
pub(crate) fn display_value(data: &Value) -> String {
    match data {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn kinds() {
        assert_eq!(value_kind(&json!(null)), "null");
        assert_eq!(value_kind(&json!(1.5)), "number");
        assert_eq!(value_kind(&json!([1])), "list");
        assert_eq!(value_kind(&json!({"a": 1})), "map");
    }

    #[test]
    fn mismatch_message() {
        assert_eq!(
            type_mismatch("number", &json!("ten"), "root(N)"),
            "Expecting value to be number but got string for root(N)"
        );
    }

    #[test]
    fn display_values() {
        assert_eq!(display_value(&json!("x")), "x");
        assert_eq!(display_value(&json!(5)), "5");
        assert_eq!(display_value(&json!({"a": [1, 2]})), r#"{"a":[1,2]}"#);
    }
}
