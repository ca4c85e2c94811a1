//! # Schema Definitions
//!
//! The raw, loosely-typed description of a schema as handed to the node
//! factory. A [`Definition`] is a JSON-like tree with two extra leaf kinds:
//!
//! - [`Provider`]: a zero-argument closure standing in for a value that is
//!   computed lazily (a *deferred fragment*).
//! - [`CustomValidation`]: a named hook invoked with the data under
//!   validation.
//!
//! Definitions are never mutated by the factory. Nodes read the keys they
//! recognize and the factory reports whatever is left over.

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use serde_json::{Number, Value};

use crate::error::{BoxError, SchemaError};

type ProviderFn = dyn Fn() -> Result<Definition, BoxError> + Send + Sync;
type HookFn = dyn Fn(&Value) -> Result<Vec<String>, BoxError> + Send + Sync;

// ─── Provider ────────────────────────────────────────────────────────

/// A deferred fragment: computes a definition on demand.
///
/// Invoked at most once per field by the realization step; the result is
/// cached by the node that owns the field.
#[derive(Clone)]
pub struct Provider {
    func: Arc<ProviderFn>,
}

impl Provider {
    /// Wrap an infallible closure.
    pub fn new<F>(f: F) -> Self
    where
        F: Fn() -> Definition + Send + Sync + 'static,
    {
        Self {
            func: Arc::new(move || Ok(f())),
        }
    }

    /// Wrap a closure that may fail.
    pub fn fallible<F>(f: F) -> Self
    where
        F: Fn() -> Result<Definition, BoxError> + Send + Sync + 'static,
    {
        Self { func: Arc::new(f) }
    }

    /// A provider that always yields a clone of `definition`.
    pub fn constant(definition: Definition) -> Self {
        Self::new(move || definition.clone())
    }

    /// Invoke the provider.
    pub fn call(&self) -> Result<Definition, BoxError> {
        (self.func)()
    }
}

impl fmt::Debug for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("<provider>")
    }
}

// ─── Custom Validation ───────────────────────────────────────────────

/// A named validation hook run after the structural checks of a node.
///
/// The hook receives the data only when it is non-null and of the node's
/// expected kind. Each returned string becomes one violation, prefixed by
/// the hook name and suffixed by the node path.
#[derive(Clone)]
pub struct CustomValidation {
    name: String,
    info: Option<String>,
    func: Arc<HookFn>,
}

impl CustomValidation {
    /// Create a hook from an infallible closure.
    pub fn new<F>(name: impl Into<String>, f: F) -> Self
    where
        F: Fn(&Value) -> Vec<String> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            info: None,
            func: Arc::new(move |data| Ok(f(data))),
        }
    }

    /// Create a hook from a closure that may fail. A failure aborts the
    /// surrounding `validate` call.
    pub fn fallible<F>(name: impl Into<String>, f: F) -> Self
    where
        F: Fn(&Value) -> Result<Vec<String>, BoxError> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            info: None,
            func: Arc::new(f),
        }
    }

    /// Attach descriptive text, reported by realization.
    pub fn with_info(mut self, info: impl Into<String>) -> Self {
        self.info = Some(info.into());
        self
    }

    /// The hook's identity, used as the violation prefix.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Descriptive text, if any.
    pub fn info(&self) -> Option<&str> {
        self.info.as_deref()
    }

    /// Run the hook against `data`.
    pub fn check(&self, data: &Value) -> Result<Vec<String>, BoxError> {
        (self.func)(data)
    }
}

impl fmt::Debug for CustomValidation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<hook {}>", self.name)
    }
}

// ─── Definition ──────────────────────────────────────────────────────

/// One level of a raw schema definition.
#[derive(Clone, Debug)]
pub enum Definition {
    /// Explicit null.
    Null,
    /// Boolean literal.
    Bool(bool),
    /// Numeric literal.
    Number(Number),
    /// String literal. In a deferrable field that expects something else,
    /// a string is a symbolic name looked up in the resolver.
    String(String),
    /// Ordered list.
    List(Vec<Definition>),
    /// Ordered mapping from key to definition.
    Map(IndexMap<String, Definition>),
    /// Deferred fragment.
    Provider(Provider),
    /// Custom validation hook.
    Hook(CustomValidation),
}

impl Definition {
    /// An empty map definition.
    pub fn map() -> Self {
        Definition::Map(IndexMap::new())
    }

    /// A deferred fragment computed by `f`.
    pub fn provider<F>(f: F) -> Self
    where
        F: Fn() -> Definition + Send + Sync + 'static,
    {
        Definition::Provider(Provider::new(f))
    }

    /// A deferred fragment computed by a fallible `f`.
    pub fn try_provider<F>(f: F) -> Self
    where
        F: Fn() -> Result<Definition, BoxError> + Send + Sync + 'static,
    {
        Definition::Provider(Provider::fallible(f))
    }

    /// Embed a custom validation hook.
    pub fn hook(hook: CustomValidation) -> Self {
        Definition::Hook(hook)
    }

    /// Add `key` to a map definition, builder style.
    ///
    /// Called on anything other than a map, the receiver is replaced by a
    /// map holding only the new entry.
    pub fn insert(self, key: impl Into<String>, value: impl Into<Definition>) -> Self {
        let mut map = match self {
            Definition::Map(map) => map,
            _ => IndexMap::new(),
        };
        map.insert(key.into(), value.into());
        Definition::Map(map)
    }

    /// Short kind name used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Definition::Null => "null",
            Definition::Bool(_) => "boolean",
            Definition::Number(_) => "number",
            Definition::String(_) => "string",
            Definition::List(_) => "list",
            Definition::Map(_) => "map",
            Definition::Provider(_) => "provider",
            Definition::Hook(_) => "hook",
        }
    }

    /// True for [`Definition::Null`].
    pub fn is_null(&self) -> bool {
        matches!(self, Definition::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Definition::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&IndexMap<String, Definition>> {
        match self {
            Definition::Map(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Definition]> {
        match self {
            Definition::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<&Number> {
        match self {
            Definition::Number(n) => Some(n),
            _ => None,
        }
    }

    /// Convert a closure-free definition into a plain JSON value.
    ///
    /// `context` names what is being converted and appears in the error.
    pub fn to_literal(&self, context: &str) -> Result<Value, SchemaError> {
        Ok(match self {
            Definition::Null => Value::Null,
            Definition::Bool(b) => Value::Bool(*b),
            Definition::Number(n) => Value::Number(n.clone()),
            Definition::String(s) => Value::String(s.clone()),
            Definition::List(items) => Value::Array(
                items
                    .iter()
                    .map(|item| item.to_literal(context))
                    .collect::<Result<_, _>>()?,
            ),
            Definition::Map(map) => {
                let mut out = serde_json::Map::with_capacity(map.len());
                for (key, value) in map {
                    out.insert(key.clone(), value.to_literal(context)?);
                }
                Value::Object(out)
            }
            Definition::Provider(_) | Definition::Hook(_) => {
                return Err(SchemaError::NotLiteral {
                    context: context.to_string(),
                    kind: self.kind(),
                })
            }
        })
    }
}

impl Default for Definition {
    fn default() -> Self {
        Definition::map()
    }
}

// ─── Conversions ─────────────────────────────────────────────────────

impl From<Value> for Definition {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => Definition::Null,
            Value::Bool(b) => Definition::Bool(b),
            Value::Number(n) => Definition::Number(n),
            Value::String(s) => Definition::String(s),
            Value::Array(items) => Definition::List(items.into_iter().map(Into::into).collect()),
            Value::Object(map) => {
                Definition::Map(map.into_iter().map(|(k, v)| (k, v.into())).collect())
            }
        }
    }
}

impl From<&str> for Definition {
    fn from(s: &str) -> Self {
        Definition::String(s.to_string())
    }
}

impl From<String> for Definition {
    fn from(s: String) -> Self {
        Definition::String(s)
    }
}

impl From<bool> for Definition {
    fn from(b: bool) -> Self {
        Definition::Bool(b)
    }
}

impl From<i64> for Definition {
    fn from(n: i64) -> Self {
        Definition::Number(n.into())
    }
}

impl From<u64> for Definition {
    fn from(n: u64) -> Self {
        Definition::Number(n.into())
    }
}

/// Non-finite floats have no literal form and become [`Definition::Null`].
impl From<f64> for Definition {
    fn from(n: f64) -> Self {
        Number::from_f64(n).map_or(Definition::Null, Definition::Number)
    }
}

impl From<Vec<Definition>> for Definition {
    fn from(items: Vec<Definition>) -> Self {
        Definition::List(items)
    }
}

impl From<Provider> for Definition {
    fn from(provider: Provider) -> Self {
        Definition::Provider(provider)
    }
}

impl From<CustomValidation> for Definition {
    fn from(hook: CustomValidation) -> Self {
        Definition::Hook(hook)
    }
}

impl<K: Into<String>> FromIterator<(K, Definition)> for Definition {
    fn from_iter<I: IntoIterator<Item = (K, Definition)>>(iter: I) -> Self {
        Definition::Map(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}
