//! # Lazy Realization
//!
//! A deferrable field (`known_children`, `value_schema`, `minimum_value`,
//! `maximum_value`, `allowed_values`) holds either a literal of the expected
//! shape or a [`Fragment`] that produces one on demand.
//!
//! Resolution order for a field:
//!
//! 1. A literal of the expected shape is used as-is.
//! 2. A [`Provider`] is invoked with no arguments.
//! 3. A string is a symbolic name; the provider registered under that name
//!    in the schema's [`Resolver`] is invoked.
//! 4. Anything else is rejected when the node is constructed.
//!
//! The produced definition must have the expected shape, otherwise
//! realization fails with [`SchemaError::FragmentTypeMismatch`]. Memoization
//! happens one level up: a node resolves all of its fields once and caches
//! the result (see `SchemaNode::rules`).

use dynschema_core::{Definition, Provider, Resolver, SchemaError};
use serde_json::Number;

/// A value that is computed when the owning node is realized.
#[derive(Clone, Debug)]
pub(crate) enum Fragment {
    Provider(Provider),
    Named(String),
}

impl Fragment {
    fn produce(&self, resolver: &Resolver, field: &FieldSpec<'_>) -> Result<Definition, SchemaError> {
        let provider = match self {
            Fragment::Provider(provider) => provider,
            Fragment::Named(name) => resolver.get(name).ok_or_else(|| SchemaError::UnknownProvider {
                path: field.path.to_string(),
                field: field.name,
                name: name.clone(),
            })?,
        };
        tracing::debug!(path = field.path, field = field.name, "invoking provider");
        provider.call().map_err(|source| SchemaError::ProviderFailed {
            path: field.path.to_string(),
            field: field.name,
            source,
        })
    }
}

/// Identifies a deferrable field in error messages.
pub(crate) struct FieldSpec<'a> {
    pub(crate) name: &'static str,
    pub(crate) expected: &'static str,
    pub(crate) path: &'a str,
}

/// Either a ready literal or a fragment awaiting realization.
#[derive(Clone, Debug)]
pub(crate) enum Lazy<T> {
    Ready(T),
    Deferred(Fragment),
}

impl<T: Clone> Lazy<T> {
    /// Classify the raw definition of a field at construction time.
    ///
    /// `literal` converts a definition of the expected shape and returns
    /// `None` for anything else.
    pub(crate) fn classify<F>(raw: &Definition, field: &FieldSpec<'_>, literal: F) -> Result<Self, SchemaError>
    where
        F: FnOnce(&Definition) -> Option<Result<T, SchemaError>>,
    {
        if let Some(ready) = literal(raw) {
            return ready.map(Lazy::Ready);
        }
        match raw {
            Definition::Provider(provider) => Ok(Lazy::Deferred(Fragment::Provider(provider.clone()))),
            Definition::String(name) => Ok(Lazy::Deferred(Fragment::Named(name.clone()))),
            other => Err(SchemaError::UnresolvableFragment {
                path: field.path.to_string(),
                field: field.name,
                expected: field.expected,
                actual: other.kind(),
            }),
        }
    }

    /// The literal, if no realization is needed.
    pub(crate) fn ready(&self) -> Option<&T> {
        match self {
            Lazy::Ready(value) => Some(value),
            Lazy::Deferred(_) => None,
        }
    }

    pub(crate) fn is_deferred(&self) -> bool {
        matches!(self, Lazy::Deferred(_))
    }

    /// Produce the literal, invoking the fragment if there is one.
    pub(crate) fn resolve<F>(&self, resolver: &Resolver, field: &FieldSpec<'_>, literal: F) -> Result<T, SchemaError>
    where
        F: FnOnce(&Definition) -> Option<Result<T, SchemaError>>,
    {
        match self {
            Lazy::Ready(value) => Ok(value.clone()),
            Lazy::Deferred(fragment) => {
                let produced = fragment.produce(resolver, field)?;
                literal(&produced).unwrap_or_else(|| {
                    Err(SchemaError::FragmentTypeMismatch {
                        path: field.path.to_string(),
                        field: field.name,
                        expected: field.expected,
                        actual: produced.kind(),
                    })
                })
            }
        }
    }
}

/// Shape check for numeric bounds.
pub(crate) fn number_literal(def: &Definition) -> Option<Result<Number, SchemaError>> {
    def.as_number().map(|n| Ok(n.clone()))
}

/// Shape check for `allowed_values`: a list whose items are all strings.
pub(crate) fn string_list_literal<'a>(
    field: &'a FieldSpec<'a>,
) -> impl FnOnce(&Definition) -> Option<Result<Vec<String>, SchemaError>> + 'a {
    move |def| {
        let items = def.as_list()?;
        Some(
            items
                .iter()
                .map(|item| {
                    item.as_str().map(str::to_string).ok_or_else(|| SchemaError::InvalidField {
                        path: field.path.to_string(),
                        field: field.name,
                        expected: "a list of strings",
                        actual: item.kind().to_string(),
                    })
                })
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    const FIELD: FieldSpec<'static> = FieldSpec {
        name: "allowed_values",
        expected: "list",
        path: "root(Names)",
    };

    #[test]
    fn literal_is_ready() {
        let lazy = Lazy::classify(&json!(["a", "b"]).into(), &FIELD, string_list_literal(&FIELD)).unwrap();
        assert_eq!(lazy.ready().map(Vec::len), Some(2));
        assert!(!lazy.is_deferred());
    }

    #[test]
    fn string_is_symbolic_name() {
        let lazy: Lazy<Vec<String>> =
            Lazy::classify(&Definition::from("name_list"), &FIELD, string_list_literal(&FIELD)).unwrap();
        assert!(lazy.is_deferred());

        let mut resolver = Resolver::new();
        resolver.constant("name_list", json!(["a", "b", "c"]).into());
        let values = lazy.resolve(&resolver, &FIELD, string_list_literal(&FIELD)).unwrap();
        assert_eq!(values, ["a", "b", "c"]);
    }

    #[test]
    fn unknown_name_is_reported() {
        let lazy: Lazy<Vec<String>> =
            Lazy::classify(&Definition::from("nowhere"), &FIELD, string_list_literal(&FIELD)).unwrap();
        let err = lazy
            .resolve(&Resolver::new(), &FIELD, string_list_literal(&FIELD))
            .unwrap_err();
        assert!(matches!(err, SchemaError::UnknownProvider { ref name, .. } if name == "nowhere"));
    }

    #[test]
    fn unsupported_kind_rejected_at_classification() {
        let err = Lazy::classify(&Definition::from(true), &FIELD, string_list_literal(&FIELD)).unwrap_err();
        assert!(matches!(err, SchemaError::UnresolvableFragment { actual: "boolean", .. }));
    }

    #[test]
    fn produced_shape_is_checked() {
        let lazy: Lazy<Vec<String>> = Lazy::classify(
            &Definition::provider(|| Definition::from(10i64)),
            &FIELD,
            string_list_literal(&FIELD),
        )
        .unwrap();
        let err = lazy
            .resolve(&Resolver::new(), &FIELD, string_list_literal(&FIELD))
            .unwrap_err();
        assert!(matches!(
            err,
            SchemaError::FragmentTypeMismatch { expected: "list", actual: "number", .. }
        ));
    }

    #[test]
    fn ready_value_never_invokes_provider() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let lazy: Lazy<Number> = Lazy::classify(
            &Definition::provider(move || {
                counter.fetch_add(1, Ordering::SeqCst);
                Definition::from(3i64)
            }),
            &FIELD,
            number_literal,
        )
        .unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        let n = lazy.resolve(&Resolver::new(), &FIELD, number_literal).unwrap();
        assert_eq!(n.as_i64(), Some(3));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn provider_failure_is_wrapped() {
        let lazy: Lazy<Number> =
            Lazy::classify(&Definition::try_provider(|| Err("offline".into())), &FIELD, number_literal).unwrap();
        let err = lazy.resolve(&Resolver::new(), &FIELD, number_literal).unwrap_err();
        assert!(matches!(err, SchemaError::ProviderFailed { .. }));
        assert!(err.to_string().contains("offline"));
    }
}
