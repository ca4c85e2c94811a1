//! Any nodes accept every non-null value and perform no structural checks.

use indexmap::IndexMap;

pub(crate) const KEYS: &[&str] = &[];

pub(crate) fn doc_tags(tags: &mut IndexMap<String, String>) {
    tags.insert(
        "WARNING".to_string(),
        "Values set at this level are not validated. Exercise caution.".to_string(),
    );
}
