//! The ordered result of a validation run.

use std::fmt;

/// Violation messages in the order they were found.
///
/// Order is deterministic: a node's type or null check comes first, then
/// its structural checks (children in data order), then its custom hook.
/// Messages are neither deduplicated nor ranked.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Violations {
    messages: Vec<String>,
}

impl Violations {
    pub(crate) fn new(messages: Vec<String>) -> Self {
        Self { messages }
    }

    /// Returns the number of violations.
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Returns true if the data satisfied the schema.
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Returns a slice of all messages.
    pub fn messages(&self) -> &[String] {
        &self.messages
    }

    pub fn iter(&self) -> std::slice::Iter<'_, String> {
        self.messages.iter()
    }

    /// Consumes self and returns the inner Vec.
    pub fn into_inner(self) -> Vec<String> {
        self.messages
    }
}

impl IntoIterator for Violations {
    type Item = String;
    type IntoIter = std::vec::IntoIter<String>;

    fn into_iter(self) -> Self::IntoIter {
        self.messages.into_iter()
    }
}

impl<'a> IntoIterator for &'a Violations {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.messages.iter()
    }
}

/// One indented line per message.
impl fmt::Display for Violations {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, message) in self.messages.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "  {message}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_indents_each_message() {
        let v = Violations::new(vec!["first".to_string(), "second".to_string()]);
        assert_eq!(v.to_string(), "  first\n  second");
    }

    #[test]
    fn empty_displays_nothing() {
        let v = Violations::default();
        assert!(v.is_empty());
        assert_eq!(v.to_string(), "");
    }

    #[test]
    fn iteration_preserves_order() {
        let v = Violations::new(vec!["a".to_string(), "b".to_string()]);
        let collected: Vec<&String> = (&v).into_iter().collect();
        assert_eq!(collected, ["a", "b"]);
        assert_eq!(v.len(), 2);
        assert_eq!(v.into_inner(), ["a", "b"]);
    }
}
