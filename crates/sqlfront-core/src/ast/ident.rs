//! Identifiers.

use std::borrow::Borrow;

/// A single identifier.
///
/// The text is stored unescaped: `"a""b"` and `[a"b]` both become `a"b`.
/// Bare identifiers keep their source letter case.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Id {
    pub text: String,
}

impl Id {
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Returns true if the identifier can be written without quotes.
    #[must_use]
    pub fn is_plain(&self) -> bool {
        let mut chars = self.text.chars();
        chars
            .next()
            .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
            && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
            && crate::lexer::Keyword::from_str(&self.text).is_none()
    }
}

impl From<&str> for Id {
    fn from(text: &str) -> Self {
        Self::new(text)
    }
}

impl From<String> for Id {
    fn from(text: String) -> Self {
        Self { text }
    }
}

impl Borrow<str> for Id {
    fn borrow(&self) -> &str {
        &self.text
    }
}

impl PartialEq<str> for Id {
    fn eq(&self, other: &str) -> bool {
        self.text == other
    }
}

impl PartialEq<&str> for Id {
    fn eq(&self, other: &&str) -> bool {
        self.text == *other
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_plain() {
        assert!(Id::new("users").is_plain());
        assert!(Id::new("_t1").is_plain());
        assert!(!Id::new("1t").is_plain());
        assert!(!Id::new("first name").is_plain());
        assert!(!Id::new("select").is_plain());
        assert!(!Id::new("").is_plain());
    }

    #[test]
    fn test_compare_with_str() {
        assert_eq!(Id::from("a"), "a");
        assert_eq!(Id::from(String::from("b")).as_str(), "b");
    }
}
