//! Location-aware syntax errors

use crate::Span;
use std::fmt;
use thiserror::Error;

/// An error tied to a region of the template source
pub trait Located {
    /// Region of the source the error refers to
    fn span(&self) -> Span;

    /// Byte offset where the offending text starts
    fn location(&self) -> usize {
        self.span().start
    }

    /// Length in bytes of the offending text
    fn length(&self) -> usize {
        self.span().len()
    }
}

/// Unmatched `{{` or `}}` found while balancing a template
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BalancingError {
    #[error("Missing opening \"{{{{\" characters for token expression \"{snippet}\" ({span})")]
    MissingOpenDelimiter { span: Span, snippet: String },

    #[error("Missing closing \"}}}}\" characters for token expression \"{snippet}\" ({span})")]
    MissingCloseDelimiter {
        span: Span,
        snippet: String,
        /// First single `}` at or after the opener, if any
        nearest_close: Option<usize>,
    },
}

impl Located for BalancingError {
    fn span(&self) -> Span {
        match self {
            BalancingError::MissingOpenDelimiter { span, .. }
            | BalancingError::MissingCloseDelimiter { span, .. } => *span,
        }
    }
}

/// A single expression did not match the expression grammar
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Error parsing expression \"{expression}\": expected {expected}, found {found} at {span}")]
pub struct GrammarError {
    /// The whole expression under parse
    pub expression: String,
    /// What the grammar wanted at this point
    pub expected: String,
    /// What was actually there
    pub found: String,
    pub span: Span,
}

impl Located for GrammarError {
    fn span(&self) -> Span {
        self.span
    }
}

/// Several errors reported together
///
/// The list takes its location from its first error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorList<E> {
    errors: Vec<E>,
}

impl<E> ErrorList<E> {
    pub fn new(errors: Vec<E>) -> Self {
        Self { errors }
    }

    pub fn errors(&self) -> &[E] {
        &self.errors
    }

    pub fn first(&self) -> Option<&E> {
        self.errors.first()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }
}

impl<E: Located> ErrorList<E> {
    pub fn location(&self) -> Option<usize> {
        self.first().map(Located::location)
    }

    pub fn length(&self) -> Option<usize> {
        self.first().map(Located::length)
    }

    pub fn span(&self) -> Option<Span> {
        self.first().map(Located::span)
    }
}

impl<E> From<Vec<E>> for ErrorList<E> {
    fn from(errors: Vec<E>) -> Self {
        Self::new(errors)
    }
}

impl<E> IntoIterator for ErrorList<E> {
    type Item = E;
    type IntoIter = std::vec::IntoIter<E>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.into_iter()
    }
}

impl<E: fmt::Display> fmt::Display for ErrorList<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, error) in self.errors.iter().enumerate() {
            if i > 0 {
                f.write_str("\n")?;
            }
            write!(f, "{error}")?;
        }
        Ok(())
    }
}

impl<E: std::error::Error> std::error::Error for ErrorList<E> {}

#[cfg(test)]
mod tests {
    use super::*;

    fn missing_open(start: usize, end: usize) -> BalancingError {
        BalancingError::MissingOpenDelimiter {
            span: Span::new(start, end),
            snippet: "x}}".to_string(),
        }
    }

    #[test]
    fn test_balancing_error_message() {
        let error = missing_open(0, 3);
        assert_eq!(
            error.to_string(),
            "Missing opening \"{{\" characters for token expression \"x}}\" (0-3)"
        );
        assert_eq!(error.location(), 0);
        assert_eq!(error.length(), 3);
    }

    #[test]
    fn test_error_list_uses_first_location() {
        let list = ErrorList::new(vec![missing_open(4, 9), missing_open(12, 15)]);
        assert_eq!(list.location(), Some(4));
        assert_eq!(list.length(), Some(5));
        assert_eq!(list.to_string().lines().count(), 2);
    }

    #[test]
    fn test_empty_error_list_has_no_location() {
        let list: ErrorList<BalancingError> = ErrorList::new(Vec::new());
        assert_eq!(list.location(), None);
        assert_eq!(list.to_string(), "");
    }
}
