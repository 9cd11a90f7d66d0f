//! Sept Syntax - locating and parsing `{{ ... }}` expressions
//!
//! This crate provides:
//! - Delimiter balancing with accumulated diagnostics
//! - The recursive expression grammar (operator, arguments, nested target)
//! - Whitespace sanitizing with span translation
//! - Location-aware syntax errors
//!
//! It knows nothing about data, tokens or operators; see the `sept` crate
//! for resolution.
//!
//! # Example
//!
//! ```
//! use sept_syntax::{check, Target};
//!
//! let expressions = check("/home/{{lower:{{substr[1,end]:name}}}}").unwrap();
//! assert_eq!(expressions.len(), 1);
//! assert_eq!(expressions[0].reference().name, "name");
//! assert!(matches!(expressions[0].target, Target::Nested(_)));
//! ```

mod balancer;
mod error;
mod grammar;
mod sanitize;
mod span;

pub use balancer::{balance, Balanced};
pub use error::{BalancingError, ErrorList, GrammarError, Located};
pub use grammar::{parse_expression, Expression, OperatorRef, Reference, Target};
pub use sanitize::{sanitize, Sanitized};
pub use span::{OffsetLedger, Span};

use thiserror::Error;

/// Structural problems found in a template
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SyntaxError {
    #[error("{0}")]
    Balancing(ErrorList<BalancingError>),

    #[error("{0}")]
    Grammar(ErrorList<GrammarError>),
}

impl SyntaxError {
    /// Span of the first reported problem
    pub fn span(&self) -> Option<Span> {
        match self {
            SyntaxError::Balancing(errors) => errors.span(),
            SyntaxError::Grammar(errors) => errors.span(),
        }
    }
}

/// Result type for syntax operations
pub type Result<T> = std::result::Result<T, SyntaxError>;

/// Check the syntax of a whole template, reporting every problem found
///
/// Balancing problems are reported first; grammar is only checked once the
/// template balances. Expression spans are in sanitized coordinates, error
/// spans point into `text`.
pub fn check(text: &str) -> Result<Vec<Expression>> {
    let balanced = balance(text);
    if !balanced.is_ok() {
        return Err(SyntaxError::Balancing(balanced.errors.into()));
    }

    let sanitized = sanitize(text, &balanced.roots);
    let mut expressions = Vec::with_capacity(sanitized.spans.len());
    let mut errors = Vec::new();

    for span in &sanitized.spans {
        match parse_expression(span.slice(&sanitized.text), span.start) {
            Ok(expression) => expressions.push(expression),
            Err(mut error) => {
                error.span = sanitized.source_span(error.span);
                errors.push(error);
            }
        }
    }

    if errors.is_empty() {
        Ok(expressions)
    } else {
        Err(SyntaxError::Grammar(errors.into()))
    }
}
