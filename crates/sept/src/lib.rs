//! Sept - resolve `{{operator:token}}` expressions against data
//!
//! This crate provides:
//! - Token and Operator capability traits
//! - Token and Operator registries with builtin operators
//! - Binding of nested expressions into one operator chain per token
//! - Compiled templates that resolve against many data mappings
//!
//! # Example
//!
//! ```
//! use serde_json::json;
//!
//! let template = sept::compile("/home/{{lower:{{substr[1,end]:name}}}}").unwrap();
//! let path = template.resolve(&json!({ "name": "AhUgHeS" })).unwrap();
//! assert_eq!(path, "/home/hughes");
//! ```

pub mod binder;
pub mod binding;
pub mod builtin;
pub mod operator;
pub mod parser;
pub mod registry;
pub mod template;
pub mod token;

pub use binder::{Binder, ResolvedExpression};
pub use operator::{ArgumentSpec, Operator, OperatorDefinition};
pub use parser::{ParserConfig, TemplateParser, TokenBinding};
pub use registry::{OperatorRegistry, TokenRegistry};
pub use template::CompiledTemplate;
pub use token::{BindingToken, FallbackToken, Token};

pub use sept_syntax::{BalancingError, ErrorList, GrammarError, Located, Span};

use thiserror::Error;

/// Errors that can occur while compiling or resolving a template
#[derive(Debug, Error)]
pub enum SeptError {
    #[error("{0}")]
    Balancing(ErrorList<BalancingError>),

    #[error(transparent)]
    Grammar(#[from] GrammarError),

    #[error("Could not find a registered token matching \"{name}\" found at {span}: \"{expression}\"")]
    TokenNotFound {
        name: String,
        span: Span,
        expression: String,
    },

    #[error("Could not find an operator with the name \"{name}\" ({span})")]
    OperatorNotFound { name: String, span: Span },

    #[error("Invalid arguments for operator \"{operator}\" ({span}): {message}")]
    InvalidOperatorArguments {
        operator: String,
        message: String,
        span: Span,
    },

    #[error(
        "The operator {operator} received invalid data and could not continue. \
         {operator} reported: \"{message}\". The previous operator was {}, \
         maybe the error originated there?",
        or_none(.previous)
    )]
    InvalidOperatorInput {
        operator: String,
        message: String,
        previous: Option<String>,
        span: Span,
    },

    #[error("A token with the name \"{0}\" is already registered")]
    TokenNameCollision(String),

    #[error("An operator with the name \"{0}\" is already registered")]
    OperatorNameCollision(String),

    #[error("Invalid binding \"{bind}\" for token \"{name}\"; bindings look like $.field.nested")]
    InvalidBinding { name: String, bind: String },

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

impl SeptError {
    /// Template region the error refers to, if it has one
    pub fn span(&self) -> Option<Span> {
        match self {
            SeptError::Balancing(errors) => errors.span(),
            SeptError::Grammar(error) => Some(error.span()),
            SeptError::TokenNotFound { span, .. }
            | SeptError::OperatorNotFound { span, .. }
            | SeptError::InvalidOperatorArguments { span, .. }
            | SeptError::InvalidOperatorInput { span, .. } => Some(*span),
            SeptError::TokenNameCollision(_)
            | SeptError::OperatorNameCollision(_)
            | SeptError::InvalidBinding { .. }
            | SeptError::JsonError(_) => None,
        }
    }
}

impl SeptError {
    /// Rewrite the template position carried by a single-location error
    pub(crate) fn map_span(mut self, f: impl FnOnce(Span) -> Span) -> Self {
        match &mut self {
            SeptError::Grammar(error) => error.span = f(error.span),
            SeptError::TokenNotFound { span, .. }
            | SeptError::OperatorNotFound { span, .. }
            | SeptError::InvalidOperatorArguments { span, .. }
            | SeptError::InvalidOperatorInput { span, .. } => *span = f(*span),
            SeptError::Balancing(_)
            | SeptError::TokenNameCollision(_)
            | SeptError::OperatorNameCollision(_)
            | SeptError::InvalidBinding { .. }
            | SeptError::JsonError(_) => {}
        }
        self
    }
}

impl From<ErrorList<BalancingError>> for SeptError {
    fn from(errors: ErrorList<BalancingError>) -> Self {
        SeptError::Balancing(errors)
    }
}

fn or_none(name: &Option<String>) -> &str {
    name.as_deref().unwrap_or("none")
}

/// Result type for template operations
pub type Result<T> = std::result::Result<T, SeptError>;

/// Compile a template with the builtin operators and fallback tokens enabled
pub fn compile(source: &str) -> Result<CompiledTemplate> {
    TemplateParser::new().compile(source)
}
