//! Binding parsed expressions to tokens and operator chains
//!
//! A nested expression such as `{{upper:{{lower:name}}}}` binds to a single
//! token (`name`) and a chain `[lower, upper]`: inner operators run first.
//! Only the outermost span is ever replaced in the output.

use crate::binding::value_to_string;
use crate::registry::{OperatorRegistry, TokenRegistry};
use crate::{Operator, Result, SeptError, Token};
use log::debug;
use sept_syntax::{Expression, Span, Target};
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

/// A root expression ready to be evaluated against data
pub struct ResolvedExpression {
    token: Arc<dyn Token>,
    operators: Vec<Box<dyn Operator>>,
    span: Span,
    origin: Span,
    text: String,
    source: String,
}

impl ResolvedExpression {
    pub fn token(&self) -> &dyn Token {
        self.token.as_ref()
    }

    /// Operators in execution order
    pub fn operators(&self) -> impl Iterator<Item = &dyn Operator> {
        self.operators.iter().map(|op| op.as_ref())
    }

    /// Span of the outermost `{{ }}` in the sanitized template
    pub fn span(&self) -> Span {
        self.span
    }

    /// Span of the expression as written in the template
    pub fn origin(&self) -> Span {
        self.origin
    }

    pub(crate) fn with_origin(mut self, origin: Span) -> Self {
        self.origin = origin;
        self
    }

    /// Sanitized expression text
    pub fn text(&self) -> &str {
        &self.text
    }

    /// The expression as written in the template, whitespace included
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Compute the replacement text for this expression
    ///
    /// Absent (or null) data leaves the expression as written. Any operator
    /// rejecting its input aborts with [`SeptError::InvalidOperatorInput`].
    pub fn resolve(&self, data: &Value) -> Result<String> {
        let mut value = match self.token.value(data) {
            Some(value) if !value.is_null() => value,
            _ => {
                debug!("no data for {}, keeping {}", self.token.name(), self.source);
                return Ok(self.source.clone());
            }
        };

        let mut previous: Option<&str> = None;
        for operator in &self.operators {
            if let Some(message) = operator.validate(&value) {
                return Err(SeptError::InvalidOperatorInput {
                    operator: operator.name().to_string(),
                    message,
                    previous: previous.map(str::to_string),
                    span: self.origin,
                });
            }
            value = operator.execute(value);
            previous = Some(operator.name());
        }

        Ok(value_to_string(&value))
    }
}

impl fmt::Debug for ResolvedExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let operators: Vec<&str> = self.operators.iter().map(|op| op.name()).collect();
        f.debug_struct("ResolvedExpression")
            .field("token", &self.token.name())
            .field("operators", &operators)
            .field("span", &self.span)
            .field("origin", &self.origin)
            .field("text", &self.text)
            .finish()
    }
}

/// Turns parse trees into [`ResolvedExpression`]s
pub struct Binder<'a> {
    tokens: &'a TokenRegistry,
    operators: &'a OperatorRegistry,
    fallback: bool,
}

impl<'a> Binder<'a> {
    pub fn new(tokens: &'a TokenRegistry, operators: &'a OperatorRegistry) -> Self {
        Self {
            tokens,
            operators,
            fallback: false,
        }
    }

    /// Read unregistered references straight from the data
    pub fn with_fallback(mut self, fallback: bool) -> Self {
        self.fallback = fallback;
        self
    }

    /// Bind a root expression
    ///
    /// `source` is the expression's raw text in the template, emitted as-is
    /// when its data is missing. Error spans are those of `expression`.
    pub fn bind(&self, expression: &Expression, source: &str) -> Result<ResolvedExpression> {
        let (token, operators) = self.bind_node(expression, source)?;
        Ok(ResolvedExpression {
            token,
            operators,
            span: expression.span,
            origin: expression.span,
            text: expression.source.clone(),
            source: source.to_string(),
        })
    }

    fn bind_node(
        &self,
        node: &Expression,
        source: &str,
    ) -> Result<(Arc<dyn Token>, Vec<Box<dyn Operator>>)> {
        let (token, mut chain) = match &node.target {
            Target::Reference(reference) => (
                self.tokens.resolve(reference, source, self.fallback)?,
                Vec::new(),
            ),
            Target::Nested(inner) => self.bind_node(inner, source)?,
        };

        let operator = match &node.operator {
            Some(operator) => self.operators.resolve(operator)?,
            None => self.operators.null()?,
        };
        chain.push(operator);

        Ok((token, chain))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builtin::NULL_OPERATOR;
    use pretty_assertions::assert_eq;
    use sept_syntax::parse_expression;
    use serde_json::json;

    fn bind(text: &str) -> Result<ResolvedExpression> {
        let tokens = TokenRegistry::new();
        let operators = OperatorRegistry::new();
        let expression = parse_expression(text, 0)?;
        Binder::new(&tokens, &operators)
            .with_fallback(true)
            .bind(&expression, text)
    }

    fn chain(resolved: &ResolvedExpression) -> Vec<&str> {
        resolved.operators().map(|op| op.name()).collect()
    }

    #[test]
    fn test_flat_expression_chain() {
        let resolved = bind("{{lower:name}}").unwrap();
        assert_eq!(chain(&resolved), vec!["lower"]);
        assert_eq!(resolved.token().name(), "name");
        assert_eq!(resolved.span(), Span::new(0, 14));
    }

    #[test]
    fn test_bare_reference_gets_null_operator() {
        let resolved = bind("{{name}}").unwrap();
        assert_eq!(chain(&resolved), vec![NULL_OPERATOR]);
    }

    #[test]
    fn test_nested_chain_runs_inner_first() {
        let resolved = bind("{{upper:{{pad[9,x]:{{lower:name}}}}}}").unwrap();
        assert_eq!(chain(&resolved), vec!["lower", "pad", "upper"]);
        assert_eq!(resolved.span().len(), resolved.text().len());
        assert_eq!(
            resolved.resolve(&json!({ "name": "AbC" })).unwrap(),
            "XXXXXXABC"
        );
    }

    #[test]
    fn test_nested_upper_lower() {
        let resolved = bind("{{upper:{{lower:name}}}}").unwrap();
        assert_eq!(resolved.resolve(&json!({ "name": "AbC" })).unwrap(), "ABC");
    }

    #[test]
    fn test_missing_data_keeps_source() {
        let resolved = bind("{{lower:missingKey}}").unwrap();
        assert_eq!(resolved.resolve(&json!({})).unwrap(), "{{lower:missingKey}}");
        assert_eq!(
            resolved.resolve(&json!({ "missingKey": null })).unwrap(),
            "{{lower:missingKey}}"
        );
    }

    #[test]
    fn test_invalid_input_names_previous_operator() {
        let resolved = bind("{{lower:{{pad[3,0]:{{upper:count}}}}}}").unwrap();
        let error = resolved.resolve(&json!({ "count": 7 })).unwrap_err();
        match error {
            SeptError::InvalidOperatorInput {
                operator, previous, ..
            } => {
                assert_eq!(operator, "upper");
                assert_eq!(previous, None);
            }
            other => panic!("unexpected error {other:?}"),
        }

        let resolved = bind("{{lower:{{name}}}}").unwrap();
        match resolved.resolve(&json!({ "name": 7 })).unwrap_err() {
            SeptError::InvalidOperatorInput { previous, .. } => {
                assert_eq!(previous.as_deref(), Some(NULL_OPERATOR));
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn test_unknown_token_without_fallback() {
        let tokens = TokenRegistry::new();
        let operators = OperatorRegistry::new();
        let expression = parse_expression("{{lower:{{upper:who}}}}", 0).unwrap();
        let error = Binder::new(&tokens, &operators)
            .bind(&expression, "{{lower:{{upper:who}}}}")
            .unwrap_err();
        match error {
            SeptError::TokenNotFound {
                name,
                span,
                expression,
            } => {
                assert_eq!(name, "who");
                assert_eq!(span, Span::new(16, 19));
                assert_eq!(expression, "{{lower:{{upper:who}}}}");
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn test_unknown_operator() {
        let error = bind("{{shout:name}}").unwrap_err();
        assert!(matches!(error, SeptError::OperatorNotFound { ref name, .. } if name == "shout"));
        assert_eq!(error.span(), Some(Span::new(2, 8)));
    }
}
