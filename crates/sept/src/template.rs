//! Compiled templates

use crate::binder::{Binder, ResolvedExpression};
use crate::{Result, SeptError};
use log::debug;
use sept_syntax::{balance, parse_expression, sanitize, OffsetLedger};
use serde_json::Value;

/// A template that has been balanced, parsed and bound once
///
/// Compiled templates are immutable; [`CompiledTemplate::resolve`] may be
/// called any number of times, from any number of threads.
#[derive(Debug)]
pub struct CompiledTemplate {
    text: String,
    expressions: Vec<ResolvedExpression>,
}

impl CompiledTemplate {
    /// Compile `source` with the registries behind `binder`
    ///
    /// Every balancing problem is reported at once. Grammar and binding
    /// stop at the first failing expression. Error spans always point into
    /// `source`.
    pub fn compile(source: &str, binder: &Binder<'_>) -> Result<Self> {
        let balanced = balance(source);
        if !balanced.is_ok() {
            return Err(SeptError::Balancing(balanced.errors.into()));
        }

        let sanitized = sanitize(source, &balanced.roots);
        let mut expressions = Vec::with_capacity(sanitized.spans.len());
        let relocate = |error: SeptError| error.map_span(|span| sanitized.source_span(span));

        for (&root, span) in balanced.roots.iter().zip(&sanitized.spans) {
            let expression = parse_expression(span.slice(&sanitized.text), span.start)
                .map_err(|error| relocate(error.into()))?;
            let resolved = binder
                .bind(&expression, root.slice(source))
                .map_err(&relocate)?;
            expressions.push(resolved.with_origin(root));
        }

        debug!(
            "compiled template with {} expressions ({} bytes sanitized away)",
            expressions.len(),
            source.len() - sanitized.text.len()
        );

        Ok(Self {
            text: sanitized.text,
            expressions,
        })
    }

    /// Template text with whitespace removed from inside expressions
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn expressions(&self) -> &[ResolvedExpression] {
        &self.expressions
    }

    /// Render the template against one data mapping
    ///
    /// Fails with [`SeptError::InvalidOperatorInput`] if any operator rejects
    /// its input; no partial output is returned in that case.
    pub fn resolve(&self, data: &Value) -> Result<String> {
        let mut output = self.text.clone();
        let mut ledger = OffsetLedger::new();

        for expression in &self.expressions {
            let replacement = expression.resolve(data)?;
            let target = ledger.map(expression.span());
            output.replace_range(target.range(), &replacement);
            ledger.record(expression.span(), replacement.len());
        }

        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::{OperatorRegistry, TokenRegistry};
    use crate::{BalancingError, Span};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn compile(source: &str) -> Result<CompiledTemplate> {
        let tokens = TokenRegistry::new();
        let operators = OperatorRegistry::new();
        let binder = Binder::new(&tokens, &operators).with_fallback(true);
        CompiledTemplate::compile(source, &binder)
    }

    #[test]
    fn test_sanitized_text_and_spans() {
        let template = compile("a {{ lower : name }} b {{ upper:name }}").unwrap();
        assert_eq!(template.text(), "a {{lower:name}} b {{upper:name}}");

        let spans: Vec<&str> = template
            .expressions()
            .iter()
            .map(|e| e.span().slice(template.text()))
            .collect();
        assert_eq!(spans, vec!["{{lower:name}}", "{{upper:name}}"]);
        assert_eq!(template.expressions()[1].source(), "{{ upper:name }}");
    }

    #[test]
    fn test_resolve_with_growing_and_shrinking_values() {
        let template = compile("{{a}}-{{b}}-{{c}}").unwrap();
        let output = template
            .resolve(&json!({ "a": "a much longer value", "b": "", "c": "z" }))
            .unwrap();
        assert_eq!(output, "a much longer value--z");
    }

    #[test]
    fn test_resolve_twice_with_different_data() {
        let template = compile("/{{lower:first}}/{{upper:last}}/").unwrap();
        let first = template
            .resolve(&json!({ "first": "ALEXANDER", "last": "hughes" }))
            .unwrap();
        let second = template
            .resolve(&json!({ "first": "Al", "last": "x" }))
            .unwrap();
        assert_eq!(first, "/alexander/HUGHES/");
        assert_eq!(second, "/al/X/");
    }

    #[test]
    fn test_missing_data_keeps_raw_expression() {
        let template = compile("{{ missingKey }} and {{name}}").unwrap();
        let output = template.resolve(&json!({ "name": "x" })).unwrap();
        assert_eq!(output, "{{ missingKey }} and x");
    }

    #[test]
    fn test_balancing_errors_are_aggregated() {
        let error = compile("{{a}} b}} {{c").unwrap_err();
        let SeptError::Balancing(errors) = &error else {
            panic!("expected balancing errors, got {error:?}");
        };
        assert_eq!(errors.len(), 2);
        assert!(matches!(
            errors.errors()[1],
            BalancingError::MissingCloseDelimiter { .. }
        ));
        assert_eq!(error.span(), errors.span());
    }

    #[test]
    fn test_grammar_error_points_into_source() {
        let source = "ok {{   a   }} then {{ pad[4,]:x }}";
        let error = compile(source).unwrap_err();
        assert!(matches!(error, SeptError::Grammar(_)));
        assert_eq!(error.span().unwrap().slice(source), "]");
    }

    #[test]
    fn test_binding_errors_point_into_source() {
        let tokens = TokenRegistry::new();
        let operators = OperatorRegistry::new();
        let binder = Binder::new(&tokens, &operators);

        let source = "{{    a   }}/{{ lower : who }}";
        let error = CompiledTemplate::compile(source, &binder).unwrap_err();
        assert!(matches!(error, SeptError::TokenNotFound { .. }));
        assert_eq!(error.span().unwrap().slice(source), "a");

        let source = "x {{ shout : name }}";
        let error = CompiledTemplate::compile(source, &binder).unwrap_err();
        assert_eq!(error.span().unwrap().slice(source), "shout :");

        let source = "{{ a }} {{ pad [ x , 0 ] : b }}";
        let error = compile(source).unwrap_err();
        assert!(matches!(error, SeptError::InvalidOperatorArguments { .. }));
        assert_eq!(error.span().unwrap().slice(source), "pad [ x , 0 ] :");
    }

    #[test]
    fn test_invalid_input_aborts_resolve() {
        let source = "{{ name }} {{ lower : count }}";
        let template = compile(source).unwrap();
        let error = template
            .resolve(&json!({ "name": "x", "count": 3 }))
            .unwrap_err();
        assert!(matches!(error, SeptError::InvalidOperatorInput { .. }));
        assert_eq!(error.span().unwrap().slice(source), "{{ lower : count }}");
        assert_eq!(template.expressions()[1].origin(), Span::new(11, 30));
    }

    #[test]
    fn test_compiled_template_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<CompiledTemplate>();
    }
}
