//! Expression grammar
//!
//! ```text
//! Expression  := "{{" [ OperatorRef ] Target "}}"
//! OperatorRef := Name [ "[" Arg ("," Arg)* "]" ] ":"
//! Target      := Expression | Reference
//! ```
//!
//! Operator names are alphanumeric. Reference names are any printable run
//! without `{ } [ ] :`. Arguments are any printable run without `[ ] ,` and
//! are kept as raw text; escapes like `\s` are left for operators to
//! interpret.
//!
//! Parsing works on a single whitespace-free expression (see
//! [`crate::sanitize`]) and fails on the first problem found.

use crate::{GrammarError, Span};
use log::trace;

const OPEN: &str = "{{";
const CLOSE: &str = "}}";

/// Name of the data a chain of operators applies to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reference {
    pub name: String,
    pub span: Span,
}

/// `name[args]:` prefix of an expression
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperatorRef {
    pub name: String,
    pub args: Vec<String>,
    /// Covers the name, the argument list and the trailing `:`
    pub span: Span,
}

/// What an expression applies its operator to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    Reference(Reference),
    Nested(Box<Expression>),
}

/// A parsed `{{ ... }}` expression
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Expression {
    pub operator: Option<OperatorRef>,
    pub target: Target,
    /// Absolute span of the whole expression, delimiters included
    pub span: Span,
    /// Exact text the expression was parsed from
    pub source: String,
}

impl Expression {
    /// The data reference at the bottom of the nesting
    pub fn reference(&self) -> &Reference {
        let mut expression = self;
        loop {
            match &expression.target {
                Target::Reference(reference) => return reference,
                Target::Nested(inner) => expression = inner,
            }
        }
    }

    /// Number of `{{ }}` levels, 1 for a flat expression
    pub fn depth(&self) -> usize {
        match &self.target {
            Target::Reference(_) => 1,
            Target::Nested(inner) => 1 + inner.depth(),
        }
    }
}

/// Parse one balanced expression
///
/// `offset` is the absolute position of `text` in the template, so every
/// span in the result (and in any error) is template-absolute.
pub fn parse_expression(text: &str, offset: usize) -> Result<Expression, GrammarError> {
    let mut parser = Parser {
        src: text,
        pos: 0,
        base: offset,
    };
    let expression = parser.expression()?;
    if parser.pos != text.len() {
        return Err(parser.error("end of expression"));
    }
    Ok(expression)
}

fn is_reference_char(c: char) -> bool {
    !c.is_whitespace() && !c.is_control() && !matches!(c, '{' | '}' | '[' | ']' | ':')
}

fn is_argument_char(c: char) -> bool {
    !c.is_whitespace() && !c.is_control() && !matches!(c, '[' | ']' | ',')
}

struct Parser<'a> {
    src: &'a str,
    pos: usize,
    base: usize,
}

impl<'a> Parser<'a> {
    fn rest(&self) -> &'a str {
        &self.src[self.pos..]
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn span(&self, start: usize, end: usize) -> Span {
        Span::new(self.base + start, self.base + end)
    }

    fn error(&self, expected: &str) -> GrammarError {
        let (found, len) = match self.peek() {
            Some(c) => (format!("\"{c}\""), c.len_utf8()),
            None => ("end of expression".to_string(), 0),
        };
        GrammarError {
            expression: self.src.to_string(),
            expected: expected.to_string(),
            found,
            span: Span::at(self.base + self.pos, len),
        }
    }

    fn expect(&mut self, literal: &str) -> Result<(), GrammarError> {
        if self.rest().starts_with(literal) {
            self.pos += literal.len();
            Ok(())
        } else {
            Err(self.error(&format!("\"{literal}\"")))
        }
    }

    fn take_while(&mut self, pred: impl Fn(char) -> bool) -> &'a str {
        let rest = self.rest();
        let len = rest.find(|c: char| !pred(c)).unwrap_or(rest.len());
        self.pos += len;
        &rest[..len]
    }

    fn expression(&mut self) -> Result<Expression, GrammarError> {
        let start = self.pos;
        self.expect(OPEN)?;

        let operator = self.operator_ref()?;
        let target = if self.rest().starts_with(OPEN) {
            Target::Nested(Box::new(self.expression()?))
        } else {
            Target::Reference(self.reference()?)
        };

        self.expect(CLOSE)?;

        let expression = Expression {
            operator,
            target,
            span: self.span(start, self.pos),
            source: self.src[start..self.pos].to_string(),
        };
        trace!(
            "parsed expression {} at {}",
            expression.source,
            expression.span
        );
        Ok(expression)
    }

    /// An alphanumeric run is only an operator if `[` or `:` follows it,
    /// otherwise it is the start of a reference name.
    fn operator_ref(&mut self) -> Result<Option<OperatorRef>, GrammarError> {
        let start = self.pos;
        let rest = self.rest();
        let name_len = rest
            .find(|c: char| !c.is_ascii_alphanumeric())
            .unwrap_or(rest.len());
        if name_len == 0 {
            return Ok(None);
        }

        let name = &rest[..name_len];
        let args = match rest[name_len..].chars().next() {
            Some(':') => {
                self.pos += name_len;
                Vec::new()
            }
            Some('[') => {
                self.pos += name_len;
                self.arguments()?
            }
            _ => return Ok(None),
        };
        self.expect(":")?;

        Ok(Some(OperatorRef {
            name: name.to_string(),
            args,
            span: self.span(start, self.pos),
        }))
    }

    fn arguments(&mut self) -> Result<Vec<String>, GrammarError> {
        self.expect("[")?;
        let mut args = Vec::new();
        loop {
            let arg = self.take_while(is_argument_char);
            if arg.is_empty() {
                return Err(self.error("an operator argument"));
            }
            args.push(arg.to_string());

            match self.peek() {
                Some(',') => self.pos += 1,
                Some(']') => {
                    self.pos += 1;
                    return Ok(args);
                }
                _ => return Err(self.error("\",\" or \"]\"")),
            }
        }
    }

    fn reference(&mut self) -> Result<Reference, GrammarError> {
        let start = self.pos;
        let name = self.take_while(is_reference_char);
        if name.is_empty() {
            return Err(self.error("a data reference name"));
        }
        Ok(Reference {
            name: name.to_string(),
            span: self.span(start, self.pos),
        })
    }
}
