//! Whitespace stripping inside expressions

use crate::{OffsetLedger, Span};

/// A template with the whitespace removed from every root expression
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sanitized {
    pub text: String,
    /// Root spans translated into `text` coordinates, in the same order
    pub spans: Vec<Span>,
    origins: Vec<Origin>,
}

/// Where one sanitized root came from
#[derive(Debug, Clone, PartialEq, Eq)]
struct Origin {
    sanitized: Span,
    source: Span,
    /// Template offset of every byte kept from the root
    kept: Vec<usize>,
}

impl Sanitized {
    /// Translate a span of `text` back into the unsanitized template
    ///
    /// ```
    /// use sept_syntax::{balance, sanitize, Span};
    ///
    /// let source = "{{ lower : name }}";
    /// let sanitized = sanitize(source, &balance(source).roots);
    /// assert_eq!(sanitized.text, "{{lower:name}}");
    ///
    /// let name = sanitized.source_span(Span::new(8, 12));
    /// assert_eq!(name.slice(source), "name");
    /// ```
    pub fn source_span(&self, span: Span) -> Span {
        let start = self.source_offset(span.start);
        if span.is_empty() {
            return Span::new(start, start);
        }
        Span::new(start, self.source_offset(span.end - 1) + 1)
    }

    fn source_offset(&self, pos: usize) -> usize {
        let mut removed = 0;
        for origin in &self.origins {
            if pos < origin.sanitized.start {
                break;
            }
            if pos < origin.sanitized.end {
                return origin.kept[pos - origin.sanitized.start];
            }
            removed += origin.source.len() - origin.sanitized.len();
        }
        pos + removed
    }
}

/// Strip whitespace from the inside of each root span
///
/// Literal text between expressions is copied untouched. `roots` must be
/// ascending and non-overlapping, as returned by [`crate::balance`].
pub fn sanitize(text: &str, roots: &[Span]) -> Sanitized {
    let mut out = String::with_capacity(text.len());
    let mut spans = Vec::with_capacity(roots.len());
    let mut origins = Vec::with_capacity(roots.len());
    let mut ledger = OffsetLedger::new();
    let mut copied = 0;

    for &root in roots {
        out.push_str(&text[copied..root.start]);

        let (stripped, kept) = strip_whitespace(text, root);
        let span = Span::at(ledger.map(root).start, stripped.len());
        ledger.record(root, stripped.len());
        spans.push(span);
        origins.push(Origin {
            sanitized: span,
            source: root,
            kept,
        });

        out.push_str(&stripped);
        copied = root.end;
    }
    out.push_str(&text[copied..]);

    Sanitized {
        text: out,
        spans,
        origins,
    }
}

/// The text of `root` without whitespace, plus the offset of each kept byte
fn strip_whitespace(text: &str, root: Span) -> (String, Vec<usize>) {
    let mut stripped = String::with_capacity(root.len());
    let mut kept = Vec::with_capacity(root.len());
    for (i, c) in root.slice(text).char_indices() {
        if c.is_whitespace() {
            continue;
        }
        stripped.push(c);
        kept.extend((0..c.len_utf8()).map(|b| root.start + i + b));
    }
    (stripped, kept)
}
