//! Delimiter balancing
//!
//! A single left-to-right scan pairs `{{` with `}}`, allowing arbitrary
//! nesting. Only outermost (root) pairs are reported as spans; every
//! unmatched delimiter is reported as an error and the scan carries on, so
//! one pass surfaces every balancing problem in the template.
//!
//! Runs of three or more braces are split into two-brace markers. Opener runs
//! of odd length keep their first brace as literal text, so `{{{` is a literal
//! `{` followed by an opener. Closer runs split greedily from the left, so
//! `}}}` is a closer followed by a literal `}`. `{{{name}}}` is therefore the
//! expression `{{name}}` wrapped in literal braces.

use crate::{BalancingError, Span};
use log::trace;

const OPEN: u8 = b'{';
const CLOSE: u8 = b'}';

/// Outcome of balancing a template
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Balanced {
    /// Outermost expression spans, ascending and non-overlapping
    pub roots: Vec<Span>,
    /// Every unmatched delimiter, in scan order
    pub errors: Vec<BalancingError>,
}

impl Balanced {
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Find the root expression spans of `text`
pub fn balance(text: &str) -> Balanced {
    Balancer::new(text).run()
}

struct Balancer<'a> {
    text: &'a str,
    /// Start offsets of currently open `{{` markers
    open: Vec<usize>,
    /// The run of `{` being scanned
    open_run: Span,
    /// Every single `{` seen so far
    single_opens: Vec<usize>,
    /// Every single `}`
    single_closes: Vec<usize>,
    /// Start offset of the most recently consumed `}}` marker
    last_close: Option<usize>,
    roots: Vec<Span>,
    errors: Vec<BalancingError>,
}

impl<'a> Balancer<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            text,
            open: Vec::new(),
            open_run: Span::default(),
            single_opens: Vec::new(),
            single_closes: Vec::new(),
            last_close: None,
            roots: Vec::new(),
            errors: Vec::new(),
        }
    }

    fn run(mut self) -> Balanced {
        let bytes = self.text.as_bytes();

        for (index, &curr) in bytes.iter().enumerate() {
            let prev = index.checked_sub(1).map(|i| bytes[i]);
            let next = bytes.get(index + 1).copied();

            match curr {
                OPEN => self.single_opens.push(index),
                CLOSE => self.single_closes.push(index),
                _ => continue,
            }

            if next != Some(curr) {
                continue;
            }

            if curr == OPEN {
                if prev != Some(OPEN) {
                    let len = bytes[index..].iter().take_while(|&&b| b == OPEN).count();
                    self.open_run = Span::at(index, len);
                }
                // Markers start at every second position after the literal lead brace
                let first_marker = self.open_run.start + self.open_run.len() % 2;
                if index < first_marker || (index - first_marker) % 2 != 0 {
                    continue;
                }
                self.open_group(index);
            } else {
                if prev == Some(CLOSE) && self.last_close != index.checked_sub(2) {
                    continue;
                }
                self.close_group(index);
            }
        }

        self.report_unterminated();

        Balanced {
            roots: self.roots,
            errors: self.errors,
        }
    }

    fn open_group(&mut self, index: usize) {
        trace!("open marker at {index}");
        self.open.push(index);
    }

    fn close_group(&mut self, index: usize) {
        let end = index + 2;
        let boundary = self.last_close.map_or(0, |close| close + 2);
        self.last_close = Some(index);

        let Some(opener) = self.open.pop() else {
            self.report_missing_open(boundary, end);
            return;
        };

        trace!("close marker at {index} pairs with {opener}");
        if self.open.is_empty() {
            self.roots.push(Span::new(opener, end));
        }
    }

    /// The most plausible missing opener is the earliest single `{` after the
    /// previous closer. Without one, the error covers everything since then.
    fn report_missing_open(&mut self, boundary: usize, end: usize) {
        let start = self
            .single_opens
            .iter()
            .copied()
            .find(|&pos| pos >= boundary && pos < end)
            .unwrap_or(boundary);

        let span = Span::new(start, end);
        trace!("unmatched close marker, missing opener for {span}");
        self.errors.push(BalancingError::MissingOpenDelimiter {
            span,
            snippet: span.slice(self.text).to_string(),
        });
    }

    fn report_unterminated(&mut self) {
        let open = std::mem::take(&mut self.open);
        for opener in open {
            let nearest_close = self
                .single_closes
                .iter()
                .copied()
                .find(|&pos| pos >= opener);

            let span = Span::new(opener, self.text.len());
            trace!("unterminated open marker at {opener}");
            self.errors.push(BalancingError::MissingCloseDelimiter {
                span,
                snippet: span.slice(self.text).to_string(),
                nearest_close,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Located;
    use pretty_assertions::assert_eq;

    fn roots(text: &str) -> Vec<&str> {
        let balanced = balance(text);
        assert!(balanced.is_ok(), "unexpected errors: {:?}", balanced.errors);
        balanced.roots.iter().map(|span| span.slice(text)).collect()
    }

    #[test]
    fn test_single_expression() {
        assert_eq!(roots("{{lower:name}}"), vec!["{{lower:name}}"]);
    }

    #[test]
    fn test_literal_text_around_expressions() {
        assert_eq!(
            roots("/home/{{firstname}}/{{ lastname }}.txt"),
            vec!["{{firstname}}", "{{ lastname }}"]
        );
    }

    #[test]
    fn test_nested_expression_is_one_root() {
        assert_eq!(
            roots("{{lower:{{substr[1,end]:name}}}}"),
            vec!["{{lower:{{substr[1,end]:name}}}}"]
        );
    }

    #[test]
    fn test_no_expressions() {
        assert_eq!(roots("plain text { with } braces"), Vec::<&str>::new());
        assert_eq!(roots(""), Vec::<&str>::new());
    }

    #[test]
    fn test_missing_close_delimiter() {
        let text = "{{lower:name}";
        let balanced = balance(text);
        assert!(balanced.roots.is_empty());
        assert_eq!(balanced.errors.len(), 1);

        let error = &balanced.errors[0];
        assert!(matches!(
            error,
            BalancingError::MissingCloseDelimiter {
                nearest_close: Some(12),
                ..
            }
        ));
        assert_eq!(error.span(), Span::new(0, text.len()));
    }

    #[test]
    fn test_missing_open_delimiter() {
        let balanced = balance("name}}");
        assert_eq!(balanced.errors.len(), 1);
        assert_eq!(
            balanced.errors[0],
            BalancingError::MissingOpenDelimiter {
                span: Span::new(0, 6),
                snippet: "name}}".to_string(),
            }
        );
    }

    #[test]
    fn test_missing_open_uses_single_brace_after_previous_close() {
        let text = "{{a}} {lower:name}}";
        let balanced = balance(text);
        assert_eq!(balanced.roots, vec![Span::new(0, 5)]);
        assert_eq!(balanced.errors.len(), 1);
        assert_eq!(balanced.errors[0].span().slice(text), "{lower:name}}");
    }

    #[test]
    fn test_errors_accumulate() {
        let balanced = balance("a}} {{b}} c}} {{d");
        assert_eq!(balanced.roots, vec![Span::new(4, 9)]);
        assert_eq!(balanced.errors.len(), 3);
        assert!(matches!(
            balanced.errors[0],
            BalancingError::MissingOpenDelimiter { .. }
        ));
        assert!(matches!(
            balanced.errors[1],
            BalancingError::MissingOpenDelimiter { .. }
        ));
        assert!(matches!(
            balanced.errors[2],
            BalancingError::MissingCloseDelimiter {
                nearest_close: None,
                ..
            }
        ));
    }

    #[test]
    fn test_unterminated_outer_with_closed_inner() {
        let text = "{{a {{b}}";
        let balanced = balance(text);
        assert!(balanced.roots.is_empty());
        assert_eq!(balanced.errors.len(), 1);
        assert_eq!(balanced.errors[0].span().slice(text), text);
    }

    #[test]
    fn test_six_open_braces_are_three_markers() {
        assert_eq!(roots("{{{{{{a}}}}}}"), vec!["{{{{{{a}}}}}}"]);
    }

    #[test]
    fn test_odd_brace_runs_leave_outer_braces_literal() {
        let balanced = balance("{{{a}}}");
        assert!(balanced.is_ok());
        assert_eq!(balanced.roots, vec![Span::new(1, 6)]);
        assert_eq!(roots("x{{{a}}}y"), vec!["{{a}}"]);
    }

    #[test]
    fn test_five_open_braces_are_literal_plus_two_markers() {
        assert_eq!(roots("{{{{{a}}}}}"), vec!["{{{{a}}}}"]);
    }

    #[test]
    fn test_single_brace_before_expression_is_literal() {
        assert_eq!(roots("{ {{a}} }"), vec!["{{a}}"]);
    }

    #[test]
    fn test_adjacent_closers_without_openers() {
        let balanced = balance("}}}}");
        assert!(balanced.roots.is_empty());
        assert_eq!(balanced.errors.len(), 2);
    }

    #[test]
    fn test_extra_closer_after_expression() {
        let balanced = balance("{{a}}}}");
        assert_eq!(balanced.roots, vec![Span::new(0, 5)]);
        assert_eq!(balanced.errors.len(), 1);
        assert_eq!(balanced.errors[0].span(), Span::new(5, 7));
    }

    #[test]
    fn test_adjacent_root_expressions() {
        assert_eq!(roots("{{a}}{{b}}"), vec!["{{a}}", "{{b}}"]);
    }

    #[test]
    fn test_multibyte_literal_text() {
        assert_eq!(roots("ชื่อ {{name}} ✓"), vec!["{{name}}"]);
    }
}
