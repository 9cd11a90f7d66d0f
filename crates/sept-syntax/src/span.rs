//! Byte spans and edit offset bookkeeping

use std::fmt;
use std::ops::Range;

/// Half-open byte range `[start, end)` into a template string
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Span {
    /// First byte covered by the span
    pub start: usize,
    /// One past the last byte covered by the span
    pub end: usize,
}

impl Span {
    /// Create a span, `start` must not exceed `end`
    pub fn new(start: usize, end: usize) -> Self {
        debug_assert!(start <= end, "span start {start} is past its end {end}");
        Self { start, end }
    }

    /// Create a span from a start offset and a length
    pub fn at(start: usize, len: usize) -> Self {
        Self::new(start, start + len)
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }

    /// True if `other` lies entirely inside this span
    pub fn contains(&self, other: &Span) -> bool {
        self.start <= other.start && other.end <= self.end
    }

    /// Borrow the covered text out of `text`
    pub fn slice<'a>(&self, text: &'a str) -> &'a str {
        &text[self.range()]
    }
}

impl From<Span> for Range<usize> {
    fn from(span: Span) -> Self {
        span.range()
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}

/// Cumulative length change of ordered, non-overlapping edits to a string
///
/// Spans are recorded against the unedited string. After each edit is
/// recorded, [`OffsetLedger::map`] translates later spans into the
/// coordinates of the partially edited string. A ledger is meant to live for
/// exactly one editing pass.
#[derive(Debug, Default, Clone)]
pub struct OffsetLedger {
    delta: isize,
    floor: usize,
}

impl OffsetLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Net bytes gained (positive) or lost (negative) so far
    pub fn delta(&self) -> isize {
        self.delta
    }

    /// Translate a span of the unedited string into edited coordinates
    ///
    /// # Panics
    /// If `span` starts inside or before an edit that was already recorded.
    pub fn map(&self, span: Span) -> Span {
        assert!(
            span.start >= self.floor,
            "span {span} overlaps an edit ending at {}",
            self.floor
        );
        Span::new(shift(span.start, self.delta), shift(span.end, self.delta))
    }

    /// Record that `span` (unedited coordinates) now holds `replacement_len` bytes
    ///
    /// # Panics
    /// If edits are recorded out of order or overlap.
    pub fn record(&mut self, span: Span, replacement_len: usize) {
        assert!(
            span.start >= self.floor,
            "edit {span} recorded out of order (previous edit ended at {})",
            self.floor
        );
        self.delta += replacement_len as isize - span.len() as isize;
        self.floor = span.end;
    }
}

fn shift(pos: usize, delta: isize) -> usize {
    match pos.checked_add_signed(delta) {
        Some(shifted) => shifted,
        None => panic!("offset {pos} shifted by {delta} falls before the start of the string"),
    }
}
