//! Byte ranges into a filter expression.
//!
//! Every token and call argument keeps the range it was read from, so an
//! error can point a caret at the offending text and an unresolved
//! expression can report the input left over from a given offset.

/// Half-open byte range `start..end` in the expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Empty span at `offset`, e.g. the end of input.
    pub fn at(offset: usize) -> Self {
        Self::new(offset, offset)
    }

    /// Smallest span covering both.
    pub fn merge(self, other: Span) -> Span {
        Span::new(self.start.min(other.start), self.end.max(other.end))
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The text this span covers, or `""` if it is out of range.
    pub fn slice<'a>(&self, source: &'a str) -> &'a str {
        source.get(self.start..self.end).unwrap_or_default()
    }
}

// Also the conversion for logos spans, which are plain ranges.
impl From<std::ops::Range<usize>> for Span {
    fn from(range: std::ops::Range<usize>) -> Self {
        Span::new(range.start, range.end)
    }
}

/// A call argument together with where it was written.
#[derive(Debug, Clone, PartialEq)]
pub struct Spanned<T> {
    pub value: T,
    pub span: Span,
}

impl<T> Spanned<T> {
    pub fn new(value: T, span: Span) -> Self {
        Self { value, span }
    }
}

/// 1-based line and column of a byte offset, counting columns in chars.
pub fn offset_to_line_col(source: &str, offset: usize) -> (usize, usize) {
    source
        .char_indices()
        .take_while(|&(i, _)| i < offset)
        .fold((1, 1), |(line, col), (_, ch)| {
            if ch == '\n' {
                (line + 1, 1)
            } else {
                (line, col + 1)
            }
        })
}
