//! Error types for filter expression parsing.

use crate::span::{offset_to_line_col, Span};
use thiserror::Error;

/// What went wrong while parsing a filter expression.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseErrorKind {
    /// A comparison operator outside `=`, `!=`, `<`, `<=`, `>`, `>=`.
    #[error("unsupported operator: {0}")]
    UnsupportedOperator(String),
    /// A comparator match type outside the known set.
    #[error("unsupported comparator: {0}")]
    UnsupportedComparator(String),
    /// Text that does not form a filter; carries the leftover text verbatim.
    #[error("unable to parse filter: {0}")]
    UnresolvedExpression(String),
    /// Parentheses nested deeper than the configured limit.
    #[error("filter nesting exceeds the limit of {limit} levels")]
    NestingTooDeep { limit: usize },
    /// Input longer than the configured limit.
    #[error("filter expression is {len} bytes long, the limit is {limit}")]
    InputTooLong { len: usize, limit: usize },
}

/// Error during lexing/parsing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub struct ParseError {
    /// The error kind, with the offending token or text.
    pub kind: ParseErrorKind,
    /// Source span where the error occurred.
    pub span: Span,
    /// Optional hint for fixing the error.
    pub hint: Option<String>,
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.kind)
    }
}

impl ParseError {
    /// Create a new parse error.
    pub fn new(kind: ParseErrorKind, span: Span) -> Self {
        Self {
            kind,
            span,
            hint: None,
        }
    }

    /// Create an unsupported operator error.
    pub fn unsupported_operator(token: &str, span: Span) -> Self {
        Self::new(ParseErrorKind::UnsupportedOperator(token.to_string()), span)
            .with_hint("supported operators are =, !=, <, <=, >, >=")
    }

    /// Create an unsupported comparator error.
    pub fn unsupported_comparator(token: &str, span: Span) -> Self {
        Self::new(ParseErrorKind::UnsupportedComparator(token.to_string()), span).with_hint(
            "supported comparators are binary, binaryprefix, null, regexstring, substring",
        )
    }

    /// Create an unresolved expression error whose leftover text starts at
    /// `span.start`.
    pub fn unresolved(source: &str, span: Span) -> Self {
        Self::new(
            ParseErrorKind::UnresolvedExpression(leftover(source, span.start)),
            span,
        )
    }

    /// Add a hint to the error.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }

    /// Move the start of an unresolved expression back to `start`.
    ///
    /// Used by enclosing constructs (a predicate call, a parenthesized group)
    /// so the leftover text begins at the construct rather than at the token
    /// inside it. Other kinds are returned unchanged.
    pub fn anchored(self, source: &str, start: usize) -> Self {
        match self.kind {
            ParseErrorKind::UnresolvedExpression(_) if start < self.span.start => Self {
                kind: ParseErrorKind::UnresolvedExpression(leftover(source, start)),
                span: Span::new(start, self.span.end),
                hint: self.hint,
            },
            _ => self,
        }
    }

    /// Check if this is an unresolved expression error.
    pub fn is_unresolved(&self) -> bool {
        matches!(self.kind, ParseErrorKind::UnresolvedExpression(_))
    }

    /// Format the error with source context.
    pub fn format_with_source(&self, source: &str) -> String {
        let (line, col) = offset_to_line_col(source, self.span.start);
        let mut result = format!("error: {}\n", self.kind);
        result.push_str(&format!("  --> line {}:{}\n", line, col));

        // Show the source line
        if let Some(source_line) = source.lines().nth(line - 1) {
            result.push_str(&format!("   |\n{:3}| {}\n   |", line, source_line));

            // Caret under the error position
            for _ in 0..col {
                result.push(' ');
            }
            result.push('^');

            // Underline the rest of the span on this line
            let span_len = self.span.end.saturating_sub(self.span.start);
            if span_len > 1 {
                let room = (source_line.len() + 1).saturating_sub(col);
                for _ in 1..span_len.min(room) {
                    result.push('~');
                }
            }
            result.push('\n');
        }

        if let Some(hint) = &self.hint {
            result.push_str(&format!("   = hint: {}\n", hint));
        }

        result
    }
}

fn leftover(source: &str, start: usize) -> String {
    source
        .get(start.min(source.len())..)
        .unwrap_or_default()
        .trim()
        .to_string()
}
