//! Lexer for the filter expression language using logos.

use crate::error::ParseError;
use crate::span::Span;
use logos::Logos;
use std::fmt;

/// Token types for filter expressions.
#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(skip r"[ \t\r\n]+")]
pub enum Token {
    // Predicate calls
    #[token("PrefixFilter")]
    PrefixFilter,
    #[token("ValueFilter")]
    ValueFilter,
    #[token("SingleColumnValueFilter")]
    SingleColumnValueFilter,

    // Connectives
    #[token("AND")]
    And,
    #[token("OR")]
    Or,

    // Any run of comparison characters; validated against the operator table
    // by the leaf recognizer so unknown operators can be named in the error.
    #[regex(r"[=!<>~]+", |lex| lex.slice().to_string())]
    CompareOp(String),

    // Single-quoted string, kept raw; see `quoted` for where it ends
    #[token("'", quoted)]
    String(String),

    // Bare word (boolean flags, misspelled names)
    #[regex(r"[a-zA-Z_][a-zA-Z0-9_]*", |lex| lex.slice().to_string())]
    Ident(String),

    // Punctuation
    #[token(",")]
    Comma,
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::PrefixFilter => f.write_str("PrefixFilter"),
            Token::ValueFilter => f.write_str("ValueFilter"),
            Token::SingleColumnValueFilter => f.write_str("SingleColumnValueFilter"),
            Token::And => f.write_str("AND"),
            Token::Or => f.write_str("OR"),
            Token::CompareOp(op) => write!(f, "operator '{}'", op),
            Token::String(s) => write!(f, "string '{}'", s),
            Token::Ident(name) => write!(f, "'{}'", name),
            Token::Comma => f.write_str("','"),
            Token::LParen => f.write_str("'('"),
            Token::RParen => f.write_str("')'"),
        }
    }
}

/// Lex the rest of a string whose opening quote was just matched.
///
/// Arguments are always followed by `,` or `)`, so the closing quote is the
/// first `'` followed by optional whitespace and then `,`, `)` or the end of
/// input. Any other `'` is part of the value.
fn quoted(lex: &mut logos::Lexer<Token>) -> Option<String> {
    let rest = lex.remainder();
    let end = rest
        .match_indices('\'')
        .map(|(i, _)| i)
        .find(|&i| closes_string(&rest[i + 1..]))?;
    lex.bump(end + 1);
    Some(rest[..end].to_string())
}

fn closes_string(after: &str) -> bool {
    let after = after.trim_start();
    after.is_empty() || after.starts_with(',') || after.starts_with(')')
}

/// A token with its span in the source.
#[derive(Debug, Clone, PartialEq)]
pub struct SpannedToken {
    pub token: Token,
    pub span: Span,
}

/// A lexed token, or the span of input that starts no token.
pub type LexResult = Result<SpannedToken, Span>;

/// Lexer that produces spanned tokens.
pub struct Lexer<'source> {
    inner: logos::Lexer<'source, Token>,
    peeked: Option<Option<LexResult>>,
}

impl<'source> Lexer<'source> {
    /// Create a new lexer for the given source.
    pub fn new(source: &'source str) -> Self {
        Self {
            inner: Token::lexer(source),
            peeked: None,
        }
    }

    /// Peek at the next token without consuming it.
    pub fn peek(&mut self) -> Option<&LexResult> {
        if self.peeked.is_none() {
            self.peeked = Some(self.next_inner());
        }
        self.peeked.as_ref().and_then(|o| o.as_ref())
    }

    /// Get the next token.
    pub fn next_token(&mut self) -> Option<LexResult> {
        if let Some(peeked) = self.peeked.take() {
            peeked
        } else {
            self.next_inner()
        }
    }

    fn next_inner(&mut self) -> Option<LexResult> {
        let token = self.inner.next()?;
        let span: Span = self.inner.span().into();
        Some(token.map(|token| SpannedToken { token, span }).map_err(|()| span))
    }

    /// Get the source string.
    pub fn source(&self) -> &'source str {
        self.inner.source()
    }
}

impl Iterator for Lexer<'_> {
    type Item = LexResult;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_token()
    }
}

/// Error for input that starts no token.
pub(crate) fn lex_error(source: &str, span: Span) -> ParseError {
    let found = span.slice(source);
    let hint = if found.starts_with('\'') {
        "unterminated string literal".to_string()
    } else {
        format!("unexpected input '{}'", found)
    };
    ParseError::unresolved(source, span).with_hint(hint)
}

/// Tokenize a source string into a vector of spanned tokens.
pub fn tokenize(source: &str) -> Result<Vec<SpannedToken>, ParseError> {
    Lexer::new(source)
        .map(|result| result.map_err(|span| lex_error(source, span)))
        .collect()
}
