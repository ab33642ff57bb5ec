//! Recursive descent parser for filter expressions.
//!
//! ```text
//! expression := or_chain EOF
//! or_chain   := and_chain ( "OR" and_chain )*
//! and_chain  := primary ( "AND" primary )*
//! primary    := "(" or_chain ")" | leaf
//! ```
//!
//! A chain of operands joined by one connective becomes a single composite
//! with the operands as members, in order. A parenthesized group is always
//! its own member, so `(A AND B) AND C` nests while `A AND B AND C` does not.

use crate::error::{ParseError, ParseErrorKind};
use crate::lexer::{lex_error, Lexer, SpannedToken, Token};
use crate::options::ParseOptions;
use crate::span::Span;
use hfilter_proto::{Filter, ListOperator};
use tracing::{debug, instrument};

/// Parser for the filter expression language.
pub struct Parser<'source> {
    lexer: Lexer<'source>,
    source: &'source str,
    options: ParseOptions,
    depth: usize,
}

impl<'source> Parser<'source> {
    /// Create a new parser with the default options.
    pub fn new(source: &'source str) -> Self {
        Self::with_options(source, ParseOptions::default())
    }

    /// Create a new parser with the given options.
    pub fn with_options(source: &'source str, options: ParseOptions) -> Self {
        Self {
            lexer: Lexer::new(source),
            source,
            options,
            depth: 0,
        }
    }

    /// Parse the whole input into one filter.
    pub fn parse_filter(&mut self) -> Result<Filter, ParseError> {
        if self.source.len() > self.options.max_len {
            return Err(ParseError::new(
                ParseErrorKind::InputTooLong {
                    len: self.source.len(),
                    limit: self.options.max_len,
                },
                Span::new(self.options.max_len, self.source.len()),
            ));
        }

        if self.peek_token()?.is_none() {
            return Err(ParseError::unresolved(self.source, self.end_span())
                .with_hint("expected a filter expression"));
        }

        let filter = self.parse_or_chain()?;

        // Everything must have been consumed
        if let Some(tok) = self.next_token_opt()? {
            let hint = match &tok.token {
                Token::Ident(word)
                    if word.eq_ignore_ascii_case("and") || word.eq_ignore_ascii_case("or") =>
                {
                    "connectives are written as upper-case AND / OR".to_string()
                }
                Token::RParen => "unmatched ')'".to_string(),
                other => format!("expected AND, OR or end of input, found {}", other),
            };
            return Err(ParseError::unresolved(self.source, tok.span).with_hint(hint));
        }

        Ok(filter)
    }

    /// Parse OR chains.
    fn parse_or_chain(&mut self) -> Result<Filter, ParseError> {
        let mut members = vec![self.parse_and_chain()?];

        while let Some(or) = self.eat(&Token::Or)? {
            let operand = self
                .parse_and_chain()
                .map_err(|e| self.anchor_at_end(e, or.span))?;
            members.push(operand);
        }

        Ok(compose(ListOperator::MustPassOne, members))
    }

    /// Parse AND chains.
    fn parse_and_chain(&mut self) -> Result<Filter, ParseError> {
        let mut members = vec![self.parse_primary()?];

        while let Some(and) = self.eat(&Token::And)? {
            let operand = self
                .parse_primary()
                .map_err(|e| self.anchor_at_end(e, and.span))?;
            members.push(operand);
        }

        Ok(compose(ListOperator::MustPassAll, members))
    }

    /// Parse a parenthesized group or a predicate call.
    fn parse_primary(&mut self) -> Result<Filter, ParseError> {
        let tok = self.next_token()?;
        match tok.token {
            Token::LParen => self.parse_group(tok.span),
            Token::PrefixFilter | Token::ValueFilter | Token::SingleColumnValueFilter => {
                self.parse_leaf(tok)
            }
            other => Err(ParseError::unresolved(self.source, tok.span)
                .with_hint(format!("expected a filter or '(', found {}", other))),
        }
    }

    /// Parse the rest of a group whose '(' is at `open`.
    fn parse_group(&mut self, open: Span) -> Result<Filter, ParseError> {
        if self.depth >= self.options.max_depth {
            return Err(ParseError::new(
                ParseErrorKind::NestingTooDeep {
                    limit: self.options.max_depth,
                },
                open,
            ));
        }

        self.depth += 1;
        let inner = self.parse_or_chain().and_then(|filter| {
            self.expect_token(Token::RParen)?;
            Ok(filter)
        });
        self.depth -= 1;

        inner.map_err(|e| e.anchored(self.source, open.start))
    }

    /// Move an error hit at end of input back to the connective before it.
    fn anchor_at_end(&self, err: ParseError, connective: Span) -> ParseError {
        if err.span.start >= self.source.len() {
            err.anchored(self.source, connective.start)
        } else {
            err
        }
    }

    /// The source being parsed.
    pub(crate) fn source(&self) -> &'source str {
        self.source
    }

    fn end_span(&self) -> Span {
        Span::at(self.source.len())
    }

    /// Peek at the next token without consuming it.
    fn peek_token(&mut self) -> Result<Option<&Token>, ParseError> {
        let source = self.source;
        match self.lexer.peek() {
            Some(Ok(tok)) => Ok(Some(&tok.token)),
            Some(Err(span)) => Err(lex_error(source, *span)),
            None => Ok(None),
        }
    }

    /// Consume the next token if it has the same kind as `expected`.
    pub(crate) fn eat(&mut self, expected: &Token) -> Result<Option<SpannedToken>, ParseError> {
        let matches = match self.peek_token()? {
            Some(tok) => std::mem::discriminant(tok) == std::mem::discriminant(expected),
            None => false,
        };
        if matches {
            self.next_token().map(Some)
        } else {
            Ok(None)
        }
    }

    /// Expect and consume a specific token.
    pub(crate) fn expect_token(&mut self, expected: Token) -> Result<SpannedToken, ParseError> {
        let tok = self.next_token()?;
        if std::mem::discriminant(&tok.token) == std::mem::discriminant(&expected) {
            Ok(tok)
        } else {
            Err(ParseError::unresolved(self.source, tok.span)
                .with_hint(format!("expected {}, found {}", expected, tok.token)))
        }
    }

    /// Get the next token or error if EOF.
    pub(crate) fn next_token(&mut self) -> Result<SpannedToken, ParseError> {
        self.next_token_opt()?.ok_or_else(|| {
            ParseError::unresolved(self.source, self.end_span())
                .with_hint("unexpected end of input")
        })
    }

    fn next_token_opt(&mut self) -> Result<Option<SpannedToken>, ParseError> {
        match self.lexer.next_token() {
            Some(Ok(tok)) => Ok(Some(tok)),
            Some(Err(span)) => Err(lex_error(self.source, span)),
            None => Ok(None),
        }
    }
}

/// Collapse a chain into its single operand, or a composite of all of them.
fn compose(operator: ListOperator, mut members: Vec<Filter>) -> Filter {
    if members.len() == 1 {
        if let Some(only) = members.pop() {
            return only;
        }
    }
    debug!(
        operator = operator.name(),
        members = members.len(),
        "built composite filter"
    );
    Filter::composite(operator, members)
}

/// Parse a source string into a filter with the given options.
#[instrument(level = "debug", skip_all, fields(len = source.len()))]
pub fn parse_with(source: &str, options: &ParseOptions) -> Result<Filter, ParseError> {
    let mut parser = Parser::with_options(source, *options);
    parser.parse_filter().map_err(|e| {
        debug!(error = %e, "filter expression rejected");
        e
    })
}

/// Parse a source string into a filter.
pub fn parse(source: &str) -> Result<Filter, ParseError> {
    parse_with(source, &ParseOptions::default())
}
