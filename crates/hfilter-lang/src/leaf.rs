//! Leaf recognizer: predicate calls and the fixed vocabularies they use.
//!
//! A predicate call is parsed in two steps. The argument list is first read
//! into a [`LeafCall`] so that the structure of the call is checked before
//! any of its values; [`resolve`] then validates the arguments against the
//! operator and comparator tables and builds the leaf [`Filter`].

use crate::ast::{LeafCall, SpannedCall};
use crate::error::ParseError;
use crate::lexer::{SpannedToken, Token};
use crate::parser::Parser;
use crate::span::{Span, Spanned};
use hfilter_proto::{CompareType, Comparator, Filter, SingleColumnValueFilter};
use tracing::trace;

/// Operator tokens and the comparison each one selects.
pub const COMPARE_OPS: [(&str, CompareType); 6] = [
    ("=", CompareType::Equal),
    ("!=", CompareType::NotEqual),
    ("<", CompareType::Less),
    ("<=", CompareType::LessOrEqual),
    (">", CompareType::Greater),
    (">=", CompareType::GreaterOrEqual),
];

/// Builds a comparator from the raw value text of a `<matchType>:<value>` argument.
pub type ComparatorCtor = fn(&str) -> Comparator;

/// Comparator match-type names (lower case) and their constructors.
pub const COMPARATORS: [(&str, ComparatorCtor); 5] = [
    ("binary", binary),
    ("binaryprefix", binary_prefix),
    ("null", null),
    ("regexstring", regex_string),
    ("substring", substring),
];

fn binary(value: &str) -> Comparator {
    Comparator::binary(value)
}

fn binary_prefix(value: &str) -> Comparator {
    Comparator::binary_prefix(value)
}

fn null(_value: &str) -> Comparator {
    Comparator::Null
}

fn regex_string(value: &str) -> Comparator {
    Comparator::regex_string(value)
}

fn substring(value: &str) -> Comparator {
    Comparator::substring(value)
}

/// Look up an operator token.
pub fn compare_type(token: &str) -> Option<CompareType> {
    COMPARE_OPS
        .iter()
        .find(|(t, _)| *t == token)
        .map(|(_, op)| *op)
}

/// Look up a match type (case-insensitive) and build its comparator from `value`.
pub fn comparator(match_type: &str, value: &str) -> Option<Comparator> {
    let key = match_type.to_ascii_lowercase();
    COMPARATORS
        .iter()
        .find(|(name, _)| *name == key)
        .map(|(_, ctor)| ctor(value))
}

/// Check that `s` is one or more ASCII word characters.
fn is_word(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'_')
}

impl Parser<'_> {
    /// Parse the predicate call introduced by `name` into a leaf filter.
    ///
    /// Unresolved errors report the leftover text from the call's name on.
    pub(crate) fn parse_leaf(&mut self, name: SpannedToken) -> Result<Filter, ParseError> {
        let source = self.source();
        let start = name.span.start;
        self.parse_leaf_call(name)
            .and_then(|call| resolve(source, call))
            .map_err(|e| e.anchored(source, start))
    }

    fn parse_leaf_call(&mut self, name: SpannedToken) -> Result<SpannedCall, ParseError> {
        self.expect_token(Token::LParen)?;

        let call = match name.token {
            Token::PrefixFilter => LeafCall::Prefix {
                prefix: self.expect_string()?,
            },
            Token::ValueFilter => {
                let op = self.expect_compare_op()?;
                self.expect_token(Token::Comma)?;
                let comparator = self.expect_string()?;
                LeafCall::Value { op, comparator }
            }
            Token::SingleColumnValueFilter => {
                let family = self.expect_string()?;
                self.expect_token(Token::Comma)?;
                let qualifier = self.expect_string()?;
                self.expect_token(Token::Comma)?;
                let op = self.expect_compare_op()?;
                self.expect_token(Token::Comma)?;
                let comparator = self.expect_string()?;

                // Trailing flags come as a pair or not at all
                let flags = if self.eat(&Token::Comma)?.is_some() {
                    let filter_if_missing = self.expect_bool()?;
                    self.expect_token(Token::Comma)?;
                    let latest_version_only = self.expect_bool()?;
                    Some((filter_if_missing, latest_version_only))
                } else {
                    None
                };

                LeafCall::SingleColumnValue {
                    family,
                    qualifier,
                    op,
                    comparator,
                    flags,
                }
            }
            other => {
                return Err(ParseError::unresolved(self.source(), name.span)
                    .with_hint(format!("{} is not a filter", other)))
            }
        };

        let close = self.expect_token(Token::RParen)?;

        Ok(SpannedCall {
            call,
            span: name.span.merge(close.span),
        })
    }

    fn expect_string(&mut self) -> Result<Spanned<String>, ParseError> {
        let tok = self.next_token()?;
        match tok.token {
            Token::String(s) => Ok(Spanned::new(s, tok.span)),
            other => Err(ParseError::unresolved(self.source(), tok.span)
                .with_hint(format!("expected a quoted string, found {}", other))),
        }
    }

    fn expect_compare_op(&mut self) -> Result<Spanned<String>, ParseError> {
        let tok = self.next_token()?;
        match tok.token {
            Token::CompareOp(op) => Ok(Spanned::new(op, tok.span)),
            other => Err(ParseError::unresolved(self.source(), tok.span)
                .with_hint(format!("expected a comparison operator, found {}", other))),
        }
    }

    fn expect_bool(&mut self) -> Result<bool, ParseError> {
        let tok = self.next_token()?;
        match &tok.token {
            Token::Ident(word) if word.eq_ignore_ascii_case("true") => Ok(true),
            Token::Ident(word) if word.eq_ignore_ascii_case("false") => Ok(false),
            other => Err(ParseError::unresolved(self.source(), tok.span)
                .with_hint(format!("expected true or false, found {}", other))),
        }
    }
}

/// Validate a parsed call and build its leaf filter.
pub(crate) fn resolve(source: &str, call: SpannedCall) -> Result<Filter, ParseError> {
    let filter = match call.call {
        LeafCall::Prefix { prefix } => Filter::row_prefix(word_arg(source, prefix, "prefix")?),
        LeafCall::Value { op, comparator } => {
            let (op, comparator) = resolve_compare(source, &op, &comparator)?;
            Filter::value(op, comparator)
        }
        LeafCall::SingleColumnValue {
            family,
            qualifier,
            op,
            comparator,
            flags,
        } => {
            let family = word_arg(source, family, "column family")?;
            let qualifier = word_arg(source, qualifier, "column qualifier")?;
            let (op, comparator) = resolve_compare(source, &op, &comparator)?;
            let (filter_if_missing, latest_version_only) = flags.unwrap_or((false, true));
            SingleColumnValueFilter::new(family, qualifier, op, comparator)
                .with_flags(filter_if_missing, latest_version_only)
                .into()
        }
    };

    trace!(name = %filter.name(), span = ?call.span, "recognized leaf filter");
    Ok(filter)
}

fn word_arg(source: &str, arg: Spanned<String>, what: &str) -> Result<String, ParseError> {
    if is_word(&arg.value) {
        Ok(arg.value)
    } else {
        Err(ParseError::unresolved(source, arg.span)
            .with_hint(format!("{} must be letters, digits or '_'", what)))
    }
}

fn resolve_compare(
    source: &str,
    op: &Spanned<String>,
    argument: &Spanned<String>,
) -> Result<(CompareType, Comparator), ParseError> {
    let (match_type, value) = argument
        .value
        .split_once(':')
        .filter(|(match_type, _)| is_word(match_type))
        .ok_or_else(|| {
            ParseError::unresolved(source, argument.span)
                .with_hint("expected '<matchType>:<value>'")
        })?;

    let compare = compare_type(&op.value)
        .ok_or_else(|| ParseError::unsupported_operator(&op.value, op.span))?;

    // Skip the opening quote
    let type_start = argument.span.start + 1;
    let comparator = comparator(match_type, value).ok_or_else(|| {
        ParseError::unsupported_comparator(
            match_type,
            Span::new(type_start, type_start + match_type.len()),
        )
    })?;

    Ok((compare, comparator))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ParseErrorKind;

    #[test]
    fn test_operator_table_is_complete() {
        for op in CompareType::ALL {
            assert_eq!(compare_type(op.token()), Some(op), "token {}", op.token());
        }
        assert_eq!(COMPARE_OPS.len(), CompareType::ALL.len());
    }

    #[test]
    fn test_greater_or_equal_is_not_less_or_equal() {
        assert_eq!(compare_type(">="), Some(CompareType::GreaterOrEqual));
    }

    #[test]
    fn test_unknown_operators() {
        for token in ["==", "=>", "<>", "~", "!", "=<"] {
            assert_eq!(compare_type(token), None, "token {}", token);
        }
    }

    #[test]
    fn test_comparator_table_round_trips_match_type() {
        for (name, _) in COMPARATORS {
            let built = comparator(name, "v").unwrap();
            assert_eq!(built.match_type(), name);
        }
    }

    #[test]
    fn test_comparator_lookup_is_case_insensitive() {
        assert_eq!(
            comparator("SubString", "18"),
            Some(Comparator::substring("18"))
        );
        assert_eq!(
            comparator("BINARYPREFIX", "ab"),
            Some(Comparator::binary_prefix("ab"))
        );
        assert_eq!(comparator("null", "ignored"), Some(Comparator::Null));
        assert_eq!(comparator("long", "1"), None);
    }

    #[test]
    fn test_value_passed_verbatim() {
        assert_eq!(
            comparator("regexstring", r"^row\d+:x$"),
            Some(Comparator::regex_string(r"^row\d+:x$"))
        );
    }

    #[test]
    fn test_is_word() {
        assert!(is_word("cf1"));
        assert!(is_word("_col_2"));
        assert!(!is_word(""));
        assert!(!is_word("a-b"));
        assert!(!is_word("a b"));
    }

    #[test]
    fn test_resolve_checks_shape_before_operator() {
        let source = "ValueFilter(==, 'nocolon')";
        let call = SpannedCall {
            call: LeafCall::Value {
                op: Spanned::new("==".to_string(), Span::new(12, 14)),
                comparator: Spanned::new("nocolon".to_string(), Span::new(16, 25)),
            },
            span: Span::new(0, 26),
        };
        let err = resolve(source, call).unwrap_err();
        assert!(err.is_unresolved());
    }

    #[test]
    fn test_resolve_comparator_span() {
        let source = "ValueFilter(=, 'long:1')";
        let call = SpannedCall {
            call: LeafCall::Value {
                op: Spanned::new("=".to_string(), Span::new(12, 13)),
                comparator: Spanned::new("long:1".to_string(), Span::new(15, 23)),
            },
            span: Span::new(0, 24),
        };
        let err = resolve(source, call).unwrap_err();
        assert_eq!(
            err.kind,
            ParseErrorKind::UnsupportedComparator("long".to_string())
        );
        assert_eq!(err.span, Span::new(16, 20));
    }
}
