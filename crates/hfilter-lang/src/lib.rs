//! hfilter filter expression language
//!
//! This crate parses the textual filter language used to describe scan
//! filters for a wide-column key-value store into a [`Filter`] tree.
//!
//! # Syntax
//!
//! ## Predicates
//!
//! ```text
//! PrefixFilter('row')
//! ValueFilter(=, 'substring:18')
//! SingleColumnValueFilter('cf1', 'col1', >=, 'binary:14')
//! SingleColumnValueFilter('cf1', 'col1', =, 'binary:14', true, false)
//! ```
//!
//! Operators are `=`, `!=`, `<`, `<=`, `>`, `>=`. Comparators are written
//! `'<matchType>:<value>'` with match types `binary`, `binaryprefix`,
//! `null`, `regexstring` and `substring` (case-insensitive). The two
//! trailing flags of `SingleColumnValueFilter` are `filterIfMissing` and
//! `latestVersionOnly`, defaulting to `false` and `true`.
//!
//! ## Composition
//!
//! ```text
//! PrefixFilter('age') AND ValueFilter(=, 'substring:18')
//! PrefixFilter('a') OR ( PrefixFilter('b') AND ValueFilter(!=, 'null:') )
//! ```
//!
//! `AND` binds tighter than `OR`; parentheses group explicitly.
//!
//! # Usage
//!
//! ```rust
//! use hfilter_lang::{parse, Filter, ListOperator};
//!
//! let filter = parse("PrefixFilter('age') AND ValueFilter(=, 'substring:18')").unwrap();
//! assert!(matches!(
//!     filter,
//!     Filter::Composite(ref list) if list.operator() == ListOperator::MustPassAll
//! ));
//! ```

pub mod ast;
pub mod error;
pub mod leaf;
pub mod lexer;
pub mod options;
pub mod parser;
pub mod span;

// Re-export main types
pub use error::{ParseError, ParseErrorKind};
pub use hfilter_proto::{
    CompareFilter, CompareType, Comparator, CompositeFilter, Filter, ListOperator,
    RowPrefixFilter, SingleColumnValueFilter, ValueFilter,
};
pub use options::{ParseOptions, DEFAULT_MAX_DEPTH, DEFAULT_MAX_LEN};
pub use span::{Span, Spanned};

/// Parse a filter expression with the default options.
///
/// # Example
///
/// ```rust
/// use hfilter_lang::{parse, Filter};
///
/// let filter = parse("PrefixFilter('age')").unwrap();
/// assert_eq!(filter, Filter::row_prefix("age"));
/// ```
pub fn parse(source: &str) -> Result<Filter, ParseError> {
    parser::parse(source)
}

/// Parse a filter expression with explicit limits.
///
/// # Example
///
/// ```rust
/// use hfilter_lang::{parse_with, ParseOptions};
///
/// let options = ParseOptions::new().with_max_depth(2);
/// assert!(parse_with("(((PrefixFilter('a'))))", &options).is_err());
/// ```
pub fn parse_with(source: &str, options: &ParseOptions) -> Result<Filter, ParseError> {
    parser::parse_with(source, options)
}

/// Tokenize a source string (for debugging/testing).
///
/// # Example
///
/// ```rust
/// use hfilter_lang::tokenize;
///
/// let tokens = tokenize("PrefixFilter('age')").unwrap();
/// assert_eq!(tokens.len(), 4);
/// ```
pub fn tokenize(source: &str) -> Result<Vec<lexer::SpannedToken>, ParseError> {
    lexer::tokenize(source)
}
