//! Raw predicate calls, before their arguments are resolved.

use crate::span::{Span, Spanned};

/// A predicate call as written, with every argument still in source form.
#[derive(Debug, Clone, PartialEq)]
pub enum LeafCall {
    /// `PrefixFilter('<prefix>')`
    Prefix { prefix: Spanned<String> },
    /// `ValueFilter(<op>, '<matchType>:<value>')`
    Value {
        op: Spanned<String>,
        comparator: Spanned<String>,
    },
    /// `SingleColumnValueFilter('<family>', '<qualifier>', <op>, '<matchType>:<value>'[, <bool>, <bool>])`
    SingleColumnValue {
        family: Spanned<String>,
        qualifier: Spanned<String>,
        op: Spanned<String>,
        comparator: Spanned<String>,
        flags: Option<(bool, bool)>,
    },
}

/// A predicate call together with the span of the whole call.
#[derive(Debug, Clone, PartialEq)]
pub struct SpannedCall {
    pub call: LeafCall,
    pub span: Span,
}
