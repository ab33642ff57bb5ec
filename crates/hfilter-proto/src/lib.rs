//! Filter tree types for hfilter.
//!
//! This crate defines the value types a parsed filter expression resolves
//! to. A transport layer walks a [`Filter`] read-only to build its wire
//! representation; nothing here depends on how that encoding looks.
//!
//! # Modules
//!
//! - [`filter`] - The [`Filter`] tree and its leaf and composite variants
//! - [`compare`] - Comparison operators and comparators
//!
//! # Example
//!
//! ```rust
//! use hfilter_proto::{Comparator, CompareType, Filter};
//!
//! let filter = Filter::row_prefix("age")
//!     .and(Filter::value(CompareType::Equal, Comparator::substring("18")));
//!
//! assert_eq!(
//!     filter.to_string(),
//!     "PrefixFilter('age') AND ValueFilter(=, 'substring:18')"
//! );
//! ```

pub mod compare;
pub mod filter;

pub use compare::{CompareFilter, CompareType, Comparator};
pub use filter::{
    CompositeFilter, Filter, ListOperator, RowPrefixFilter, SingleColumnValueFilter, ValueFilter,
    MIN_MEMBERS,
};
