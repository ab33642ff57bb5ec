//! The filter tree.
//!
//! A [`Filter`] is an immutable value graph: leaves own their payloads and a
//! [`CompositeFilter`] owns its members. Nothing is shared between siblings,
//! so two textually identical predicates produce two distinct values.

use crate::compare::{CompareFilter, CompareType, Comparator, FILTER_PACKAGE};
use serde::{Deserialize, Serialize};
use std::fmt;

/// How the members of a [`CompositeFilter`] are combined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ListOperator {
    /// Every member must pass (`AND`).
    MustPassAll,
    /// At least one member must pass (`OR`).
    MustPassOne,
}

impl ListOperator {
    /// The connective keyword used in filter expressions.
    pub fn connective(self) -> &'static str {
        match self {
            ListOperator::MustPassAll => "AND",
            ListOperator::MustPassOne => "OR",
        }
    }

    /// The store's name for this operator.
    pub fn name(self) -> &'static str {
        match self {
            ListOperator::MustPassAll => "MUST_PASS_ALL",
            ListOperator::MustPassOne => "MUST_PASS_ONE",
        }
    }
}

/// Matches rows whose key starts with `prefix`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RowPrefixFilter {
    pub prefix: Vec<u8>,
}

/// Matches cells whose value satisfies `compare`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ValueFilter {
    pub compare: CompareFilter,
}

/// Matches rows based on the value of a single column.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SingleColumnValueFilter {
    /// Column family.
    pub family: Vec<u8>,
    /// Column qualifier.
    pub qualifier: Vec<u8>,
    /// Comparison applied to the column's value.
    pub compare: CompareFilter,
    /// Drop rows that do not have the column at all.
    pub filter_if_missing: bool,
    /// Only test the most recent version of the column.
    pub latest_version_only: bool,
}

impl SingleColumnValueFilter {
    /// Create a filter with the default flags (`filter_if_missing = false`,
    /// `latest_version_only = true`).
    pub fn new(
        family: impl Into<Vec<u8>>,
        qualifier: impl Into<Vec<u8>>,
        op: CompareType,
        comparator: Comparator,
    ) -> Self {
        Self {
            family: family.into(),
            qualifier: qualifier.into(),
            compare: CompareFilter::new(op, comparator),
            filter_if_missing: false,
            latest_version_only: true,
        }
    }

    /// Set both trailing flags.
    pub fn with_flags(mut self, filter_if_missing: bool, latest_version_only: bool) -> Self {
        self.filter_if_missing = filter_if_missing;
        self.latest_version_only = latest_version_only;
        self
    }
}

/// Fewest members a [`CompositeFilter`] can have.
pub const MIN_MEMBERS: usize = 2;

/// Two or more filters combined under one [`ListOperator`], in order.
///
/// The fields are private so the member count cannot drop below
/// [`MIN_MEMBERS`]; deserialization checks it too.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "CompositeParts")]
pub struct CompositeFilter {
    operator: ListOperator,
    members: Vec<Filter>,
}

impl CompositeFilter {
    /// Create a composite from its members.
    ///
    /// Returns `None` if there are fewer than [`MIN_MEMBERS`] members.
    pub fn new(operator: ListOperator, members: Vec<Filter>) -> Option<Self> {
        if members.len() < MIN_MEMBERS {
            return None;
        }
        Some(Self { operator, members })
    }

    /// How the members are combined.
    pub fn operator(&self) -> ListOperator {
        self.operator
    }

    /// The members, in source order.
    pub fn members(&self) -> &[Filter] {
        &self.members
    }

    /// Take the members out of the composite.
    pub fn into_members(self) -> Vec<Filter> {
        self.members
    }
}

#[derive(Deserialize)]
struct CompositeParts {
    operator: ListOperator,
    members: Vec<Filter>,
}

impl TryFrom<CompositeParts> for CompositeFilter {
    type Error = String;

    fn try_from(parts: CompositeParts) -> Result<Self, Self::Error> {
        let found = parts.members.len();
        CompositeFilter::new(parts.operator, parts.members).ok_or_else(|| {
            format!(
                "composite filter needs at least {} members, found {}",
                MIN_MEMBERS, found
            )
        })
    }
}

/// A filter that a scan or get request can carry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Filter {
    RowPrefix(RowPrefixFilter),
    Value(ValueFilter),
    SingleColumnValue(SingleColumnValueFilter),
    Composite(CompositeFilter),
}

impl Filter {
    /// Create a row prefix filter.
    pub fn row_prefix(prefix: impl Into<Vec<u8>>) -> Self {
        Filter::RowPrefix(RowPrefixFilter {
            prefix: prefix.into(),
        })
    }

    /// Create a value filter.
    pub fn value(op: CompareType, comparator: Comparator) -> Self {
        Filter::Value(ValueFilter {
            compare: CompareFilter::new(op, comparator),
        })
    }

    /// Create a composite filter.
    ///
    /// # Panics
    ///
    /// Panics if `members` holds fewer than [`MIN_MEMBERS`] filters. Use
    /// [`CompositeFilter::new`] to check instead.
    pub fn composite(operator: ListOperator, members: Vec<Filter>) -> Self {
        let found = members.len();
        match CompositeFilter::new(operator, members) {
            Some(list) => Filter::Composite(list),
            None => panic!(
                "composite filter needs at least {} members, found {}",
                MIN_MEMBERS, found
            ),
        }
    }

    /// Combine with `other` so that both must pass.
    ///
    /// If `self` is already a `MustPassAll` composite, `other` is appended to
    /// it instead of nesting.
    pub fn and(self, other: Filter) -> Self {
        self.combine(ListOperator::MustPassAll, other)
    }

    /// Combine with `other` so that either may pass.
    ///
    /// If `self` is already a `MustPassOne` composite, `other` is appended to
    /// it instead of nesting.
    pub fn or(self, other: Filter) -> Self {
        self.combine(ListOperator::MustPassOne, other)
    }

    fn combine(self, operator: ListOperator, other: Filter) -> Self {
        match self {
            Filter::Composite(mut list) if list.operator == operator => {
                list.members.push(other);
                Filter::Composite(list)
            }
            leaf => Filter::composite(operator, vec![leaf, other]),
        }
    }

    /// Fully qualified class name of this filter in the store.
    pub fn name(&self) -> String {
        let class = match self {
            Filter::RowPrefix(_) => "PrefixFilter",
            Filter::Value(_) => "ValueFilter",
            Filter::SingleColumnValue(_) => "SingleColumnValueFilter",
            Filter::Composite(_) => "FilterList",
        };
        format!("{}.{}", FILTER_PACKAGE, class)
    }

    /// Check if this filter has no sub-filters.
    pub fn is_leaf(&self) -> bool {
        !matches!(self, Filter::Composite(_))
    }

    /// Leaf filters in depth-first, left-to-right order.
    pub fn leaves(&self) -> Vec<&Filter> {
        let mut out = Vec::new();
        self.collect_leaves(&mut out);
        out
    }

    fn collect_leaves<'a>(&'a self, out: &mut Vec<&'a Filter>) {
        match self {
            Filter::Composite(list) => {
                for member in &list.members {
                    member.collect_leaves(out);
                }
            }
            leaf => out.push(leaf),
        }
    }

    /// Nesting depth; a leaf has depth 1.
    pub fn depth(&self) -> usize {
        match self {
            Filter::Composite(list) => {
                1 + list.members.iter().map(Filter::depth).max().unwrap_or(0)
            }
            _ => 1,
        }
    }
}

impl From<RowPrefixFilter> for Filter {
    fn from(filter: RowPrefixFilter) -> Self {
        Filter::RowPrefix(filter)
    }
}

impl From<ValueFilter> for Filter {
    fn from(filter: ValueFilter) -> Self {
        Filter::Value(filter)
    }
}

impl From<SingleColumnValueFilter> for Filter {
    fn from(filter: SingleColumnValueFilter) -> Self {
        Filter::SingleColumnValue(filter)
    }
}

impl From<CompositeFilter> for Filter {
    fn from(filter: CompositeFilter) -> Self {
        Filter::Composite(filter)
    }
}

/// Renders canonical filter-language text.
///
/// Payloads are written as-is. A quote inside a value parses back unless it
/// is followed by optional whitespace and then `,` or `)`, since that reads
/// as the closing quote.
impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Filter::RowPrefix(p) => {
                write!(f, "PrefixFilter('{}')", String::from_utf8_lossy(&p.prefix))
            }
            Filter::Value(v) => write!(
                f,
                "ValueFilter({}, '{}')",
                v.compare.op, v.compare.comparator
            ),
            Filter::SingleColumnValue(s) => write!(
                f,
                "SingleColumnValueFilter('{}', '{}', {}, '{}', {}, {})",
                String::from_utf8_lossy(&s.family),
                String::from_utf8_lossy(&s.qualifier),
                s.compare.op,
                s.compare.comparator,
                s.filter_if_missing,
                s.latest_version_only
            ),
            Filter::Composite(list) => {
                for (i, member) in list.members.iter().enumerate() {
                    if i > 0 {
                        write!(f, " {} ", list.operator.connective())?;
                    }
                    if member.is_leaf() {
                        write!(f, "{}", member)?;
                    } else {
                        write!(f, "({})", member)?;
                    }
                }
                Ok(())
            }
        }
    }
}
