//! Comparison types shared by value-based filters.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Package prefix of the store's filter and comparator classes.
pub(crate) const FILTER_PACKAGE: &str = "org.apache.hadoop.hbase.filter";

/// Comparison outcome a cell value must satisfy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CompareType {
    /// Equal (`=`).
    Equal,
    /// Not equal (`!=`).
    NotEqual,
    /// Less than (`<`).
    Less,
    /// Less than or equal (`<=`).
    LessOrEqual,
    /// Greater than (`>`).
    Greater,
    /// Greater than or equal (`>=`).
    GreaterOrEqual,
}

impl CompareType {
    /// All comparison types, in declaration order.
    pub const ALL: [CompareType; 6] = [
        CompareType::Equal,
        CompareType::NotEqual,
        CompareType::Less,
        CompareType::LessOrEqual,
        CompareType::Greater,
        CompareType::GreaterOrEqual,
    ];

    /// The operator token used in filter expressions.
    pub fn token(self) -> &'static str {
        match self {
            CompareType::Equal => "=",
            CompareType::NotEqual => "!=",
            CompareType::Less => "<",
            CompareType::LessOrEqual => "<=",
            CompareType::Greater => ">",
            CompareType::GreaterOrEqual => ">=",
        }
    }

    /// The store's name for this comparison (`EQUAL`, `LESS_OR_EQUAL`, ...).
    pub fn name(self) -> &'static str {
        match self {
            CompareType::Equal => "EQUAL",
            CompareType::NotEqual => "NOT_EQUAL",
            CompareType::Less => "LESS",
            CompareType::LessOrEqual => "LESS_OR_EQUAL",
            CompareType::Greater => "GREATER",
            CompareType::GreaterOrEqual => "GREATER_OR_EQUAL",
        }
    }
}

impl fmt::Display for CompareType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

/// A value-comparison strategy applied to a cell's raw value.
///
/// Every variant owns its payload.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Comparator {
    /// Lexicographic byte comparison against the payload.
    Binary(Vec<u8>),
    /// Byte comparison against the payload, limited to the payload's length.
    BinaryPrefix(Vec<u8>),
    /// Matches empty (null) values.
    Null,
    /// Regular expression match.
    RegexString(String),
    /// Case-insensitive substring containment.
    Substring(String),
}

impl Comparator {
    /// Create a binary comparator.
    pub fn binary(value: impl Into<Vec<u8>>) -> Self {
        Comparator::Binary(value.into())
    }

    /// Create a binary prefix comparator.
    pub fn binary_prefix(value: impl Into<Vec<u8>>) -> Self {
        Comparator::BinaryPrefix(value.into())
    }

    /// Create a regex comparator.
    pub fn regex_string(pattern: impl Into<String>) -> Self {
        Comparator::RegexString(pattern.into())
    }

    /// Create a substring comparator.
    pub fn substring(needle: impl Into<String>) -> Self {
        Comparator::Substring(needle.into())
    }

    /// The match-type name used in filter expressions (`binary`, `substring`, ...).
    pub fn match_type(&self) -> &'static str {
        match self {
            Comparator::Binary(_) => "binary",
            Comparator::BinaryPrefix(_) => "binaryprefix",
            Comparator::Null => "null",
            Comparator::RegexString(_) => "regexstring",
            Comparator::Substring(_) => "substring",
        }
    }

    /// Fully qualified class name of this comparator in the store.
    pub fn name(&self) -> String {
        let class = match self {
            Comparator::Binary(_) => "BinaryComparator",
            Comparator::BinaryPrefix(_) => "BinaryPrefixComparator",
            Comparator::Null => "NullComparator",
            Comparator::RegexString(_) => "RegexStringComparator",
            Comparator::Substring(_) => "SubstringComparator",
        };
        format!("{}.{}", FILTER_PACKAGE, class)
    }

    /// The raw payload, if the comparator carries one.
    pub fn payload(&self) -> Option<&[u8]> {
        match self {
            Comparator::Binary(v) | Comparator::BinaryPrefix(v) => Some(v),
            Comparator::RegexString(s) | Comparator::Substring(s) => Some(s.as_bytes()),
            Comparator::Null => None,
        }
    }
}

/// Renders the `<matchType>:<value>` argument without surrounding quotes.
impl fmt::Display for Comparator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let payload = self.payload().unwrap_or_default();
        write!(
            f,
            "{}:{}",
            self.match_type(),
            String::from_utf8_lossy(payload)
        )
    }
}

/// A comparison operator paired with the comparator it applies.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CompareFilter {
    /// The comparison outcome to test for.
    pub op: CompareType,
    /// How the cell value is compared.
    pub comparator: Comparator,
}

impl CompareFilter {
    /// Create a new compare filter.
    pub fn new(op: CompareType, comparator: Comparator) -> Self {
        Self { op, comparator }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokens_are_distinct() {
        let mut tokens: Vec<&str> = CompareType::ALL.iter().map(|op| op.token()).collect();
        tokens.sort_unstable();
        tokens.dedup();
        assert_eq!(tokens.len(), CompareType::ALL.len());
    }

    #[test]
    fn test_greater_or_equal_keeps_its_own_name() {
        assert_eq!(CompareType::GreaterOrEqual.token(), ">=");
        assert_eq!(CompareType::GreaterOrEqual.name(), "GREATER_OR_EQUAL");
        assert_ne!(CompareType::GreaterOrEqual, CompareType::LessOrEqual);
    }

    #[test]
    fn test_comparator_display() {
        assert_eq!(Comparator::binary("14").to_string(), "binary:14");
        assert_eq!(Comparator::binary_prefix("ab").to_string(), "binaryprefix:ab");
        assert_eq!(Comparator::Null.to_string(), "null:");
        assert_eq!(Comparator::regex_string("a.*").to_string(), "regexstring:a.*");
        assert_eq!(Comparator::substring("18").to_string(), "substring:18");
    }

    #[test]
    fn test_comparator_names() {
        assert_eq!(
            Comparator::substring("x").name(),
            "org.apache.hadoop.hbase.filter.SubstringComparator"
        );
        assert_eq!(
            Comparator::Null.name(),
            "org.apache.hadoop.hbase.filter.NullComparator"
        );
    }

    #[test]
    fn test_payload() {
        assert_eq!(Comparator::binary(vec![0u8, 1]).payload(), Some(&[0u8, 1][..]));
        assert_eq!(Comparator::Null.payload(), None);
    }
}
