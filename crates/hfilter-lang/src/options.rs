//! Parser limits.

/// Default maximum parenthesis nesting depth.
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// Default maximum input length in bytes (64 KiB).
pub const DEFAULT_MAX_LEN: usize = 64 * 1024;

/// Limits applied to a single parse call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseOptions {
    /// Maximum number of nested parenthesized groups.
    pub max_depth: usize,

    /// Maximum input length in bytes.
    pub max_len: usize,
}

impl ParseOptions {
    /// Create options with the default limits.
    pub fn new() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            max_len: DEFAULT_MAX_LEN,
        }
    }

    /// Set the maximum nesting depth.
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Set the maximum input length.
    pub fn with_max_len(mut self, max_len: usize) -> Self {
        self.max_len = max_len;
        self
    }
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self::new()
    }
}
