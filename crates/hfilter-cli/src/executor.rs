//! Expression parsing and rendering.

use crate::formatter::Formatter;
use hfilter_lang::{parse_with, tokenize, ParseOptions};
use thiserror::Error;

/// Execution errors.
#[derive(Debug, Error)]
pub enum ExecuteError {
    /// Parse error, rendered against its source.
    #[error("{0}")]
    Language(String),

    /// Script file could not be read.
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Parse an expression and return formatted output.
pub fn execute(
    input: &str,
    options: &ParseOptions,
    formatter: &dyn Formatter,
) -> Result<String, ExecuteError> {
    let filter = parse_with(input, options)
        .map_err(|e| ExecuteError::Language(e.format_with_source(input)))?;
    Ok(formatter.format_filter(&filter))
}

/// List the tokens of an expression, one per line with byte offsets.
pub fn tokens(input: &str) -> Result<String, ExecuteError> {
    let tokens =
        tokenize(input).map_err(|e| ExecuteError::Language(e.format_with_source(input)))?;

    let lines: Vec<String> = tokens
        .iter()
        .map(|t| format!("{:>4}..{:<4} {}", t.span.start, t.span.end, t.token))
        .collect();
    Ok(lines.join("\n"))
}

/// Split a script into expressions, skipping blank and comment lines.
///
/// Returns each expression with its 1-based line number.
pub fn script_lines(content: &str) -> Vec<(usize, &str)> {
    content
        .lines()
        .enumerate()
        .map(|(i, l)| (i + 1, l.trim()))
        .filter(|(_, l)| !l.is_empty() && !l.starts_with("//") && !l.starts_with('#'))
        .collect()
}

/// Read a script file.
pub fn read_script(path: &std::path::Path) -> Result<String, ExecuteError> {
    std::fs::read_to_string(path).map_err(|source| ExecuteError::Io {
        path: path.display().to_string(),
        source,
    })
}
