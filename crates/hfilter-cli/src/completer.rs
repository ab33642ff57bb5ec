//! Tab completion for the REPL.

use hfilter_lang::leaf::COMPARATORS;
use rustyline::completion::{Completer, Pair};
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::validate::Validator;
use rustyline::{Context, Helper};
use std::borrow::Cow;

/// REPL helper with completion support.
#[derive(Default)]
pub struct FilterHelper;

impl FilterHelper {
    pub fn new() -> Self {
        Self
    }
}

/// Dot-commands for completion.
const DOT_COMMANDS: &[&str] = &[
    ".format", ".tokens", ".history", ".clear", ".help", ".exit", ".quit",
];

/// Predicate call names.
const FILTER_NAMES: &[&str] = &["PrefixFilter", "ValueFilter", "SingleColumnValueFilter"];

/// Connectives between filters.
const CONNECTIVES: &[&str] = &["AND", "OR"];

/// Flag values of SingleColumnValueFilter.
const FLAG_VALUES: &[&str] = &["true", "false"];

fn pairs<'a>(candidates: impl IntoIterator<Item = &'a str>, word: &str) -> Vec<Pair> {
    let lower = word.to_lowercase();
    candidates
        .into_iter()
        .filter(|c| c.to_lowercase().starts_with(&lower))
        .map(|c| Pair {
            display: c.to_string(),
            replacement: c.to_string(),
        })
        .collect()
}

impl FilterHelper {
    fn candidates(&self, line_to_cursor: &str) -> (usize, Vec<Pair>) {
        // Dot commands at start of line
        let trimmed = line_to_cursor.trim_start();
        if trimmed.starts_with('.') && !trimmed.contains(' ') {
            let start = line_to_cursor.len() - trimmed.len();
            return (start, pairs(DOT_COMMANDS.iter().copied(), trimmed));
        }

        // Inside a quoted argument: complete the match type
        if line_to_cursor.matches('\'').count() % 2 == 1 {
            let quote = line_to_cursor.rfind('\'').map(|i| i + 1).unwrap_or(0);
            let word = &line_to_cursor[quote..];
            if word.contains(':') {
                return (quote, Vec::new());
            }
            let match_types: Vec<String> =
                COMPARATORS.iter().map(|(name, _)| format!("{}:", name)).collect();
            return (quote, pairs(match_types.iter().map(String::as_str), word));
        }

        let word_start = line_to_cursor
            .rfind(|c: char| c.is_whitespace() || c == '(' || c == ',')
            .map(|i| i + 1)
            .unwrap_or(0);
        let word = &line_to_cursor[word_start..];
        let before = line_to_cursor[..word_start].trim_end();

        let completions = if before.is_empty() || (before.ends_with('(') && is_group(before)) {
            pairs(FILTER_NAMES.iter().copied(), word)
        } else if before.ends_with(')') {
            pairs(CONNECTIVES.iter().copied(), word)
        } else if before.ends_with("AND") || before.ends_with("OR") {
            pairs(FILTER_NAMES.iter().copied(), word)
        } else if before.ends_with(',') {
            pairs(FLAG_VALUES.iter().copied(), word)
        } else {
            Vec::new()
        };

        (word_start, completions)
    }
}

/// Check whether the `(` ending `before` opens a group rather than a call.
fn is_group(before: &str) -> bool {
    let head = before[..before.len() - 1].trim_end();
    !head.ends_with(|c: char| c.is_ascii_alphanumeric() || c == '_')
        || head.ends_with("AND")
        || head.ends_with("OR")
}

impl Completer for FilterHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        Ok(self.candidates(&line[..pos]))
    }
}

impl Hinter for FilterHelper {
    type Hint = String;

    fn hint(&self, _line: &str, _pos: usize, _ctx: &Context<'_>) -> Option<String> {
        None
    }
}

impl Highlighter for FilterHelper {
    fn highlight<'l>(&self, line: &'l str, _pos: usize) -> Cow<'l, str> {
        Cow::Borrowed(line)
    }

    fn highlight_char(
        &self,
        _line: &str,
        _pos: usize,
        _kind: rustyline::highlight::CmdKind,
    ) -> bool {
        false
    }
}

impl Validator for FilterHelper {}

impl Helper for FilterHelper {}
