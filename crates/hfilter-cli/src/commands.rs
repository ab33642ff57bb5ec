//! REPL dot-command handling.

use crate::executor;
use crate::formatter::OutputFormat;

/// Result of executing a command.
#[derive(Debug, PartialEq)]
pub enum CommandResult {
    /// Exit the REPL.
    Exit,
    /// Output to display.
    Output(String),
    /// Change the output format.
    SetFormat(OutputFormat),
    /// Show history.
    ShowHistory,
    /// Clear screen.
    Clear,
}

/// Parse and execute a dot-command.
pub fn handle_command(line: &str, format: OutputFormat) -> CommandResult {
    let line = line.trim();
    let (command, arg) = match line.split_once(char::is_whitespace) {
        Some((command, arg)) => (command.to_lowercase(), Some(arg.trim())),
        None => (line.to_lowercase(), None),
    };

    match command.as_str() {
        ".exit" | ".quit" | ".q" => CommandResult::Exit,

        ".help" | ".h" | ".?" => CommandResult::Output(get_help()),

        ".clear" | ".cls" => CommandResult::Clear,

        ".history" => CommandResult::ShowHistory,

        ".format" => match arg {
            Some(name) => match OutputFormat::from_name(name) {
                Some(fmt) => CommandResult::SetFormat(fmt),
                None => CommandResult::Output(format!(
                    "Unknown format '{}'. Use: tree, json, text, table",
                    name
                )),
            },
            None => CommandResult::Output(format!("Current format: {}", format)),
        },

        ".tokens" => match arg {
            Some(expr) => CommandResult::Output(
                executor::tokens(expr).unwrap_or_else(|e| e.to_string()),
            ),
            None => CommandResult::Output("Usage: .tokens <expression>".to_string()),
        },

        _ => CommandResult::Output(format!("Unknown command: {}", command)),
    }
}

/// Check if a line is a dot-command.
pub fn is_command(line: &str) -> bool {
    line.trim().starts_with('.')
}

/// Get help text for REPL commands.
fn get_help() -> String {
    r#"REPL Commands
=============

.format [type]        Get or set output format (tree, json, text, table)
.tokens <expr>        Show the tokens of an expression
.history              Show expression history
.clear                Clear the screen
.help                 Show this help message
.exit / .quit         Exit the REPL

Filter Expressions
==================
PrefixFilter('<prefix>')
ValueFilter(<op>, '<matchType>:<value>')
SingleColumnValueFilter('<family>', '<qualifier>', <op>, '<matchType>:<value>'[, <bool>, <bool>])

Operators:    =  !=  <  <=  >  >=
Match types:  binary  binaryprefix  null  regexstring  substring
Connectives:  AND binds tighter than OR; use ( ) to group

Examples:
  PrefixFilter('age')
  PrefixFilter('age') AND ValueFilter(=, 'substring:18')
  SingleColumnValueFilter('cf1', 'col1', >=, 'binary:14', true, false)
"#
    .to_string()
}
