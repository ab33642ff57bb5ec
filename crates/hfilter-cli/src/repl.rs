//! Interactive REPL implementation.

use crate::commands::{self, CommandResult};
use crate::completer::FilterHelper;
use crate::executor;
use crate::formatter::{self, OutputFormat};
use hfilter_lang::ParseOptions;
use rustyline::error::ReadlineError;
use rustyline::history::{DefaultHistory, History};
use rustyline::{Config, Editor};
use std::path::PathBuf;
use tracing::{debug, warn};

/// Get the history file path.
fn history_path() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".hfilter_history")
}

/// Run the interactive REPL.
pub fn run(
    options: &ParseOptions,
    initial_format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut format = initial_format;

    let rl_config = Config::builder()
        .history_ignore_space(true)
        .auto_add_history(true)
        .build();

    let mut rl: Editor<FilterHelper, DefaultHistory> = Editor::with_config(rl_config)?;
    rl.set_helper(Some(FilterHelper::new()));

    let hist_path = history_path();
    if hist_path.exists() {
        if let Err(e) = rl.load_history(&hist_path) {
            warn!(path = %hist_path.display(), error = %e, "failed to load history");
        }
    }

    println!("hfilter - Type .help for commands, .exit to quit\n");

    loop {
        match rl.readline("hfilter> ") {
            Ok(line) => {
                let line = line.trim();

                if line.is_empty() {
                    continue;
                }

                if commands::is_command(line) {
                    match commands::handle_command(line, format) {
                        CommandResult::Exit => {
                            println!("Goodbye!");
                            break;
                        }
                        CommandResult::Output(msg) => {
                            println!("{}", msg);
                        }
                        CommandResult::SetFormat(fmt) => {
                            format = fmt;
                            println!("Output format set to {}", format);
                        }
                        CommandResult::ShowHistory => {
                            let history = rl.history();
                            let start = history.len().saturating_sub(20);
                            for (i, entry) in history.iter().skip(start).enumerate() {
                                println!("{:4}  {}", start + i + 1, entry);
                            }
                        }
                        CommandResult::Clear => {
                            // ANSI clear screen
                            print!("\x1B[2J\x1B[1;1H");
                        }
                    }
                    continue;
                }

                let formatter = formatter::create_formatter(format);
                match executor::execute(line, options, &*formatter) {
                    Ok(output) => println!("{}", output),
                    Err(e) => println!("{}", formatter.format_error(&e.to_string())),
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("^C");
                continue;
            }
            Err(ReadlineError::Eof) => {
                println!("Goodbye!");
                break;
            }
            Err(err) => {
                println!("Error: {:?}", err);
                break;
            }
        }
    }

    if let Err(e) = rl.save_history(&hist_path) {
        warn!(path = %hist_path.display(), error = %e, "failed to save history");
    } else {
        debug!(path = %hist_path.display(), "saved history");
    }

    Ok(())
}
