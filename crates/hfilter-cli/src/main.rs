//! hfilter command-line tool
//!
//! Parses filter expressions and prints the resulting filter tree.

mod commands;
mod completer;
mod executor;
mod formatter;
mod repl;

use clap::Parser;
use formatter::OutputFormat;
use hfilter_lang::{ParseOptions, DEFAULT_MAX_DEPTH, DEFAULT_MAX_LEN};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// hfilter command-line tool
#[derive(Parser, Debug)]
#[command(name = "hfilter")]
#[command(version, about = "Parse and inspect filter expressions")]
pub struct Args {
    /// Parse a single expression and exit
    #[arg(short = 'e', long = "expr")]
    pub expr: Option<String>,

    /// Parse expressions from file, one per line
    #[arg(short = 'f', long, conflicts_with = "expr")]
    pub file: Option<PathBuf>,

    /// Output format
    #[arg(long, default_value = "tree", value_enum)]
    pub format: OutputFormat,

    /// Maximum parenthesis nesting depth
    #[arg(long, env = "HFILTER_MAX_DEPTH", default_value_t = DEFAULT_MAX_DEPTH)]
    pub max_depth: usize,

    /// Maximum expression length in bytes
    #[arg(long, env = "HFILTER_MAX_LEN", default_value_t = DEFAULT_MAX_LEN)]
    pub max_len: usize,
}

impl Args {
    fn parse_options(&self) -> ParseOptions {
        ParseOptions::new()
            .with_max_depth(self.max_depth)
            .with_max_len(self.max_len)
    }
}

fn main() {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("hfilter_cli=info".parse().unwrap()),
        )
        .init();

    let args = Args::parse();

    match run(args) {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}

/// Run in the selected mode; `Ok(false)` means some expression failed to parse.
fn run(args: Args) -> Result<bool, Box<dyn std::error::Error>> {
    let options = args.parse_options();

    if let Some(expr) = &args.expr {
        Ok(run_expr_mode(expr, &options, args.format))
    } else if let Some(file) = &args.file {
        run_script_mode(file, &options, args.format)
    } else {
        repl::run(&options, args.format)?;
        Ok(true)
    }
}

/// Parse a single expression and print it.
fn run_expr_mode(expr: &str, options: &ParseOptions, format: OutputFormat) -> bool {
    let formatter = formatter::create_formatter(format);

    match executor::execute(expr, options, &*formatter) {
        Ok(output) => {
            println!("{}", output);
            true
        }
        Err(e) => {
            eprintln!("{}", formatter.format_error(&e.to_string()));
            false
        }
    }
}

/// Parse every expression in a file, continuing past failures.
fn run_script_mode(
    file: &Path,
    options: &ParseOptions,
    format: OutputFormat,
) -> Result<bool, Box<dyn std::error::Error>> {
    let content = executor::read_script(file)?;
    let formatter = formatter::create_formatter(format);

    let mut failed = 0;
    let lines = executor::script_lines(&content);
    for (line_no, expr) in &lines {
        match executor::execute(expr, options, &*formatter) {
            Ok(output) => println!("{}", output),
            Err(e) => {
                failed += 1;
                eprintln!(
                    "{}:{}: {}",
                    file.display(),
                    line_no,
                    formatter.format_error(&e.to_string())
                );
            }
        }
    }

    if failed > 0 {
        warn!(failed, total = lines.len(), "some expressions failed to parse");
    } else {
        info!(total = lines.len(), "parsed all expressions");
    }

    Ok(failed == 0)
}
