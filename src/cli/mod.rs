//! CLI module for crossverify
//!
//! ## Commands
//!
//! - `verify` - Check a candidate implementation against a reference
//! - `run` - Run one function once with the given arguments
//! - `arity` - Print the inferred parameter count of a function
//! - `cases` - Print the generated test cases as JSON
//! - `harness` - Print the generated harness sources
//!
//! ## Modules
//!
//! - `commands` - Command implementations
//! - `reporter` - Console (pytest-style) and JSON verification reports
//!
//! ## Design
//!
//! The CLI uses clap for argument parsing with derive macros.
//! Command functions return `CliResult<T>` instead of calling `process::exit`.
//! Only the top-level `run()` function handles errors and exits.

// Enforce explicit error handling - no panicking in production code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

pub mod commands;
pub mod reporter;

use std::fmt;
use std::path::PathBuf;
use std::process;
use std::time::Duration;

use clap::{Args, Parser, Subcommand};
use crossverify_core::LanguageId;

use crate::config::parse_timeout;
use crate::version::CROSSVERIFY_VERSION;

// ============================================================================
// CLI Error handling
// ============================================================================

/// Exit code for CLI operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExitCode(pub i32);

impl ExitCode {
    pub const SUCCESS: ExitCode = ExitCode(0);
    pub const FAILURE: ExitCode = ExitCode(1);
}

/// Error type for CLI operations.
///
/// Contains a user-facing message and an exit code. The CLI entry point
/// catches these errors, prints the message, and exits with the code.
#[derive(Debug)]
pub struct CliError {
    /// User-facing error message (already formatted for display)
    pub message: String,
    /// Exit code to return to the shell
    pub exit_code: ExitCode,
}

impl CliError {
    /// Create a new CLI error with a message and exit code.
    pub fn new(message: impl Into<String>, exit_code: ExitCode) -> Self {
        Self {
            message: message.into(),
            exit_code,
        }
    }

    /// Create a failure error (exit code 1).
    pub fn failure(message: impl Into<String>) -> Self {
        Self::new(message, ExitCode::FAILURE)
    }

    /// Create an error with a custom exit code.
    pub fn with_code(message: impl Into<String>, code: i32) -> Self {
        Self::new(message, ExitCode(code))
    }

    /// Render a diagnostic (source labels, help text) through miette.
    pub fn diagnostic<D>(diagnostic: D) -> Self
    where
        D: miette::Diagnostic + Send + Sync + 'static,
    {
        Self::failure(format!("{:?}", miette::Report::new(diagnostic)))
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

// ============================================================================
// Clap CLI definition
// ============================================================================

/// Behavioural equivalence checking across languages
#[derive(Parser, Debug)]
#[command(name = "crossverify")]
#[command(version = CROSSVERIFY_VERSION)]
#[command(about = "Check that two implementations of a function agree on generated inputs", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Verify a candidate implementation against a reference
    Verify(VerifyArgs),

    /// Run a function once and print what it produced
    Run {
        #[arg(long, value_name = "LANG")]
        lang: LanguageId,
        #[arg(long, value_name = "FILE")]
        file: PathBuf,
        #[arg(long, value_name = "NAME")]
        function: String,
        /// Integer arguments, in call order
        #[arg(value_name = "ARGS", allow_negative_numbers = true)]
        args: Vec<i64>,
        #[arg(long = "run-timeout", value_name = "SECS", value_parser = parse_run_timeout)]
        run_timeout: Option<Duration>,
    },

    /// Print the inferred parameter count of a function
    Arity {
        #[arg(long, value_name = "LANG")]
        lang: LanguageId,
        #[arg(long, value_name = "FILE")]
        file: PathBuf,
        #[arg(long, value_name = "NAME")]
        function: String,
        /// Print this instead of failing when inference fails
        #[arg(long, value_name = "N")]
        fallback: Option<usize>,
    },

    /// Print generated test cases as JSON
    Cases {
        #[arg(long, value_name = "N")]
        arity: usize,
        #[arg(long = "max-random", value_name = "K")]
        max_random: Option<usize>,
        #[arg(long, value_name = "SEED")]
        seed: Option<u64>,
        /// Custom tuple such as "3,4" (repeatable)
        #[arg(long = "input", value_name = "TUPLE", allow_hyphen_values = true)]
        inputs: Vec<String>,
    },

    /// Print the generated harness sources for a function
    Harness {
        #[arg(long, value_name = "LANG")]
        lang: LanguageId,
        #[arg(long, value_name = "FILE")]
        file: PathBuf,
        #[arg(long, value_name = "NAME")]
        function: String,
        /// Skip inference and generate for this many parameters
        #[arg(long, value_name = "N")]
        arity: Option<usize>,
    },
}

#[derive(Args, Debug)]
pub struct VerifyArgs {
    /// Reference implementation source
    #[arg(long, value_name = "FILE")]
    pub reference: PathBuf,
    #[arg(long = "reference-lang", value_name = "LANG", default_value = "python")]
    pub reference_lang: LanguageId,
    /// Function to verify (same name on both sides)
    #[arg(long, value_name = "NAME")]
    pub function: String,
    /// Candidate implementation source (Markdown code fences are stripped)
    #[arg(long, value_name = "FILE")]
    pub target: PathBuf,
    #[arg(long = "target-lang", value_name = "LANG")]
    pub target_lang: LanguageId,
    /// Custom tuple such as "3,4" (repeatable)
    #[arg(long = "input", value_name = "TUPLE", allow_hyphen_values = true)]
    pub inputs: Vec<String>,
    #[arg(long = "max-random", value_name = "N")]
    pub max_random: Option<usize>,
    /// Skip arity inference
    #[arg(long = "param-count", value_name = "N")]
    pub param_count: Option<usize>,
    #[arg(long, value_name = "SEED")]
    pub seed: Option<u64>,
    /// Cases to run concurrently per side
    #[arg(short = 'j', long, value_name = "N")]
    pub jobs: Option<usize>,
    #[arg(long = "run-timeout", value_name = "SECS", value_parser = parse_run_timeout)]
    pub run_timeout: Option<Duration>,
    /// Print the verification as JSON
    #[arg(long)]
    pub json: bool,
    /// One line per case
    #[arg(short, long)]
    pub verbose: bool,
}

fn parse_run_timeout(value: &str) -> Result<Duration, String> {
    parse_timeout("--run-timeout", value).map_err(|e| e.to_string())
}

// ============================================================================
// CLI entry point
// ============================================================================

/// Main CLI entry point.
///
/// This is the only place where `process::exit` is called. All command
/// implementations return `CliResult` and errors are handled here.
pub fn run() {
    let cli = Cli::parse();

    match execute(cli) {
        Ok(exit_code) => {
            if exit_code.0 != 0 {
                process::exit(exit_code.0);
            }
        }
        Err(e) => {
            if !e.message.is_empty() {
                eprintln!("{}", e.message);
            }
            process::exit(e.exit_code.0);
        }
    }
}

/// Execute the CLI command and return result.
fn execute(cli: Cli) -> CliResult<ExitCode> {
    match cli.command {
        Command::Verify(args) => commands::verify(&args),
        Command::Run {
            lang,
            file,
            function,
            args,
            run_timeout,
        } => commands::run_once(lang, &file, &function, &args, run_timeout),
        Command::Arity {
            lang,
            file,
            function,
            fallback,
        } => commands::print_arity(lang, &file, &function, fallback),
        Command::Cases {
            arity,
            max_random,
            seed,
            inputs,
        } => commands::print_cases(arity, max_random, seed, &inputs),
        Command::Harness {
            lang,
            file,
            function,
            arity,
        } => commands::print_harness(lang, &file, &function, arity),
    }
}

// ============================================================================
// Tests
// ============================================================================
