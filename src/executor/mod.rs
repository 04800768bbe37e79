//! Process execution under a wall-clock timeout.
//!
//! The executor knows nothing about languages: it runs one command in one working directory and reports
//! what happened as a [`RunResult`]. A child that fails, crashes or times out is still an `Ok` result;
//! only failing to spawn or wait on the child is an [`ExecError`].
//!
//! ## Notes
//! - [`CommandExecutor`] is the seam tests substitute; [`SystemExecutor`] is the real implementation.
//! - Everything above this layer (runners, verifier) goes through the trait, never `std::process` directly.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

mod system;

use std::fmt;
use std::io;
use std::path::PathBuf;
use std::time::Duration;

use serde::Serialize;
use thiserror::Error;

use crate::harness::HarnessError;

pub use system::SystemExecutor;

// ============================================================================
// Command and result types
// ============================================================================

/// One external command to run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    pub program: String,
    pub args: Vec<String>,
    pub workdir: PathBuf,
    pub timeout: Duration,
}

impl CommandSpec {
    pub fn new(program: impl Into<String>, workdir: impl Into<PathBuf>, timeout: Duration) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            workdir: workdir.into(),
            timeout,
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }
}

impl fmt::Display for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}

/// Outcome of one process execution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunResult {
    /// Exited with status zero within the timeout.
    pub ok: bool,
    /// Exit status; `-1` after a timeout, `128 + signal` when killed by a signal.
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
    /// Directory the process ran in. It has usually been removed by the time the caller sees this.
    pub workdir: PathBuf,
    pub timed_out: bool,
    pub duration: Duration,
}

impl RunResult {
    /// Short human-readable description of why this run did not succeed.
    ///
    /// Returns `None` for a successful run.
    pub fn failure_summary(&self) -> Option<String> {
        if self.ok {
            return None;
        }
        if self.timed_out {
            return Some(self.stderr.lines().next().unwrap_or_default().to_string());
        }
        let detail = self.stderr.trim();
        if detail.is_empty() {
            Some(format!("exit code {}", self.exit_code))
        } else {
            Some(format!("exit code {}: {}", self.exit_code, tail_lines(detail, STDERR_SUMMARY_LINES)))
        }
    }
}

/// Stderr lines kept by [`RunResult::failure_summary`].
const STDERR_SUMMARY_LINES: usize = 12;

fn tail_lines(text: &str, n: usize) -> String {
    let lines: Vec<&str> = text.lines().collect();
    lines[lines.len().saturating_sub(n)..].join("\n")
}

/// Infrastructure failure: the command could not be run or observed at all.
#[derive(Debug, Error)]
pub enum ExecError {
    #[error("failed to spawn '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("failed waiting for '{program}': {source}")]
    Wait {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("could not capture output of '{program}'")]
    Capture { program: String },

    #[error("failed to create working directory: {0}")]
    Workdir(#[source] io::Error),

    #[error("failed to write {path}: {source}")]
    WriteFile {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error(transparent)]
    Harness(#[from] HarnessError),
}

// ============================================================================
// Executor seam
// ============================================================================

/// Runs commands. Implementations must be usable from several threads at once.
pub trait CommandExecutor: Send + Sync {
    fn execute(&self, spec: &CommandSpec) -> Result<RunResult, ExecError>;
}

impl<T: CommandExecutor + ?Sized> CommandExecutor for std::sync::Arc<T> {
    fn execute(&self, spec: &CommandSpec) -> Result<RunResult, ExecError> {
        (**self).execute(spec)
    }
}
