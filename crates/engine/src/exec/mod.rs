//! External tool invocation.
//!
//! The engine never spawns processes directly. Every `getfacl`/`setfacl` run
//! goes through [`CommandExecutor`], so tests substitute a deterministic fake
//! and production uses [`ProcessExecutor`].

mod context;
mod process;

use std::ffi::OsString;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

pub use context::{CancellationHandle, ExecContext};
pub use process::ProcessExecutor;

/// Captured output of a finished tool run.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct ExecOutput {
    /// Standard output, decoded lossily as UTF-8.
    pub stdout: String,
    /// Standard error, decoded lossily as UTF-8.
    pub stderr: String,
}

impl ExecOutput {
    /// Creates output with the given stdout and empty stderr.
    pub fn from_stdout(stdout: impl Into<String>) -> Self {
        Self {
            stdout: stdout.into(),
            stderr: String::new(),
        }
    }

    /// Returns the most useful diagnostic text: stderr when present, else stdout.
    #[must_use]
    pub fn diagnostic(&self) -> &str {
        let stderr = self.stderr.trim();
        if stderr.is_empty() {
            self.stdout.trim()
        } else {
            stderr
        }
    }
}

/// Failure to run an external tool to successful completion.
#[derive(Debug, thiserror::Error)]
pub enum ExecError {
    /// The program could not be started.
    #[error("failed to spawn '{}': {source}", program.display())]
    Spawn {
        /// Program that failed to start.
        program: PathBuf,
        /// Underlying error.
        #[source]
        source: io::Error,
    },
    /// Waiting for the program or collecting its output failed.
    #[error("I/O error while running '{}': {source}", program.display())]
    Io {
        /// Program being run.
        program: PathBuf,
        /// Underlying error.
        #[source]
        source: io::Error,
    },
    /// The program exited unsuccessfully.
    #[error("'{}' {}{}", program.display(), describe_status(*status), describe_output(output))]
    Failed {
        /// Program that failed.
        program: PathBuf,
        /// Exit code, or `None` when terminated by a signal.
        status: Option<i32>,
        /// Output captured before exit.
        output: ExecOutput,
    },
    /// The deadline passed and the program was killed.
    #[error("'{}' exceeded its deadline and was terminated", program.display())]
    DeadlineExceeded {
        /// Program that timed out.
        program: PathBuf,
    },
    /// The caller cancelled the run and the program was killed.
    #[error("'{}' was cancelled", program.display())]
    Cancelled {
        /// Program that was cancelled.
        program: PathBuf,
    },
}

fn describe_status(status: Option<i32>) -> String {
    match status {
        Some(code) => format!("exited with status {code}"),
        None => "was terminated by a signal".to_owned(),
    }
}

fn describe_output(output: &ExecOutput) -> String {
    let text = output.diagnostic();
    if text.is_empty() {
        String::new()
    } else {
        format!(": {text}")
    }
}

impl ExecError {
    /// Output captured from a program that exited unsuccessfully.
    #[must_use]
    pub const fn output(&self) -> Option<&ExecOutput> {
        match self {
            Self::Failed { output, .. } => Some(output),
            _ => None,
        }
    }

    /// Returns `true` when the run was stopped by its deadline.
    #[must_use]
    pub const fn is_deadline_exceeded(&self) -> bool {
        matches!(self, Self::DeadlineExceeded { .. })
    }

    /// Returns `true` when the run was stopped by its deadline or by cancellation.
    #[must_use]
    pub const fn is_interrupted(&self) -> bool {
        matches!(
            self,
            Self::DeadlineExceeded { .. } | Self::Cancelled { .. }
        )
    }
}

/// Runs an external program to completion.
///
/// Implementations must honour `ctx`: once its deadline passes or it is
/// cancelled, the run ends with [`ExecError::DeadlineExceeded`] or
/// [`ExecError::Cancelled`] and the program is no longer running.
pub trait CommandExecutor: Send + Sync {
    /// Runs `program` with `args`, returning its output on a zero exit status.
    fn execute(
        &self,
        program: &Path,
        args: &[OsString],
        ctx: &ExecContext,
    ) -> Result<ExecOutput, ExecError>;
}

impl<T: CommandExecutor + ?Sized> CommandExecutor for Arc<T> {
    fn execute(
        &self,
        program: &Path,
        args: &[OsString],
        ctx: &ExecContext,
    ) -> Result<ExecOutput, ExecError> {
        (**self).execute(program, args, ctx)
    }
}

impl<T: CommandExecutor + ?Sized> CommandExecutor for &T {
    fn execute(
        &self,
        program: &Path,
        args: &[OsString],
        ctx: &ExecContext,
    ) -> Result<ExecOutput, ExecError> {
        (**self).execute(program, args, ctx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn diagnostic_prefers_stderr() {
        let output = ExecOutput {
            stdout: "listing\n".to_owned(),
            stderr: "setfacl: bad entry\n".to_owned(),
        };
        assert_eq!(output.diagnostic(), "setfacl: bad entry");
        assert_eq!(ExecOutput::from_stdout(" out \n").diagnostic(), "out");
    }

    #[test]
    fn failed_display_includes_status_and_output() {
        let error = ExecError::Failed {
            program: PathBuf::from("setfacl"),
            status: Some(1),
            output: ExecOutput {
                stdout: String::new(),
                stderr: "setfacl: /x: Operation not supported\n".to_owned(),
            },
        };
        assert_eq!(
            error.to_string(),
            "'setfacl' exited with status 1: setfacl: /x: Operation not supported"
        );
        assert!(error.output().is_some());
        assert!(!error.is_interrupted());
    }

    #[test]
    fn signal_termination_without_output() {
        let error = ExecError::Failed {
            program: PathBuf::from("getfacl"),
            status: None,
            output: ExecOutput::default(),
        };
        assert_eq!(error.to_string(), "'getfacl' was terminated by a signal");
    }

    #[test]
    fn interruption_classification() {
        let deadline = ExecError::DeadlineExceeded {
            program: PathBuf::from("getfacl"),
        };
        let cancelled = ExecError::Cancelled {
            program: PathBuf::from("getfacl"),
        };
        assert!(deadline.is_deadline_exceeded());
        assert!(deadline.is_interrupted());
        assert!(!cancelled.is_deadline_exceeded());
        assert!(cancelled.is_interrupted());
        assert!(deadline.output().is_none());
    }
}
