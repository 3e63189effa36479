use std::ffi::OsString;
use std::io::{self, Read};
use std::path::Path;
use std::process::{Child, Command, Stdio};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use super::{CommandExecutor, ExecContext, ExecError, ExecOutput};

const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(10);

type OutputReader = JoinHandle<io::Result<Vec<u8>>>;

/// [`CommandExecutor`] that spawns real processes.
///
/// Stdout and stderr are drained on helper threads so a chatty tool cannot
/// block on a full pipe while the caller polls for its exit.
#[derive(Clone, Debug)]
pub struct ProcessExecutor {
    poll_interval: Duration,
}

impl Default for ProcessExecutor {
    fn default() -> Self {
        Self::new()
    }
}

impl ProcessExecutor {
    /// Creates an executor with the default poll interval.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }

    /// Sets how often a running child is checked for exit, deadline and cancellation.
    #[must_use]
    pub const fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }
}

impl CommandExecutor for ProcessExecutor {
    fn execute(
        &self,
        program: &Path,
        args: &[OsString],
        ctx: &ExecContext,
    ) -> Result<ExecOutput, ExecError> {
        if let Some(error) = interruption(program, ctx) {
            return Err(error);
        }

        let mut child = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| ExecError::Spawn {
                program: program.to_path_buf(),
                source,
            })?;

        let stdout = child.stdout.take().map(spawn_reader);
        let stderr = child.stderr.take().map(spawn_reader);

        let status = loop {
            match child.try_wait() {
                Ok(Some(status)) => break status,
                Ok(None) => {}
                Err(source) => {
                    terminate(&mut child);
                    return Err(ExecError::Io {
                        program: program.to_path_buf(),
                        source,
                    });
                }
            }
            if let Some(error) = interruption(program, ctx) {
                terminate(&mut child);
                tracing::debug!(program = %program.display(), %error, "terminated tool");
                return Err(error);
            }
            thread::sleep(self.poll_interval);
        };

        let io_error = |source| ExecError::Io {
            program: program.to_path_buf(),
            source,
        };
        let output = ExecOutput {
            stdout: collect(stdout).map_err(io_error)?,
            stderr: collect(stderr).map_err(io_error)?,
        };

        if status.success() {
            Ok(output)
        } else {
            Err(ExecError::Failed {
                program: program.to_path_buf(),
                status: status.code(),
                output,
            })
        }
    }
}

fn interruption(program: &Path, ctx: &ExecContext) -> Option<ExecError> {
    if ctx.is_cancelled() {
        Some(ExecError::Cancelled {
            program: program.to_path_buf(),
        })
    } else if ctx.is_expired() {
        Some(ExecError::DeadlineExceeded {
            program: program.to_path_buf(),
        })
    } else {
        None
    }
}

fn terminate(child: &mut Child) {
    if let Ok(None) = child.try_wait() {
        let _ = child.kill();
    }
    let _ = child.wait();
}

fn spawn_reader<R: Read + Send + 'static>(mut reader: R) -> OutputReader {
    thread::spawn(move || {
        let mut buffer = Vec::new();
        reader.read_to_end(&mut buffer)?;
        Ok(buffer)
    })
}

fn collect(reader: Option<OutputReader>) -> io::Result<String> {
    let Some(handle) = reader else {
        return Ok(String::new());
    };
    let bytes = handle
        .join()
        .map_err(|_| io::Error::other("output reader thread panicked"))??;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::time::Instant;

    fn sh(script: &str) -> Vec<OsString> {
        vec![OsString::from("-c"), OsString::from(script)]
    }

    #[test]
    fn captures_stdout_and_stderr() {
        let output = ProcessExecutor::new()
            .execute(
                Path::new("sh"),
                &sh("printf 'user::rw-\\n'; printf 'note' >&2"),
                &ExecContext::new(),
            )
            .expect("sh runs");
        assert_eq!(output.stdout, "user::rw-\n");
        assert_eq!(output.stderr, "note");
    }

    #[test]
    fn nonzero_exit_is_failed_with_output() {
        let error = ProcessExecutor::new()
            .execute(
                Path::new("sh"),
                &sh("echo 'bad entry' >&2; exit 3"),
                &ExecContext::new(),
            )
            .unwrap_err();
        match error {
            ExecError::Failed { status, output, .. } => {
                assert_eq!(status, Some(3));
                assert_eq!(output.stderr, "bad entry\n");
            }
            other => panic!("expected failure, got {other:?}"),
        }
    }

    #[test]
    fn missing_program_fails_to_spawn() {
        let error = ProcessExecutor::new()
            .execute(
                Path::new("/nonexistent/oc-facl-test-tool"),
                &[],
                &ExecContext::new(),
            )
            .unwrap_err();
        assert!(matches!(error, ExecError::Spawn { .. }));
    }

    #[test]
    fn deadline_kills_long_running_child() {
        let started = Instant::now();
        let error = ProcessExecutor::new()
            .execute(
                Path::new("sleep"),
                &[OsString::from("5")],
                &ExecContext::with_timeout(Duration::from_millis(50)),
            )
            .unwrap_err();
        assert!(error.is_deadline_exceeded());
        assert!(started.elapsed() < Duration::from_secs(4));
    }

    #[test]
    fn cancellation_before_spawn_runs_nothing() {
        let ctx = ExecContext::new();
        ctx.cancel();
        let error = ProcessExecutor::new()
            .execute(Path::new("/nonexistent/oc-facl-test-tool"), &[], &ctx)
            .unwrap_err();
        assert!(matches!(error, ExecError::Cancelled { .. }));
    }

    #[test]
    fn cancellation_from_another_thread_stops_child() {
        let ctx = ExecContext::new();
        let handle = ctx.cancellation_handle();
        let canceller = thread::spawn(move || {
            thread::sleep(Duration::from_millis(50));
            handle.cancel();
        });

        let started = Instant::now();
        let error = ProcessExecutor::new()
            .with_poll_interval(Duration::from_millis(5))
            .execute(Path::new("sleep"), &[OsString::from("5")], &ctx)
            .unwrap_err();
        canceller.join().expect("canceller thread");
        assert!(matches!(error, ExecError::Cancelled { .. }));
        assert!(started.elapsed() < Duration::from_secs(4));
    }
}
