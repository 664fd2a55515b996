//! Command runner trait and value types.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;

/// A program invocation: executable, argument vector and time budget.
///
/// Arguments are passed as separate argv entries; no shell is involved,
/// so adapter names containing spaces need no quoting by the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    /// Executable name or path (e.g. `netsh`).
    pub program: String,
    /// Arguments, one entry per argv slot.
    pub args: Vec<String>,
    /// Maximum wall time before the process is killed.
    pub timeout: Duration,
}

impl Invocation {
    /// Creates an invocation with no arguments.
    #[must_use]
    pub fn new(program: impl Into<String>, timeout: Duration) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            timeout,
        }
    }

    /// Appends one argument.
    #[must_use]
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Appends several arguments.
    #[must_use]
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Returns true if the arguments start with `prefix`.
    #[must_use]
    pub fn args_start_with(&self, prefix: &[&str]) -> bool {
        prefix.len() <= self.args.len() && self.args.iter().zip(prefix).all(|(a, p)| a == p)
    }
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            if arg.contains(' ') {
                write!(f, " \"{arg}\"")?;
            } else {
                write!(f, " {arg}")?;
            }
        }
        Ok(())
    }
}

/// Captured result of a finished (or killed) process.
///
/// A non-zero exit code is data, not an error: interpreting it is the
/// caller's job.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    /// Process exit code; `None` if the process was killed.
    pub exit_code: Option<i32>,
    /// Decoded standard output.
    pub stdout: String,
    /// Decoded standard error.
    pub stderr: String,
    /// True if the timeout elapsed and the process was killed.
    pub timed_out: bool,
}

impl CommandOutput {
    /// A successful run (exit code 0) with the given stdout.
    #[must_use]
    pub fn success(stdout: impl Into<String>) -> Self {
        Self {
            exit_code: Some(0),
            stdout: stdout.into(),
            ..Self::default()
        }
    }

    /// A run that exited with `exit_code`.
    #[must_use]
    pub fn failure(exit_code: i32, stdout: impl Into<String>, stderr: impl Into<String>) -> Self {
        Self {
            exit_code: Some(exit_code),
            stdout: stdout.into(),
            stderr: stderr.into(),
            timed_out: false,
        }
    }

    /// A run that was killed after its timeout elapsed.
    #[must_use]
    pub fn timeout() -> Self {
        Self {
            timed_out: true,
            ..Self::default()
        }
    }

    /// Returns true if the process exited with code 0 before its timeout.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        !self.timed_out && matches!(self.exit_code, Some(0))
    }

    /// Stdout and stderr joined, for diagnostics that may land on either stream.
    #[must_use]
    pub fn combined_text(&self) -> String {
        match (self.stdout.trim().is_empty(), self.stderr.trim().is_empty()) {
            (false, false) => format!("{}\n{}", self.stdout, self.stderr),
            (true, false) => self.stderr.clone(),
            _ => self.stdout.clone(),
        }
    }
}

/// Environment failure: the command could not run at all.
#[derive(Debug, Error)]
pub enum CommandError {
    /// The executable does not exist on this system.
    #[error("Program '{program}' not found")]
    NotFound {
        /// The missing program
        program: String,
    },

    /// The process could not be started or its output could not be collected.
    #[error("Failed to run '{program}': {source}")]
    Spawn {
        /// The program that failed
        program: String,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },
}

/// Trait for executing external commands.
///
/// # Contract
///
/// - Returns `Ok` for any process that started, whatever its exit code
/// - On timeout the process is killed and `Ok` with `timed_out = true` is returned
/// - Returns `Err` only when the command could not run at all
///
/// # Example
///
/// ```ignore
/// use adapterctl::command::{CommandError, CommandOutput, CommandRunner, Invocation};
///
/// struct Canned(String);
///
/// impl CommandRunner for Canned {
///     async fn run(&self, _invocation: &Invocation) -> Result<CommandOutput, CommandError> {
///         Ok(CommandOutput::success(self.0.clone()))
///     }
/// }
/// ```
pub trait CommandRunner: Send + Sync {
    /// Runs the invocation to completion or timeout.
    ///
    /// # Errors
    ///
    /// Returns [`CommandError`] when:
    /// - The program does not exist ([`CommandError::NotFound`])
    /// - The process cannot be spawned or awaited ([`CommandError::Spawn`])
    fn run(
        &self,
        invocation: &Invocation,
    ) -> impl std::future::Future<Output = Result<CommandOutput, CommandError>> + Send;
}

impl<R: CommandRunner> CommandRunner for Arc<R> {
    async fn run(&self, invocation: &Invocation) -> Result<CommandOutput, CommandError> {
        (**self).run(invocation).await
    }
}
