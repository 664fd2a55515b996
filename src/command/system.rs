//! Production command runner on `tokio::process`.

use std::io;
use std::process::Stdio;

use encoding_rs::Encoding;
use tokio::process::Command;

use super::decode::{DEFAULT_FALLBACK, decode};
use super::{CommandError, CommandOutput, CommandRunner, Invocation};

/// Runs real processes, killing them when their timeout elapses.
#[derive(Debug, Clone, Copy)]
pub struct SystemRunner {
    fallback: &'static Encoding,
}

impl SystemRunner {
    /// Creates a runner that decodes non-UTF-8 output with `fallback`.
    #[must_use]
    pub const fn new(fallback: &'static Encoding) -> Self {
        Self { fallback }
    }

    /// The encoding tried after UTF-8.
    #[must_use]
    pub const fn fallback_encoding(&self) -> &'static Encoding {
        self.fallback
    }
}

impl Default for SystemRunner {
    fn default() -> Self {
        Self::new(DEFAULT_FALLBACK)
    }
}

impl CommandRunner for SystemRunner {
    async fn run(&self, invocation: &Invocation) -> Result<CommandOutput, CommandError> {
        let mut command = Command::new(&invocation.program);
        command
            .args(&invocation.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        hide_console(&mut command);

        tracing::debug!("Running: {invocation}");

        let child = command
            .spawn()
            .map_err(|e| spawn_error(&invocation.program, e))?;

        // Dropping the child on timeout kills it (kill_on_drop).
        match tokio::time::timeout(invocation.timeout, child.wait_with_output()).await {
            Ok(Ok(output)) => Ok(CommandOutput {
                exit_code: output.status.code(),
                stdout: decode(&output.stdout, self.fallback),
                stderr: decode(&output.stderr, self.fallback),
                timed_out: false,
            }),
            Ok(Err(e)) => Err(spawn_error(&invocation.program, e)),
            Err(_) => {
                tracing::warn!(
                    "'{invocation}' timed out after {}s and was killed",
                    invocation.timeout.as_secs()
                );
                Ok(CommandOutput::timeout())
            }
        }
    }
}

fn spawn_error(program: &str, source: io::Error) -> CommandError {
    if source.kind() == io::ErrorKind::NotFound {
        CommandError::NotFound {
            program: program.to_string(),
        }
    } else {
        CommandError::Spawn {
            program: program.to_string(),
            source,
        }
    }
}

#[cfg(windows)]
fn hide_console(command: &mut Command) {
    use windows::Win32::System::Threading::CREATE_NO_WINDOW;
    command.creation_flags(CREATE_NO_WINDOW.0);
}

#[cfg(not(windows))]
const fn hide_console(_command: &mut Command) {}
