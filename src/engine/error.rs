//! Engine and mutation error types.

use thiserror::Error;

use crate::command::{CommandError, CommandOutput};
use crate::network::MaskError;

/// Failures surfaced by the engine facade.
///
/// Source failures and parse misses never reach this type: they only
/// degrade individual fields of a snapshot.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The id is not in the current catalog; re-discover and retry.
    #[error("Adapter '{id}' not found; run discovery again")]
    AdapterNotFound {
        /// The requested id or name
        id: String,
    },

    /// The enumeration source produced nothing usable.
    #[error("Adapter discovery failed: {reason}")]
    DiscoveryFailed {
        /// What went wrong
        reason: String,
    },
}

/// Failure of a single mutation call.
#[derive(Debug, Error)]
pub enum MutationError {
    /// The command could not run at all.
    #[error(transparent)]
    Unavailable(#[from] CommandError),

    /// The command was killed after its timeout.
    #[error("'{command}' timed out")]
    TimedOut {
        /// The command line
        command: String,
    },

    /// The command requires administrator rights.
    #[error("Permission denied (run as administrator): {message}")]
    PermissionDenied {
        /// Output of the command
        message: String,
    },

    /// The command did not recognise the interface name.
    #[error("Interface not found: {message}")]
    InterfaceNotFound {
        /// Output of the command
        message: String,
    },

    /// The command exited unsuccessfully for another reason.
    #[error("Command rejected (exit code {}): {message}", exit_code.map_or_else(|| "none".to_string(), |c| c.to_string()))]
    Rejected {
        /// Process exit code
        exit_code: Option<i32>,
        /// Output of the command
        message: String,
    },

    /// The subnet mask could not be normalized.
    #[error("Invalid subnet mask: {0}")]
    InvalidMask(#[from] MaskError),

    /// A batch item is not of the form `ip/mask`.
    #[error("Invalid item '{item}': {reason}")]
    InvalidItem {
        /// The raw item
        item: String,
        /// Why it was rejected
        reason: String,
    },

    /// The batch was cancelled before this item started.
    #[error("Cancelled before start")]
    Cancelled,
}

const DENIED_MARKERS: &[&str] = &["access is denied", "requires elevation", "拒绝访问", "需要提升"];
const NOT_FOUND_MARKERS: &[&str] = &[
    "not found",
    "no such interface",
    "找不到",
    "没有与此名称匹配的接口",
];

impl MutationError {
    /// Interprets a finished mutation command.
    ///
    /// # Errors
    ///
    /// Returns the classified failure for a timeout or a non-zero exit.
    pub fn check(command: &str, output: &CommandOutput) -> Result<(), Self> {
        if output.timed_out {
            return Err(Self::TimedOut {
                command: command.to_string(),
            });
        }
        if output.is_success() {
            return Ok(());
        }

        let message = output.combined_text().trim().to_string();
        let lower = message.to_lowercase();
        if DENIED_MARKERS.iter().any(|m| lower.contains(m)) {
            Err(Self::PermissionDenied { message })
        } else if NOT_FOUND_MARKERS.iter().any(|m| lower.contains(m)) {
            Err(Self::InterfaceNotFound { message })
        } else {
            Err(Self::Rejected {
                exit_code: output.exit_code,
                message,
            })
        }
    }
}
