//! External command execution.
//!
//! This module provides:
//! - The [`CommandRunner`] trait, the only seam between the engine and the OS
//! - [`SystemRunner`], the production implementation on `tokio::process`
//! - [`Invocation`] / [`CommandOutput`] value types and [`CommandError`]
//! - Locale-tolerant output decoding ([`decode`])

pub mod decode;
mod runner;
mod system;

#[cfg(test)]
pub mod mock;

pub use runner::{CommandError, CommandOutput, CommandRunner, Invocation};
pub use system::SystemRunner;
