//! Platform queries used by the CLI.
//!
//! # Platform Support
//!
//! - **Windows**: `IsUserAnAdmin` via the `windows` crate.
//! - **Others**: no elevation check; [`is_elevated`] returns `None`.

#[cfg(windows)]
mod windows;

/// Returns whether the process runs with administrator rights, or `None`
/// where the question does not apply.
#[must_use]
pub fn is_elevated() -> Option<bool> {
    #[cfg(windows)]
    {
        Some(windows::is_user_an_admin())
    }
    #[cfg(not(windows))]
    {
        None
    }
}
