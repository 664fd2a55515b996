//! Windows elevation check.

use windows::Win32::UI::Shell::IsUserAnAdmin;

/// Returns true if the current user token is a member of Administrators.
pub fn is_user_an_admin() -> bool {
    // SAFETY: `IsUserAnAdmin` takes no arguments and only reads the
    // current process token.
    unsafe { IsUserAnAdmin() }.as_bool()
}
