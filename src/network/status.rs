//! Adapter status resolution.
//!
//! The final status combines the administrative state and the operational
//! state reported by the interface table. When the administrative state
//! is unknown (the adapter could not be matched in that table), the raw
//! enumeration status code is used instead.

use std::fmt;

use serde::Serialize;

/// Administrative (configured) state of an interface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum AdminState {
    /// Enabled by configuration.
    Enabled,
    /// Disabled by configuration.
    Disabled,
    /// Not reported or not recognised.
    Unknown,
}

impl AdminState {
    /// Parses an admin-state cell in English or Chinese.
    #[must_use]
    pub fn parse(text: &str) -> Self {
        let lower = text.trim().to_lowercase();
        if lower.contains("disabled") || lower.contains("已禁用") {
            Self::Disabled
        } else if lower.contains("enabled") || lower.contains("已启用") {
            Self::Enabled
        } else {
            Self::Unknown
        }
    }
}

/// Operational (link) state of an interface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum OperState {
    /// Link is up.
    Connected,
    /// Link is down.
    Disconnected,
    /// Not reported or not recognised.
    Unknown,
}

impl OperState {
    /// Parses an operational-state cell in English or Chinese.
    ///
    /// "Disconnected" contains "connected", so the negative forms are
    /// checked first.
    #[must_use]
    pub fn parse(text: &str) -> Self {
        let lower = text.trim().to_lowercase();
        let disconnected = ["disconnected", "not connected", "已断开连接", "未连接"];
        if disconnected.iter().any(|m| lower.contains(m)) {
            Self::Disconnected
        } else if lower.contains("connected") || lower.contains("已连接") {
            Self::Connected
        } else {
            Self::Unknown
        }
    }
}

/// Final adapter status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum AdapterStatus {
    /// Administratively disabled.
    Disabled,
    /// Enabled with a live link.
    Connected,
    /// Enabled without a link.
    Disconnected,
    /// Could not be determined.
    Unknown,
}

impl AdapterStatus {
    /// Combines the two interface-table signals, falling back to the
    /// enumeration status code when the admin state is unknown.
    ///
    /// | admin    | oper         | result                 |
    /// |----------|--------------|------------------------|
    /// | disabled | any          | `Disabled`             |
    /// | enabled  | connected    | `Connected`            |
    /// | enabled  | disconnected | `Disconnected`         |
    /// | enabled  | unknown      | `Unknown`              |
    /// | unknown  | any          | `from_status_code(..)` |
    #[must_use]
    pub fn resolve(admin: AdminState, oper: OperState, fallback_code: &str) -> Self {
        match (admin, oper) {
            (AdminState::Disabled, _) => Self::Disabled,
            (AdminState::Enabled, OperState::Connected) => Self::Connected,
            (AdminState::Enabled, OperState::Disconnected) => Self::Disconnected,
            (AdminState::Enabled, OperState::Unknown) => Self::Unknown,
            (AdminState::Unknown, _) => Self::from_status_code(fallback_code),
        }
    }

    /// Maps an enumeration status code: 0/4/5 disabled, 2 connected.
    #[must_use]
    pub fn from_status_code(code: &str) -> Self {
        match code.trim() {
            "0" | "4" | "5" => Self::Disabled,
            "2" => Self::Connected,
            _ => Self::Unknown,
        }
    }
}

impl fmt::Display for AdapterStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Disabled => write!(f, "Disabled"),
            Self::Connected => write!(f, "Connected"),
            Self::Disconnected => write!(f, "Disconnected"),
            Self::Unknown => write!(f, "Unknown"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod resolution {
        use super::*;

        const ADMINS: [AdminState; 3] = [
            AdminState::Enabled,
            AdminState::Disabled,
            AdminState::Unknown,
        ];
        const OPERS: [OperState; 3] = [
            OperState::Connected,
            OperState::Disconnected,
            OperState::Unknown,
        ];

        #[test]
        fn full_grid_without_fallback_signal() {
            use AdapterStatus as S;
            let expected = [
                // Enabled
                [S::Connected, S::Disconnected, S::Unknown],
                // Disabled
                [S::Disabled, S::Disabled, S::Disabled],
                // Unknown admin, code "" maps to Unknown
                [S::Unknown, S::Unknown, S::Unknown],
            ];

            for (row, admin) in ADMINS.iter().enumerate() {
                for (col, oper) in OPERS.iter().enumerate() {
                    assert_eq!(
                        AdapterStatus::resolve(*admin, *oper, ""),
                        expected[row][col],
                        "admin={admin:?} oper={oper:?}"
                    );
                }
            }
        }

        #[test]
        fn disabled_wins_over_connected() {
            assert_eq!(
                AdapterStatus::resolve(AdminState::Disabled, OperState::Connected, "2"),
                AdapterStatus::Disabled
            );
        }

        #[test]
        fn known_admin_ignores_fallback_code() {
            assert_eq!(
                AdapterStatus::resolve(AdminState::Enabled, OperState::Unknown, "2"),
                AdapterStatus::Unknown
            );
        }

        #[test]
        fn unknown_admin_uses_fallback_code() {
            for oper in OPERS {
                assert_eq!(
                    AdapterStatus::resolve(AdminState::Unknown, oper, "2"),
                    AdapterStatus::Connected
                );
                assert_eq!(
                    AdapterStatus::resolve(AdminState::Unknown, oper, "4"),
                    AdapterStatus::Disabled
                );
            }
        }

        #[test]
        fn status_code_table() {
            for code in ["0", "4", "5"] {
                assert_eq!(AdapterStatus::from_status_code(code), AdapterStatus::Disabled);
            }
            assert_eq!(AdapterStatus::from_status_code(" 2 "), AdapterStatus::Connected);
            for code in ["1", "3", "7", "12", "", "abc"] {
                assert_eq!(AdapterStatus::from_status_code(code), AdapterStatus::Unknown);
            }
        }
    }

    mod parsing {
        use super::*;

        #[test]
        fn admin_state_in_both_locales() {
            assert_eq!(AdminState::parse("Enabled"), AdminState::Enabled);
            assert_eq!(AdminState::parse("已启用"), AdminState::Enabled);
            assert_eq!(AdminState::parse("Disabled"), AdminState::Disabled);
            assert_eq!(AdminState::parse("已禁用"), AdminState::Disabled);
            assert_eq!(AdminState::parse("???"), AdminState::Unknown);
        }

        #[test]
        fn oper_state_checks_disconnected_first() {
            assert_eq!(OperState::parse("Disconnected"), OperState::Disconnected);
            assert_eq!(OperState::parse("Not connected"), OperState::Disconnected);
            assert_eq!(OperState::parse("已断开连接"), OperState::Disconnected);
            assert_eq!(OperState::parse("未连接"), OperState::Disconnected);
            assert_eq!(OperState::parse("Connected"), OperState::Connected);
            assert_eq!(OperState::parse("已连接"), OperState::Connected);
            assert_eq!(OperState::parse(""), OperState::Unknown);
        }
    }
}
