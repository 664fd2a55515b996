//! Interface state table extractor (`netsh interface show interface`).
//!
//! ```text
//! Admin State    State          Type             Interface Name
//! -------------------------------------------------------------------------
//! Enabled        Connected      Dedicated        Ethernet 2
//! ```

use crate::network::status::{AdminState, OperState};

const HEADER_MARKERS: &[&str] = &["admin state", "管理状态", "管理员状态", "接口名称"];

/// One row of the interface table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterfaceRow {
    /// Administrative state column.
    pub admin: AdminState,
    /// Operational state column.
    pub oper: OperState,
    /// Interface (connection) name; may contain spaces.
    pub name: String,
}

/// Parses all data rows, skipping headers and separator lines.
#[must_use]
pub fn parse_interface_table(text: &str) -> Vec<InterfaceRow> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with("---"))
        .filter(|line| {
            let lower = line.to_lowercase();
            !HEADER_MARKERS.iter().any(|m| lower.contains(m))
        })
        .filter_map(|line| {
            let parts: Vec<&str> = line.split_whitespace().collect();
            if parts.len() < 4 {
                return None;
            }
            Some(InterfaceRow {
                admin: AdminState::parse(parts[0]),
                oper: OperState::parse(parts[1]),
                name: parts[3..].join(" "),
            })
        })
        .collect()
}

/// Finds the states of the interface called `name`.
///
/// An exact (case-insensitive) name match wins over a row whose name
/// contains, or is contained in, `name`.
#[must_use]
pub fn find_interface_state(text: &str, name: &str) -> Option<(AdminState, OperState)> {
    let wanted = name.trim().to_lowercase();
    if wanted.is_empty() {
        return None;
    }
    let rows = parse_interface_table(text);

    let exact = rows.iter().find(|row| row.name.to_lowercase() == wanted);
    let fuzzy = || {
        rows.iter().find(|row| {
            let candidate = row.name.to_lowercase();
            candidate.contains(&wanted) || wanted.contains(&candidate)
        })
    };
    exact.or_else(fuzzy).map(|row| (row.admin, row.oper))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::extract::fixtures;

    #[test]
    fn parses_english_rows() {
        let rows = parse_interface_table(fixtures::INTERFACES_EN);
        assert_eq!(rows.len(), 4);
        assert_eq!(rows[1].name, "Ethernet 2");
        assert_eq!(rows[2].admin, AdminState::Disabled);
        assert_eq!(rows[2].name, "VirtualBox Host-Only Network");
    }

    #[test]
    fn exact_name_beats_prefix() {
        assert_eq!(
            find_interface_state(fixtures::INTERFACES_EN, "Ethernet"),
            Some((AdminState::Enabled, OperState::Connected))
        );
        assert_eq!(
            find_interface_state(fixtures::INTERFACES_EN, "ethernet 2"),
            Some((AdminState::Enabled, OperState::Disconnected))
        );
    }

    #[test]
    fn containment_fallback() {
        assert_eq!(
            find_interface_state(fixtures::INTERFACES_EN, "VirtualBox"),
            Some((AdminState::Disabled, OperState::Disconnected))
        );
    }

    #[test]
    fn chinese_table() {
        assert_eq!(
            find_interface_state(fixtures::INTERFACES_ZH, "以太网 2"),
            Some((AdminState::Disabled, OperState::Disconnected))
        );
        assert_eq!(
            find_interface_state(fixtures::INTERFACES_ZH, "以太网"),
            Some((AdminState::Enabled, OperState::Connected))
        );
    }

    #[test]
    fn missing_interface_or_empty_output() {
        assert_eq!(find_interface_state(fixtures::INTERFACES_EN, "Bluetooth"), None);
        assert_eq!(find_interface_state("", "Ethernet"), None);
        assert!(parse_interface_table("garbage line").is_empty());
    }
}
