//! Adapter data model: enumeration records and aggregated snapshots.

use std::fmt::{self, Write as _};
use std::net::{Ipv4Addr, Ipv6Addr};
use std::time::SystemTime;

use serde::Serialize;

use super::mask;
use super::status::AdapterStatus;
use crate::time::format_utc;

/// Lightweight adapter record produced by enumeration.
///
/// Records are replaced wholesale on every discovery and never edited.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AdapterRecord {
    /// Opaque identifier, stable within one discovery cycle (the adapter GUID).
    pub id: String,
    /// Internal adapter name as reported by the enumeration source.
    pub name: String,
    /// Connection name shown to users (e.g. "Ethernet", "WLAN").
    pub display_name: String,
    /// Hardware description (e.g. "Intel(R) Ethernet Connection I219-V").
    pub description: String,
    /// MAC address as printed by the source.
    pub mac_address: String,
    /// Raw enumeration status code (e.g. "2" for connected).
    pub status_code: String,
    /// Derived from the status code: false for 0, 4 and 5.
    pub enabled: bool,
}

impl AdapterRecord {
    /// Creates a record, deriving `enabled` from `status_code`.
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        display_name: impl Into<String>,
        description: impl Into<String>,
        mac_address: impl Into<String>,
        status_code: impl Into<String>,
    ) -> Self {
        let status_code = status_code.into();
        Self {
            id: id.into(),
            name: name.into(),
            display_name: display_name.into(),
            description: description.into(),
            mac_address: mac_address.into(),
            enabled: is_enabled_code(&status_code),
            status_code,
        }
    }

    /// Returns true if the enumeration source reports a live connection.
    #[must_use]
    pub fn is_connected(&self) -> bool {
        self.status_code.trim() == "2"
    }

    /// Human-readable text for the raw status code.
    #[must_use]
    pub fn status_text(&self) -> &'static str {
        status_code_text(&self.status_code)
    }

    /// Returns true if `key` is this adapter's id, or (case-insensitively)
    /// its display name, internal name or description.
    #[must_use]
    pub fn matches(&self, key: &str) -> bool {
        let key = key.trim();
        self.id == key
            || self.display_name.eq_ignore_ascii_case(key)
            || self.name.eq_ignore_ascii_case(key)
            || self.description.eq_ignore_ascii_case(key)
    }
}

/// Returns false for the status codes that mean the adapter is off.
#[must_use]
pub fn is_enabled_code(code: &str) -> bool {
    !matches!(code.trim(), "0" | "4" | "5")
}

/// Display text for an enumeration status code.
#[must_use]
pub fn status_code_text(code: &str) -> &'static str {
    match code.trim() {
        "0" => "Disconnected",
        "1" => "Connecting",
        "2" => "Connected",
        "3" => "Disconnecting",
        "4" => "Hardware not present",
        "5" => "Hardware disabled",
        "6" => "Hardware malfunction",
        "7" => "Media disconnected",
        "8" => "Authenticating",
        "9" => "Authentication succeeded",
        "10" => "Authentication failed",
        "11" => "Invalid address",
        "12" => "Credentials required",
        _ => "Unknown",
    }
}

/// Interface class derived from the hardware description.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum InterfaceClass {
    /// Wired Ethernet.
    Wired,
    /// Wi-Fi.
    Wireless,
    /// Hypervisor or software adapter.
    Virtual,
    /// Anything else.
    Other,
}

const WIRELESS_KEYWORDS: &[&str] = &["wireless", "wi-fi", "wifi", "wlan", "802.11", "无线"];
const WIRED_KEYWORDS: &[&str] = &["ethernet", "gigabit", "gbe", "以太网"];
const VIRTUAL_KEYWORDS: &[&str] = &["virtual", "hyper-v", "vmware", "virtualbox", "虚拟"];

impl InterfaceClass {
    /// Classifies by ordered keyword match: wireless, then wired, then virtual.
    #[must_use]
    pub fn classify(description: &str) -> Self {
        let lower = description.to_lowercase();
        let has = |keywords: &[&str]| keywords.iter().any(|k| lower.contains(k));

        if has(WIRELESS_KEYWORDS) {
            Self::Wireless
        } else if has(WIRED_KEYWORDS) {
            Self::Wired
        } else if has(VIRTUAL_KEYWORDS) {
            Self::Virtual
        } else {
            Self::Other
        }
    }
}

impl fmt::Display for InterfaceClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Wired => write!(f, "Wired"),
            Self::Wireless => write!(f, "Wireless"),
            Self::Virtual => write!(f, "Virtual"),
            Self::Other => write!(f, "Other"),
        }
    }
}

/// Returns true if the name or description carries a wireless keyword.
#[must_use]
pub fn is_wireless(name: &str, description: &str) -> bool {
    InterfaceClass::classify(name) == InterfaceClass::Wireless
        || InterfaceClass::classify(description) == InterfaceClass::Wireless
}

/// An IPv4 address together with its own subnet mask.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Ipv4Binding {
    /// The address.
    pub address: Ipv4Addr,
    /// The mask in dotted form.
    pub mask: Ipv4Addr,
}

impl Ipv4Binding {
    /// Creates a binding.
    #[must_use]
    pub const fn new(address: Ipv4Addr, mask: Ipv4Addr) -> Self {
        Self { address, mask }
    }

    /// Returns true if `ip` is inside this binding's network.
    #[must_use]
    pub fn contains(&self, ip: Ipv4Addr) -> bool {
        mask::contains(self.address, self.mask, ip)
    }
}

impl fmt::Display for Ipv4Binding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.address, self.mask)
    }
}

/// Index of the primary binding: the first whose network contains the
/// gateway, else the first binding.
#[must_use]
pub fn primary_index(bindings: &[Ipv4Binding], gateway: Option<Ipv4Addr>) -> Option<usize> {
    if bindings.is_empty() {
        return None;
    }
    gateway
        .and_then(|gw| bindings.iter().position(|b| b.contains(gw)))
        .or(Some(0))
}

/// Immutable, fully aggregated snapshot of one adapter.
///
/// IPv4 addresses and masks are stored as [`Ipv4Binding`] pairs, so the
/// address and mask lists always have the same length.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AdapterConfig {
    /// Enumeration fields.
    #[serde(flatten)]
    pub record: AdapterRecord,
    /// IPv4 addresses with their masks, in source order.
    pub ipv4: Vec<Ipv4Binding>,
    /// Global/temporary IPv6 addresses (link-local excluded).
    pub ipv6_addresses: Vec<Ipv6Addr>,
    /// IPv4 default gateway.
    pub gateway: Option<Ipv4Addr>,
    /// DNS servers in priority order, without duplicates.
    pub dns_servers: Vec<Ipv4Addr>,
    /// True if the address is obtained through DHCP.
    pub dhcp_enabled: bool,
    /// Link speed such as "1.0 Gbps"; `None` when unknown.
    pub link_speed: Option<String>,
    /// Interface class from the hardware description.
    pub interface_class: InterfaceClass,
    /// Resolved status.
    pub status: AdapterStatus,
    /// When this snapshot was produced.
    pub resolved_at: SystemTime,
}

impl AdapterConfig {
    /// IPv4 addresses, index-aligned with [`subnet_masks`](Self::subnet_masks).
    #[must_use]
    pub fn ipv4_addresses(&self) -> Vec<Ipv4Addr> {
        self.ipv4.iter().map(|b| b.address).collect()
    }

    /// Subnet masks, index-aligned with [`ipv4_addresses`](Self::ipv4_addresses).
    #[must_use]
    pub fn subnet_masks(&self) -> Vec<Ipv4Addr> {
        self.ipv4.iter().map(|b| b.mask).collect()
    }

    /// The binding whose network contains the gateway, else the first one.
    #[must_use]
    pub fn primary(&self) -> Option<Ipv4Binding> {
        primary_index(&self.ipv4, self.gateway).map(|i| self.ipv4[i])
    }

    /// Every binding other than the primary, each with its own mask.
    #[must_use]
    pub fn extra_ips(&self) -> Vec<Ipv4Binding> {
        let primary = primary_index(&self.ipv4, self.gateway);
        self.ipv4
            .iter()
            .enumerate()
            .filter(|(i, _)| Some(*i) != primary)
            .map(|(_, b)| *b)
            .collect()
    }

    /// First DNS server.
    #[must_use]
    pub fn primary_dns(&self) -> Option<Ipv4Addr> {
        self.dns_servers.first().copied()
    }

    /// Second DNS server.
    #[must_use]
    pub fn secondary_dns(&self) -> Option<Ipv4Addr> {
        self.dns_servers.get(1).copied()
    }

    /// Link speed, or "unknown".
    #[must_use]
    pub fn link_speed_text(&self) -> &str {
        self.link_speed.as_deref().unwrap_or("unknown")
    }

    /// Renders a multi-line summary suitable for copying into a ticket.
    #[must_use]
    pub fn report(&self) -> String {
        let show = |ip: Option<Ipv4Addr>| ip.map_or_else(|| "unset".to_string(), |ip| ip.to_string());
        let primary = self.primary();

        let mut out = String::new();
        let mut line = |label: &str, value: &dyn fmt::Display| {
            let _ = writeln!(out, "{label:<15}{value}");
        };

        line("Adapter:", &self.record.display_name);
        line("Description:", &self.record.description);
        line("MAC address:", &self.record.mac_address);
        line("Status:", &self.status);
        line("Link speed:", &self.link_speed_text());
        line("Type:", &self.interface_class);
        line("Address mode:", &if self.dhcp_enabled { "DHCP" } else { "Static" });
        line("IP address:", &show(primary.map(|b| b.address)));
        line("Subnet mask:", &show(primary.map(|b| b.mask)));
        let network = primary
            .and_then(|b| mask::network_info(b.address, b.mask))
            .map_or_else(
                || "unset".to_string(),
                |n| format!("{}/{} ({} hosts)", n.network, n.prefix_len, n.host_count()),
            );
        line("Network:", &network);
        line("Gateway:", &show(self.gateway));
        line("Primary DNS:", &show(self.primary_dns()));
        line("Secondary DNS:", &show(self.secondary_dns()));

        let extras = self.extra_ips();
        if !extras.is_empty() {
            let _ = writeln!(out, "Extra IPs:");
            for binding in extras {
                let _ = writeln!(out, "  {} / {}", binding.address, binding.mask);
            }
        }
        if !self.ipv6_addresses.is_empty() {
            let _ = writeln!(out, "IPv6:");
            for address in &self.ipv6_addresses {
                let _ = writeln!(out, "  {address}");
            }
        }
        let _ = writeln!(out, "{:<15}{}", "Resolved at:", format_utc(self.resolved_at));
        out
    }
}

#[cfg(test)]
#[path = "adapter_tests.rs"]
mod tests;
