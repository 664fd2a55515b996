//! Default values for configuration options.
//!
//! Centralized constants to avoid magic numbers scattered across the codebase.

use std::time::Duration;

/// Adapter enumeration (`wmic path win32_networkadapter`), in seconds.
pub const ENUMERATION_TIMEOUT_SECS: u64 = 30;

/// Per-interface IPv4 configuration (`netsh ... show config`), in seconds.
pub const IPV4_CONFIG_TIMEOUT_SECS: u64 = 15;

/// System-wide detail dump (`ipconfig /all`), in seconds.
pub const FULL_DETAIL_TIMEOUT_SECS: u64 = 6;

/// DNS enhancement query (`netsh ... show dns`), in seconds.
pub const DNS_TIMEOUT_SECS: u64 = 10;

/// Link speed table (`wmic nic`), in seconds.
pub const LINK_SPEED_TIMEOUT_SECS: u64 = 10;

/// Wireless receive rate (`netsh wlan show interfaces`), in seconds.
pub const WIRELESS_TIMEOUT_SECS: u64 = 10;

/// Interface state table (`netsh interface show interface`), in seconds.
pub const INTERFACE_STATUS_TIMEOUT_SECS: u64 = 15;

/// Static address assignment, in seconds.
pub const STATIC_ADDRESS_TIMEOUT_SECS: u64 = 15;

/// Each DNS server update, in seconds.
pub const DNS_UPDATE_TIMEOUT_SECS: u64 = 8;

/// Administrative enable/disable, in seconds.
pub const ADMIN_TOGGLE_TIMEOUT_SECS: u64 = 15;

/// Each of the two DHCP switch calls, in seconds.
pub const DHCP_TIMEOUT_SECS: u64 = 15;

/// Secondary address add/delete, in seconds.
pub const SECONDARY_IP_TIMEOUT_SECS: u64 = 30;

/// Legacy encoding tried when command output is not UTF-8.
pub const FALLBACK_ENCODING: &str = "gbk";

/// Default timeout multiplier.
pub const TIMEOUT_SCALE: f64 = 1.0;

/// Upper bound for `--timeout-scale`.
pub const MAX_TIMEOUT_SCALE: f64 = 20.0;

/// Converts a seconds constant into a [`Duration`].
#[must_use]
pub const fn secs(value: u64) -> Duration {
    Duration::from_secs(value)
}
