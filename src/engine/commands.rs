//! The concrete command surface: one builder per query or mutation.
//!
//! Every builder returns an [`Invocation`] with the per-source timeout
//! from [`Timeouts`]. Adapter names are passed as one `name=<n>` argv
//! entry, so names with spaces need no quoting.

use std::net::Ipv4Addr;
use std::time::Duration;

use crate::command::Invocation;
use crate::config::defaults;

const WMIC: &str = "wmic";
const NETSH: &str = "netsh";
const IPCONFIG: &str = "ipconfig";

/// Per-source time budgets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timeouts {
    /// Adapter enumeration
    pub enumeration: Duration,
    /// Per-interface IPv4 configuration
    pub ipv4_config: Duration,
    /// System-wide detail dump
    pub full_detail: Duration,
    /// DNS enhancement query
    pub dns: Duration,
    /// Link speed table
    pub link_speed: Duration,
    /// Wireless receive rate
    pub wireless: Duration,
    /// Interface state table
    pub interface_status: Duration,
    /// Static address assignment
    pub static_address: Duration,
    /// Each DNS server update
    pub dns_update: Duration,
    /// Administrative enable/disable
    pub admin_toggle: Duration,
    /// Each DHCP switch call
    pub dhcp: Duration,
    /// Secondary address add/delete
    pub secondary_ip: Duration,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self {
            enumeration: defaults::secs(defaults::ENUMERATION_TIMEOUT_SECS),
            ipv4_config: defaults::secs(defaults::IPV4_CONFIG_TIMEOUT_SECS),
            full_detail: defaults::secs(defaults::FULL_DETAIL_TIMEOUT_SECS),
            dns: defaults::secs(defaults::DNS_TIMEOUT_SECS),
            link_speed: defaults::secs(defaults::LINK_SPEED_TIMEOUT_SECS),
            wireless: defaults::secs(defaults::WIRELESS_TIMEOUT_SECS),
            interface_status: defaults::secs(defaults::INTERFACE_STATUS_TIMEOUT_SECS),
            static_address: defaults::secs(defaults::STATIC_ADDRESS_TIMEOUT_SECS),
            dns_update: defaults::secs(defaults::DNS_UPDATE_TIMEOUT_SECS),
            admin_toggle: defaults::secs(defaults::ADMIN_TOGGLE_TIMEOUT_SECS),
            dhcp: defaults::secs(defaults::DHCP_TIMEOUT_SECS),
            secondary_ip: defaults::secs(defaults::SECONDARY_IP_TIMEOUT_SECS),
        }
    }
}

impl Timeouts {
    /// Multiplies every budget by `factor` (for slow machines).
    #[must_use]
    pub fn scaled(self, factor: f64) -> Self {
        let scale = |d: Duration| d.mul_f64(factor);
        Self {
            enumeration: scale(self.enumeration),
            ipv4_config: scale(self.ipv4_config),
            full_detail: scale(self.full_detail),
            dns: scale(self.dns),
            link_speed: scale(self.link_speed),
            wireless: scale(self.wireless),
            interface_status: scale(self.interface_status),
            static_address: scale(self.static_address),
            dns_update: scale(self.dns_update),
            admin_toggle: scale(self.admin_toggle),
            dhcp: scale(self.dhcp),
            secondary_ip: scale(self.secondary_ip),
        }
    }
}

/// Builds the invocations used by the aggregator and the mutator.
#[derive(Debug, Clone, Default)]
pub struct CommandSet {
    timeouts: Timeouts,
}

fn name_arg(name: &str) -> String {
    format!("name={name}")
}

impl CommandSet {
    /// Creates a command set with the given time budgets.
    #[must_use]
    pub const fn new(timeouts: Timeouts) -> Self {
        Self { timeouts }
    }

    /// The configured time budgets.
    #[must_use]
    pub const fn timeouts(&self) -> &Timeouts {
        &self.timeouts
    }

    /// Adapter table as CSV.
    #[must_use]
    pub fn enumeration(&self) -> Invocation {
        Invocation::new(WMIC, self.timeouts.enumeration).args([
            "path",
            "win32_networkadapter",
            "where",
            "NetConnectionID is not null",
            "get",
            "Name,Description,NetConnectionID,GUID,MACAddress,NetConnectionStatus",
            "/format:csv",
        ])
    }

    #[must_use]
    pub fn ipv4_config(&self, name: &str) -> Invocation {
        Invocation::new(NETSH, self.timeouts.ipv4_config)
            .args(["interface", "ipv4", "show", "config"])
            .arg(name_arg(name))
    }

    #[must_use]
    pub fn full_detail(&self) -> Invocation {
        Invocation::new(IPCONFIG, self.timeouts.full_detail).arg("/all")
    }

    #[must_use]
    pub fn dns(&self, name: &str) -> Invocation {
        Invocation::new(NETSH, self.timeouts.dns)
            .args(["interface", "ipv4", "show", "dns"])
            .arg(name_arg(name))
    }

    /// Speed of every enabled adapter, in bits per second.
    #[must_use]
    pub fn link_speed(&self) -> Invocation {
        Invocation::new(WMIC, self.timeouts.link_speed).args([
            "nic",
            "where",
            "NetEnabled=true",
            "get",
            "Name,Speed",
            "/format:csv",
        ])
    }

    #[must_use]
    pub fn wireless(&self) -> Invocation {
        Invocation::new(NETSH, self.timeouts.wireless).args(["wlan", "show", "interfaces"])
    }

    #[must_use]
    pub fn interface_status(&self) -> Invocation {
        Invocation::new(NETSH, self.timeouts.interface_status)
            .args(["interface", "show", "interface"])
    }

    /// Static address; `mask` must already be in dotted form.
    #[must_use]
    pub fn static_address(
        &self,
        name: &str,
        ip: Ipv4Addr,
        mask: Ipv4Addr,
        gateway: Option<Ipv4Addr>,
    ) -> Invocation {
        let invocation = Invocation::new(NETSH, self.timeouts.static_address)
            .args(["interface", "ipv4", "set", "address"])
            .arg(name_arg(name))
            .args(["static".to_string(), ip.to_string(), mask.to_string()]);
        match gateway {
            Some(gateway) => invocation.arg(gateway.to_string()),
            None => invocation,
        }
    }

    /// Replaces the DNS list with `server`.
    #[must_use]
    pub fn primary_dns(&self, name: &str, server: Ipv4Addr) -> Invocation {
        Invocation::new(NETSH, self.timeouts.dns_update)
            .args(["interface", "ipv4", "set", "dnsservers"])
            .arg(name_arg(name))
            .args(["static".to_string(), server.to_string(), "primary".to_string()])
    }

    /// Adds `server` at position 2 of the DNS list.
    #[must_use]
    pub fn secondary_dns(&self, name: &str, server: Ipv4Addr) -> Invocation {
        Invocation::new(NETSH, self.timeouts.dns_update)
            .args(["interface", "ipv4", "add", "dnsservers"])
            .arg(name_arg(name))
            .args([server.to_string(), "index=2".to_string()])
    }

    #[must_use]
    pub fn dhcp_address(&self, name: &str) -> Invocation {
        Invocation::new(NETSH, self.timeouts.dhcp)
            .args(["interface", "ipv4", "set", "address"])
            .arg(name_arg(name))
            .arg("source=dhcp")
    }

    #[must_use]
    pub fn dhcp_dns(&self, name: &str) -> Invocation {
        Invocation::new(NETSH, self.timeouts.dhcp)
            .args(["interface", "ipv4", "set", "dnsservers"])
            .arg(name_arg(name))
            .arg("source=dhcp")
    }

    #[must_use]
    pub fn admin_toggle(&self, name: &str, enabled: bool) -> Invocation {
        let admin = if enabled { "admin=enabled" } else { "admin=disabled" };
        Invocation::new(NETSH, self.timeouts.admin_toggle)
            .args(["interface", "set", "interface"])
            .arg(name_arg(name))
            .arg(admin)
    }

    #[must_use]
    pub fn add_address(&self, name: &str, ip: Ipv4Addr, mask: Ipv4Addr) -> Invocation {
        Invocation::new(NETSH, self.timeouts.secondary_ip)
            .args(["interface", "ipv4", "add", "address"])
            .arg(name_arg(name))
            .args([ip.to_string(), mask.to_string()])
    }

    #[must_use]
    pub fn delete_address(&self, name: &str, ip: Ipv4Addr) -> Invocation {
        Invocation::new(NETSH, self.timeouts.secondary_ip)
            .args(["interface", "ipv4", "delete", "address"])
            .arg(name_arg(name))
            .arg(ip.to_string())
    }
}
