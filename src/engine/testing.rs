//! Scripted hosts shared by the engine tests.

use crate::command::mock::ScriptedRunner;
use crate::network::extract::fixtures;

pub const ETHERNET_ID: &str = "{6F1D7A3E-0001}";
pub const WLAN_ID: &str = "{9A2B0000-0002}";
pub const VIRTUALBOX_ID: &str = "{C0FFEE00-0003}";

pub const SHOW_CONFIG: &[&str] = &["interface", "ipv4", "show", "config"];
pub const SHOW_DNS: &[&str] = &["interface", "ipv4", "show", "dns"];
pub const SHOW_INTERFACE: &[&str] = &["interface", "show", "interface"];

/// Every query source answered from the English captures.
pub fn english_host() -> ScriptedRunner {
    ScriptedRunner::new()
        .on_stdout("wmic", &["path"], fixtures::ENUMERATION_EN)
        .on_stdout("wmic", &["nic"], fixtures::SPEED_TABLE)
        .on_stdout("netsh", SHOW_CONFIG, fixtures::IPV4_CONFIG_EN)
        .on_stdout("ipconfig", &["/all"], fixtures::FULL_DETAIL_EN)
        .on_stdout("netsh", SHOW_DNS, fixtures::DNS_EN)
        .on_stdout("netsh", &["wlan"], fixtures::WLAN_EN)
        .on_stdout("netsh", SHOW_INTERFACE, fixtures::INTERFACES_EN)
}

/// Every query source answered from the Chinese captures; no DNS query.
pub fn chinese_host() -> ScriptedRunner {
    ScriptedRunner::new()
        .on_stdout("wmic", &["path"], fixtures::ENUMERATION_ZH)
        .on_stdout("wmic", &["nic"], fixtures::SPEED_TABLE)
        .on_stdout("netsh", SHOW_CONFIG, fixtures::IPV4_CONFIG_ZH)
        .on_stdout("ipconfig", &["/all"], fixtures::FULL_DETAIL_ZH)
        .on_stdout("netsh", &["wlan"], fixtures::WLAN_ZH)
        .on_stdout("netsh", SHOW_INTERFACE, fixtures::INTERFACES_ZH)
}
