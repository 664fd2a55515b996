//! TOML configuration file parsing.
//!
//! Defines the structure of the configuration file with serde.

use std::path::Path;

use serde::Deserialize;

use super::ConfigError;

/// Root configuration structure from TOML file.
///
/// All fields are optional to allow partial configuration
/// that can be merged with CLI arguments.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TomlConfig {
    /// Per-command timeouts
    #[serde(default)]
    pub timeouts: TimeoutsSection,

    /// Output decoding
    #[serde(default)]
    pub decoding: DecodingSection,

    /// Output format
    #[serde(default)]
    pub output: OutputSection,
}

/// Per-command timeouts in seconds.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TimeoutsSection {
    pub enumeration: Option<u64>,
    pub ipv4_config: Option<u64>,
    pub full_detail: Option<u64>,
    pub dns: Option<u64>,
    pub link_speed: Option<u64>,
    pub wireless: Option<u64>,
    pub interface_status: Option<u64>,
    pub static_address: Option<u64>,
    pub dns_update: Option<u64>,
    pub admin_toggle: Option<u64>,
    pub dhcp: Option<u64>,
    pub secondary_ip: Option<u64>,
}

/// Output decoding section.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DecodingSection {
    /// Encoding label tried when output is not UTF-8
    pub fallback_encoding: Option<String>,
}

/// Output format section.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OutputSection {
    /// Print JSON instead of text
    #[serde(default)]
    pub json: bool,
}

impl TomlConfig {
    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;

        Self::parse(&content)
    }

    /// Parses configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is invalid.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(ConfigError::from)
    }
}

/// Generates a default configuration file with comments.
#[must_use]
pub fn default_config_template() -> String {
    r#"# adapterctl configuration file

[timeouts]
# Seconds each system command may run before it is killed.
# All values must be greater than 0; --timeout-scale multiplies them.

# Adapter list (wmic path win32_networkadapter)
# enumeration = 30
# Per-adapter IPv4 configuration (netsh interface ipv4 show config)
# ipv4_config = 15
# Full detail dump (ipconfig /all)
# full_detail = 6
# DNS list (netsh interface ipv4 show dns)
# dns = 10
# Link speed table (wmic nic)
# link_speed = 10
# Wireless receive rate (netsh wlan show interfaces)
# wireless = 10
# Admin/link state table (netsh interface show interface)
# interface_status = 15

# Static address change
# static_address = 15
# Each DNS server change
# dns_update = 8
# Enable/disable
# admin_toggle = 15
# Each of the two DHCP calls
# dhcp = 15
# Secondary address add/remove
# secondary_ip = 30

[decoding]
# Encoding tried when command output is not UTF-8 (default: gbk)
# fallback_encoding = "gbk"

[output]
# Print JSON instead of text (same as --json)
# json = false
"#
    .to_string()
}
