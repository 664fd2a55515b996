//! Validated configuration after merging CLI and TOML sources.
//!
//! This module contains the final, validated configuration that is used
//! by the application. All validation is performed during construction.

use std::fmt;
use std::path::Path;
use std::time::Duration;

use encoding_rs::Encoding;

use crate::command::decode::encoding_for_label;
use crate::engine::Timeouts;

use super::cli::Cli;
use super::defaults;
use super::error::ConfigError;
use super::toml::{TimeoutsSection, TomlConfig};

/// Fully validated configuration ready for use by the application.
///
/// # Construction
///
/// Use [`ValidatedConfig::from_raw`] to create from CLI args and optional TOML config.
/// The function validates all inputs and returns errors for invalid configurations.
#[derive(Debug)]
pub struct ValidatedConfig {
    /// Per-command timeouts, already multiplied by `timeout_scale`
    pub timeouts: Timeouts,

    /// Multiplier applied to every timeout
    pub timeout_scale: f64,

    /// Encoding tried when command output is not UTF-8
    pub fallback_encoding: &'static Encoding,

    /// Print JSON instead of text
    pub json: bool,

    /// Verbose logging enabled
    pub verbose: bool,
}

impl fmt::Display for ValidatedConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Config {{ timeout_scale: {}, enumeration: {:.1}s, full_detail: {:.1}s, \
             static_address: {:.1}s, encoding: {}, json: {} }}",
            self.timeout_scale,
            self.timeouts.enumeration.as_secs_f64(),
            self.timeouts.full_detail.as_secs_f64(),
            self.timeouts.static_address.as_secs_f64(),
            self.fallback_encoding.name(),
            self.json,
        )
    }
}

impl ValidatedConfig {
    /// Creates a validated configuration from CLI arguments and optional TOML config.
    ///
    /// CLI arguments take precedence over TOML config values.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - A timeout is zero
    /// - The timeout scale is not in (0, max]
    /// - The fallback encoding label is unknown
    pub fn from_raw(cli: &Cli, toml: Option<&TomlConfig>) -> Result<Self, ConfigError> {
        let base = Self::resolve_timeouts(toml.map(|t| &t.timeouts))?;
        let timeout_scale = Self::resolve_timeout_scale(cli)?;
        let fallback_encoding = Self::resolve_encoding(cli, toml)?;

        // OR semantics: either source can turn JSON on
        let json = cli.json || toml.is_some_and(|t| t.output.json);

        Ok(Self {
            timeouts: base.scaled(timeout_scale),
            timeout_scale,
            fallback_encoding,
            json,
            verbose: cli.verbose,
        })
    }

    /// Loads and merges configuration from CLI and optional config file.
    ///
    /// If `cli.config` is set, loads the TOML file from that path.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The config file cannot be read or parsed
    /// - The merged configuration is invalid
    pub fn load(cli: &Cli) -> Result<Self, ConfigError> {
        let toml = if let Some(ref path) = cli.config {
            Some(TomlConfig::load(path)?)
        } else {
            None
        };

        Self::from_raw(cli, toml.as_ref())
    }

    fn resolve_timeouts(section: Option<&TimeoutsSection>) -> Result<Timeouts, ConfigError> {
        let empty = TimeoutsSection::default();
        let t = section.unwrap_or(&empty);

        Ok(Timeouts {
            enumeration: seconds(
                "timeouts.enumeration",
                t.enumeration,
                defaults::ENUMERATION_TIMEOUT_SECS,
            )?,
            ipv4_config: seconds(
                "timeouts.ipv4_config",
                t.ipv4_config,
                defaults::IPV4_CONFIG_TIMEOUT_SECS,
            )?,
            full_detail: seconds(
                "timeouts.full_detail",
                t.full_detail,
                defaults::FULL_DETAIL_TIMEOUT_SECS,
            )?,
            dns: seconds("timeouts.dns", t.dns, defaults::DNS_TIMEOUT_SECS)?,
            link_speed: seconds(
                "timeouts.link_speed",
                t.link_speed,
                defaults::LINK_SPEED_TIMEOUT_SECS,
            )?,
            wireless: seconds(
                "timeouts.wireless",
                t.wireless,
                defaults::WIRELESS_TIMEOUT_SECS,
            )?,
            interface_status: seconds(
                "timeouts.interface_status",
                t.interface_status,
                defaults::INTERFACE_STATUS_TIMEOUT_SECS,
            )?,
            static_address: seconds(
                "timeouts.static_address",
                t.static_address,
                defaults::STATIC_ADDRESS_TIMEOUT_SECS,
            )?,
            dns_update: seconds(
                "timeouts.dns_update",
                t.dns_update,
                defaults::DNS_UPDATE_TIMEOUT_SECS,
            )?,
            admin_toggle: seconds(
                "timeouts.admin_toggle",
                t.admin_toggle,
                defaults::ADMIN_TOGGLE_TIMEOUT_SECS,
            )?,
            dhcp: seconds("timeouts.dhcp", t.dhcp, defaults::DHCP_TIMEOUT_SECS)?,
            secondary_ip: seconds(
                "timeouts.secondary_ip",
                t.secondary_ip,
                defaults::SECONDARY_IP_TIMEOUT_SECS,
            )?,
        })
    }

    fn resolve_timeout_scale(cli: &Cli) -> Result<f64, ConfigError> {
        let value = cli.timeout_scale.unwrap_or(defaults::TIMEOUT_SCALE);
        let in_range = value.is_finite() && value > 0.0 && value <= defaults::MAX_TIMEOUT_SCALE;
        if !in_range {
            return Err(ConfigError::InvalidTimeoutScale {
                value,
                max: defaults::MAX_TIMEOUT_SCALE,
            });
        }
        Ok(value)
    }

    fn resolve_encoding(
        cli: &Cli,
        toml: Option<&TomlConfig>,
    ) -> Result<&'static Encoding, ConfigError> {
        // CLI takes precedence
        let label = cli
            .fallback_encoding
            .as_deref()
            .or_else(|| toml.and_then(|t| t.decoding.fallback_encoding.as_deref()))
            .unwrap_or(defaults::FALLBACK_ENCODING);

        encoding_for_label(label).ok_or_else(|| ConfigError::UnknownEncoding {
            label: label.to_string(),
        })
    }
}

/// Writes the default configuration template to a file.
///
/// # Errors
///
/// Returns an error if the file cannot be written.
pub fn write_default_config(path: &Path) -> Result<(), ConfigError> {
    let template = super::toml::default_config_template();
    std::fs::write(path, template).map_err(|e| ConfigError::FileWrite {
        path: path.to_path_buf(),
        source: e,
    })
}

fn seconds(field: &'static str, value: Option<u64>, default: u64) -> Result<Duration, ConfigError> {
    match value {
        Some(0) => Err(ConfigError::InvalidDuration {
            field,
            reason: "must be greater than 0".to_string(),
        }),
        Some(secs) => Ok(defaults::secs(secs)),
        None => Ok(defaults::secs(default)),
    }
}
