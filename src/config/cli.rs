//! CLI argument parsing using clap.
//!
//! Defines the command-line interface with all options and subcommands.

use std::net::Ipv4Addr;
use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// adapterctl: view and edit network adapter configuration
///
/// Resolves adapter state from several system commands and applies
/// static IP, DNS, DHCP and secondary address changes.
#[derive(Debug, Parser)]
#[command(name = "adapterctl")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to run (default: list)
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Path to configuration file
    #[arg(long, short, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(long, short, global = true)]
    pub verbose: bool,

    /// Print JSON instead of text
    #[arg(long, global = true)]
    pub json: bool,

    /// Multiply every command timeout (for slow machines)
    #[arg(long = "timeout-scale", value_name = "FACTOR", global = true)]
    pub timeout_scale: Option<f64>,

    /// Encoding tried when command output is not UTF-8 (e.g. gbk, big5)
    #[arg(long = "fallback-encoding", value_name = "LABEL", global = true)]
    pub fallback_encoding: Option<String>,
}

/// Subcommands for adapterctl
///
/// `ADAPTER` is an adapter id, a connection name or a hardware
/// description (names are case-insensitive).
#[derive(Debug, Subcommand)]
pub enum Command {
    /// List adapters in priority order
    List,

    /// Show the full configuration of one adapter
    Show {
        /// Adapter id, name or description
        adapter: String,
    },

    /// Set a static primary address, gateway and DNS
    Apply {
        /// Adapter id, name or description
        adapter: String,

        /// IPv4 address
        #[arg(long)]
        ip: Ipv4Addr,

        /// Subnet mask: prefix length (24), /24 or dotted
        #[arg(long)]
        mask: String,

        /// Default gateway
        #[arg(long)]
        gateway: Option<Ipv4Addr>,

        /// Primary DNS server
        #[arg(long)]
        dns1: Option<Ipv4Addr>,

        /// Secondary DNS server
        #[arg(long)]
        dns2: Option<Ipv4Addr>,
    },

    /// Obtain address and DNS through DHCP
    Dhcp {
        /// Adapter id, name or description
        adapter: String,
    },

    /// Enable the adapter
    Enable {
        /// Adapter id, name or description
        adapter: String,
    },

    /// Disable the adapter
    Disable {
        /// Adapter id, name or description
        adapter: String,
    },

    /// Add secondary addresses
    AddIp {
        /// Adapter id, name or description
        adapter: String,

        /// Addresses as ip/mask (mask as prefix or dotted)
        #[arg(required = true, value_name = "IP/MASK")]
        items: Vec<String>,
    },

    /// Remove addresses
    RemoveIp {
        /// Adapter id, name or description
        adapter: String,

        /// Addresses to remove
        #[arg(required = true, value_name = "IP")]
        items: Vec<String>,
    },

    /// Generate a default configuration file
    Init {
        /// Output path for the configuration file
        #[arg(long, short, default_value = "adapterctl.toml")]
        output: PathBuf,
    },
}

impl Command {
    /// Returns true for subcommands that change adapter configuration.
    #[must_use]
    pub const fn is_mutation(&self) -> bool {
        matches!(
            self,
            Self::Apply { .. }
                | Self::Dhcp { .. }
                | Self::Enable { .. }
                | Self::Disable { .. }
                | Self::AddIp { .. }
                | Self::RemoveIp { .. }
        )
    }
}

impl Cli {
    /// Parses CLI arguments from the command line.
    #[must_use]
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Parses CLI arguments from an iterator (useful for testing).
    pub fn parse_from_iter<I, T>(iter: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        Self::parse_from(iter)
    }

    /// Returns true if this is the init command.
    #[must_use]
    pub const fn is_init(&self) -> bool {
        matches!(self.command, Some(Command::Init { .. }))
    }
}
