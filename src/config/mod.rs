//! Configuration layer for adapterctl.
//!
//! This module provides:
//! - CLI argument parsing ([`Cli`], [`Command`])
//! - TOML configuration file parsing ([`TomlConfig`])
//! - Validated configuration ([`ValidatedConfig`])
//! - Configuration file generation ([`write_default_config`])
//! - Default values ([`defaults`])
//!
//! # Priority
//!
//! Configuration values are resolved with the following priority (highest to lowest):
//!
//! 1. **Explicit CLI arguments** - Values explicitly passed via command line
//! 2. **TOML config file** - Values from the configuration file
//! 3. **Built-in defaults** - Hardcoded default values
//!
//! Per-command timeouts are TOML-only; the CLI offers `--timeout-scale`,
//! which multiplies every resolved timeout.
//!
//! # Boolean Flag Semantics
//!
//! `--json` uses OR semantics: if set `true` in either CLI or TOML, the
//! result is `true`.

mod cli;
pub mod defaults;
mod error;
mod toml;
mod validated;


pub use cli::{Cli, Command};
pub use error::ConfigError;
pub use toml::{DecodingSection, OutputSection, TimeoutsSection, TomlConfig, default_config_template};
pub use validated::{ValidatedConfig, write_default_config};
