//! adapterctl: network adapter state resolution and configuration
//!
//! A library that resolves the full state of each network adapter from
//! several locale-dependent system commands, and applies static IP, DNS,
//! DHCP, enable/disable and secondary address changes.

pub mod command;
pub mod config;
pub mod engine;
pub mod network;
pub mod platform;
pub mod time;
