//! Text extractors, one per external data source.
//!
//! Every extractor is a pure function from raw command output to partial
//! fields. A pattern that does not match means "field absent", never an
//! error, so extractors tolerate truncated, empty or foreign-locale text.
//!
//! - [`enumeration`]: adapter table (CSV)
//! - [`ipv4_config`]: per-interface IPv4 configuration
//! - [`full_detail`]: system-wide detail dump, one block per adapter
//! - [`dns`]: per-interface DNS list
//! - [`link_speed`]: speed table and wireless receive rate
//! - [`interface_status`]: admin/oper state table

pub mod dns;
pub mod enumeration;
pub mod full_detail;
pub mod interface_status;
pub mod ipv4_config;
pub mod link_speed;

#[cfg(test)]
pub(crate) mod fixtures;

use std::net::{Ipv4Addr, Ipv6Addr};
use std::sync::LazyLock;

use regex::Regex;

use super::adapter::Ipv4Binding;

static IPV4_TOKEN: LazyLock<Option<Regex>> =
    LazyLock::new(|| compile(r"(?:^|[^\d.])((?:\d{1,3}\.){3}\d{1,3})(?:$|[^\d.])"));

/// Compiles a built-in pattern. A pattern that fails to compile matches
/// nothing, which extractors already treat as "field absent".
pub(crate) fn compile(pattern: &str) -> Option<Regex> {
    Regex::new(pattern)
        .inspect_err(|e| tracing::error!("Invalid built-in pattern {pattern:?}: {e}"))
        .ok()
}

/// Fields one source contributed; `None` means the source said nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PartialConfig {
    /// Addresses paired with their masks.
    pub ipv4: Option<Vec<Ipv4Binding>>,
    /// Non-link-local IPv6 addresses.
    pub ipv6: Option<Vec<Ipv6Addr>>,
    /// Default gateway.
    pub gateway: Option<Ipv4Addr>,
    /// DNS servers, de-duplicated.
    pub dns_servers: Option<Vec<Ipv4Addr>>,
    /// DHCP flag.
    pub dhcp_enabled: Option<bool>,
}

impl PartialConfig {
    /// Returns true if no field is known.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Overlays a more reliable source onto this one.
    ///
    /// Each non-empty field of `other` replaces the field here, except DNS,
    /// which is merged with `other`'s servers in front.
    pub fn overlay(&mut self, other: Self) {
        if let Some(ipv4) = other.ipv4.filter(|v| !v.is_empty()) {
            self.ipv4 = Some(ipv4);
        }
        if let Some(ipv6) = other.ipv6.filter(|v| !v.is_empty()) {
            self.ipv6 = Some(ipv6);
        }
        if other.gateway.is_some() {
            self.gateway = other.gateway;
        }
        if other.dhcp_enabled.is_some() {
            self.dhcp_enabled = other.dhcp_enabled;
        }
        if let Some(dns) = other.dns_servers.filter(|v| !v.is_empty()) {
            self.merge_dns(&dns);
        }
    }

    /// Merges a higher-priority DNS list in front of the current one.
    pub fn merge_dns(&mut self, preferred: &[Ipv4Addr]) {
        let existing = self.dns_servers.take().unwrap_or_default();
        let merged = merge_dns(preferred, &existing);
        self.dns_servers = (!merged.is_empty()).then_some(merged);
    }
}

/// Merges `preferred` in front of `existing`, dropping duplicates and
/// keeping first-seen order.
#[must_use]
pub fn merge_dns(preferred: &[Ipv4Addr], existing: &[Ipv4Addr]) -> Vec<Ipv4Addr> {
    dedup_preserving_order(preferred.iter().chain(existing).copied())
}

/// Removes duplicates while keeping the first occurrence of each item.
#[must_use]
pub fn dedup_preserving_order<T: PartialEq>(items: impl IntoIterator<Item = T>) -> Vec<T> {
    let mut out: Vec<T> = Vec::new();
    for item in items {
        if !out.contains(&item) {
            out.push(item);
        }
    }
    out
}

/// All dotted-quad IPv4 addresses in `text`, in order.
pub(crate) fn ipv4_tokens(text: &str) -> Vec<Ipv4Addr> {
    let Some(re) = IPV4_TOKEN.as_ref() else {
        return Vec::new();
    };
    // Adjacent tokens share their separator, so scan word by word.
    text.split(|c: char| c.is_whitespace() || c == ',')
        .filter_map(|word| re.captures(word))
        .filter_map(|caps| caps.get(1)?.as_str().parse().ok())
        .collect()
}

/// Interprets a yes/no cell in English or Chinese.
pub(crate) fn parse_yes_no(value: &str) -> Option<bool> {
    let lower = value.trim().to_lowercase();
    if lower.starts_with("yes") || lower.starts_with('是') || lower.starts_with("enabled") {
        Some(true)
    } else if lower.starts_with("no") || lower.starts_with('否') || lower.starts_with("disabled") {
        Some(false)
    } else {
        None
    }
}

/// Indentation at or beyond which a line continues the previous field.
const CONTINUATION_INDENT: usize = 16;

/// One `Label . . . : value` entry with its continuation lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Field<'a> {
    /// Label with trailing dot leaders removed.
    pub label: &'a str,
    /// The value on the label line, then each continuation line.
    pub values: Vec<&'a str>,
}

impl Field<'_> {
    /// Case-insensitive label comparison.
    pub fn is(&self, label: &str) -> bool {
        self.label.eq_ignore_ascii_case(label)
    }

    /// Returns true if the label equals any of `labels`.
    pub fn is_any(&self, labels: &[&str]) -> bool {
        labels.iter().any(|l| self.is(l))
    }

    /// The value on the label line.
    pub fn value(&self) -> &str {
        self.values.first().copied().unwrap_or("")
    }

    /// All IPv4 tokens across the value and its continuation lines.
    pub fn ipv4_tokens(&self) -> Vec<Ipv4Addr> {
        self.values.iter().flat_map(|v| ipv4_tokens(v)).collect()
    }
}

/// Splits `Label . . . : value` (ASCII or full-width colon).
fn split_label(line: &str) -> Option<(&str, &str)> {
    let idx = line.find([':', '：'])?;
    let sep_len = line[idx..].chars().next().map_or(1, char::len_utf8);
    let label = line[..idx].trim().trim_end_matches(['.', ' ']).trim();
    if label.is_empty() {
        return None;
    }
    Some((label, line[idx + sep_len..].trim()))
}

/// Parses indented `label: value` listings (ipconfig, netsh) into fields.
///
/// Deeply indented lines without their own label continue the previous
/// field (multi-valued DNS servers and gateways). Blank lines end it.
pub(crate) fn fields(text: &str) -> Vec<Field<'_>> {
    let mut out: Vec<Field<'_>> = Vec::new();
    let mut open = false;

    for line in text.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            open = false;
            continue;
        }
        let indent = line.len() - line.trim_start().len();

        if open && indent >= CONTINUATION_INDENT {
            if let Some(field) = out.last_mut() {
                field.values.push(trimmed);
            }
            continue;
        }

        match split_label(line) {
            Some((label, value)) => {
                out.push(Field {
                    label,
                    values: if value.is_empty() { Vec::new() } else { vec![value] },
                });
                open = true;
            }
            None => open = false,
        }
    }

    out
}
