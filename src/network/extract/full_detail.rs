//! System-wide detail extractor (`ipconfig /all`).
//!
//! The dump lists every adapter under a heading such as
//! `Ethernet adapter Ethernet:` or `以太网适配器 以太网:`. The block for one
//! adapter runs from its heading to the next heading or the end of text.

use std::net::{Ipv4Addr, Ipv6Addr};
use std::sync::LazyLock;

use regex::Regex;

use super::{Field, PartialConfig, compile, dedup_preserving_order, fields, parse_yes_no};
use crate::network::adapter::Ipv4Binding;
use crate::network::mask::normalize_mask;

/// Adapter-type heading prefixes, English and Chinese.
static TYPED_HEADING: LazyLock<Option<Regex>> = LazyLock::new(|| {
    compile(
        r"(?mi)^(?:Ethernet adapter|Wireless LAN adapter|PPP adapter|Tunnel adapter|Unknown adapter|以太网适配器|无线局域网适配器|PPP 适配器|隧道适配器|未知适配器)\s+(.+?)\s*[:：]\s*$",
    )
});

/// Any unindented line ending in a colon starts a new block.
static ANY_HEADING: LazyLock<Option<Regex>> =
    LazyLock::new(|| compile(r"(?m)^[^\s].*[:：][ \t]*$"));

const IPV4_LABELS: &[&str] = &[
    "IPv4 Address",
    "Autoconfiguration IPv4 Address",
    "IPv4 地址",
    "自动配置 IPv4 地址",
];
const IPV6_LABELS: &[&str] = &[
    "IPv6 Address",
    "Temporary IPv6 Address",
    "IPv6 地址",
    "临时 IPv6 地址",
];
const MASK_LABELS: &[&str] = &["Subnet Mask", "子网掩码"];
const GATEWAY_LABELS: &[&str] = &["Default Gateway", "默认网关"];
const DNS_LABELS: &[&str] = &["DNS Servers", "DNS 服务器"];
const DHCP_LABELS: &[&str] = &["DHCP Enabled", "DHCP 已启用", "已启用 DHCP"];

/// Finds the block of `adapter_name` in a full dump.
///
/// Tries, in order: an exact typed heading (`<type> adapter <name>:`), a
/// typed heading that merely contains the name, and finally any heading
/// containing the name.
#[must_use]
pub fn locate_block<'a>(dump: &'a str, adapter_name: &str) -> Option<&'a str> {
    let name = adapter_name.trim();
    if name.is_empty() {
        return None;
    }
    let lower_name = name.to_lowercase();

    if let Some(typed) = TYPED_HEADING.as_ref() {
        let headings: Vec<_> = typed.captures_iter(dump).collect();
        let exact = headings.iter().find(|c| {
            c.get(1)
                .is_some_and(|m| m.as_str().eq_ignore_ascii_case(name))
        });
        let loose = || {
            headings.iter().find(|c| {
                c.get(1)
                    .is_some_and(|m| m.as_str().to_lowercase().contains(&lower_name))
            })
        };
        if let Some(heading) = exact.or_else(loose).and_then(|c| c.get(0)) {
            return Some(block_after(dump, heading.end()));
        }
    }

    let any = ANY_HEADING.as_ref()?;
    let heading = any
        .find_iter(dump)
        .find(|m| m.as_str().to_lowercase().contains(&lower_name))?;
    tracing::debug!("Matched '{name}' by loose heading '{}'", heading.as_str().trim());
    Some(block_after(dump, heading.end()))
}

/// Text from `start` up to the next heading or the end of `dump`.
fn block_after(dump: &str, start: usize) -> &str {
    let rest = &dump[start..];
    let end = ANY_HEADING
        .as_ref()
        .and_then(|re| re.find(rest))
        .map_or(rest.len(), |m| m.start());
    &rest[..end]
}

/// Extracts one adapter's configuration from the full dump.
///
/// Returns an empty [`PartialConfig`] if the adapter's block is missing.
#[must_use]
pub fn parse_full_detail(dump: &str, adapter_name: &str) -> PartialConfig {
    let Some(block) = locate_block(dump, adapter_name) else {
        tracing::debug!("No detail block for '{adapter_name}'");
        return PartialConfig::default();
    };
    parse_block(block)
}

fn parse_block(block: &str) -> PartialConfig {
    let fields = fields(block);

    let bindings = pair_addresses(&fields);
    let ipv6: Vec<Ipv6Addr> = dedup_preserving_order(
        fields
            .iter()
            .filter(|f| f.is_any(IPV6_LABELS))
            .filter_map(|f| parse_ipv6(f.value())),
    );
    let dns: Vec<Ipv4Addr> = dedup_preserving_order(
        fields
            .iter()
            .filter(|f| f.is_any(DNS_LABELS))
            .flat_map(Field::ipv4_tokens),
    );

    PartialConfig {
        ipv4: (!bindings.is_empty()).then_some(bindings),
        ipv6: (!ipv6.is_empty()).then_some(ipv6),
        // The first IPv4-looking token skips an IPv6 gateway on the same field.
        gateway: fields
            .iter()
            .filter(|f| f.is_any(GATEWAY_LABELS))
            .find_map(|f| f.ipv4_tokens().first().copied()),
        dns_servers: (!dns.is_empty()).then_some(dns),
        dhcp_enabled: fields
            .iter()
            .filter(|f| f.is_any(DHCP_LABELS))
            .find_map(|f| parse_yes_no(f.value())),
    }
}

/// Pairs each mask with the most recent address that has none yet.
fn pair_addresses(fields: &[Field<'_>]) -> Vec<Ipv4Binding> {
    let mut pending: Vec<(Ipv4Addr, Option<Ipv4Addr>)> = Vec::new();

    for field in fields {
        if field.is_any(IPV4_LABELS) {
            if let Some(address) = field.ipv4_tokens().first() {
                pending.push((*address, None));
            }
        } else if field.is_any(MASK_LABELS) {
            let mask = field
                .value()
                .split_whitespace()
                .next()
                .and_then(|v| normalize_mask(v).ok());
            if let (Some(mask), Some(slot)) =
                (mask, pending.iter_mut().rev().find(|(_, m)| m.is_none()))
            {
                slot.1 = Some(mask);
            }
        }
    }

    pending
        .into_iter()
        .filter_map(|(address, mask)| Some(Ipv4Binding::new(address, mask?)))
        .collect()
}

/// Parses `2001:db8::1%12(Preferred)`, rejecting link-local addresses.
fn parse_ipv6(value: &str) -> Option<Ipv6Addr> {
    let token = value.split(['(', '%', ' ']).next()?.trim();
    let address: Ipv6Addr = token.parse().ok()?;
    (!address.is_unicast_link_local()).then_some(address)
}
