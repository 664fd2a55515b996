//! Per-interface IPv4 configuration extractor
//! (`netsh interface ipv4 show config name=<adapter>`).
//!
//! Each field has several label variants (English and Chinese). For every
//! field the first variant group that matches anything wins.

use std::net::Ipv4Addr;

use super::{Field, PartialConfig, fields, parse_yes_no};
use crate::network::adapter::Ipv4Binding;
use crate::network::mask::normalize_mask;

const ADDRESS_LABELS: &[&[&str]] = &[
    &["IP Address", "IP 地址"],
    &["IPv4 Address", "IPv4 地址", "静态 IP 地址"],
];

/// How a mask is written after its label.
#[derive(Debug, Clone, Copy)]
enum MaskForm {
    /// `192.168.1.0/24 (mask 255.255.255.0)`
    SubnetPrefix,
    /// `255.255.255.0` or a bare prefix length.
    Plain,
}

const MASK_LABELS: &[(&[&str], MaskForm)] = &[
    (&["Subnet Prefix", "子网前缀"], MaskForm::SubnetPrefix),
    (&["Subnet Mask", "子网掩码"], MaskForm::Plain),
    (&["Subnet Prefix Length", "子网前缀长度"], MaskForm::Plain),
];

const DHCP_LABELS: &[&str] = &["DHCP enabled", "DHCP 已启用", "已启用 DHCP"];

const GATEWAY_LABELS: &[&str] = &["Default Gateway", "默认网关"];

/// Label fragments that identify DNS server lists, static or DHCP-provided.
const DNS_LABEL_MARKERS: &[&str] = &["dns servers", "dns 服务器"];

/// Extracts the IPv4 configuration of one interface.
///
/// Addresses and masks are paired by position; surplus entries on either
/// side are dropped rather than mis-paired.
#[must_use]
pub fn parse_ipv4_config(text: &str) -> PartialConfig {
    let fields = fields(text);

    let addresses = first_group(&fields, ADDRESS_LABELS, |f| f.ipv4_tokens().first().copied());
    let masks = extract_masks(&fields);
    let bindings: Vec<Ipv4Binding> = addresses
        .iter()
        .zip(&masks)
        .map(|(address, mask)| Ipv4Binding::new(*address, *mask))
        .collect();
    if addresses.len() != masks.len() {
        tracing::debug!(
            "IPv4 config listed {} address(es) and {} mask(s); kept {} pair(s)",
            addresses.len(),
            masks.len(),
            bindings.len()
        );
    }

    let dns: Vec<Ipv4Addr> = super::dedup_preserving_order(
        fields
            .iter()
            .filter(|f| is_dns_label(f.label))
            .flat_map(Field::ipv4_tokens),
    );

    PartialConfig {
        ipv4: (!bindings.is_empty()).then_some(bindings),
        ipv6: None,
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

/// Values of the first label group that yields at least one value.
fn first_group<T>(
    fields: &[Field<'_>],
    groups: &[&[&str]],
    extract: impl Fn(&Field<'_>) -> Option<T>,
) -> Vec<T> {
    groups
        .iter()
        .map(|labels| {
            fields
                .iter()
                .filter(|f| f.is_any(labels))
                .filter_map(&extract)
                .collect::<Vec<_>>()
        })
        .find(|values| !values.is_empty())
        .unwrap_or_default()
}

fn extract_masks(fields: &[Field<'_>]) -> Vec<Ipv4Addr> {
    MASK_LABELS
        .iter()
        .map(|(labels, form)| {
            fields
                .iter()
                .filter(|f| f.is_any(labels))
                .filter_map(|f| parse_mask(f.value(), *form))
                .collect::<Vec<_>>()
        })
        .find(|masks| !masks.is_empty())
        .unwrap_or_default()
}

fn parse_mask(value: &str, form: MaskForm) -> Option<Ipv4Addr> {
    match form {
        MaskForm::SubnetPrefix => {
            // Prefer the explicit "(mask a.b.c.d)", else the CIDR length.
            let tokens = super::ipv4_tokens(value);
            if let Some(mask) = tokens.get(1) {
                return normalize_mask(&mask.to_string()).ok();
            }
            let (_, after) = value.split_once('/')?;
            let digits: String = after.chars().take_while(char::is_ascii_digit).collect();
            normalize_mask(&digits).ok()
        }
        MaskForm::Plain => normalize_mask(value.split_whitespace().next()?).ok(),
    }
}

fn is_dns_label(label: &str) -> bool {
    let lower = label.to_lowercase();
    DNS_LABEL_MARKERS.iter().any(|m| lower.contains(m))
}
