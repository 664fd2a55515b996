//! DNS list extractor (`netsh interface ipv4 show dns name=<adapter>`).

use std::net::Ipv4Addr;

use super::{dedup_preserving_order, ipv4_tokens};

/// Every IPv4 address in the output, de-duplicated in order.
///
/// The command prints nothing but the interface header and its server
/// list, so any dotted quad is a DNS server.
#[must_use]
pub fn parse_dns_servers(text: &str) -> Vec<Ipv4Addr> {
    dedup_preserving_order(ipv4_tokens(text))
}
