//! Subnet mask normalization and IPv4 network arithmetic.

use std::net::Ipv4Addr;

use serde::Serialize;
use thiserror::Error;

/// Error for mask input that cannot be turned into a dotted mask.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MaskError {
    /// Prefix length outside 1..=32.
    #[error("Prefix length {0} is out of range (expected 1-32)")]
    PrefixOutOfRange(u32),

    /// Dotted value whose one-bits are not contiguous.
    #[error("{0} is not a contiguous subnet mask")]
    NonContiguous(Ipv4Addr),

    /// Neither a prefix length nor a dotted mask.
    #[error("'{0}' is not a subnet mask")]
    Unrecognized(String),
}

/// Converts a prefix length (0..=32) to a dotted mask.
#[must_use]
pub fn prefix_to_mask(prefix: u8) -> Option<Ipv4Addr> {
    match prefix {
        0 => Some(Ipv4Addr::UNSPECIFIED),
        1..=32 => Some(Ipv4Addr::from(u32::MAX << (32 - u32::from(prefix)))),
        _ => None,
    }
}

/// Returns the prefix length of a contiguous mask.
#[must_use]
pub fn mask_to_prefix(mask: Ipv4Addr) -> Option<u8> {
    let bits = u32::from(mask);
    let ones = bits.leading_ones();
    if bits.checked_shl(ones).unwrap_or(0) == 0 {
        u8::try_from(ones).ok()
    } else {
        None
    }
}

/// Normalizes `"24"`, `"/24"` or `"255.255.255.0"` to a dotted mask.
///
/// # Errors
///
/// Returns [`MaskError`] for out-of-range prefixes, non-contiguous
/// masks and anything unparseable.
pub fn normalize_mask(input: &str) -> Result<Ipv4Addr, MaskError> {
    let trimmed = input.trim();
    let bare = trimmed.strip_prefix('/').map_or(trimmed, str::trim);

    if !bare.is_empty() && bare.bytes().all(|b| b.is_ascii_digit()) {
        let prefix: u32 = bare
            .parse()
            .map_err(|_| MaskError::Unrecognized(trimmed.to_string()))?;
        return match u8::try_from(prefix) {
            Ok(p @ 1..=32) => prefix_to_mask(p).ok_or(MaskError::PrefixOutOfRange(prefix)),
            _ => Err(MaskError::PrefixOutOfRange(prefix)),
        };
    }

    let mask: Ipv4Addr = bare
        .parse()
        .map_err(|_| MaskError::Unrecognized(trimmed.to_string()))?;
    match mask_to_prefix(mask) {
        Some(0) | None => Err(MaskError::NonContiguous(mask)),
        Some(_) => Ok(mask),
    }
}

/// Derived facts about the network an address lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct NetworkInfo {
    /// Network address (host bits cleared).
    pub network: Ipv4Addr,
    /// Broadcast address (host bits set).
    pub broadcast: Ipv4Addr,
    /// Mask length in bits.
    pub prefix_len: u8,
    /// First usable host address.
    pub first_host: Ipv4Addr,
    /// Last usable host address.
    pub last_host: Ipv4Addr,
}

impl NetworkInfo {
    /// Number of usable host addresses.
    #[must_use]
    pub fn host_count(&self) -> u32 {
        u32::from(self.last_host) - u32::from(self.first_host) + 1
    }
}

/// Computes network, broadcast and host range for `ip`/`mask`.
///
/// Returns `None` if `mask` is not contiguous. /31 and /32 have no
/// network/broadcast reservation, so every address is a host.
#[must_use]
pub fn network_info(ip: Ipv4Addr, mask: Ipv4Addr) -> Option<NetworkInfo> {
    let prefix_len = mask_to_prefix(mask)?;
    let mask_bits = u32::from(mask);
    let network = u32::from(ip) & mask_bits;
    let broadcast = network | !mask_bits;
    let (first, last) = if prefix_len >= 31 {
        (network, broadcast)
    } else {
        (network + 1, broadcast - 1)
    };

    Some(NetworkInfo {
        network: network.into(),
        broadcast: broadcast.into(),
        prefix_len,
        first_host: first.into(),
        last_host: last.into(),
    })
}

/// Returns true if `candidate` is inside the network of `ip`/`mask`.
#[must_use]
pub fn contains(ip: Ipv4Addr, mask: Ipv4Addr, candidate: Ipv4Addr) -> bool {
    let mask_bits = u32::from(mask);
    u32::from(ip) & mask_bits == u32::from(candidate) & mask_bits
}
