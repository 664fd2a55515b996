//! Configuration changes applied through the command surface.
//!
//! Every operation is one or two independent external calls with no
//! retry and no rollback. Callers re-aggregate afterwards instead of
//! trusting the write.

use std::net::Ipv4Addr;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use serde::Serialize;

use crate::command::{CommandRunner, Invocation};
use crate::network::normalize_mask;

use super::commands::CommandSet;
use super::error::MutationError;

#[cfg(test)]
#[path = "mutator_tests.rs"]
mod tests;

/// Desired primary configuration of one adapter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigChangeRequest {
    /// Catalog id of the target adapter.
    pub adapter_id: String,
    /// New primary IPv4 address.
    pub address: Ipv4Addr,
    /// Mask as typed: prefix length, `/prefix` or dotted.
    pub mask: String,
    /// Default gateway; `None` leaves the static address without one.
    pub gateway: Option<Ipv4Addr>,
    /// DNS server set with the static replace verb.
    pub primary_dns: Option<Ipv4Addr>,
    /// DNS server added at index 2; ignored without a primary.
    pub secondary_dns: Option<Ipv4Addr>,
}

impl ConfigChangeRequest {
    /// Creates a request without gateway or DNS.
    #[must_use]
    pub fn new(adapter_id: impl Into<String>, address: Ipv4Addr, mask: impl Into<String>) -> Self {
        Self {
            adapter_id: adapter_id.into(),
            address,
            mask: mask.into(),
            gateway: None,
            primary_dns: None,
            secondary_dns: None,
        }
    }

    #[must_use]
    pub const fn with_gateway(mut self, gateway: Option<Ipv4Addr>) -> Self {
        self.gateway = gateway;
        self
    }

    #[must_use]
    pub const fn with_dns(mut self, primary: Option<Ipv4Addr>, secondary: Option<Ipv4Addr>) -> Self {
        self.primary_dns = primary;
        self.secondary_dns = secondary;
        self
    }
}

/// Shared flag that stops a batch before its next item.
///
/// Calls already running are not interrupted.
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Result of one batch item.
#[derive(Debug)]
pub struct ItemResult {
    /// The item as given (`ip/mask` or `ip`).
    pub item: String,
    /// Success, or why this item failed.
    pub result: Result<(), MutationError>,
}

/// Overall classification of a batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum BatchOutcome {
    /// Every item succeeded (also for an empty batch).
    AllSuccess,
    /// Some items failed.
    Partial {
        /// The failed items, in input order.
        failed: Vec<String>,
    },
    /// No item succeeded.
    AllFailure,
}

/// Per-item results of a batch, in input order.
#[derive(Debug, Default)]
pub struct BatchReport {
    /// One entry per input item.
    pub items: Vec<ItemResult>,
}

impl BatchReport {
    /// Classifies the batch.
    #[must_use]
    pub fn outcome(&self) -> BatchOutcome {
        let failed: Vec<String> = self.failures().map(|r| r.item.clone()).collect();
        if failed.is_empty() {
            BatchOutcome::AllSuccess
        } else if failed.len() == self.items.len() {
            BatchOutcome::AllFailure
        } else {
            BatchOutcome::Partial { failed }
        }
    }

    /// Items that failed, in input order.
    pub fn failures(&self) -> impl Iterator<Item = &ItemResult> {
        self.items.iter().filter(|r| r.result.is_err())
    }

    #[must_use]
    pub fn succeeded(&self) -> usize {
        self.items.iter().filter(|r| r.result.is_ok()).count()
    }
}

/// Splits an `ip/mask` batch item; the mask may be a prefix or dotted.
///
/// # Errors
///
/// Returns [`MutationError::InvalidItem`] or [`MutationError::InvalidMask`].
pub fn parse_address_item(item: &str) -> Result<(Ipv4Addr, Ipv4Addr), MutationError> {
    let invalid = |reason: &str| MutationError::InvalidItem {
        item: item.to_string(),
        reason: reason.to_string(),
    };
    let (ip, mask) = item
        .split_once('/')
        .ok_or_else(|| invalid("expected ip/mask"))?;
    let ip = ip
        .trim()
        .parse()
        .map_err(|_| invalid("not an IPv4 address"))?;
    Ok((ip, normalize_mask(mask)?))
}

/// Address part of a removal item (`ip` or `ip/mask`).
fn parse_removal_item(item: &str) -> Result<Ipv4Addr, MutationError> {
    let ip = item.split_once('/').map_or(item, |(ip, _)| ip);
    ip.trim().parse().map_err(|_| MutationError::InvalidItem {
        item: item.to_string(),
        reason: "not an IPv4 address".to_string(),
    })
}

/// Applies configuration changes through a [`CommandRunner`].
#[derive(Debug)]
pub struct ConfigMutator<R> {
    runner: R,
    commands: CommandSet,
}

impl<R: CommandRunner> ConfigMutator<R> {
    pub const fn new(runner: R, commands: CommandSet) -> Self {
        Self { runner, commands }
    }

    /// Sets a static primary address. The mask is normalized to dotted
    /// form before anything runs.
    ///
    /// # Errors
    ///
    /// Returns [`MutationError::InvalidMask`] without running anything,
    /// or the classified failure of the call.
    pub async fn set_static_address(
        &self,
        name: &str,
        ip: Ipv4Addr,
        mask: &str,
        gateway: Option<Ipv4Addr>,
    ) -> Result<(), MutationError> {
        let mask = normalize_mask(mask)?;
        self.exec(self.commands.static_address(name, ip, mask, gateway))
            .await
    }

    /// Replaces the DNS list with `primary`, then adds `secondary`.
    ///
    /// # Errors
    ///
    /// A failed primary call is returned without trying the secondary.
    pub async fn set_dns(
        &self,
        name: &str,
        primary: Ipv4Addr,
        secondary: Option<Ipv4Addr>,
    ) -> Result<(), MutationError> {
        self.exec(self.commands.primary_dns(name, primary)).await?;
        match secondary {
            Some(server) => self.exec(self.commands.secondary_dns(name, server)).await,
            None => Ok(()),
        }
    }

    /// Switches address and DNS to DHCP. Both calls always run.
    ///
    /// # Errors
    ///
    /// Returns the first failure.
    pub async fn set_dhcp(&self, name: &str) -> Result<(), MutationError> {
        let address = self.exec(self.commands.dhcp_address(name)).await;
        let dns = self.exec(self.commands.dhcp_dns(name)).await;
        address.and(dns)
    }

    /// Enables or disables the adapter administratively.
    ///
    /// # Errors
    ///
    /// Returns the classified failure of the call.
    pub async fn set_enabled(&self, name: &str, enabled: bool) -> Result<(), MutationError> {
        self.exec(self.commands.admin_toggle(name, enabled)).await
    }

    /// Adds a secondary address.
    ///
    /// # Errors
    ///
    /// Returns [`MutationError::InvalidMask`] or the call's failure.
    pub async fn add_secondary_ip(
        &self,
        name: &str,
        ip: Ipv4Addr,
        mask: &str,
    ) -> Result<(), MutationError> {
        let mask = normalize_mask(mask)?;
        self.exec(self.commands.add_address(name, ip, mask)).await
    }

    /// Removes an address; no mask is needed.
    ///
    /// # Errors
    ///
    /// Returns the classified failure of the call.
    pub async fn remove_secondary_ip(&self, name: &str, ip: Ipv4Addr) -> Result<(), MutationError> {
        self.exec(self.commands.delete_address(name, ip)).await
    }

    /// Applies a primary configuration: static address, then DNS.
    ///
    /// A failed secondary DNS is only logged.
    ///
    /// # Errors
    ///
    /// Returns the failure of the static address or primary DNS call.
    pub async fn apply(&self, name: &str, request: &ConfigChangeRequest) -> Result<(), MutationError> {
        self.set_static_address(name, request.address, &request.mask, request.gateway)
            .await?;

        let Some(primary) = request.primary_dns else {
            if request.secondary_dns.is_some() {
                tracing::warn!("Secondary DNS ignored for '{name}': no primary DNS given");
            }
            return Ok(());
        };
        self.exec(self.commands.primary_dns(name, primary)).await?;

        if let Some(secondary) = request.secondary_dns {
            if let Err(e) = self.exec(self.commands.secondary_dns(name, secondary)).await {
                tracing::warn!("Secondary DNS {secondary} not set on '{name}': {e}");
            }
        }
        Ok(())
    }

    /// Adds every `ip/mask` item; failures never stop the remaining items.
    pub async fn add_selected(&self, name: &str, items: &[String], cancel: &CancelFlag) -> BatchReport {
        let mut report = BatchReport::default();
        for item in items {
            let result = if cancel.is_cancelled() {
                Err(MutationError::Cancelled)
            } else {
                match parse_address_item(item) {
                    Ok((ip, mask)) => self.add_secondary_ip(name, ip, &mask.to_string()).await,
                    Err(e) => Err(e),
                }
            };
            log_item("add", name, item, &result);
            report.items.push(ItemResult {
                item: item.clone(),
                result,
            });
        }
        report
    }

    /// Removes every item (`ip` or `ip/mask`); failures never stop the
    /// remaining items.
    pub async fn remove_selected(&self, name: &str, items: &[String], cancel: &CancelFlag) -> BatchReport {
        let mut report = BatchReport::default();
        for item in items {
            let result = if cancel.is_cancelled() {
                Err(MutationError::Cancelled)
            } else {
                match parse_removal_item(item) {
                    Ok(ip) => self.remove_secondary_ip(name, ip).await,
                    Err(e) => Err(e),
                }
            };
            log_item("remove", name, item, &result);
            report.items.push(ItemResult {
                item: item.clone(),
                result,
            });
        }
        report
    }

    async fn exec(&self, invocation: Invocation) -> Result<(), MutationError> {
        tracing::debug!("Running {invocation}");
        let output = self.runner.run(&invocation).await?;
        MutationError::check(&invocation.to_string(), &output)
    }
}

fn log_item(action: &str, name: &str, item: &str, result: &Result<(), MutationError>) {
    match result {
        Ok(()) => tracing::info!("{action} {item} on '{name}': ok"),
        Err(MutationError::Cancelled) => tracing::debug!("{action} {item} on '{name}': cancelled"),
        Err(e) => tracing::warn!("{action} {item} on '{name}' failed: {e}"),
    }
}
