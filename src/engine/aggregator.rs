//! Per-adapter configuration aggregation.
//!
//! Runs the sources in a fixed order, because later steps override or
//! merge into earlier ones:
//!
//! 1. enumeration re-read (fresh status code)
//! 2. IPv4 configuration (seed)
//! 3. full-detail dump (overrides non-empty fields, merges DNS)
//! 4. DNS enhancement (merged in front)
//! 5. link speed, then wireless receive rate for wireless adapters
//! 6. interface state table, with the status code as fallback
//!
//! A source that is missing, times out, exits non-zero or matches nothing
//! only leaves its fields empty.

use std::sync::Arc;

use crate::command::{CommandRunner, Invocation};
use crate::network::adapter::is_wireless;
use crate::network::extract::{
    PartialConfig, dns, enumeration, full_detail, interface_status, ipv4_config, link_speed,
};
use crate::network::{AdapterConfig, AdapterRecord, AdapterStatus, AdminState, InterfaceClass, OperState};
use crate::time::{Clock, SystemClock};

use super::catalog::AdapterCatalog;
use super::commands::CommandSet;
use super::error::EngineError;

#[cfg(test)]
#[path = "aggregator_tests.rs"]
mod tests;

/// Builds [`AdapterConfig`] snapshots from the command sources.
#[derive(Debug)]
pub struct ConfigAggregator<R, C = SystemClock> {
    runner: R,
    commands: CommandSet,
    clock: C,
    catalog: Arc<AdapterCatalog>,
}

impl<R: CommandRunner> ConfigAggregator<R, SystemClock> {
    /// Creates an aggregator stamping snapshots with the system clock.
    pub const fn new(runner: R, commands: CommandSet, catalog: Arc<AdapterCatalog>) -> Self {
        Self::with_clock(runner, commands, catalog, SystemClock)
    }
}

impl<R: CommandRunner, C: Clock> ConfigAggregator<R, C> {
    /// Creates an aggregator with a custom clock (for tests).
    pub const fn with_clock(
        runner: R,
        commands: CommandSet,
        catalog: Arc<AdapterCatalog>,
        clock: C,
    ) -> Self {
        Self {
            runner,
            commands,
            clock,
            catalog,
        }
    }

    /// Runs the enumeration source.
    ///
    /// Returns `None` if the source could not produce any output; an
    /// empty list means it ran but listed no adapters.
    pub async fn enumerate(&self) -> Option<Vec<AdapterRecord>> {
        let text = self.capture("enumeration", self.commands.enumeration()).await?;
        Some(enumeration::parse_adapter_table(&text))
    }

    /// Aggregates the adapter with catalog id `id`.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::AdapterNotFound`] if `id` is not in the
    /// catalog. Source failures never fail the call.
    pub async fn aggregate(&self, id: &str) -> Result<AdapterConfig, EngineError> {
        let cached = self
            .catalog
            .get(id)
            .ok_or_else(|| EngineError::AdapterNotFound { id: id.to_string() })?;
        let record = self.reread(&cached).await.unwrap_or(cached);
        let name = record.display_name.as_str();

        let mut partial = self
            .capture("ipv4 config", self.commands.ipv4_config(name))
            .await
            .map(|text| ipv4_config::parse_ipv4_config(&text))
            .unwrap_or_default();

        if let Some(dump) = self.capture("full detail", self.commands.full_detail()).await {
            let detail = full_detail::parse_full_detail(&dump, name);
            if detail.is_empty() {
                tracing::debug!("No detail block for '{name}'");
            }
            partial.overlay(detail);
        }

        if let Some(text) = self.capture("dns", self.commands.dns(name)).await {
            partial.merge_dns(&dns::parse_dns_servers(&text));
        }

        let link_speed = self.link_speed(&record).await;
        let status = self.status(&record).await;

        Ok(self.assemble(record, partial, link_speed, status))
    }

    fn assemble(
        &self,
        record: AdapterRecord,
        partial: PartialConfig,
        link_speed: Option<String>,
        status: AdapterStatus,
    ) -> AdapterConfig {
        let interface_class = InterfaceClass::classify(&record.description);
        AdapterConfig {
            ipv4: partial.ipv4.unwrap_or_default(),
            ipv6_addresses: partial.ipv6.unwrap_or_default(),
            gateway: partial.gateway,
            dns_servers: partial.dns_servers.unwrap_or_default(),
            dhcp_enabled: partial.dhcp_enabled.unwrap_or(false),
            link_speed,
            interface_class,
            status,
            resolved_at: self.clock.now(),
            record,
        }
    }

    /// Re-reads the enumeration row for `cached`.
    async fn reread(&self, cached: &AdapterRecord) -> Option<AdapterRecord> {
        let fresh = self
            .enumerate()
            .await?
            .into_iter()
            .find(|r| r.id == cached.id);
        if fresh.is_none() {
            tracing::debug!("'{}' missing from enumeration, using cached record", cached.id);
        }
        fresh
    }

    async fn link_speed(&self, record: &AdapterRecord) -> Option<String> {
        let from_table = self
            .capture("link speed", self.commands.link_speed())
            .await
            .and_then(|text| link_speed::parse_speed_table(&text, &record.description));
        if from_table.is_some() {
            return from_table;
        }
        if !is_wireless(&record.display_name, &record.description) {
            tracing::debug!("No link speed for '{}'", record.display_name);
            return None;
        }
        self.capture("wireless", self.commands.wireless())
            .await
            .and_then(|text| link_speed::parse_wireless_rate(&text, &record.display_name))
    }

    async fn status(&self, record: &AdapterRecord) -> AdapterStatus {
        let (admin, oper) = self
            .capture("interface status", self.commands.interface_status())
            .await
            .and_then(|text| interface_status::find_interface_state(&text, &record.display_name))
            .unwrap_or_else(|| {
                tracing::debug!(
                    "'{}' not in interface table, falling back to status code {}",
                    record.display_name,
                    record.status_code
                );
                (AdminState::Unknown, OperState::Unknown)
            });
        AdapterStatus::resolve(admin, oper, &record.status_code)
    }

    /// Runs one query source; any failure means "no output".
    async fn capture(&self, source: &str, invocation: Invocation) -> Option<String> {
        tracing::debug!("Running {invocation}");
        match self.runner.run(&invocation).await {
            Ok(output) if output.timed_out => {
                tracing::warn!(
                    "{source} source timed out after {}s",
                    invocation.timeout.as_secs()
                );
                None
            }
            Ok(output) if output.is_success() => Some(output.stdout),
            Ok(output) => {
                tracing::debug!(
                    "{source} source exited with {:?}: {}",
                    output.exit_code,
                    output.combined_text().trim()
                );
                None
            }
            Err(e) => {
                tracing::warn!("{source} source unavailable: {e}");
                None
            }
        }
    }
}
