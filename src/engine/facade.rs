//! Engine facade: discovery, selection and mutations with re-aggregation.
//!
//! State machine:
//!
//! ```text
//! Idle ──discover──▶ Discovering ──▶ Ready(first) ──select──▶ Ready(id)
//!                         │                  │
//!                         └──failure──▶ Idle └──mutation──▶ Mutating ──re-aggregate──▶ Ready(id)
//! ```
//!
//! Operations on the same adapter id are serialized; different ids may
//! overlap. `Mutating` lists every adapter with a mutation in flight and
//! returns to `Ready` when the last one finishes. Selection changes made
//! meanwhile are kept. Every mutation is followed by a fresh aggregation
//! of the adapter, never by a patch of the previous snapshot.

use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex, PoisonError};

use serde::Serialize;
use tokio::sync::{broadcast, watch};

use crate::command::CommandRunner;
use crate::network::{AdapterConfig, AdapterRecord};
use crate::time::{Clock, SystemClock};

use super::aggregator::ConfigAggregator;
use super::catalog::AdapterCatalog;
use super::commands::CommandSet;
use super::error::{EngineError, MutationError};
use super::mutator::{BatchReport, CancelFlag, ConfigChangeRequest, ConfigMutator};

#[cfg(test)]
#[path = "facade_tests.rs"]
mod tests;

const EVENT_CAPACITY: usize = 64;

/// Engine lifecycle state, published through [`AdapterEngine::watch_state`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum EngineState {
    /// No catalog (startup or failed discovery).
    Idle,
    /// Enumeration is running.
    Discovering,
    /// Catalog available; `selected` is the adapter shown to the user.
    Ready {
        /// Selected adapter id
        selected: Option<String>,
    },
    /// Mutations are running.
    Mutating {
        /// Adapter ids with a mutation in flight, in start order
        active: Vec<String>,
        /// Selected adapter id
        selected: Option<String>,
    },
}

impl EngineState {
    /// The selected adapter id, if any.
    #[must_use]
    pub fn selected(&self) -> Option<&str> {
        match self {
            Self::Ready { selected } | Self::Mutating { selected, .. } => selected.as_deref(),
            Self::Idle | Self::Discovering => None,
        }
    }
}

/// Notifications for presentation layers.
#[derive(Debug, Clone)]
pub enum EngineEvent {
    /// Discovery replaced the catalog.
    CatalogReplaced {
        /// Number of adapters in the new catalog
        adapters: usize,
    },
    /// A fresh snapshot was aggregated.
    ConfigResolved(Arc<AdapterConfig>),
    /// A mutation finished (before re-aggregation).
    MutationCompleted {
        /// Target adapter id
        id: String,
        /// Operation name (`apply`, `dhcp`, `add-ip`, ...)
        operation: &'static str,
        /// Whether the mutation (every item, for batches) succeeded
        success: bool,
    },
}

/// A mutation outcome with the adapter's re-aggregated snapshot.
///
/// The outcome is always present once the mutation ran, even when the
/// re-aggregation failed (for example after a rediscovery dropped the
/// adapter).
#[derive(Debug)]
pub struct Applied<T> {
    /// What the mutation reported
    pub outcome: T,
    /// Fresh snapshot of the adapter, or why it could not be resolved
    pub config: Result<Arc<AdapterConfig>, EngineError>,
}

/// Whether a mutation outcome counts as success for events and logs.
trait Outcome {
    fn succeeded(&self) -> bool;
}

impl Outcome for Result<(), MutationError> {
    fn succeeded(&self) -> bool {
        self.is_ok()
    }
}

impl Outcome for BatchReport {
    fn succeeded(&self) -> bool {
        self.failures().next().is_none()
    }
}

/// The adapter engine: catalog, aggregator and mutator behind one API.
pub struct AdapterEngine<R, C = SystemClock> {
    catalog: Arc<AdapterCatalog>,
    aggregator: ConfigAggregator<Arc<R>, C>,
    mutator: ConfigMutator<Arc<R>>,
    locks: Mutex<HashMap<String, Arc<tokio::sync::Mutex<()>>>>,
    state: watch::Sender<EngineState>,
    events: broadcast::Sender<EngineEvent>,
}

impl<R: CommandRunner> AdapterEngine<R, SystemClock> {
    /// Creates an engine in the `Idle` state.
    pub fn new(runner: R, commands: CommandSet) -> Self {
        Self::with_clock(runner, commands, SystemClock)
    }
}

impl<R: CommandRunner, C: Clock> AdapterEngine<R, C> {
    /// Creates an engine with a custom snapshot clock.
    pub fn with_clock(runner: R, commands: CommandSet, clock: C) -> Self {
        let runner = Arc::new(runner);
        let catalog = Arc::new(AdapterCatalog::new());
        Self {
            aggregator: ConfigAggregator::with_clock(
                Arc::clone(&runner),
                commands.clone(),
                Arc::clone(&catalog),
                clock,
            ),
            mutator: ConfigMutator::new(runner, commands),
            catalog,
            locks: Mutex::new(HashMap::new()),
            state: watch::channel(EngineState::Idle).0,
            events: broadcast::channel(EVENT_CAPACITY).0,
        }
    }

    /// Receives engine events from now on.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<EngineEvent> {
        self.events.subscribe()
    }

    /// Watches the engine state.
    #[must_use]
    pub fn watch_state(&self) -> watch::Receiver<EngineState> {
        self.state.subscribe()
    }

    /// The current state.
    #[must_use]
    pub fn state(&self) -> EngineState {
        self.state.borrow().clone()
    }

    /// The current catalog in priority order.
    #[must_use]
    pub fn catalog(&self) -> Arc<[AdapterRecord]> {
        self.catalog.snapshot()
    }

    /// Resolves an id, display name or description against the catalog.
    #[must_use]
    pub fn resolve(&self, key: &str) -> Option<AdapterRecord> {
        self.catalog.resolve(key)
    }

    /// Rebuilds the catalog from enumeration and selects the first adapter.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::DiscoveryFailed`] if enumeration produced no
    /// output; the catalog is then cleared and the engine is `Idle`.
    pub async fn discover(&self) -> Result<Arc<[AdapterRecord]>, EngineError> {
        self.state.send_replace(EngineState::Discovering);

        let Some(records) = self.aggregator.enumerate().await else {
            self.catalog.clear();
            self.state.send_replace(EngineState::Idle);
            return Err(EngineError::DiscoveryFailed {
                reason: "the enumeration source produced no output".to_string(),
            });
        };

        let snapshot = self.catalog.replace(records);
        tracing::info!("Discovered {} adapter(s)", snapshot.len());
        let _ = self.events.send(EngineEvent::CatalogReplaced {
            adapters: snapshot.len(),
        });
        self.state.send_replace(EngineState::Ready {
            selected: snapshot.first().map(|r| r.id.clone()),
        });
        Ok(snapshot)
    }

    /// Selects `id` and aggregates it.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::AdapterNotFound`]; the selection is unchanged.
    pub async fn select(&self, id: &str) -> Result<Arc<AdapterConfig>, EngineError> {
        let config = self.refresh(id).await?;
        self.state.send_modify(|state| match state {
            EngineState::Mutating { selected, .. } => *selected = Some(id.to_string()),
            _ => {
                *state = EngineState::Ready {
                    selected: Some(id.to_string()),
                };
            }
        });
        Ok(config)
    }

    /// Aggregates `id` without changing the selection.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::AdapterNotFound`].
    pub async fn refresh(&self, id: &str) -> Result<Arc<AdapterConfig>, EngineError> {
        let lock = self.lock_for(id);
        let _guard = lock.lock().await;
        self.aggregate(id).await
    }

    /// Applies a static primary configuration, then re-aggregates.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::AdapterNotFound`]; mutation failures are in
    /// the returned outcome.
    pub async fn apply_config(
        &self,
        request: &ConfigChangeRequest,
    ) -> Result<Applied<Result<(), MutationError>>, EngineError> {
        let record = self.record(&request.adapter_id)?;
        Ok(self.mutate(
            &record.id,
            "apply",
            self.mutator.apply(&record.display_name, request),
        )
        .await)
    }

    /// Adds `ip/mask` items as secondary addresses, then re-aggregates.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::AdapterNotFound`].
    pub async fn add_secondary_ips(
        &self,
        id: &str,
        items: &[String],
        cancel: &CancelFlag,
    ) -> Result<Applied<BatchReport>, EngineError> {
        let record = self.record(id)?;
        Ok(self.mutate(
            &record.id,
            "add-ip",
            self.mutator.add_selected(&record.display_name, items, cancel),
        )
        .await)
    }

    /// Removes addresses, then re-aggregates.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::AdapterNotFound`].
    pub async fn remove_secondary_ips(
        &self,
        id: &str,
        items: &[String],
        cancel: &CancelFlag,
    ) -> Result<Applied<BatchReport>, EngineError> {
        let record = self.record(id)?;
        Ok(self.mutate(
            &record.id,
            "remove-ip",
            self.mutator.remove_selected(&record.display_name, items, cancel),
        )
        .await)
    }

    /// Enables or disables the adapter, then re-aggregates.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::AdapterNotFound`].
    pub async fn set_enabled(
        &self,
        id: &str,
        enabled: bool,
    ) -> Result<Applied<Result<(), MutationError>>, EngineError> {
        let record = self.record(id)?;
        let operation = if enabled { "enable" } else { "disable" };
        Ok(self.mutate(
            &record.id,
            operation,
            self.mutator.set_enabled(&record.display_name, enabled),
        )
        .await)
    }

    /// Switches address and DNS to DHCP, then re-aggregates.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::AdapterNotFound`].
    pub async fn set_dhcp(&self, id: &str) -> Result<Applied<Result<(), MutationError>>, EngineError> {
        let record = self.record(id)?;
        Ok(self
            .mutate(&record.id, "dhcp", self.mutator.set_dhcp(&record.display_name))
            .await)
    }

    fn record(&self, id: &str) -> Result<AdapterRecord, EngineError> {
        self.catalog
            .get(id)
            .ok_or_else(|| EngineError::AdapterNotFound { id: id.to_string() })
    }

    fn lock_for(&self, id: &str) -> Arc<tokio::sync::Mutex<()>> {
        let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(locks.entry(id.to_string()).or_default())
    }

    /// Runs `mutation` under the adapter's lock, then re-aggregates.
    async fn mutate<T: Outcome>(
        &self,
        id: &str,
        operation: &'static str,
        mutation: impl Future<Output = T>,
    ) -> Applied<T> {
        let lock = self.lock_for(id);
        let _guard = lock.lock().await;

        self.begin_mutation(id);
        let outcome = mutation.await;
        let success = outcome.succeeded();
        if success {
            tracing::info!("{operation} on {id} completed");
        } else {
            tracing::warn!("{operation} on {id} did not fully succeed");
        }
        let _ = self.events.send(EngineEvent::MutationCompleted {
            id: id.to_string(),
            operation,
            success,
        });

        let config = self.aggregate(id).await;
        if let Err(e) = &config {
            tracing::warn!("{operation} on {id} ran, but the adapter could not be re-read: {e}");
        }
        self.finish_mutation(id);
        Applied { outcome, config }
    }

    /// Adds `id` to the in-flight list, keeping the current selection.
    fn begin_mutation(&self, id: &str) {
        self.state.send_modify(|state| {
            let selected = state.selected().map(str::to_string);
            let mut active = match state {
                EngineState::Mutating { active, .. } => std::mem::take(active),
                _ => Vec::new(),
            };
            active.push(id.to_string());
            *state = EngineState::Mutating { active, selected };
        });
    }

    /// Removes `id` from the in-flight list; `Ready` once it is empty.
    ///
    /// A state replaced meanwhile by discovery is left alone.
    fn finish_mutation(&self, id: &str) {
        self.state.send_modify(|state| {
            let EngineState::Mutating { active, selected } = state else {
                return;
            };
            if let Some(pos) = active.iter().position(|a| a == id) {
                active.remove(pos);
            }
            if active.is_empty() {
                let selected = selected.take();
                *state = EngineState::Ready { selected };
            }
        });
    }

    /// Aggregates and publishes a snapshot; the caller holds the lock.
    async fn aggregate(&self, id: &str) -> Result<Arc<AdapterConfig>, EngineError> {
        let config = Arc::new(self.aggregator.aggregate(id).await?);
        let _ = self.events.send(EngineEvent::ConfigResolved(Arc::clone(&config)));
        Ok(config)
    }
}
