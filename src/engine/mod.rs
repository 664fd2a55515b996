//! Adapter state resolution and configuration engine.
//!
//! - [`AdapterCatalog`]: replace-only list of discovered adapters
//! - [`ConfigAggregator`]: merges the query sources into one snapshot
//! - [`ConfigMutator`]: applies changes, single and batched
//! - [`AdapterEngine`]: the facade with its state machine and events
//! - [`CommandSet`] / [`Timeouts`]: the concrete command surface

mod aggregator;
mod catalog;
mod commands;
mod error;
mod facade;
mod mutator;

#[cfg(test)]
mod testing;

pub use aggregator::ConfigAggregator;
pub use catalog::AdapterCatalog;
pub use commands::{CommandSet, Timeouts};
pub use error::{EngineError, MutationError};
pub use facade::{AdapterEngine, Applied, EngineEvent, EngineState};
pub use mutator::{
    BatchOutcome, BatchReport, CancelFlag, ConfigChangeRequest, ConfigMutator, ItemResult,
    parse_address_item,
};
