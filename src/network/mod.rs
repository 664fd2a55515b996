//! Network data model and command-output extraction.
//!
//! - [`adapter`]: adapter records and aggregated configuration snapshots
//! - [`mask`]: subnet mask normalization and network calculations
//! - [`status`]: admin/oper state and final adapter status
//! - [`extract`]: pure text extractors, one per command

pub mod adapter;
pub mod extract;
pub mod mask;
pub mod status;

pub use adapter::{AdapterConfig, AdapterRecord, InterfaceClass, Ipv4Binding};
pub use mask::{MaskError, NetworkInfo, normalize_mask};
pub use status::{AdapterStatus, AdminState, OperState};
