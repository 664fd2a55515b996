//! Adapter catalog: the current discovery cycle's records.
//!
//! The record list is only ever replaced wholesale, so readers see either
//! the previous cycle or the new one, never a mix.

use std::sync::{Arc, PoisonError, RwLock};

use crate::network::AdapterRecord;

/// Shared, replace-only list of known adapters in priority order.
#[derive(Debug, Default)]
pub struct AdapterCatalog {
    records: RwLock<Arc<[AdapterRecord]>>,
}

/// Priority group: connected, then other enabled adapters, then disabled.
fn priority(record: &AdapterRecord) -> u8 {
    if record.is_connected() {
        0
    } else if record.enabled {
        1
    } else {
        2
    }
}

impl AdapterCatalog {
    /// Creates an empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the whole catalog, sorting records by priority and then by
    /// display name. Returns the new snapshot.
    pub fn replace(&self, mut records: Vec<AdapterRecord>) -> Arc<[AdapterRecord]> {
        records.sort_by_cached_key(|r| (priority(r), r.display_name.to_lowercase()));
        let snapshot: Arc<[AdapterRecord]> = records.into();
        *self.records.write().unwrap_or_else(PoisonError::into_inner) = Arc::clone(&snapshot);
        snapshot
    }

    /// Removes every record (catalog invalidation).
    pub fn clear(&self) {
        self.replace(Vec::new());
    }

    /// The current records, in priority order.
    #[must_use]
    pub fn snapshot(&self) -> Arc<[AdapterRecord]> {
        Arc::clone(&self.records.read().unwrap_or_else(PoisonError::into_inner))
    }

    /// Looks up a record by exact id.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<AdapterRecord> {
        self.snapshot().iter().find(|r| r.id == id).cloned()
    }

    /// Resolves an id, display name, internal name or description.
    ///
    /// An id match wins over a name match.
    #[must_use]
    pub fn resolve(&self, key: &str) -> Option<AdapterRecord> {
        let records = self.snapshot();
        records
            .iter()
            .find(|r| r.id == key.trim())
            .or_else(|| records.iter().find(|r| r.matches(key)))
            .cloned()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshot().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
