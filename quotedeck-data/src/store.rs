//! Canonical state store: symbol -> latest asset record.
//!
//! Upserts keep "stable position, latest value": a record keeps the position
//! it was first seen at while its value tracks the most recently processed
//! tick. This is what keeps a live table from jittering as values update.

use crate::types::AssetRecord;
use indexmap::IndexMap;
use parking_lot::RwLock;
use smol_str::SmolStr;

/// Thread-safe owner of the canonical symbol -> record mapping.
///
/// The ingestion path is the only writer; all readers receive clones.
#[derive(Debug, Default)]
pub struct StateStore {
    records: RwLock<IndexMap<SmolStr, AssetRecord>>,
}

impl StateStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a record, or replace the existing record with the same symbol.
    ///
    /// Replacement keeps the record's original arrival position.
    pub fn upsert(&self, record: AssetRecord) {
        self.records.write().insert(record.symbol.clone(), record);
    }

    /// Current records in first-seen arrival order.
    pub fn snapshot(&self) -> Vec<AssetRecord> {
        self.records.read().values().cloned().collect()
    }

    /// Latest record for one symbol, if it has been seen.
    pub fn get(&self, symbol: &str) -> Option<AssetRecord> {
        self.records.read().get(symbol).cloned()
    }

    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.read().is_empty()
    }
}
