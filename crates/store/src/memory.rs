//! In-memory key-value store for testing.

use std::collections::BTreeMap;

use parking_lot::RwLock;

use crate::kv::{KvStore, Result, ScanIter};

/// In-memory [`KvStore`] implementation.
///
/// All data is stored in memory and lost when the store is dropped. Scans
/// materialize a snapshot under the read lock, so concurrent writes issued
/// while a snapshot is being consumed never tear it.
#[derive(Default)]
pub struct InMemoryStore {
    entries: RwLock<BTreeMap<Vec<u8>, Vec<u8>>>,
}

impl InMemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of stored entries.
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Returns `true` if the store holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// Removes all entries (for testing).
    pub fn clear(&self) {
        self.entries.write().clear();
    }
}

impl KvStore for InMemoryStore {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>> {
        Ok(self.entries.read().get(key).cloned())
    }

    fn put(&self, key: &[u8], value: &[u8]) -> Result<()> {
        self.entries.write().insert(key.to_vec(), value.to_vec());
        Ok(())
    }

    fn scan(&self) -> Result<ScanIter<'_>> {
        // Copies the map under the lock; a real backend streams its own
        // snapshot iterator instead.
        let snapshot = self.entries.read().clone();
        Ok(Box::new(snapshot.into_iter().map(Ok)))
    }
}
