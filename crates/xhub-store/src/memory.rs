use std::collections::BTreeMap;
use std::sync::RwLock;

use crate::error::{StoreError, StoreResult};
use crate::traits::{Entry, OrderedStore};

/// In-memory, BTreeMap-based ordered store.
///
/// Intended for tests and embedding. Entries are held behind a `RwLock` for
/// safe concurrent access and are cloned on read/write.
pub struct InMemoryOrderedStore {
    entries: RwLock<BTreeMap<Vec<u8>, Vec<u8>>>,
}

impl InMemoryOrderedStore {
    /// Create a new empty in-memory store.
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(BTreeMap::new()),
        }
    }

    /// Number of entries currently stored.
    pub fn len(&self) -> StoreResult<usize> {
        Ok(self.read_map()?.len())
    }

    /// Returns `true` if the store is empty.
    pub fn is_empty(&self) -> StoreResult<bool> {
        Ok(self.read_map()?.is_empty())
    }

    fn read_map(
        &self,
    ) -> StoreResult<std::sync::RwLockReadGuard<'_, BTreeMap<Vec<u8>, Vec<u8>>>> {
        self.entries
            .read()
            .map_err(|e| StoreError::LockPoisoned(e.to_string()))
    }

    fn write_map(
        &self,
    ) -> StoreResult<std::sync::RwLockWriteGuard<'_, BTreeMap<Vec<u8>, Vec<u8>>>> {
        self.entries
            .write()
            .map_err(|e| StoreError::LockPoisoned(e.to_string()))
    }
}

impl Default for InMemoryOrderedStore {
    fn default() -> Self {
        Self::new()
    }
}

impl OrderedStore for InMemoryOrderedStore {
    fn put(&self, key: &[u8], value: &[u8]) -> StoreResult<()> {
        self.write_map()?.insert(key.to_vec(), value.to_vec());
        Ok(())
    }

    fn get(&self, key: &[u8]) -> StoreResult<Option<Vec<u8>>> {
        Ok(self.read_map()?.get(key).cloned())
    }

    fn delete(&self, key: &[u8]) -> StoreResult<bool> {
        Ok(self.write_map()?.remove(key).is_some())
    }

    fn scan_prefix(&self, prefix: &[u8]) -> StoreResult<Vec<Entry>> {
        let map = self.read_map()?;
        // Keys sharing a prefix are contiguous in a BTreeMap: start at the
        // prefix and stop at the first key outside it.
        Ok(map
            .range(prefix.to_vec()..)
            .take_while(|(k, _)| k.starts_with(prefix))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect())
    }
}

impl std::fmt::Debug for InMemoryOrderedStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let count = self.entries.read().map(|m| m.len()).unwrap_or(0);
        f.debug_struct("InMemoryOrderedStore")
            .field("entry_count", &count)
            .finish()
    }
}
