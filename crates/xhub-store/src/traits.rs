use crate::error::StoreResult;

/// A key-value pair as returned by a scan.
pub type Entry = (Vec<u8>, Vec<u8>);

/// Byte-ordered key-value store.
///
/// All implementations must satisfy these invariants:
/// - Keys are compared bytewise (lexicographic, shorter-is-smaller).
/// - Each call is atomic on its own; there is no multi-call transaction.
/// - A `put` that has returned is visible to every later `get` or scan.
/// - The store never interprets keys or values.
/// - All backend errors are propagated, never silently ignored.
pub trait OrderedStore: Send + Sync {
    /// Insert or overwrite the value at `key`.
    fn put(&self, key: &[u8], value: &[u8]) -> StoreResult<()>;

    /// Read the value at `key`.
    ///
    /// Returns `Ok(None)` if the key does not exist.
    fn get(&self, key: &[u8]) -> StoreResult<Option<Vec<u8>>>;

    /// Delete the value at `key`. Returns `true` if the key existed.
    ///
    /// Deleting an absent key is not an error.
    fn delete(&self, key: &[u8]) -> StoreResult<bool>;

    /// All entries whose key starts with `prefix`, in key order.
    ///
    /// Only true byte-prefix matches are returned; an empty prefix returns
    /// every entry.
    fn scan_prefix(&self, prefix: &[u8]) -> StoreResult<Vec<Entry>>;

    /// Delete every key in `keys`, returning how many existed.
    ///
    /// Default implementation calls `delete()` for each key and stops at
    /// the first failure. Keys deleted before the failure stay deleted.
    fn delete_batch(&self, keys: &[Vec<u8>]) -> StoreResult<usize> {
        let mut removed = 0;
        for key in keys {
            if self.delete(key)? {
                removed += 1;
            }
        }
        Ok(removed)
    }
}
