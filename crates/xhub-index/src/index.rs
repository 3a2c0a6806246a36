//! The [`ResourceIndex`] structure.
//!
//! Each entry maps a top-level resource key to its recorded creation time,
//! stored as RFC 3339 text with nanosecond precision. Entries come back in
//! key order because the index is itself an ordered partition.

use std::sync::Arc;

use chrono::{DateTime, SecondsFormat, Utc};
use tracing::debug;
use xhub_store::OrderedStore;

use crate::error::{IndexError, IndexResult};

/// A recorded top-level key and its creation time.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IndexEntry {
    /// The stored key of the indexed resource.
    pub key: Vec<u8>,
    /// When the resource was (last) created.
    pub created: DateTime<Utc>,
}

/// Ordered registry of top-level resources.
pub struct ResourceIndex {
    store: Arc<dyn OrderedStore>,
}

impl std::fmt::Debug for ResourceIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResourceIndex").finish_non_exhaustive()
    }
}

impl ResourceIndex {
    /// Create an index over a dedicated partition.
    ///
    /// The partition must not be shared with payload data: every entry in
    /// it is read back as an index record.
    pub fn new(store: Arc<dyn OrderedStore>) -> Self {
        Self { store }
    }

    /// Record `key` as created at `at`.
    ///
    /// Recording an existing key does not add a second entry; it refreshes
    /// the recorded time.
    pub fn record(&self, key: &[u8], at: DateTime<Utc>) -> IndexResult<()> {
        let stamp = encode_timestamp(at);
        self.store.put(key, stamp.as_bytes())?;
        debug!(key = %String::from_utf8_lossy(key), created = %stamp, "index recorded");
        Ok(())
    }

    /// All recorded entries in key order.
    pub fn items(&self) -> IndexResult<Vec<IndexEntry>> {
        self.store
            .scan_prefix(b"")?
            .into_iter()
            .map(|(key, value)| {
                let created = decode_timestamp(&key, &value)?;
                Ok(IndexEntry { key, created })
            })
            .collect()
    }

    /// The recorded creation time of `key`, if it is indexed.
    pub fn created_at(&self, key: &[u8]) -> IndexResult<Option<DateTime<Utc>>> {
        self.store
            .get(key)?
            .map(|value| decode_timestamp(key, &value))
            .transpose()
    }

    /// Remove `key` from the index. Returns `true` if it was present.
    pub fn remove(&self, key: &[u8]) -> IndexResult<bool> {
        let removed = self.store.delete(key)?;
        debug!(key = %String::from_utf8_lossy(key), removed, "index removed");
        Ok(removed)
    }
}

fn encode_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Nanos, true)
}

fn decode_timestamp(key: &[u8], value: &[u8]) -> IndexResult<DateTime<Utc>> {
    let corrupt = |reason: String| IndexError::CorruptTimestamp {
        key: String::from_utf8_lossy(key).into_owned(),
        reason,
    };
    let text = std::str::from_utf8(value).map_err(|e| corrupt(e.to_string()))?;
    DateTime::parse_from_rfc3339(text)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| corrupt(e.to_string()))
}
