//! The [`ResourceStore`]: create, get, list, and delete for every kind.
//!
//! One generic table serves all four path shapes. What differs per kind is
//! captured by two small decisions:
//!
//! - **Listing**: studies are listed from the [`ResourceIndex`]; trials and
//!   files are listed by a live prefix scan of their scope.
//! - **Cascade**: deleting a study or trial first removes everything under
//!   its [`KeyCodec::descendant_prefixes`], then the resource itself, then
//!   (for studies) its index entry.
//!
//! Cascades are not transactional. A failure part-way leaves the already
//! deleted children deleted and the parent intact, and is reported as a
//! storage failure. A child created concurrently with a cascade may survive
//! it.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};
use xhub_index::ResourceIndex;
use xhub_keys::{KeyCodec, KeyPrefix, StoredKey};
use xhub_store::{InMemoryOrderedStore, OrderedStore};
use xhub_types::{ResourceKind, ResourcePath, Scope, SegmentName, DELIMITER};

use crate::clock::{Clock, SystemClock};
use crate::collection::{Collection, CollectionAssembler, RawItem};
use crate::error::{ResourceError, ResourceResult};

/// A persisted resource as returned by [`ResourceStore::get`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Resource {
    pub path: ResourcePath,
    pub key: StoredKey,
    /// The payload exactly as it was stored.
    pub data: Vec<u8>,
    /// Recorded creation time (studies only).
    pub created: Option<DateTime<Utc>>,
}

/// Outcome of a delete.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DeleteReport {
    /// Whether the resource itself existed.
    pub existed: bool,
    /// How many descendants were removed by the cascade.
    pub descendants_removed: usize,
}

/// How the members of a scope are enumerated.
enum Listing {
    Index,
    Scan(KeyPrefix),
}

/// Path-addressed resource store over an ordered key-value substrate.
///
/// Holds no mutable state of its own: every operation goes straight to the
/// payload partition and the study index, so one instance can be shared
/// across request handlers.
pub struct ResourceStore {
    payloads: Arc<dyn OrderedStore>,
    index: ResourceIndex,
    codec: KeyCodec,
    assembler: CollectionAssembler,
    clock: Arc<dyn Clock>,
    base_url: String,
}

impl std::fmt::Debug for ResourceStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResourceStore")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl ResourceStore {
    /// Create a store over a payload partition and a separate index
    /// partition.
    pub fn new(payloads: Arc<dyn OrderedStore>, index: Arc<dyn OrderedStore>) -> Self {
        let codec = KeyCodec::new();
        Self {
            payloads,
            index: ResourceIndex::new(index),
            codec,
            assembler: CollectionAssembler::new(codec),
            clock: Arc::new(SystemClock),
            base_url: String::new(),
        }
    }

    /// A store backed by two fresh in-memory partitions.
    pub fn in_memory() -> Self {
        Self::new(
            Arc::new(InMemoryOrderedStore::new()),
            Arc::new(InMemoryOrderedStore::new()),
        )
    }

    /// Use `clock` for study creation times.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Prefix list item URLs with `base_url` (e.g. `http://localhost:8081`).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn codec(&self) -> &KeyCodec {
        &self.codec
    }

    /// Resolve a client-supplied identifier to a member of `scope`.
    ///
    /// `id` is either a bare segment name (`"study_a"`) or a canonical key
    /// (`"/studies/study_a"`). A canonical key must name a member of
    /// `scope`; the scope itself always comes from the caller.
    pub fn resolve(&self, scope: &Scope, id: &str) -> ResourceResult<ResourcePath> {
        if !id.starts_with(DELIMITER) {
            return Ok(scope.child(SegmentName::new(id)?));
        }
        let path = self.codec.decode(id.as_bytes())?;
        if path.scope() != *scope {
            return Err(ResourceError::InvalidIdentifier {
                id: id.to_string(),
                reason: format!("not a member of {}", self.codec.prefix_for(scope)),
            });
        }
        Ok(path)
    }

    // ---------------------------------------------------------------
    // Create
    // ---------------------------------------------------------------

    /// Store `payload` at `path`, replacing whatever was there.
    ///
    /// Creating a study also records it in the index with the current
    /// time; re-creating an existing study refreshes that time.
    pub fn create(&self, path: &ResourcePath, payload: &[u8]) -> ResourceResult<StoredKey> {
        let key = self.codec.encode(path);
        if path.kind() == ResourceKind::Study {
            self.index.record(key.as_bytes(), self.clock.now())?;
        }
        self.payloads.put(key.as_bytes(), payload)?;
        debug!(key = %key, bytes = payload.len(), "resource created");
        Ok(key)
    }

    // ---------------------------------------------------------------
    // Get
    // ---------------------------------------------------------------

    /// Fetch the resource at `path`, or `None` if it does not exist.
    pub fn get(&self, path: &ResourcePath) -> ResourceResult<Option<Resource>> {
        let key = self.codec.encode(path);
        let Some(data) = self.payloads.get(key.as_bytes())? else {
            debug!(key = %key, "resource not found");
            return Ok(None);
        };
        let created = if path.kind() == ResourceKind::Study {
            let created = self.index.created_at(key.as_bytes())?;
            if created.is_none() {
                warn!(key = %key, "study payload present without index entry");
            }
            created
        } else {
            None
        };
        Ok(Some(Resource {
            path: path.clone(),
            key,
            data,
            created,
        }))
    }

    // ---------------------------------------------------------------
    // List
    // ---------------------------------------------------------------

    /// All members of `scope`, in key order.
    ///
    /// An empty scope yields an empty collection, not an error.
    pub fn list(&self, scope: &Scope) -> ResourceResult<Collection> {
        let entries = match self.listing(scope) {
            Listing::Index => self.indexed_entries()?,
            Listing::Scan(prefix) => self
                .payloads
                .scan_prefix(prefix.as_bytes())?
                .into_iter()
                .map(|(key, value)| RawItem::new(key, value))
                .collect(),
        };
        let collection = self.assembler.assemble(&self.base_url, scope, entries)?;
        debug!(scope = %self.codec.prefix_for(scope), count = collection.len(), "listed");
        Ok(collection)
    }

    fn listing(&self, scope: &Scope) -> Listing {
        match scope {
            Scope::Studies => Listing::Index,
            other => Listing::Scan(self.codec.prefix_for(other)),
        }
    }

    fn indexed_entries(&self) -> ResourceResult<Vec<RawItem>> {
        let mut entries = Vec::new();
        for entry in self.index.items()? {
            let Some(value) = self.payloads.get(&entry.key)? else {
                let key = String::from_utf8_lossy(&entry.key).into_owned();
                warn!(key = %key, "indexed study has no payload");
                return Err(ResourceError::DataInconsistency {
                    key,
                    reason: "indexed study has no stored payload".into(),
                });
            };
            entries.push(RawItem {
                key: entry.key,
                value,
                created: Some(entry.created),
            });
        }
        Ok(entries)
    }

    // ---------------------------------------------------------------
    // Delete
    // ---------------------------------------------------------------

    /// Delete the resource at `path` and, for studies and trials, all of
    /// its descendants.
    ///
    /// Deleting an absent resource succeeds. Children are removed before
    /// the resource itself and before its index entry, so an interrupted
    /// cascade leaves the parent visible.
    pub fn delete(&self, path: &ResourcePath) -> ResourceResult<DeleteReport> {
        let key = self.codec.encode(path);

        let mut descendants_removed = 0;
        for prefix in self.codec.descendant_prefixes(path) {
            descendants_removed += self.delete_under(&key, &prefix, descendants_removed)?;
        }

        let existed = self.payloads.delete(key.as_bytes())?;
        if path.kind() == ResourceKind::Study {
            self.index.remove(key.as_bytes())?;
        }

        if descendants_removed > 0 {
            info!(key = %key, descendants_removed, "cascade delete complete");
        } else {
            debug!(key = %key, existed, "resource deleted");
        }
        Ok(DeleteReport {
            existed,
            descendants_removed,
        })
    }

    /// Delete every entry under `prefix` in one batch, returning how many
    /// were removed.
    fn delete_under(
        &self,
        parent: &StoredKey,
        prefix: &KeyPrefix,
        already_removed: usize,
    ) -> ResourceResult<usize> {
        let children: Vec<Vec<u8>> = self
            .payloads
            .scan_prefix(prefix.as_bytes())?
            .into_iter()
            .map(|(child, _)| child)
            .collect();
        self.payloads.delete_batch(&children).map_err(|err| {
            warn!(
                key = %parent,
                prefix = %prefix,
                batch = children.len(),
                already_removed,
                error = %err,
                "cascade delete interrupted; removed children are not restored"
            );
            ResourceError::from(err)
        })
    }
}
