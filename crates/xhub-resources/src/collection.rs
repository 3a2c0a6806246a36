//! Turning raw scan results into list-response items.
//!
//! [`CollectionAssembler`] is pure: it decodes each stored key back into a
//! [`ResourcePath`], checks it belongs to the listed scope, and annotates it
//! with its URL. Input order is preserved, so callers feed it entries in
//! key order.

use chrono::{DateTime, Utc};
use xhub_keys::KeyCodec;
use xhub_types::{ResourceKind, ResourcePath, Scope};

use crate::error::AssemblyError;

/// Version tag carried by every list item.
pub const API_VERSION: &str = "1";

/// One stored entry awaiting assembly.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RawItem {
    pub key: Vec<u8>,
    pub value: Vec<u8>,
    /// Recorded creation time (studies only).
    pub created: Option<DateTime<Utc>>,
}

impl RawItem {
    /// An entry with no recorded creation time.
    pub fn new(key: Vec<u8>, value: Vec<u8>) -> Self {
        Self {
            key,
            value,
            created: None,
        }
    }
}

/// A resource as it appears in a list response.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CollectionItem {
    pub version: &'static str,
    pub kind: ResourceKind,
    pub path: ResourcePath,
    /// The stored key, which is also the resource's canonical identifier.
    pub id: String,
    pub url: String,
    /// The payload exactly as it was stored.
    pub data: Vec<u8>,
    pub created: Option<DateTime<Utc>>,
}

/// An ordered, request-scoped list of resources sharing a parent.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Collection {
    pub items: Vec<CollectionItem>,
}

impl Collection {
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// The ids of all items, in order.
    pub fn ids(&self) -> Vec<&str> {
        self.items.iter().map(|item| item.id.as_str()).collect()
    }
}

impl IntoIterator for Collection {
    type Item = CollectionItem;
    type IntoIter = std::vec::IntoIter<CollectionItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

/// Builds [`Collection`]s from raw `(key, value)` entries.
#[derive(Clone, Copy, Debug, Default)]
pub struct CollectionAssembler {
    codec: KeyCodec,
}

impl CollectionAssembler {
    pub fn new(codec: KeyCodec) -> Self {
        Self { codec }
    }

    /// Assemble `entries`, all members of `scope`, into a collection whose
    /// item URLs are `base_url` followed by the key.
    pub fn assemble(
        &self,
        base_url: &str,
        scope: &Scope,
        entries: impl IntoIterator<Item = RawItem>,
    ) -> Result<Collection, AssemblyError> {
        let base = base_url.trim_end_matches('/');
        let items = entries
            .into_iter()
            .map(|entry| {
                let id = String::from_utf8_lossy(&entry.key).into_owned();
                let path =
                    self.codec
                        .decode(&entry.key)
                        .map_err(|source| AssemblyError::Undecodable {
                            key: id.clone(),
                            source,
                        })?;
                if path.scope() != *scope {
                    return Err(AssemblyError::OutOfScope {
                        key: id,
                        scope: self.codec.prefix_for(scope).to_string(),
                    });
                }
                Ok(CollectionItem {
                    version: API_VERSION,
                    kind: path.kind(),
                    url: format!("{base}{id}"),
                    id,
                    path,
                    data: entry.value,
                    created: entry.created,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Collection { items })
    }
}
