//! Error types for resource operations.

use thiserror::Error;
use xhub_keys::KeyError;
use xhub_types::PathError;

/// A stored key that could not be turned back into a collection item.
#[derive(Debug, Error)]
pub enum AssemblyError {
    /// The key does not decode to a valid resource path.
    #[error("undecodable key {key:?}: {source}")]
    Undecodable {
        key: String,
        #[source]
        source: KeyError,
    },

    /// The key decodes, but to a resource outside the listed collection.
    #[error("key {key:?} is not a member of {scope}")]
    OutOfScope { key: String, scope: String },
}

/// Errors that can occur during resource operations.
///
/// An absent resource is not an error: `get` returns `Ok(None)`.
#[derive(Debug, Error)]
pub enum ResourceError {
    /// A path segment is empty or contains the delimiter.
    #[error("invalid path: {0}")]
    InvalidPath(#[from] PathError),

    /// A client-supplied identifier does not name a member of the target
    /// collection.
    #[error("invalid identifier {id:?}: {reason}")]
    InvalidIdentifier { id: String, reason: String },

    /// The payload store failed.
    #[error("storage failure: {0}")]
    Storage(#[from] xhub_store::StoreError),

    /// The study index failed.
    #[error("index failure: {0}")]
    Index(#[from] xhub_index::IndexError),

    /// The index and the payload store disagree.
    #[error("data inconsistency at {key}: {reason}")]
    DataInconsistency { key: String, reason: String },

    /// A list result could not be formatted.
    #[error("assembly error: {0}")]
    Assembly(#[from] AssemblyError),
}

impl ResourceError {
    /// Returns `true` if the caller sent bad input, as opposed to the store
    /// failing.
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::InvalidPath(_) | Self::InvalidIdentifier { .. })
    }
}

impl From<KeyError> for ResourceError {
    fn from(err: KeyError) -> Self {
        match err {
            KeyError::Path(path) => Self::InvalidPath(path),
            KeyError::Malformed { key, reason } => Self::InvalidIdentifier { id: key, reason },
        }
    }
}

/// Convenience alias for resource results.
pub type ResourceResult<T> = Result<T, ResourceError>;
