//! Error types for path construction.

use thiserror::Error;

/// Errors that can occur while building resource paths.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum PathError {
    /// A segment name is empty or contains forbidden material.
    #[error("invalid path segment {segment:?}: {reason}")]
    InvalidPathSegment { segment: String, reason: String },

    /// A resource kind label did not match any known kind.
    #[error("unknown resource kind: {0}")]
    UnknownKind(String),
}

/// Convenience type alias for path operations.
pub type PathResult<T> = std::result::Result<T, PathError>;
