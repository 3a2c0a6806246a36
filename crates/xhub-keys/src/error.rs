//! Error types for key decoding.

use thiserror::Error;
use xhub_types::PathError;

/// Errors raised while turning stored bytes back into resource paths.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum KeyError {
    /// The bytes do not match any of the four key shapes.
    #[error("malformed key {key:?}: {reason}")]
    Malformed { key: String, reason: String },

    /// A key segment failed segment-name validation.
    #[error(transparent)]
    Path(#[from] PathError),
}

/// Convenience type alias for key operations.
pub type KeyResult<T> = std::result::Result<T, KeyError>;
