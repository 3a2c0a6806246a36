//! Error types for the index crate.

/// Errors that can occur during index operations.
#[derive(Debug, thiserror::Error)]
pub enum IndexError {
    /// The partition backing the index failed.
    #[error("store error: {0}")]
    Store(#[from] xhub_store::StoreError),

    /// A recorded creation time could not be parsed.
    #[error("corrupt timestamp for {key}: {reason}")]
    CorruptTimestamp { key: String, reason: String },
}

/// Convenience alias for index results.
pub type IndexResult<T> = Result<T, IndexError>;
