/// Errors from ordered store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The SQLite engine rejected or failed an operation.
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// I/O error while preparing the storage location.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A lock guarding the backend was poisoned by a panicking writer.
    #[error("lock poisoned: {0}")]
    LockPoisoned(String),

    /// Partition names become table names and must be plain identifiers.
    #[error("invalid partition name: {0:?}")]
    InvalidPartition(String),
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
