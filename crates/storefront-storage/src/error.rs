use thiserror::Error;

/// Errors raised by the local cache.
#[derive(Error, Debug)]
pub enum StorageError {
    /// SQLite error
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// Record body could not be encoded or decoded
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error (creating the database directory, spawning a worker thread)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The staging context worker is gone
    #[error("Staging context closed: {0}")]
    ContextClosed(String),
}

/// Result type alias using StorageError.
pub type StorageResult<T> = Result<T, StorageError>;
