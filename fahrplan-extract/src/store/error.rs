//! Document store error types.

/// Errors that can occur when writing documents.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Filesystem operation failed
    #[error("store IO error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Document could not be serialised
    #[error("failed to serialise document: {0}")]
    Serialize(#[from] serde_json::Error),

    /// Store is unusable (e.g. a poisoned lock)
    #[error("store unavailable: {0}")]
    Unavailable(String),
}
