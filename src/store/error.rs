use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur when interacting with a backing store
#[derive(Error, Debug)]
pub enum StoreError {
    /// Failed to read or write the store file
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The store file exists but is not a JSON object
    #[error("Malformed store file {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// A value could not be converted to or from JSON
    #[error("Serialization error for key '{key}': {source}")]
    Serialization {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}

impl StoreError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Result type for backing store operations
pub type StoreResult<T> = Result<T, StoreError>;
