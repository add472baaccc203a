//! Error types for relman-store.

use std::path::PathBuf;

use thiserror::Error;

use relman_core::CodecError;

/// All errors that can arise from backend and snapshot operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The key does not exist under the storage root.
    #[error("{key} not found in backend")]
    NotFound { key: String },

    /// An I/O error, with annotated path for context.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Backend-specific failure translated to a uniform error.
    #[error("backend error: {0}")]
    Backend(String),

    #[error("release codec error: {0}")]
    Codec(#[from] CodecError),

    /// Manager state descriptor could not be (de)serialized.
    #[error("state descriptor JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("worker task failed: {0}")]
    Join(String),
}

impl StoreError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound { .. })
    }
}

/// Convenience constructor for [`StoreError::Io`].
pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> StoreError {
    StoreError::Io {
        path: path.into(),
        source,
    }
}
