//! Error types for relman-sync.

use thiserror::Error;

use relman_core::SourceError;
use relman_store::StoreError;

/// All errors that can abort an export, replay or clear run.
///
/// Per-release failures never surface here; they are reported in the
/// per-item results instead.
#[derive(Debug, Error)]
pub enum SyncError {
    #[error("storage error: {0}")]
    Store(#[from] StoreError),

    #[error("release source error: {0}")]
    Source(#[from] SourceError),

    /// A state descriptor exists at the path being replayed and no new
    /// storage path was given.
    #[error(
        "existing state {key} found in {location} but no new storage path was specified.\n\
         This can lead to unexpected results and is probably a mistake. \
         If you really wish to continue, use --force"
    )]
    StateConflict { key: String, location: String },

    /// A new storage path was given but the descriptor naming the manager
    /// release cannot be decoded, so there is nothing safe to relocate.
    #[error(
        "existing state {key} in {location} is unreadable ({reason}); \
         cannot relocate the manager release to the new storage path"
    )]
    DescriptorUnreadable {
        key: String,
        location: String,
        reason: String,
    },

    #[error("worker task failed: {0}")]
    Join(String),
}

pub(crate) fn join_err(err: tokio::task::JoinError) -> SyncError {
    SyncError::Join(err.to_string())
}
