//! Remove a whole snapshot and its state descriptor.

use relman_core::codec;
use relman_store::{SnapshotStore, StateStore};

use crate::error::SyncError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClearResult {
    Deleted { key: String },
    /// Dry-run. `rendered` is `None` when the blob could not be read.
    WouldDelete {
        key: String,
        rendered: Option<String>,
    },
    Failed { key: String, error: String },
}

#[derive(Debug, Clone, Default)]
pub struct ClearReport {
    pub results: Vec<ClearResult>,
    pub descriptor_removed: bool,
}

/// Delete every stored release, then the descriptor.
///
/// Listing failures abort. Per-key failures are logged and the rest of the
/// keys are still processed. Under dry-run, each release is read and
/// rendered and nothing is deleted.
pub fn clear(
    store: &SnapshotStore,
    state: &StateStore,
    dry_run: bool,
    verbose: bool,
) -> Result<ClearReport, SyncError> {
    let keys = store.list_keys()?;
    let mut report = ClearReport::default();

    for key in keys {
        tracing::debug!(key = %key, "removing release");
        let result = if dry_run {
            let rendered = match store.read_one(&key) {
                Ok(release) => Some(codec::render(&release, verbose)),
                Err(err) => {
                    tracing::error!(key = %key, error = %err, "error retrieving stored release");
                    None
                }
            };
            ClearResult::WouldDelete { key, rendered }
        } else {
            match store.delete_one(&key) {
                Ok(()) => ClearResult::Deleted { key },
                Err(err) => {
                    tracing::error!(key = %key, error = %err, "error removing stored release");
                    ClearResult::Failed {
                        key,
                        error: err.to_string(),
                    }
                }
            }
        };
        report.results.push(result);
    }

    if !dry_run {
        report.descriptor_removed = state.remove()?;
    }
    Ok(report)
}
