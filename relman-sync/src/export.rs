//! Export pass: snapshot the live release set into storage.

use std::sync::Arc;

use tokio::task::JoinSet;

use relman_core::{codec, Config, Release, ReleaseSource};
use relman_store::{Backend, SnapshotStore, StateStore};

use crate::diff::{filter_namespaces, ReleaseDiff};
use crate::error::{join_err, SyncError};
use crate::tracker::{ManagerTracker, TrackOutcome};

/// Result of a single export action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionResult {
    Written { key: String },
    Deleted { key: String },
    /// Dry-run: the release would have been stored. Carries its rendering.
    WouldWrite { key: String, rendered: String },
    WouldDelete { key: String },
    Failed { key: String, error: String },
}

impl ActionResult {
    pub fn key(&self) -> &str {
        match self {
            ActionResult::Written { key }
            | ActionResult::Deleted { key }
            | ActionResult::WouldWrite { key, .. }
            | ActionResult::WouldDelete { key }
            | ActionResult::Failed { key, .. } => key,
        }
    }
}

/// Outcome of one export pass.
#[derive(Debug, Clone, Default)]
pub struct ExportSummary {
    pub actions: Vec<ActionResult>,
    /// `None` under dry-run, where the descriptor is left alone.
    pub tracker: Option<TrackOutcome>,
}

impl ExportSummary {
    pub fn written(&self) -> usize {
        self.count(|a| matches!(a, ActionResult::Written { .. }))
    }

    pub fn deleted(&self) -> usize {
        self.count(|a| matches!(a, ActionResult::Deleted { .. }))
    }

    pub fn failed(&self) -> usize {
        self.count(|a| matches!(a, ActionResult::Failed { .. }))
    }

    pub fn is_noop(&self) -> bool {
        self.actions.is_empty()
    }

    fn count(&self, pred: impl Fn(&ActionResult) -> bool) -> usize {
        self.actions.iter().filter(|a| pred(a)).count()
    }
}

// ---------------------------------------------------------------------------
// Exporter
// ---------------------------------------------------------------------------

/// Drives export passes. Holds the descriptor cache, so one instance should
/// live for the whole process.
pub struct Exporter {
    config: Arc<Config>,
    source: Arc<dyn ReleaseSource>,
    store: SnapshotStore,
    tracker: ManagerTracker,
}

impl Exporter {
    pub fn new(
        config: Arc<Config>,
        source: Arc<dyn ReleaseSource>,
        backend: Arc<dyn Backend>,
    ) -> Self {
        let tracker = ManagerTracker::new(
            config.export.manager_release(),
            StateStore::new(backend.clone()),
        );
        Self {
            config,
            source,
            store: SnapshotStore::new(backend),
            tracker,
        }
    }

    pub fn store(&self) -> &SnapshotStore {
        &self.store
    }

    pub fn tracker(&self) -> &ManagerTracker {
        &self.tracker
    }

    /// Drop a descriptor left by an earlier process before the first pass.
    /// Failures are logged only. Does nothing under dry-run.
    pub fn prepare(&mut self) {
        if self.config.dry_run || !self.tracker.is_enabled() {
            return;
        }
        tracing::info!(location = %self.store.location(), "cleaning old manager state");
        if let Err(err) = self.tracker.clear_stale() {
            tracing::warn!(error = %err, "error cleaning up old manager state");
        }
    }

    /// Run one reconciliation pass.
    ///
    /// Failing to list the live or stored set aborts the pass. Individual
    /// write and delete failures are reported in the summary.
    pub async fn run_once(&mut self) -> Result<ExportSummary, SyncError> {
        let current = self.current_releases().await?;

        let stored = {
            let store = self.store.clone();
            tokio::task::spawn_blocking(move || store.list_keys())
                .await
                .map_err(join_err)??
        };
        for key in &stored {
            tracing::debug!(key = %key, "found stored release");
        }

        let diff = ReleaseDiff::compute(&current, &stored);

        let summary = if self.config.dry_run {
            ExportSummary {
                actions: plan(&diff, self.config.verbose),
                tracker: None,
            }
        } else {
            let tracker = match self.tracker.track(&current) {
                Ok(outcome) => Some(outcome),
                Err(err) => {
                    tracing::warn!(error = %err, "manager state update failed");
                    None
                }
            };
            ExportSummary {
                actions: apply(&self.store, diff).await,
                tracker,
            }
        };

        tracing::info!(
            written = summary.written(),
            deleted = summary.deleted(),
            failed = summary.failed(),
            "export pass finished"
        );
        Ok(summary)
    }

    async fn current_releases(&self) -> Result<Vec<Release>, SyncError> {
        tracing::debug!("finding installed releases");
        let source = self.source.clone();
        let releases = tokio::task::spawn_blocking(move || source.list_installed())
            .await
            .map_err(join_err)??;

        let releases = filter_namespaces(releases, &self.config.export.namespaces);
        for r in &releases {
            tracing::debug!(key = %codec::filename(r), "found installed release");
        }
        Ok(releases)
    }
}

/// Dry-run strategy: describe the delta without touching the backend.
fn plan(diff: &ReleaseDiff, verbose: bool) -> Vec<ActionResult> {
    let writes = diff.to_write.iter().map(|r| ActionResult::WouldWrite {
        key: codec::filename(r),
        rendered: codec::render(r, verbose),
    });
    let deletes = diff
        .to_delete
        .iter()
        .map(|key| ActionResult::WouldDelete { key: key.clone() });
    writes.chain(deletes).collect()
}

/// Apply strategy: the write and delete batches run concurrently, and every
/// item within a batch is its own task.
async fn apply(store: &SnapshotStore, diff: ReleaseDiff) -> Vec<ActionResult> {
    let (mut written, deleted) = tokio::join!(
        write_batch(store, diff.to_write),
        delete_batch(store, diff.to_delete)
    );
    written.extend(deleted);
    written
}

async fn write_batch(store: &SnapshotStore, releases: Vec<Release>) -> Vec<ActionResult> {
    let mut tasks = JoinSet::new();
    for release in releases {
        let store = store.clone();
        tasks.spawn_blocking(move || {
            let key = codec::filename(&release);
            match store.write_one(&release) {
                Ok(key) => ActionResult::Written { key },
                Err(err) => {
                    tracing::warn!(key = %key, error = %err, "failed to store release");
                    ActionResult::Failed {
                        key,
                        error: err.to_string(),
                    }
                }
            }
        });
    }
    join_all(tasks).await
}

async fn delete_batch(store: &SnapshotStore, keys: Vec<String>) -> Vec<ActionResult> {
    let mut tasks = JoinSet::new();
    for key in keys {
        let store = store.clone();
        tasks.spawn_blocking(move || match store.delete_one(&key) {
            Ok(()) => ActionResult::Deleted { key },
            Err(err) => {
                tracing::warn!(key = %key, error = %err, "failed to delete stored release");
                ActionResult::Failed {
                    key,
                    error: err.to_string(),
                }
            }
        });
    }
    join_all(tasks).await
}

async fn join_all(mut tasks: JoinSet<ActionResult>) -> Vec<ActionResult> {
    let mut results = Vec::with_capacity(tasks.len());
    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok(result) => results.push(result),
            Err(err) => tracing::warn!(error = %err, "export task failed"),
        }
    }
    results.sort_by(|a, b| a.key().cmp(b.key()));
    results
}
