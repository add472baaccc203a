//! Manager self-tracking: keeps the state descriptor in step with the
//! manager's own release.

use relman_core::{codec, ManagerInfo, Release};
use relman_store::{StateStore, StoreError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrackOutcome {
    /// No manager release name is configured.
    Disabled,
    /// Descriptor matches what this process last wrote.
    Unchanged,
    Written(ManagerInfo),
    /// The manager release is gone; `existed` says whether a descriptor was
    /// actually deleted.
    Removed { existed: bool },
}

/// Tracks the descriptor across export passes.
///
/// The last written descriptor is cached for the process lifetime and never
/// re-read from the backend. Only the export control loop touches it.
pub struct ManagerTracker {
    release_name: Option<String>,
    state: StateStore,
    last_written: Option<ManagerInfo>,
}

impl ManagerTracker {
    /// `release_name` of `None` or `""` disables tracking.
    pub fn new(release_name: Option<&str>, state: StateStore) -> Self {
        Self {
            release_name: release_name
                .filter(|name| !name.is_empty())
                .map(str::to_string),
            state,
            last_written: None,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.release_name.is_some()
    }

    pub fn last_written(&self) -> Option<&ManagerInfo> {
        self.last_written.as_ref()
    }

    /// Remove a descriptor left behind by a previous process.
    pub fn clear_stale(&mut self) -> Result<bool, StoreError> {
        self.last_written = None;
        if !self.is_enabled() {
            return Ok(false);
        }
        self.state.remove()
    }

    /// Run once per export pass over the current release set.
    pub fn track(&mut self, current: &[Release]) -> Result<TrackOutcome, StoreError> {
        let Some(name) = self.release_name.as_deref() else {
            tracing::debug!("no manager release configured; ignoring state");
            return Ok(TrackOutcome::Disabled);
        };

        let Some(release) = current.iter().find(|r| r.name == name) else {
            tracing::debug!(release = %name, "manager release not found; removing state");
            self.last_written = None;
            let existed = self.state.remove()?;
            return Ok(TrackOutcome::Removed { existed });
        };

        let candidate = ManagerInfo {
            release_filename: codec::filename(release),
            release_name: name.to_string(),
            release_version: release.version,
        };
        if self.last_written.as_ref() == Some(&candidate) {
            return Ok(TrackOutcome::Unchanged);
        }

        self.state.write(&candidate)?;
        self.last_written = Some(candidate.clone());
        Ok(TrackOutcome::Written(candidate))
    }
}
