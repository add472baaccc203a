//! Delta between live releases and the stored snapshot.

use std::collections::{BTreeSet, HashSet};

use relman_core::{codec, Release};

/// What one reconciliation pass has to do.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReleaseDiff {
    /// Live releases whose filename key is not stored yet.
    pub to_write: Vec<Release>,
    /// Stored keys with no matching live release.
    pub to_delete: Vec<String>,
}

impl ReleaseDiff {
    /// Compute the delta. A changed release yields a new key, so updates show
    /// up as a write of the new key plus a delete of the old one.
    ///
    /// Releases sharing a key are written once (first wins) so the write
    /// batch never touches the same key twice.
    pub fn compute(current: &[Release], stored: &BTreeSet<String>) -> Self {
        let mut live_keys = HashSet::with_capacity(current.len());
        let mut to_write = Vec::new();

        for release in current {
            let key = codec::filename(release);
            if !live_keys.insert(key.clone()) {
                tracing::debug!(key = %key, "duplicate live key; keeping first release");
                continue;
            }
            if !stored.contains(&key) {
                tracing::debug!(key = %key, "release to save");
                to_write.push(release.clone());
            }
        }

        let to_delete: Vec<String> = stored
            .iter()
            .filter(|key| !live_keys.contains(*key))
            .cloned()
            .collect();
        for key in &to_delete {
            tracing::debug!(key = %key, "release to delete");
        }

        Self {
            to_write,
            to_delete,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.to_write.is_empty() && self.to_delete.is_empty()
    }

    /// Keys the write batch will produce.
    pub fn write_keys(&self) -> Vec<String> {
        self.to_write.iter().map(codec::filename).collect()
    }
}

/// Keep releases whose namespace is in `allow`. An empty list keeps all.
///
/// Keys carry no namespace, so a pass over the filtered set deletes stored
/// entries of releases outside the list, including ones still deployed.
pub fn filter_namespaces(releases: Vec<Release>, allow: &[String]) -> Vec<Release> {
    if allow.is_empty() {
        return releases;
    }
    releases
        .into_iter()
        .filter(|r| allow.iter().any(|ns| *ns == r.namespace))
        .collect()
}
