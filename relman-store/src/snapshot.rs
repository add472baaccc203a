//! Snapshot store: release blobs in a [`Backend`].
//!
//! Only keys carrying the release extension are recognized; anything else in
//! the backend (the state descriptor, stray files) is invisible here.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use tokio::task::JoinSet;

use relman_core::{codec, Release};

use crate::backend::Backend;
use crate::error::StoreError;

#[derive(Clone)]
pub struct SnapshotStore {
    backend: Arc<dyn Backend>,
}

impl std::fmt::Debug for SnapshotStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SnapshotStore")
            .field("location", &self.backend.location())
            .finish()
    }
}

impl SnapshotStore {
    pub fn new(backend: Arc<dyn Backend>) -> Self {
        Self { backend }
    }

    pub fn location(&self) -> String {
        self.backend.location()
    }

    /// Stored release keys, filtered by extension.
    pub fn list_keys(&self) -> Result<BTreeSet<String>, StoreError> {
        Ok(self
            .backend
            .list()?
            .into_iter()
            .filter(|key| codec::is_release_key(key))
            .collect())
    }

    /// Read and decode one named release. Decode failures are returned.
    pub fn read_one(&self, key: &str) -> Result<Release, StoreError> {
        let bytes = self.backend.read(key)?;
        Ok(codec::decode(&bytes)?)
    }

    /// Persist a release under its filename key and return the key.
    pub fn write_one(&self, release: &Release) -> Result<String, StoreError> {
        let key = codec::filename(release);
        let bytes = codec::encode(release)?;
        self.backend.write(&key, &bytes)?;
        tracing::debug!(key = %key, "release written");
        Ok(key)
    }

    pub fn delete_one(&self, key: &str) -> Result<(), StoreError> {
        self.backend.delete(key)?;
        tracing::debug!(key = %key, "release deleted");
        Ok(())
    }

    /// Read every stored release concurrently.
    ///
    /// Failing to list the backend is an error. Individual read or decode
    /// failures are logged and the key is skipped, so the result may be
    /// partial. Releases come back ordered by key.
    pub async fn read_all(&self) -> Result<Vec<Release>, StoreError> {
        let keys = {
            let store = self.clone();
            tokio::task::spawn_blocking(move || store.list_keys())
                .await
                .map_err(|e| StoreError::Join(e.to_string()))??
        };

        let mut tasks = JoinSet::new();
        for key in keys {
            let store = self.clone();
            tasks.spawn_blocking(move || {
                let result = store.read_one(&key);
                (key, result)
            });
        }

        let mut releases = BTreeMap::new();
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((key, Ok(release))) => {
                    releases.insert(key, release);
                }
                Ok((key, Err(err))) => {
                    tracing::warn!(key = %key, error = %err, "skipping unreadable release");
                }
                Err(err) => {
                    tracing::warn!(error = %err, "release read task failed");
                }
            }
        }
        Ok(releases.into_values().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryBackend;

    fn store_with(backend: Arc<MemoryBackend>) -> SnapshotStore {
        SnapshotStore::new(backend)
    }

    #[test]
    fn list_keys_ignores_non_release_files() {
        let backend = Arc::new(MemoryBackend::new());
        backend.write("a-1.release", b"{}").unwrap();
        backend.write("relman-state.json", b"{}").unwrap();
        backend.write("notes.txt", b"").unwrap();
        backend.write(".release", b"").unwrap();

        let keys = store_with(backend).list_keys().unwrap();
        assert_eq!(keys.into_iter().collect::<Vec<_>>(), vec!["a-1.release"]);
    }

    #[test]
    fn write_one_uses_filename_key() {
        let backend = Arc::new(MemoryBackend::new());
        let store = store_with(backend.clone());
        let key = store.write_one(&Release::new("a", "default", 1)).unwrap();
        assert_eq!(key, "a-1.release");
        assert!(backend.contains("a-1.release"));
        assert_eq!(store.read_one(&key).unwrap().name, "a");
    }

    #[test]
    fn read_one_surfaces_decode_error() {
        let backend = Arc::new(MemoryBackend::new());
        backend.write("broken-1.release", b"not json").unwrap();
        let err = store_with(backend).read_one("broken-1.release").unwrap_err();
        assert!(matches!(err, StoreError::Codec(_)));
    }

    #[test]
    fn delete_one_missing_is_not_found() {
        let store = store_with(Arc::new(MemoryBackend::new()));
        assert!(store.delete_one("ghost-1.release").unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn read_all_skips_corrupt_blobs() {
        let backend = Arc::new(MemoryBackend::new());
        let store = store_with(backend.clone());
        store.write_one(&Release::new("b", "default", 2)).unwrap();
        store.write_one(&Release::new("a", "default", 1)).unwrap();
        backend.write("broken-1.release", b"{{{").unwrap();

        let releases = store.read_all().await.unwrap();
        let names: Vec<_> = releases.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["a", "b"]);
    }
}
