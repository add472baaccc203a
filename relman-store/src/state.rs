//! Manager state descriptor persistence.
//!
//! At most one descriptor exists per storage root, under [`STATE_KEY`].

use std::sync::Arc;

use relman_core::ManagerInfo;

use crate::backend::Backend;
use crate::error::StoreError;

/// Well-known backend key of the descriptor.
pub const STATE_KEY: &str = "relman-state.json";

#[derive(Clone)]
pub struct StateStore {
    backend: Arc<dyn Backend>,
}

impl StateStore {
    pub fn new(backend: Arc<dyn Backend>) -> Self {
        Self { backend }
    }

    /// Whether a descriptor blob is present, decodable or not.
    pub fn exists(&self) -> Result<bool, StoreError> {
        match self.backend.read(STATE_KEY) {
            Ok(_) => Ok(true),
            Err(err) if err.is_not_found() => Ok(false),
            Err(err) => Err(err),
        }
    }

    pub fn read(&self) -> Result<Option<ManagerInfo>, StoreError> {
        match self.backend.read(STATE_KEY) {
            Ok(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            Err(err) if err.is_not_found() => Ok(None),
            Err(err) => Err(err),
        }
    }

    pub fn write(&self, info: &ManagerInfo) -> Result<(), StoreError> {
        let bytes = serde_json::to_vec_pretty(info)?;
        self.backend.write(STATE_KEY, &bytes)?;
        tracing::info!(
            release = %info.release_name,
            version = info.release_version,
            "manager state descriptor written"
        );
        Ok(())
    }

    /// Delete the descriptor. Returns `false` if there was none.
    pub fn remove(&self) -> Result<bool, StoreError> {
        match self.backend.delete(STATE_KEY) {
            Ok(()) => {
                tracing::info!("manager state descriptor removed");
                Ok(true)
            }
            Err(err) if err.is_not_found() => Ok(false),
            Err(err) => Err(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryBackend;

    fn info(version: u32) -> ManagerInfo {
        ManagerInfo {
            release_filename: format!("mgr-{version}.release"),
            release_name: "mgr".to_string(),
            release_version: version,
        }
    }

    #[test]
    fn read_absent_is_none() {
        let store = StateStore::new(Arc::new(MemoryBackend::new()));
        assert_eq!(store.read().unwrap(), None);
        assert!(!store.exists().unwrap());
    }

    #[test]
    fn write_then_read() {
        let backend = Arc::new(MemoryBackend::new());
        let store = StateStore::new(backend.clone());
        store.write(&info(2)).unwrap();
        assert!(backend.contains(STATE_KEY));
        assert_eq!(store.read().unwrap(), Some(info(2)));
    }

    #[test]
    fn stored_json_uses_descriptor_field_names() {
        let backend = Arc::new(MemoryBackend::new());
        StateStore::new(backend.clone()).write(&info(3)).unwrap();
        let raw: serde_json::Value =
            serde_json::from_slice(&backend.read(STATE_KEY).unwrap()).unwrap();
        assert_eq!(raw["ReleaseFilename"], "mgr-3.release");
        assert_eq!(raw["ReleaseVersion"], 3);
    }

    #[test]
    fn corrupt_descriptor_still_exists() {
        let backend = Arc::new(MemoryBackend::new());
        backend.write(STATE_KEY, b"garbage").unwrap();
        let store = StateStore::new(backend);
        assert!(store.exists().unwrap());
        assert!(matches!(store.read().unwrap_err(), StoreError::Json(_)));
    }

    #[test]
    fn remove_tolerates_missing_descriptor() {
        let store = StateStore::new(Arc::new(MemoryBackend::new()));
        assert!(!store.remove().unwrap());
        store.write(&info(1)).unwrap();
        assert!(store.remove().unwrap());
        assert!(!store.exists().unwrap());
    }
}
