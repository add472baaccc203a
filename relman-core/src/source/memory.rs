//! In-memory release source for tests and embedding.

use std::collections::BTreeSet;
use std::sync::{Mutex, MutexGuard};

use crate::error::{InstallError, SourceError};
use crate::source::ReleaseSource;
use crate::types::Release;

#[derive(Debug, Default)]
struct Inner {
    deployed: Vec<Release>,
    installs: Vec<Release>,
    failing: BTreeSet<String>,
    unavailable: bool,
}

/// Release source holding its deployed set in memory.
///
/// Every install call is recorded, including rejected ones.
#[derive(Debug, Default)]
pub struct MemorySource {
    inner: Mutex<Inner>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_releases(releases: Vec<Release>) -> Self {
        let source = Self::default();
        source.lock().deployed = releases;
        source
    }

    /// Replace the deployed set.
    pub fn set_releases(&self, releases: Vec<Release>) {
        self.lock().deployed = releases;
    }

    /// Make installs of `name` fail with a generic error.
    pub fn fail_installs_of(&self, name: impl Into<String>) {
        self.lock().failing.insert(name.into());
    }

    /// Make `list_installed` fail until reset.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.lock().unavailable = unavailable;
    }

    /// Every release passed to `install`, in call order.
    pub fn installs(&self) -> Vec<Release> {
        self.lock().installs.clone()
    }

    pub fn deployed(&self) -> Vec<Release> {
        self.lock().deployed.clone()
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl ReleaseSource for MemorySource {
    fn list_installed(&self) -> Result<Vec<Release>, SourceError> {
        let inner = self.lock();
        if inner.unavailable {
            return Err(SourceError::Unavailable("memory source offline".to_string()));
        }
        Ok(inner.deployed.clone())
    }

    fn install(&self, release: &Release) -> Result<(), InstallError> {
        let mut inner = self.lock();
        inner.installs.push(release.clone());

        if inner.failing.contains(&release.name) {
            return Err(InstallError::Failed {
                name: release.name.clone(),
                reason: "injected failure".to_string(),
            });
        }
        let in_use = inner
            .deployed
            .iter()
            .any(|r| r.name == release.name && r.namespace == release.namespace);
        if in_use {
            return Err(InstallError::NameInUse {
                name: release.name.clone(),
            });
        }
        inner.deployed.push(release.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_installs_and_rejects_duplicates() {
        let source = MemorySource::with_releases(vec![Release::new("a", "ns", 1)]);
        assert!(matches!(
            source.install(&Release::new("a", "ns", 2)),
            Err(InstallError::NameInUse { .. })
        ));
        source.install(&Release::new("b", "ns", 1)).unwrap();
        assert_eq!(source.installs().len(), 2);
        assert_eq!(source.deployed().len(), 2);
    }

    #[test]
    fn injected_failures_and_outage() {
        let source = MemorySource::new();
        source.fail_installs_of("bad");
        assert!(matches!(
            source.install(&Release::new("bad", "ns", 1)),
            Err(InstallError::Failed { .. })
        ));
        source.set_unavailable(true);
        assert!(source.list_installed().is_err());
    }
}
