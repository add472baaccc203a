//! Directory-backed release source.
//!
//! # Layout
//!
//! ```text
//! <dir>/
//!   <namespace>/
//!     <name>.json   (codec bytes of the deployed release)
//! ```

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use chrono::Utc;

use crate::codec;
use crate::error::{source_io_err, InstallError, SourceError};
use crate::source::ReleaseSource;
use crate::types::{Release, ReleaseStatus};

/// A cluster emulated as a directory tree of release descriptors.
#[derive(Debug, Clone)]
pub struct DirectorySource {
    root: PathBuf,
}

impl DirectorySource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// `<dir>/<namespace>/<name>.json`. Pure, no I/O.
    pub fn release_path(&self, namespace: &str, name: &str) -> PathBuf {
        self.root.join(namespace).join(format!("{name}.json"))
    }
}

impl ReleaseSource for DirectorySource {
    fn list_installed(&self) -> Result<Vec<Release>, SourceError> {
        let namespaces = match std::fs::read_dir(&self.root) {
            Ok(entries) => entries,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                return Err(SourceError::Unavailable(format!(
                    "cluster directory {} does not exist",
                    self.root.display()
                )));
            }
            Err(err) => return Err(source_io_err(&self.root, err)),
        };

        let mut ns_dirs: Vec<PathBuf> = namespaces
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().map(|t| t.is_dir()).unwrap_or(false))
            .map(|e| e.path())
            .collect();
        ns_dirs.sort();

        let mut releases = Vec::new();
        for dir in ns_dirs {
            let mut files: Vec<PathBuf> = std::fs::read_dir(&dir)
                .map_err(|e| source_io_err(&dir, e))?
                .filter_map(|e| e.ok())
                .map(|e| e.path())
                .filter(|p| p.extension().and_then(|ext| ext.to_str()) == Some("json"))
                .collect();
            files.sort();

            for path in files {
                let bytes = std::fs::read(&path).map_err(|e| source_io_err(&path, e))?;
                match codec::decode(&bytes) {
                    Ok(release) => releases.push(release),
                    Err(err) => {
                        tracing::warn!(
                            path = %path.display(),
                            error = %err,
                            "skipping undecodable release"
                        );
                    }
                }
            }
        }
        Ok(releases)
    }

    fn install(&self, release: &Release) -> Result<(), InstallError> {
        let failed = |reason: String| InstallError::Failed {
            name: release.name.clone(),
            reason,
        };

        let path = self.release_path(&release.namespace, &release.name);
        if path.exists() {
            return Err(InstallError::NameInUse {
                name: release.name.clone(),
            });
        }

        let mut installed = release.clone();
        installed.status = ReleaseStatus::Deployed;
        installed.last_deployed = Some(Utc::now());
        let bytes = codec::encode(&installed).map_err(|e| failed(e.to_string()))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| failed(format!("{}: {e}", parent.display())))?;
        }
        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, &bytes).map_err(|e| failed(format!("{}: {e}", tmp.display())))?;
        if let Err(e) = std::fs::rename(&tmp, &path) {
            let _ = std::fs::remove_file(&tmp);
            return Err(failed(format!("{}: {e}", path.display())));
        }

        tracing::debug!(
            release = %release.name,
            namespace = %release.namespace,
            "installed release"
        );
        Ok(())
    }
}
