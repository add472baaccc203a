//! Process configuration.
//!
//! # Storage layout
//!
//! ```text
//! ~/.relman/
//!   config.yaml   (optional; every field has a default)
//! ```
//!
//! # API pattern
//!
//! - `load_at(path)`: explicit file; used in tests with `TempDir`
//! - `load(explicit)`: explicit file if given, otherwise `~/.relman/config.yaml`
//!   when present, otherwise [`Config::default`]
//!
//! The loaded value is overlaid with CLI flags once at startup and then shared
//! read-only (`Arc<Config>`) by every component.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Default seconds between daemon export passes.
pub const DEFAULT_POLLING_INTERVAL_SECS: u64 = 30;

/// Default number of concurrent install slots during import.
pub const DEFAULT_IMPORT_THREADS: usize = 50;

/// Default bind address of the daemon HTTP surface.
pub const DEFAULT_LISTEN: &str = "127.0.0.1:8080";

/// Value path rewritten on the manager's own release when it is relocated.
pub const MANAGER_STORAGE_PATH_VALUE: &str = "backend.storagePath";

// ---------------------------------------------------------------------------
// Sections
// ---------------------------------------------------------------------------

/// Where the snapshot lives.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct StorageConfig {
    /// Root directory of the local backend.
    pub path: Option<PathBuf>,
}

/// How to reach the cluster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ClusterConfig {
    /// Directory emulating a cluster for the directory release source.
    pub dir: Option<PathBuf>,
}

/// Options for `export`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    pub daemon: bool,
    pub polling_interval_secs: u64,
    /// Name of the release that deploys this manager. Empty disables tracking.
    pub manager_release: Option<String>,
    /// Namespace allow-list. Empty exports every namespace.
    pub namespaces: Vec<String>,
    pub listen: String,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            daemon: false,
            polling_interval_secs: DEFAULT_POLLING_INTERVAL_SECS,
            manager_release: None,
            namespaces: Vec::new(),
            listen: DEFAULT_LISTEN.to_string(),
        }
    }
}

impl ExportConfig {
    /// Configured manager release name, treating an empty string as unset.
    pub fn manager_release(&self) -> Option<&str> {
        self.manager_release.as_deref().filter(|name| !name.is_empty())
    }
}

/// Options for `import` and `transfer`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImportConfig {
    /// Proceed even when the target path already holds manager state.
    pub force: bool,
    /// New storage path for a replayed manager release.
    pub new_storage_path: Option<String>,
    /// Only replay releases from this namespace.
    pub namespace: Option<String>,
    /// Rewrite every replayed release into this namespace.
    pub target_namespace: Option<String>,
    pub exclude_namespaces: Vec<String>,
    /// Dotted value path to replacement value.
    pub values: BTreeMap<String, String>,
    pub threads: usize,
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            force: false,
            new_storage_path: None,
            namespace: None,
            target_namespace: None,
            exclude_namespaces: Vec::new(),
            values: BTreeMap::new(),
            threads: DEFAULT_IMPORT_THREADS,
        }
    }
}

impl ImportConfig {
    pub fn new_storage_path(&self) -> Option<&str> {
        self.new_storage_path.as_deref().filter(|p| !p.is_empty())
    }

    pub fn namespace(&self) -> Option<&str> {
        self.namespace.as_deref().filter(|ns| !ns.is_empty())
    }

    pub fn target_namespace(&self) -> Option<&str> {
        self.target_namespace.as_deref().filter(|ns| !ns.is_empty())
    }
}

/// Root configuration value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub storage: StorageConfig,
    pub cluster: ClusterConfig,
    pub export: ExportConfig,
    pub import: ImportConfig,
    pub dry_run: bool,
    pub verbose: bool,
    pub debug: bool,
}

impl Config {
    /// Reject combinations the engine cannot act on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.storage.path.is_none() {
            return Err(ConfigError::Invalid(
                "a storage path is required (--path or storage.path)".to_string(),
            ));
        }
        if self.import.threads == 0 {
            return Err(ConfigError::Invalid(
                "import.threads must be at least 1".to_string(),
            ));
        }
        if self.export.polling_interval_secs == 0 {
            return Err(ConfigError::Invalid(
                "export.polling_interval_secs must be at least 1".to_string(),
            ));
        }
        if self.import.target_namespace().is_some() && self.import.namespace().is_none() {
            return Err(ConfigError::Invalid(
                "a target namespace requires a source namespace (--namespace)".to_string(),
            ));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Load
// ---------------------------------------------------------------------------

/// `<home>/.relman/config.yaml`. Pure, no I/O.
pub fn default_path_at(home: &Path) -> PathBuf {
    home.join(".relman").join("config.yaml")
}

/// Load configuration from an explicit file.
///
/// Returns `ConfigError::NotFound` if absent, `ConfigError::Parse` (with path)
/// if malformed YAML.
pub fn load_at(path: &Path) -> Result<Config, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::NotFound {
            path: path.to_path_buf(),
        });
    }
    let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    if contents.trim().is_empty() {
        return Ok(Config::default());
    }
    serde_yaml::from_str(&contents).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Load the explicit file if given, otherwise the default file when it exists.
pub fn load(explicit: Option<&Path>) -> Result<Config, ConfigError> {
    if let Some(path) = explicit {
        return load_at(path);
    }
    let Some(home) = dirs::home_dir() else {
        return Ok(Config::default());
    };
    let path = default_path_at(&home);
    if path.exists() {
        load_at(&path)
    } else {
        Ok(Config::default())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn with_path() -> Config {
        let mut config = Config::default();
        config.storage.path = Some(PathBuf::from("/var/lib/relman"));
        config
    }

    #[test]
    fn defaults_match_documented_values() {
        let config = Config::default();
        assert_eq!(config.export.polling_interval_secs, 30);
        assert_eq!(config.import.threads, 50);
        assert_eq!(config.export.listen, "127.0.0.1:8080");
        assert!(!config.dry_run);
    }

    #[test]
    fn partial_yaml_keeps_defaults_for_missing_fields() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config.yaml");
        std::fs::write(
            &path,
            "storage:\n  path: /data\nimport:\n  exclude_namespaces: [kube-system]\n",
        )
        .unwrap();

        let config = load_at(&path).unwrap();
        assert_eq!(config.storage.path, Some(PathBuf::from("/data")));
        assert_eq!(config.import.exclude_namespaces, vec!["kube-system"]);
        assert_eq!(config.import.threads, DEFAULT_IMPORT_THREADS);
    }

    #[test]
    fn empty_file_is_default_config() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config.yaml");
        std::fs::write(&path, "\n").unwrap();
        assert_eq!(load_at(&path).unwrap(), Config::default());
    }

    #[test]
    fn missing_explicit_file_is_not_found() {
        let tmp = TempDir::new().unwrap();
        let err = load_at(&tmp.path().join("nope.yaml")).unwrap_err();
        assert!(matches!(err, ConfigError::NotFound { .. }), "got: {err}");
    }

    #[test]
    fn malformed_yaml_reports_path() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config.yaml");
        std::fs::write(&path, "import: [unclosed").unwrap();
        let err = load_at(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }), "got: {err}");
        assert!(err.to_string().contains("config.yaml"));
    }

    #[test]
    fn validate_requires_storage_path() {
        let err = Config::default().validate().unwrap_err();
        assert!(err.to_string().contains("storage path"));
        assert!(with_path().validate().is_ok());
    }

    #[test]
    fn validate_rejects_zero_threads() {
        let mut config = with_path();
        config.import.threads = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_target_without_source_namespace() {
        let mut config = with_path();
        config.import.target_namespace = Some("prod".to_string());
        assert!(config.validate().is_err());
        config.import.namespace = Some("staging".to_string());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn empty_manager_release_is_disabled() {
        let mut config = Config::default();
        config.export.manager_release = Some(String::new());
        assert_eq!(config.export.manager_release(), None);
        config.export.manager_release = Some("mgr".to_string());
        assert_eq!(config.export.manager_release(), Some("mgr"));
    }
}
