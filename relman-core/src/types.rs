//! Domain types for releases and the manager state descriptor.
//!
//! Releases are produced by a [`crate::source::ReleaseSource`]; the engine only
//! reads, transforms, and replays them. All types round-trip through serde.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Nested, string-keyed configuration value tree of a release.
pub type Values = serde_json::Map<String, serde_json::Value>;

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// Lifecycle status of a deployed release.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum ReleaseStatus {
    #[default]
    Deployed,
    Failed,
    PendingInstall,
    PendingUpgrade,
    PendingRollback,
}

impl fmt::Display for ReleaseStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReleaseStatus::Deployed => write!(f, "deployed"),
            ReleaseStatus::Failed => write!(f, "failed"),
            ReleaseStatus::PendingInstall => write!(f, "pending-install"),
            ReleaseStatus::PendingUpgrade => write!(f, "pending-upgrade"),
            ReleaseStatus::PendingRollback => write!(f, "pending-rollback"),
        }
    }
}

// ---------------------------------------------------------------------------
// Domain structs
// ---------------------------------------------------------------------------

/// Chart reference a release was installed from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Chart {
    pub name: String,
    pub version: String,
    /// Default values shipped with the chart.
    #[serde(default)]
    pub values: Values,
}

/// A named, versioned deployable unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Release {
    pub name: String,
    pub namespace: String,
    pub version: u32,
    #[serde(default)]
    pub status: ReleaseStatus,
    /// Absent when the source did not report deployment metadata.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_deployed: Option<DateTime<Utc>>,
    #[serde(default)]
    pub chart: Chart,
    /// Operator-supplied configuration values.
    #[serde(default)]
    pub config: Values,
}

impl Release {
    /// Minimal release with an empty chart and config tree.
    pub fn new(name: impl Into<String>, namespace: impl Into<String>, version: u32) -> Self {
        Self {
            name: name.into(),
            namespace: namespace.into(),
            version,
            status: ReleaseStatus::Deployed,
            last_deployed: None,
            chart: Chart::default(),
            config: Values::new(),
        }
    }
}

/// Descriptor identifying which stored release is the manager's own
/// deployment. Persisted as JSON next to the release blobs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ManagerInfo {
    pub release_filename: String,
    pub release_name: String,
    pub release_version: u32,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
