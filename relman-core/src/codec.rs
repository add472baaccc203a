//! Release codec: blob encoding, filename keys, and human-readable summaries.
//!
//! The filename key doubles as the storage blob identifier and the diff key.
//! It is derived from `(name, version, last_deployed)` and degrades to
//! `(name, version)` when the source reported no deployment timestamp, in
//! which case a re-deploy that keeps the version is invisible to the differ.

use std::fmt;

use chrono::{DateTime, Utc};

use crate::error::CodecError;
use crate::types::{Release, Values};

/// File extension (without the dot) of stored release blobs.
pub const RELEASE_EXTENSION: &str = "release";

/// Serialize a release to its stored byte form.
pub fn encode(release: &Release) -> Result<Vec<u8>, CodecError> {
    serde_json::to_vec(release).map_err(|source| CodecError::Encode {
        name: release.name.clone(),
        source,
    })
}

/// Deserialize a release from its stored byte form.
pub fn decode(bytes: &[u8]) -> Result<Release, CodecError> {
    serde_json::from_slice(bytes).map_err(CodecError::Decode)
}

/// Stable filename key for a release.
pub fn filename(release: &Release) -> String {
    match release.last_deployed {
        Some(deployed) => format!(
            "{}-{}-{}.{RELEASE_EXTENSION}",
            release.name,
            release.version,
            deployed.timestamp()
        ),
        None => {
            tracing::debug!(
                release = %release.name,
                "no deployment metadata; key degrades to name and version"
            );
            format!("{}-{}.{RELEASE_EXTENSION}", release.name, release.version)
        }
    }
}

/// Whether a backend key looks like a stored release blob.
pub fn is_release_key(key: &str) -> bool {
    key.strip_suffix(RELEASE_EXTENSION)
        .and_then(|rest| rest.strip_suffix('.'))
        .is_some_and(|stem| !stem.is_empty())
}

/// Deterministic multi-line summary of a release.
///
/// With `verbose`, the chart's default values are appended.
pub fn render(release: &Release, verbose: bool) -> String {
    let mut out = format!(
        "Name: {}\nFilename: {}\nStatus: {}\nVersion: {}\nNamespace: {}\nChart: {} {}\nValues:\n{}",
        release.name,
        filename(release),
        release.status,
        release.version,
        release.namespace,
        release.chart.name,
        release.chart.version,
        values_yaml(&release.config),
    );
    if verbose {
        out.push_str("\nChart values:\n");
        out.push_str(&values_yaml(&release.chart.values));
    }
    out
}

fn values_yaml(values: &Values) -> String {
    serde_yaml::to_string(values).unwrap_or_default()
}

// ---------------------------------------------------------------------------
// Key parsing
// ---------------------------------------------------------------------------

/// Fields recovered from a filename key without fetching the blob.
///
/// Parsing is best-effort: a name ending in `-<digits>` on a key without a
/// timestamp reads as name plus version plus timestamp.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseKey {
    pub name: String,
    pub version: u32,
    pub deployed: Option<DateTime<Utc>>,
}

impl ReleaseKey {
    /// Parse a stored filename key. Returns `None` for non-release keys.
    pub fn parse(key: &str) -> Option<Self> {
        if !is_release_key(key) {
            return None;
        }
        let stem = &key[..key.len() - RELEASE_EXTENSION.len() - 1];

        let (head, last) = stem.rsplit_once('-')?;
        let last: i64 = last.parse().ok()?;

        if let Some((name, version)) = head.rsplit_once('-') {
            if let Ok(version) = version.parse::<u32>() {
                if !name.is_empty() {
                    return Some(Self {
                        name: name.to_string(),
                        version,
                        deployed: DateTime::from_timestamp(last, 0),
                    });
                }
            }
        }

        let version = u32::try_from(last).ok()?;
        (!head.is_empty()).then(|| Self {
            name: head.to_string(),
            version,
            deployed: None,
        })
    }
}

impl fmt::Display for ReleaseKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.deployed {
            Some(deployed) => write!(
                f,
                "{}-{}-{}.{RELEASE_EXTENSION}",
                self.name,
                self.version,
                deployed.timestamp()
            ),
            None => write!(f, "{}-{}.{RELEASE_EXTENSION}", self.name, self.version),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
