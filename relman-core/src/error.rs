//! Error types for relman-core.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while encoding or decoding a release blob.
#[derive(Debug, Error)]
pub enum CodecError {
    #[error("failed to encode release {name}: {source}")]
    Encode {
        name: String,
        #[source]
        source: serde_json::Error,
    },

    /// Corrupt or foreign bytes.
    #[error("failed to decode release: {0}")]
    Decode(#[source] serde_json::Error),
}

/// Errors raised while loading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// YAML parse error on load, with the file that failed.
    #[error("failed to parse config at {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("config file not found at {path}")]
    NotFound { path: PathBuf },

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Errors raised by a [`crate::source::ReleaseSource`] when listing releases.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("release source unavailable: {0}")]
    Unavailable(String),
}

/// Outcome of a failed install call.
#[derive(Debug, Error)]
pub enum InstallError {
    /// The target already has a release with this name.
    #[error("cannot re-use a name that is still in use: {name}")]
    NameInUse { name: String },

    #[error("install of {name} failed: {reason}")]
    Failed { name: String, reason: String },
}

pub(crate) fn source_io_err(path: impl Into<PathBuf>, source: std::io::Error) -> SourceError {
    SourceError::Io {
        path: path.into(),
        source,
    }
}
