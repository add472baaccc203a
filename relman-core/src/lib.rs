//! relman core library: release types, codec, configuration, release sources.
//!
//! - [`types`]: `Release`, `ReleaseStatus`, `Chart`, `ManagerInfo`
//! - [`codec`]: blob encoding, filename keys, rendering
//! - [`config`]: configuration model and loader
//! - [`source`]: `ReleaseSource` capability and its implementations
//! - [`error`]: error enums

pub mod codec;
pub mod config;
pub mod error;
pub mod source;
pub mod types;

pub use config::Config;
pub use error::{CodecError, ConfigError, InstallError, SourceError};
pub use source::{DirectorySource, MemorySource, ReleaseSource};
pub use types::{Chart, ManagerInfo, Release, ReleaseStatus, Values};
