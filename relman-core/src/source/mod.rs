//! Release source capability: list what is deployed, install a release.
//!
//! The engine treats the source as opaque. Implementations must be safe to
//! call from several worker threads at once with distinct releases.

mod directory;
mod memory;

pub use directory::DirectorySource;
pub use memory::MemorySource;

use crate::error::{InstallError, SourceError};
use crate::types::Release;

pub trait ReleaseSource: Send + Sync {
    /// Every release currently deployed.
    fn list_installed(&self) -> Result<Vec<Release>, SourceError>;

    /// Install one release descriptor.
    fn install(&self, release: &Release) -> Result<(), InstallError>;
}
