//! relman storage layer: backend adapters, snapshot store, state descriptor.

pub mod backend;
pub mod error;
pub mod memory;
pub mod snapshot;
pub mod state;

pub use backend::{Backend, LocalBackend};
pub use error::StoreError;
pub use memory::MemoryBackend;
pub use snapshot::SnapshotStore;
pub use state::{StateStore, STATE_KEY};
