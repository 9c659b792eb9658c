// Adapters layer: concrete implementations of the persistence ports.

pub mod memory;
pub mod snapshot;

pub use memory::{MemoryStore, Snapshot};
pub use snapshot::SnapshotFile;
