//! Device state storage for Playback Monitor.
//!
//! Provides the in-memory `DeviceRepository` (first-registration ordering,
//! bounded buffer appends), a `SnapshotStore` abstraction for durable
//! snapshots with file and in-memory backends, and the `SnapshotWriter`
//! that serializes every save through a single queue.

pub mod error;
pub mod mock;
pub mod repository;
pub mod snapshot;
pub mod writer;

// Re-export key types for convenience
pub use error::{StoreError, StoreResult};
pub use mock::MemorySnapshotStore;
pub use repository::{DeviceRepository, append_bounded};
pub use snapshot::{JsonFileStore, SnapshotStore};
pub use writer::SnapshotWriter;
