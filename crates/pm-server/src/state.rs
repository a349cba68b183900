//! Shared application state for the Axum server.

use std::sync::Arc;

use tokio::sync::RwLock;

use pm_query::QueryContext;
use pm_store::{DeviceRepository, SnapshotWriter};

/// Shared application state, cloned into every handler.
#[derive(Clone)]
pub struct AppState {
    /// Device repository. Report handlers hold the write lock for the whole
    /// parse, mutate and snapshot sequence.
    pub repo: Arc<RwLock<DeviceRepository>>,
    /// Snapshot queue (None disables persistence).
    pub writer: Option<SnapshotWriter>,
    /// Facts the query engine mentions in its answers.
    pub query: QueryContext,
    /// Accepted report channel. None accepts every channel.
    pub channel_id: Option<String>,
}

impl AppState {
    /// Create state around a loaded repository.
    pub fn new(repo: DeviceRepository, writer: Option<SnapshotWriter>) -> Self {
        Self {
            repo: Arc::new(RwLock::new(repo)),
            writer,
            query: QueryContext::default(),
            channel_id: None,
        }
    }

    /// Restrict ingestion to one channel.
    pub fn with_channel(mut self, channel_id: Option<String>) -> Self {
        self.query = QueryContext::new(channel_id.as_deref().unwrap_or("todos"));
        self.channel_id = channel_id;
        self
    }

    /// Empty in-memory state without persistence (for tests).
    pub fn in_memory() -> Self {
        Self::new(DeviceRepository::new(), None)
    }

    /// Whether a report from `channel` should be ingested.
    pub fn accepts_channel(&self, channel: Option<&str>) -> bool {
        match (&self.channel_id, channel) {
            (Some(expected), Some(actual)) => expected == actual,
            _ => true,
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::in_memory()
    }
}
