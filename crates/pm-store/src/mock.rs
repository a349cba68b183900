//! In-memory snapshot store for testing, records every save.

use std::sync::Mutex;

use async_trait::async_trait;
use pm_protocol::Document;

use crate::error::{StoreError, StoreResult};
use crate::snapshot::SnapshotStore;

/// Snapshot store that keeps documents in memory.
///
/// Thread-safe via `Mutex` (fine for test contexts).
pub struct MemorySnapshotStore {
    current: Mutex<Document>,
    saved: Mutex<Vec<Document>>,
    fail_saves: bool,
}

impl MemorySnapshotStore {
    pub fn new() -> Self {
        Self::with_document(Document::new())
    }

    /// Start from a pre-loaded document.
    pub fn with_document(document: Document) -> Self {
        Self {
            current: Mutex::new(document),
            saved: Mutex::new(Vec::new()),
            fail_saves: false,
        }
    }

    /// A store whose every save fails.
    pub fn failing() -> Self {
        Self {
            fail_saves: true,
            ..Self::new()
        }
    }

    /// All documents saved so far, oldest first.
    pub fn saved(&self) -> Vec<Document> {
        self.saved.lock().unwrap().clone()
    }

    /// Most recently saved document.
    pub fn last_saved(&self) -> Option<Document> {
        self.saved.lock().unwrap().last().cloned()
    }
}

impl Default for MemorySnapshotStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SnapshotStore for MemorySnapshotStore {
    async fn load(&self) -> StoreResult<Document> {
        Ok(self.current.lock().unwrap().clone())
    }

    async fn save(&self, document: &Document) -> StoreResult<()> {
        if self.fail_saves {
            return Err(StoreError::Other("save rejected by test store".into()));
        }
        *self.current.lock().unwrap() = document.clone();
        self.saved.lock().unwrap().push(document.clone());
        Ok(())
    }
}
