//! Snapshot persistence abstraction: load and save the whole-fleet document.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use pm_protocol::Document;

use crate::error::{StoreError, StoreResult};

/// Durable backend for fleet snapshots.
///
/// Implemented by [`JsonFileStore`] for production and by
/// [`MemorySnapshotStore`](crate::MemorySnapshotStore) for tests.
#[async_trait]
pub trait SnapshotStore: Send + Sync {
    /// Read the current snapshot.
    async fn load(&self) -> StoreResult<Document>;

    /// Replace the stored snapshot with `document`.
    async fn save(&self, document: &Document) -> StoreResult<()>;
}

/// Stores the snapshot as a pretty-printed JSON file.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "snapshot".into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

fn io_error(path: &Path, e: std::io::Error) -> StoreError {
    StoreError::Io(format!("{}: {e}", path.display()))
}

#[async_trait]
impl SnapshotStore for JsonFileStore {
    async fn load(&self) -> StoreResult<Document> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => serde_json::from_str(&content)
                .map_err(|e| StoreError::Serialization(format!("{}: {e}", self.path.display()))),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!(path = %self.path.display(), "snapshot missing, creating empty document");
                let document = Document::new();
                self.save(&document).await?;
                Ok(document)
            }
            Err(e) => Err(io_error(&self.path, e)),
        }
    }

    async fn save(&self, document: &Document) -> StoreResult<()> {
        let json = serde_json::to_vec_pretty(document)
            .map_err(|e| StoreError::Serialization(e.to_string()))?;
        let temp = self.temp_path();
        tokio::fs::write(&temp, json)
            .await
            .map_err(|e| io_error(&temp, e))?;
        tokio::fs::rename(&temp, &self.path)
            .await
            .map_err(|e| io_error(&self.path, e))?;
        Ok(())
    }
}
