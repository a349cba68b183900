//! Serialized write path to the snapshot store.
//!
//! Every mutation produces a whole-fleet document. Documents go through one
//! queue drained by one task, so saves never race each other. When several
//! documents are waiting only the newest is written.

use std::sync::Arc;

use pm_protocol::Document;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::snapshot::SnapshotStore;

/// Cloneable handle for queueing snapshots.
///
/// The background task exits after the last handle is dropped and the queue
/// has drained.
#[derive(Clone)]
pub struct SnapshotWriter {
    tx: mpsc::UnboundedSender<Document>,
}

impl SnapshotWriter {
    /// Spawn the writer task on the current tokio runtime.
    pub fn spawn(store: Arc<dyn SnapshotStore>) -> (Self, JoinHandle<()>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let handle = tokio::spawn(run(store, rx));
        (Self { tx }, handle)
    }

    /// Queue a snapshot. Returns false if the writer task is gone.
    pub fn enqueue(&self, document: Document) -> bool {
        if self.tx.send(document).is_err() {
            tracing::error!("snapshot writer stopped, dropping snapshot");
            return false;
        }
        true
    }
}

async fn run(store: Arc<dyn SnapshotStore>, mut rx: mpsc::UnboundedReceiver<Document>) {
    while let Some(mut document) = rx.recv().await {
        while let Ok(newer) = rx.try_recv() {
            document = newer;
        }
        match store.save(&document).await {
            Ok(()) => tracing::debug!(devices = document.devices.len(), "snapshot saved"),
            Err(e) => tracing::error!(error = %e, "failed to save snapshot"),
        }
    }
    tracing::debug!("snapshot writer drained");
}
