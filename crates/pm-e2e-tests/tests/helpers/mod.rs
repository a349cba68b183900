//! Shared test harness for E2E integration tests.
//!
//! Drives the real router, repository and snapshot writer together, with
//! an in-memory snapshot store standing in for the data file.

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use tokio::task::JoinHandle;
use tower::ServiceExt;

use pm_protocol::{DeviceState, Document};
use pm_server::routes::build_router;
use pm_server::state::AppState;
use pm_store::{DeviceRepository, MemorySnapshotStore, SnapshotWriter};

/// End-to-end test harness wiring the HTTP surface to a memory store.
pub struct TestHarness {
    /// Server state shared with the router.
    pub state: AppState,
    /// Axum router for HTTP requests via `tower::oneshot`.
    pub router: Router,
    /// Snapshot store receiving every persisted document.
    pub store: Arc<MemorySnapshotStore>,
    writer_task: JoinHandle<()>,
}

impl TestHarness {
    /// Harness with an empty fleet and no channel restriction.
    pub fn new() -> Self {
        Self::build(Document::new(), None)
    }

    /// Harness that only accepts reports from `channel_id`.
    pub fn with_channel(channel_id: &str) -> Self {
        Self::build(Document::new(), Some(channel_id.to_string()))
    }

    /// Harness whose fleet state was loaded from `document`.
    pub fn with_document(document: Document) -> Self {
        Self::build(document, None)
    }

    fn build(document: Document, channel_id: Option<String>) -> Self {
        let store = Arc::new(MemorySnapshotStore::with_document(document.clone()));
        let (writer, writer_task) = SnapshotWriter::spawn(store.clone());
        let state = AppState::new(DeviceRepository::from_document(document), Some(writer))
            .with_channel(channel_id);
        let router = build_router(state.clone());

        Self {
            state,
            router,
            store,
            writer_task,
        }
    }

    async fn send(&self, request: Request<Body>) -> (StatusCode, serde_json::Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        (status, json)
    }

    fn post_json(uri: &str, body: serde_json::Value) -> Request<Body> {
        Request::post(uri)
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_vec(&body).unwrap()))
            .unwrap()
    }

    /// Post a report (POST /api/v1/reports).
    /// Returns (HTTP status code, response JSON body).
    pub async fn report(&self, content: &str) -> (StatusCode, serde_json::Value) {
        self.send(Self::post_json(
            "/api/v1/reports",
            serde_json::json!({ "content": content }),
        ))
        .await
    }

    /// Post a report tagged with the channel it arrived on.
    pub async fn report_on(
        &self,
        channel_id: &str,
        content: &str,
    ) -> (StatusCode, serde_json::Value) {
        self.send(Self::post_json(
            "/api/v1/reports",
            serde_json::json!({ "content": content, "channel_id": channel_id }),
        ))
        .await
    }

    /// Ask a question (POST /api/v1/ask) and return the answer text.
    pub async fn ask(&self, question: &str) -> String {
        let (status, json) = self
            .send(Self::post_json(
                "/api/v1/ask",
                serde_json::json!({ "question": question }),
            ))
            .await;
        assert_eq!(status, StatusCode::OK, "ask failed: {json}");
        json["answer"].as_str().unwrap().to_string()
    }

    /// List devices (GET /api/v1/devices).
    pub async fn list_devices(&self) -> Vec<serde_json::Value> {
        let (status, json) = self
            .send(Request::get("/api/v1/devices").body(Body::empty()).unwrap())
            .await;
        assert_eq!(status, StatusCode::OK);
        json.as_array().unwrap().clone()
    }

    /// Fetch one device (GET /api/v1/devices/{id}).
    pub async fn get_device(&self, device_id: &str) -> (StatusCode, serde_json::Value) {
        let uri = format!("/api/v1/devices/{device_id}");
        self.send(Request::get(&uri).body(Body::empty()).unwrap())
            .await
    }

    /// Device state straight from the repository.
    pub async fn device(&self, device_id: &str) -> Option<DeviceState> {
        self.state.repo.read().await.get(device_id).cloned()
    }

    /// Mutate the repository directly, bypassing the HTTP surface.
    pub async fn with_repo<R>(&self, f: impl FnOnce(&mut DeviceRepository) -> R) -> R {
        let mut repo = self.state.repo.write().await;
        f(&mut repo)
    }

    /// Kill the snapshot writer task, as if persistence had died.
    /// The harness must not be shut down afterwards.
    pub async fn stop_writer(&mut self) {
        self.writer_task.abort();
        let _ = (&mut self.writer_task).await;
    }

    /// Drop the server side and wait for the writer to drain.
    /// Returns the snapshot store for inspection.
    pub async fn shutdown(self) -> Arc<MemorySnapshotStore> {
        let Self {
            state,
            router,
            store,
            writer_task,
        } = self;
        drop(router);
        drop(state);
        writer_task.await.unwrap();
        store
    }
}
