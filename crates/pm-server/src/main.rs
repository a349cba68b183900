//! Playback Monitor server: ingests device reports and answers operator
//! questions about the fleet over HTTP.

use std::sync::Arc;

use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

use pm_server::config::ServerConfig;
use pm_server::routes;
use pm_server::state::AppState;
use pm_store::{DeviceRepository, JsonFileStore, SnapshotStore, SnapshotWriter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .init();

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "pm-server starting");

    let config_path = std::env::args().nth(1);
    let config = ServerConfig::load(config_path.as_deref())?;

    let store = Arc::new(JsonFileStore::new(&config.data_file));
    let document = store.load().await?;
    let repo = DeviceRepository::from_document(document);
    tracing::info!(
        path = %config.data_file.display(),
        devices = repo.len(),
        "fleet state loaded"
    );

    let (writer, writer_task) = SnapshotWriter::spawn(store);
    let state = AppState::new(repo, Some(writer)).with_channel(config.channel_id.clone());
    if config.channel_id.is_none() {
        tracing::warn!("CHANNEL_ID not set, accepting reports from every channel");
    }

    let app = routes::build_router(state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!(addr = %addr, "listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // The router and its state are gone, so the writer drains and exits.
    if let Err(e) = writer_task.await {
        tracing::error!(error = %e, "snapshot writer task failed");
    }
    tracing::info!("pm-server stopped");

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown signal received");
}
