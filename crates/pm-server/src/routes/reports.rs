//! Report ingestion endpoint.

use axum::Json;
use axum::extract::State;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use pm_ingest::{ReportCategory, apply, parse_report};

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

/// Request body for POST /api/v1/reports.
#[derive(Debug, Deserialize)]
pub struct ReportRequest {
    /// Raw report text as posted by the device.
    pub content: String,
    /// Channel the report was posted to.
    #[serde(default)]
    pub channel_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ReportResponse {
    pub accepted: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub device_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<ReportCategory>,
}

impl ReportResponse {
    fn ignored() -> Self {
        Self {
            accepted: false,
            device_id: None,
            category: None,
        }
    }
}

/// POST /api/v1/reports, ingest one raw report.
///
/// Reports from another channel or without a device token are ignored and
/// leave the repository untouched. When the snapshot writer has stopped the
/// report stays applied in memory but the call fails with 500.
pub async fn ingest_report(
    State(state): State<AppState>,
    Json(req): Json<ReportRequest>,
) -> ApiResult<Json<ReportResponse>> {
    if !state.accepts_channel(req.channel_id.as_deref()) {
        tracing::debug!(channel_id = ?req.channel_id, "report from other channel ignored");
        return Ok(Json(ReportResponse::ignored()));
    }

    let Some(report) = parse_report(&req.content) else {
        tracing::debug!("report without device token ignored");
        return Ok(Json(ReportResponse::ignored()));
    };

    // Mutate and snapshot under one write lock so reports never interleave.
    let mut repo = state.repo.write().await;
    let category = apply(&mut repo, &report, Utc::now());
    let queued = match &state.writer {
        Some(writer) => writer.enqueue(repo.to_document()),
        None => true,
    };
    drop(repo);

    if !queued {
        tracing::error!(device_id = %report.device_id, "report applied but snapshot not queued");
        return Err(ApiError::Internal("snapshot writer stopped".into()));
    }

    tracing::info!(device_id = %report.device_id, category = %category, "report ingested");
    Ok(Json(ReportResponse {
        accepted: true,
        device_id: Some(report.device_id),
        category: Some(category),
    }))
}
