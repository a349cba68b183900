//! Device state endpoints.

use axum::Json;
use axum::extract::{Path, State};
use chrono::{DateTime, Utc};
use serde::Serialize;

use pm_protocol::{DeviceState, HealthStatus, evaluate};

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

/// Summary view of a device (for list responses).
#[derive(Debug, Serialize)]
pub struct DeviceSummary {
    pub device_id: String,
    pub health: HealthStatus,
    pub last_report_at: Option<DateTime<Utc>>,
}

/// GET /api/v1/devices, list devices in registration order.
pub async fn list_devices(State(state): State<AppState>) -> Json<Vec<DeviceSummary>> {
    let now = Utc::now();
    let repo = state.repo.read().await;
    let summaries = repo
        .iter()
        .map(|(id, device)| DeviceSummary {
            device_id: id.to_string(),
            health: evaluate(device, now),
            last_report_at: device.last_report_at,
        })
        .collect();
    Json(summaries)
}

/// GET /api/v1/devices/{id}, full state of one device.
pub async fn get_device(
    State(state): State<AppState>,
    Path(device_id): Path<String>,
) -> ApiResult<Json<DeviceState>> {
    let repo = state.repo.read().await;
    repo.get(&device_id)
        .cloned()
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("device '{device_id}' not found")))
}
