//! Apply parsed reports to the device repository.

use chrono::{DateTime, Utc};

use pm_protocol::{
    ButtonState, DailyPlan, ERROR_CAPACITY, ErrorRecord, STATUS_UPDATE_CAPACITY, StatusUpdate,
    WARNING_CAPACITY, WarningRecord,
};
use pm_store::{DeviceRepository, append_bounded};

use crate::extract::{NO_DESCRIPTION, parse_report};
use crate::types::{Report, ReportCategory, ReportEvent};

/// Parse `text` and apply it to `repo`.
///
/// Returns the category applied, or `None` when the report names no device
/// and was dropped without touching the repository.
pub fn classify_and_apply(
    text: &str,
    repo: &mut DeviceRepository,
    now: DateTime<Utc>,
) -> Option<ReportCategory> {
    let Some(report) = parse_report(text) else {
        tracing::debug!("report without device token ignored");
        return None;
    };
    Some(apply(repo, &report, now))
}

/// Apply a parsed report to its device, creating the device if needed.
pub fn apply(repo: &mut DeviceRepository, report: &Report, now: DateTime<Utc>) -> ReportCategory {
    let device_id = report.device_id.as_str();
    let state = repo.upsert(device_id);
    state.last_report_at = Some(now);

    match &report.event {
        ReportEvent::DailyPlan(plan) => {
            state.pauses = plan.pauses.clone();
            state.daily_plan = Some(DailyPlan {
                start_time: plan.start_time.clone(),
                total_pauses: plan.effective_total(),
                generated_at: now,
            });
            state.estimated_songs = plan.estimated_songs;
            tracing::info!(
                device_id,
                pauses = plan.pauses.len(),
                estimated_songs = ?plan.estimated_songs,
                "daily plan recorded"
            );
        }
        ReportEvent::Warning(warning) => {
            let record = WarningRecord {
                kind: warning.kind.clone(),
                description: warning
                    .description
                    .clone()
                    .unwrap_or_else(|| NO_DESCRIPTION.to_string()),
                repetition: warning.repetition.clone(),
                timestamp: now,
            };
            append_bounded(&mut state.warnings, record, WARNING_CAPACITY);
            tracing::warn!(device_id, kind = %warning.kind, "device warning");
        }
        ReportEvent::Error(error) => {
            let record = ErrorRecord {
                kind: error.kind.clone(),
                exception_text: error.exception_text.clone(),
                repetition: error.repetition.clone(),
                timestamp: now,
            };
            append_bounded(&mut state.errors, record, ERROR_CAPACITY);
            tracing::warn!(device_id, kind = %error.kind, "device error");
        }
        ReportEvent::Status(status) => {
            let update = StatusUpdate {
                elapsed_hours: status.elapsed_hours,
                songs_played: status.songs_played,
                pauses_done: status.pauses_done,
                timestamp: now,
            };
            append_bounded(&mut state.status_updates, update, STATUS_UPDATE_CAPACITY);
            // A status report proves the loop is alive.
            state.clear_critical();
            tracing::info!(
                device_id,
                songs_played = ?status.songs_played,
                pauses_done = ?status.pauses_done,
                "status update"
            );
        }
        ReportEvent::Critical(reason) => {
            state.mark_critical(reason.as_str());
            tracing::error!(device_id, reason = reason.as_str(), "device critical");
        }
        ReportEvent::Buttons(buttons) => {
            state.button_state = Some(ButtonState {
                play_pause: buttons.play_pause.clone(),
                next: buttons.next.clone(),
                double_tap: buttons.double_tap.clone(),
                timestamp: now,
            });
            // Button scans only happen while the script is running.
            state.clear_critical();
            tracing::info!(device_id, "button state updated");
        }
        ReportEvent::Unclassified => {
            tracing::debug!(device_id, "unclassified report");
        }
    }

    report.event.category()
}
