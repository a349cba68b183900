use std::collections::VecDeque;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Maximum warnings kept per device.
pub const WARNING_CAPACITY: usize = 50;
/// Maximum errors kept per device.
pub const ERROR_CAPACITY: usize = 50;
/// Maximum status updates kept per device.
pub const STATUS_UPDATE_CAPACITY: usize = 20;

/// One scheduled pause from a daily plan report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pause {
    /// Ordinal as printed by the device ("Pausa #3").
    pub index: u32,
    /// Free-form time text, kept exactly as reported.
    pub scheduled_time: String,
    pub duration_minutes: u32,
}

/// A warning reported by a device.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WarningRecord {
    pub kind: String,
    pub description: String,
    /// "m/n" repetition counter, when the report carried one.
    pub repetition: Option<String>,
    pub timestamp: DateTime<Utc>,
}

/// An error reported by a device.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorRecord {
    pub kind: String,
    pub exception_text: Option<String>,
    pub repetition: Option<String>,
    pub timestamp: DateTime<Utc>,
}

/// Periodic progress report from the automation loop.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusUpdate {
    pub elapsed_hours: Option<f64>,
    pub songs_played: Option<u64>,
    pub pauses_done: Option<u32>,
    pub timestamp: DateTime<Utc>,
}

/// Summary of the most recent daily plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyPlan {
    pub start_time: Option<String>,
    pub total_pauses: u32,
    pub generated_at: DateTime<Utc>,
}

/// Detection result for a single on-screen button.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ButtonProbe {
    pub found: String,
    pub clickable: String,
}

/// Outcome of the double-tap fallback.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TapProbe {
    pub attempted: String,
    pub result: String,
}

/// Latest button detection snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ButtonState {
    pub play_pause: Option<ButtonProbe>,
    pub next: Option<ButtonProbe>,
    pub double_tap: Option<TapProbe>,
    pub timestamp: DateTime<Utc>,
}

/// Rolling health record for one device.
///
/// Created lazily on the first report that names the device and only ever
/// mutated field by field afterwards.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DeviceState {
    pub last_report_at: Option<DateTime<Utc>>,
    /// Replaced wholesale by every daily plan report.
    pub pauses: Vec<Pause>,
    pub warnings: VecDeque<WarningRecord>,
    pub errors: VecDeque<ErrorRecord>,
    pub status_updates: VecDeque<StatusUpdate>,
    pub daily_plan: Option<DailyPlan>,
    pub estimated_songs: Option<u64>,
    pub button_state: Option<ButtonState>,
    pub critical: bool,
    pub critical_reason: Option<String>,
}

impl DeviceState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Raise the critical flag together with its reason.
    pub fn mark_critical(&mut self, reason: impl Into<String>) {
        self.critical = true;
        self.critical_reason = Some(reason.into());
    }

    /// Clear the critical flag and its reason.
    pub fn clear_critical(&mut self) {
        self.critical = false;
        self.critical_reason = None;
    }

    /// Most recent pause of the current plan.
    pub fn last_pause(&self) -> Option<&Pause> {
        self.pauses.last()
    }
}
