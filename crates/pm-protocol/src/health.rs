//! Derived device health, shared by report ingestion and query answering.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::device::DeviceState;

/// Hours without a report after which a device counts as unresponsive.
pub const UNRESPONSIVE_AFTER_HOURS: i64 = 2;

/// Size of the "recent" window over the error and warning buffers.
///
/// Recency is a fixed count of newest entries, not a time window, so any
/// recorded error or warning keeps a device degraded until it clears.
pub const RECENT_WINDOW: usize = 3;

/// Health classification of a single device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HealthStatus {
    Healthy,
    Degraded,
    Critical,
    Unresponsive,
}

impl HealthStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Healthy => "healthy",
            Self::Degraded => "degraded",
            Self::Critical => "critical",
            Self::Unresponsive => "unresponsive",
        }
    }

    /// Operator-facing label.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Healthy => "OK",
            Self::Degraded => "Con problemas",
            Self::Critical => "CRÍTICO",
            Self::Unresponsive => "SIN REPORTAR",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            Self::Healthy => "✅",
            Self::Degraded => "⚠️",
            Self::Critical => "🚨",
            Self::Unresponsive => "💀",
        }
    }
}

impl std::fmt::Display for HealthStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classify a device. First matching rule wins:
/// critical flag, silence past the threshold, any recent error or warning.
pub fn evaluate(state: &DeviceState, now: DateTime<Utc>) -> HealthStatus {
    if state.critical {
        return HealthStatus::Critical;
    }
    if is_silent(state, now) {
        return HealthStatus::Unresponsive;
    }
    if recent_errors(state) > 0 || recent_warnings(state) > 0 {
        return HealthStatus::Degraded;
    }
    HealthStatus::Healthy
}

/// True when the device has never reported or has been quiet for longer
/// than [`UNRESPONSIVE_AFTER_HOURS`].
pub fn is_silent(state: &DeviceState, now: DateTime<Utc>) -> bool {
    match state.last_report_at {
        Some(last) => now - last > Duration::hours(UNRESPONSIVE_AFTER_HOURS),
        None => true,
    }
}

/// Hours elapsed since the last report, `None` if the device never reported.
pub fn hours_since_report(state: &DeviceState, now: DateTime<Utc>) -> Option<f64> {
    state
        .last_report_at
        .map(|last| (now - last).num_milliseconds() as f64 / 3_600_000.0)
}

/// Number of errors inside the recent window.
pub fn recent_errors(state: &DeviceState) -> usize {
    state.errors.len().min(RECENT_WINDOW)
}

/// Number of warnings inside the recent window.
pub fn recent_warnings(state: &DeviceState) -> usize {
    state.warnings.len().min(RECENT_WINDOW)
}
