//! Typed report events produced by the extraction engine.

use pm_protocol::{ButtonProbe, Pause, TapProbe};
use serde::{Deserialize, Serialize};

// ── Report Category ───────────────────────────────────────────

/// Category a report was classified into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportCategory {
    DailyPlanGenerated,
    Warning,
    Error,
    StatusUpdate,
    Critical,
    ButtonDetection,
    Unclassified,
}

impl ReportCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::DailyPlanGenerated => "daily_plan_generated",
            Self::Warning => "warning",
            Self::Error => "error",
            Self::StatusUpdate => "status_update",
            Self::Critical => "critical",
            Self::ButtonDetection => "button_detection",
            Self::Unclassified => "unclassified",
        }
    }
}

impl std::fmt::Display for ReportCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── Per-category records ──────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DailyPlanReport {
    pub pauses: Vec<Pause>,
    /// Explicit "Total de pausas" value, if printed.
    pub total_pauses: Option<u32>,
    pub start_time: Option<String>,
    pub estimated_songs: Option<u64>,
}

impl DailyPlanReport {
    /// Printed total, falling back to the number of parsed pauses.
    pub fn effective_total(&self) -> u32 {
        self.total_pauses
            .unwrap_or_else(|| u32::try_from(self.pauses.len()).unwrap_or(u32::MAX))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WarningReport {
    pub kind: String,
    /// Third line of the report, `None` when missing or blank.
    pub description: Option<String>,
    pub repetition: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorReport {
    pub kind: String,
    pub exception_text: Option<String>,
    pub repetition: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct StatusReport {
    pub elapsed_hours: Option<f64>,
    pub songs_played: Option<u64>,
    pub pauses_done: Option<u32>,
}

/// Why a device entered the critical state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CriticalReason {
    NextButtonMissing,
    ScriptStopped,
}

impl CriticalReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NextButtonMissing => "Next button not found",
            Self::ScriptStopped => "Script stopped",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ButtonReport {
    pub play_pause: Option<ButtonProbe>,
    pub next: Option<ButtonProbe>,
    pub double_tap: Option<TapProbe>,
}

// ── Report ────────────────────────────────────────────────────

/// Category-specific payload of a report.
#[derive(Debug, Clone, PartialEq)]
pub enum ReportEvent {
    DailyPlan(DailyPlanReport),
    Warning(WarningReport),
    Error(ErrorReport),
    Status(StatusReport),
    Critical(CriticalReason),
    Buttons(ButtonReport),
    Unclassified,
}

impl ReportEvent {
    pub fn category(&self) -> ReportCategory {
        match self {
            Self::DailyPlan(_) => ReportCategory::DailyPlanGenerated,
            Self::Warning(_) => ReportCategory::Warning,
            Self::Error(_) => ReportCategory::Error,
            Self::Status(_) => ReportCategory::StatusUpdate,
            Self::Critical(_) => ReportCategory::Critical,
            Self::Buttons(_) => ReportCategory::ButtonDetection,
            Self::Unclassified => ReportCategory::Unclassified,
        }
    }
}

/// A parsed report addressed to one device.
#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    pub device_id: String,
    pub event: ReportEvent,
}
