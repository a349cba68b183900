//! Event extraction engine for device reports.
//!
//! Turns free-text reports into typed events: resolves the device token,
//! classifies the report with an ordered first-match rule list, extracts
//! the category's fields, and applies the result to a `DeviceRepository`.
//! Malformed input never fails; missing pieces become `None`.

pub mod apply;
pub mod extract;
pub mod rules;
pub mod types;

// Re-export key types for convenience
pub use apply::{apply, classify_and_apply};
pub use extract::parse_report;
pub use rules::{classify_category, extract_device_id};
pub use types::{
    ButtonReport, CriticalReason, DailyPlanReport, ErrorReport, Report, ReportCategory,
    ReportEvent, StatusReport, WarningReport,
};
