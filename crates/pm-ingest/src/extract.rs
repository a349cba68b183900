//! Category-specific field extraction.
//!
//! Each sub-pattern is optional on its own: a field whose pattern does not
//! match becomes `None` and never aborts the rest of the parse.
//!
//! Word and digit classes are ASCII (`(?-u:\w)`, `[0-9]`) so accented
//! letters never extend a kind token or a number.

use regex::{Captures, Regex};
use std::str::FromStr;
use std::sync::LazyLock;

use pm_protocol::{ButtonProbe, Pause, TapProbe};

use crate::rules::{classify_category, extract_device_id};
use crate::types::{
    ButtonReport, CriticalReason, DailyPlanReport, ErrorReport, Report, ReportCategory,
    ReportEvent, StatusReport, WarningReport,
};

/// Placeholder used when a warning report has no description line.
pub const NO_DESCRIPTION: &str = "Sin descripción";

// Daily plan
static RE_PAUSE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Pausa #([0-9]+):\s*(.*?)\s*\(([0-9]+)\s*min\)").unwrap());
static RE_TOTAL_PAUSES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Total de pausas:\s*([0-9]+)").unwrap());
static RE_START: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Inicio:\s*([^\n]+?)(?:\n|Dispositivo:)").unwrap());
static RE_SONGS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Estimado canciones.*?:\s*([0-9]+)").unwrap());

// Warnings and errors
static RE_WARNING_KIND: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Warning\s+((?-u:\w)+)").unwrap());
static RE_ERROR_KIND: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Error\s+((?-u:\w)+)").unwrap());
static RE_REPETITION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Repeticion:\s*([0-9]+)\s*/\s*([0-9]+)").unwrap());
static RE_JAVA_EXCEPTION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"JavaException:\s*(.+)").unwrap());

// Status updates
static RE_ELAPSED_HOURS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Elapsed hours:\s*([0-9.]+)").unwrap());
static RE_SONGS_PLAYED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Songs played:\s*([0-9]+)").unwrap());
static RE_PAUSES_DONE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Pauses done:\s*([0-9]+)").unwrap());

// Button detection, markers may span lines. Answer tokens keep Unicode
// `\w` so an accented "sí" is captured whole.
static RE_PLAY_PAUSE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)Play/Pause.*?encontrado:\s*(\w+).*?clickable:\s*(\w+)").unwrap()
});
static RE_NEXT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)Next.*?encontrado:\s*(\w+).*?clickable:\s*(\w+)").unwrap());
static RE_DOUBLE_TAP: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)Doble tap.*?intentado:\s*(\w+).*?resultado:\s*(\w+)").unwrap()
});

/// Parse a raw report. Returns `None` when no device token is present.
pub fn parse_report(text: &str) -> Option<Report> {
    let device_id = extract_device_id(text)?.to_string();
    let event = match classify_category(text) {
        ReportCategory::DailyPlanGenerated => ReportEvent::DailyPlan(extract_daily_plan(text)),
        ReportCategory::Warning => ReportEvent::Warning(extract_warning(text)),
        ReportCategory::Error => ReportEvent::Error(extract_error(text)),
        ReportCategory::StatusUpdate => ReportEvent::Status(extract_status(text)),
        ReportCategory::Critical => ReportEvent::Critical(extract_critical_reason(text)),
        ReportCategory::ButtonDetection => ReportEvent::Buttons(extract_buttons(text)),
        ReportCategory::Unclassified => ReportEvent::Unclassified,
    };
    Some(Report { device_id, event })
}

pub fn extract_daily_plan(text: &str) -> DailyPlanReport {
    let pauses = RE_PAUSE
        .captures_iter(text)
        .filter_map(|caps| {
            Some(Pause {
                index: caps[1].parse().ok()?,
                scheduled_time: caps[2].to_string(),
                duration_minutes: caps[3].parse().ok()?,
            })
        })
        .collect();

    let start_time = RE_START
        .captures(text)
        .map(|caps| caps[1].trim().to_string())
        .filter(|s| !s.is_empty());

    DailyPlanReport {
        pauses,
        total_pauses: capture_number(&RE_TOTAL_PAUSES, text),
        start_time,
        estimated_songs: capture_number(&RE_SONGS, text),
    }
}

pub fn extract_warning(text: &str) -> WarningReport {
    // A whitespace-only line is still a description, stored empty.
    let description = text
        .split('\n')
        .nth(2)
        .filter(|line| !line.is_empty())
        .map(|line| line.trim().to_string());

    WarningReport {
        kind: capture_str(&RE_WARNING_KIND, text).unwrap_or_default(),
        description,
        repetition: extract_repetition(text),
    }
}

pub fn extract_error(text: &str) -> ErrorReport {
    ErrorReport {
        kind: capture_str(&RE_ERROR_KIND, text).unwrap_or_default(),
        exception_text: RE_JAVA_EXCEPTION
            .captures(text)
            .map(|caps| caps[1].trim().to_string())
            .filter(|s| !s.is_empty()),
        repetition: extract_repetition(text),
    }
}

pub fn extract_status(text: &str) -> StatusReport {
    StatusReport {
        elapsed_hours: RE_ELAPSED_HOURS
            .captures(text)
            .and_then(|caps| leading_decimal(&caps[1])),
        songs_played: capture_number(&RE_SONGS_PLAYED, text),
        pauses_done: capture_number(&RE_PAUSES_DONE, text),
    }
}

pub fn extract_critical_reason(text: &str) -> CriticalReason {
    if text.contains("Next") {
        CriticalReason::NextButtonMissing
    } else {
        CriticalReason::ScriptStopped
    }
}

pub fn extract_buttons(text: &str) -> ButtonReport {
    ButtonReport {
        play_pause: capture_pair(&RE_PLAY_PAUSE, text).map(|(found, clickable)| ButtonProbe {
            found,
            clickable,
        }),
        next: capture_pair(&RE_NEXT, text).map(|(found, clickable)| ButtonProbe {
            found,
            clickable,
        }),
        double_tap: capture_pair(&RE_DOUBLE_TAP, text)
            .map(|(attempted, result)| TapProbe { attempted, result }),
    }
}

/// "m/n" from a `Repeticion: m / n` token.
fn extract_repetition(text: &str) -> Option<String> {
    RE_REPETITION
        .captures(text)
        .map(|caps| format!("{}/{}", &caps[1], &caps[2]))
}

fn capture_str(re: &Regex, text: &str) -> Option<String> {
    re.captures(text).map(|caps| caps[1].to_string())
}

fn capture_number<T: FromStr>(re: &Regex, text: &str) -> Option<T> {
    re.captures(text).and_then(|caps| caps[1].parse().ok())
}

/// Longest decimal prefix of a digits-and-dots token: `1.2.3` reads as 1.2.
fn leading_decimal(token: &str) -> Option<f64> {
    let end = token
        .match_indices('.')
        .nth(1)
        .map_or(token.len(), |(idx, _)| idx);
    token[..end].parse().ok()
}

fn capture_pair(re: &Regex, text: &str) -> Option<(String, String)> {
    re.captures(text).map(|caps: Captures<'_>| (caps[1].to_string(), caps[2].to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    const PLAN: &str = "📅 Plan diario generado\n\
        Inicio: 08:00 Dispositivo: A1\n\
        Pausa #1: 10:15 (12 min)\n\
        Pausa #2: 14:40 (7 min)\n\
        Pausa #3: 19:05 (20 min)\n\
        Total de pausas: 3\n\
        Estimado canciones (24h): 312\n\
        Device: A1";

    #[test]
    fn daily_plan_full() {
        let plan = extract_daily_plan(PLAN);
        assert_eq!(plan.pauses.len(), 3);
        assert_eq!(plan.pauses[0].index, 1);
        assert_eq!(plan.pauses[0].scheduled_time, "10:15");
        assert_eq!(plan.pauses[2].duration_minutes, 20);
        assert_eq!(plan.total_pauses, Some(3));
        assert_eq!(plan.start_time.as_deref(), Some("08:00"));
        assert_eq!(plan.estimated_songs, Some(312));
    }

    #[test]
    fn daily_plan_total_falls_back_to_count() {
        let plan = extract_daily_plan("Plan diario generado\nPausa #1: 9:00 (5 min)\nPausa #2: 12:00 (5 min)");
        assert_eq!(plan.total_pauses, None);
        assert_eq!(plan.effective_total(), 2);
        assert!(plan.estimated_songs.is_none());
    }

    #[test]
    fn daily_plan_start_terminated_by_newline() {
        let plan = extract_daily_plan("Plan diario generado\nInicio:  07:30 AM  \nDevice: A1");
        assert_eq!(plan.start_time.as_deref(), Some("07:30 AM"));
    }

    #[test]
    fn daily_plan_start_on_next_line() {
        let plan = extract_daily_plan("Plan diario generado\nInicio:\n08:00\nDevice: A1");
        assert_eq!(plan.start_time.as_deref(), Some("08:00"));
    }

    #[test]
    fn daily_plan_large_song_estimate() {
        let plan = extract_daily_plan("Plan diario generado\nEstimado canciones: 5000000000\n");
        assert_eq!(plan.estimated_songs, Some(5_000_000_000));
    }

    #[test]
    fn daily_plan_start_without_terminator_is_absent() {
        let plan = extract_daily_plan("Plan diario generado\nInicio: 07:30");
        assert!(plan.start_time.is_none());
    }

    #[test]
    fn daily_plan_without_pauses() {
        let plan = extract_daily_plan("Plan diario generado\nDevice: A1");
        assert!(plan.pauses.is_empty());
        assert_eq!(plan.effective_total(), 0);
    }

    #[test]
    fn warning_fields() {
        let text = "⚠️ Warning SlowNetwork\nDevice: A1\nLatency above threshold \nRepeticion: 2 / 5";
        let warning = extract_warning(text);
        assert_eq!(warning.kind, "SlowNetwork");
        assert_eq!(warning.description.as_deref(), Some("Latency above threshold"));
        assert_eq!(warning.repetition.as_deref(), Some("2/5"));
    }

    #[test]
    fn warning_without_third_line() {
        let warning = extract_warning("Warning Glitch\nDevice: A1");
        assert!(warning.description.is_none());
        assert!(warning.repetition.is_none());
    }

    #[test]
    fn warning_blank_third_line_is_empty_description() {
        let warning = extract_warning("Warning Glitch\nDevice: A1\n   \nRepeticion: 1/2");
        assert_eq!(warning.description.as_deref(), Some(""));

        let warning = extract_warning("Warning Glitch\nDevice: A1\n\nRepeticion: 1/2");
        assert!(warning.description.is_none());
    }

    #[test]
    fn kind_stops_at_non_ascii_letter() {
        assert_eq!(extract_warning("Warning Señal\nDevice: A1").kind, "Se");
        assert_eq!(extract_error("Error Conexión\nDevice: A1").kind, "Conexi");
    }

    #[test]
    fn error_fields() {
        let text = "Error PlaybackFailed\nDevice: B2\nJavaException: java.lang.IllegalStateException: boom  \nRepeticion: 1/3";
        let error = extract_error(text);
        assert_eq!(error.kind, "PlaybackFailed");
        assert_eq!(
            error.exception_text.as_deref(),
            Some("java.lang.IllegalStateException: boom")
        );
        assert_eq!(error.repetition.as_deref(), Some("1/3"));
    }

    #[test]
    fn error_without_exception() {
        let error = extract_error("Error Timeout\nDevice: B2");
        assert_eq!(error.kind, "Timeout");
        assert!(error.exception_text.is_none());
    }

    #[test]
    fn status_fields() {
        let status =
            extract_status("Device: A1\nStatus update\nElapsed hours: 1.5\nSongs played: 10\nPauses done: 2");
        assert_eq!(status.elapsed_hours, Some(1.5));
        assert_eq!(status.songs_played, Some(10));
        assert_eq!(status.pauses_done, Some(2));
    }

    #[test]
    fn status_partial_and_malformed() {
        let status = extract_status("Status update\nElapsed hours: 1.2.3\nSongs played: 5000000000");
        assert_eq!(status.elapsed_hours, Some(1.2));
        assert_eq!(status.songs_played, Some(5_000_000_000));
        assert!(status.pauses_done.is_none());

        let status = extract_status("Status update\nElapsed hours: .\nSongs played: 99999999999999999999");
        assert!(status.elapsed_hours.is_none());
        assert!(status.songs_played.is_none());
    }

    #[test]
    fn leading_decimal_prefixes() {
        assert_eq!(leading_decimal("3"), Some(3.0));
        assert_eq!(leading_decimal("2."), Some(2.0));
        assert_eq!(leading_decimal(".5.1"), Some(0.5));
        assert_eq!(leading_decimal("..5"), None);
    }

    #[test]
    fn digit_classes_are_ascii() {
        // Arabic-Indic digits are not counts.
        let status = extract_status("Status update\nSongs played: ١٢\nPauses done: 3");
        assert!(status.songs_played.is_none());
        assert_eq!(status.pauses_done, Some(3));
    }

    #[test]
    fn critical_reason_depends_on_next() {
        assert_eq!(
            extract_critical_reason("CRITICAL: Next button not found"),
            CriticalReason::NextButtonMissing
        );
        assert_eq!(
            extract_critical_reason("Stopping QA bot"),
            CriticalReason::ScriptStopped
        );
    }

    #[test]
    fn buttons_across_lines() {
        let text = "Resultados deteccion botones\nDevice: A1\n\
            Play/Pause\n  encontrado: si\n  clickable: si\n\
            Next\n  encontrado: no\n  clickable: no\n\
            Doble tap\n  intentado: si\n  resultado: ok";
        let buttons = extract_buttons(text);
        let pp = buttons.play_pause.unwrap();
        assert_eq!((pp.found.as_str(), pp.clickable.as_str()), ("si", "si"));
        let next = buttons.next.unwrap();
        assert_eq!((next.found.as_str(), next.clickable.as_str()), ("no", "no"));
        let tap = buttons.double_tap.unwrap();
        assert_eq!((tap.attempted.as_str(), tap.result.as_str()), ("si", "ok"));
    }

    #[test]
    fn buttons_partial() {
        let buttons = extract_buttons(
            "Inicio del script - deteccion de botones\nDoble tap intentado: no resultado: skip",
        );
        assert!(buttons.play_pause.is_none());
        assert!(buttons.next.is_none());
        assert_eq!(buttons.double_tap.unwrap().result, "skip");
    }

    #[test]
    fn parse_report_requires_device() {
        assert!(parse_report("Status update\nSongs played: 3").is_none());

        let report = parse_report("Device: A1\nStatus update\nSongs played: 3").unwrap();
        assert_eq!(report.device_id, "A1");
        assert_eq!(report.event.category(), ReportCategory::StatusUpdate);
    }

    #[test]
    fn parse_report_unclassified() {
        let report = parse_report("Device: Z9\nhello there").unwrap();
        assert_eq!(report.event, ReportEvent::Unclassified);
    }
}
