//! E2E tests for operator questions answered from ingested reports.

mod helpers;

use chrono::{Duration, Utc};

use helpers::TestHarness;
use pm_protocol::{HealthStatus, evaluate};

/// The overview on an empty fleet is the empty-state message.
#[tokio::test]
async fn e2e_overview_empty_fleet() {
    let h = TestHarness::new();
    assert_eq!(
        h.ask("¿Todo bien?").await,
        "📭 No hay dispositivos registrados aún."
    );
}

/// One critical and one healthy device are counted separately.
#[tokio::test]
async fn e2e_overview_counts() {
    let h = TestHarness::new();
    h.report("Device: A1\nStopping QA bot").await;
    h.report("Device: A2\nStatus update\nSongs played: 12").await;

    let answer = h.ask("¿Todo bien?").await;
    assert!(answer.contains("Resumen General - 2 dispositivos"));
    assert!(answer.contains("Saludables: 1"));
    assert!(answer.contains("Críticos: 1"));
    assert!(answer.contains("Con problemas: 0"));
}

/// A question without a device id is about the first registered device.
#[tokio::test]
async fn e2e_default_device_is_first_registered() {
    let h = TestHarness::new();
    h.report("Error Crash\nDevice: A1\nJavaException: NullPointer").await;
    h.report("Error Freeze\nDevice: A2").await;

    let answer = h.ask("últimos errores").await;
    assert!(answer.contains("**A1**"));
    assert!(answer.contains("NullPointer"));
    assert!(!answer.contains("Freeze"));

    let answer = h.ask("últimos errores device A2").await;
    // The device reference wins over the topic.
    assert!(answer.starts_with("📱 **Device A2**"));
}

/// The critical flag dominates a fresh, error-free device.
#[tokio::test]
async fn e2e_critical_flag_dominates_health() {
    let h = TestHarness::new();
    h.report("Device: A1\nCRITICAL: Next button not found").await;

    let state = h.device("A1").await.unwrap();
    assert!(state.errors.is_empty() && state.warnings.is_empty());
    assert_eq!(evaluate(&state, Utc::now()), HealthStatus::Critical);
    assert!(h.ask("salud").await.contains("🚨 CRÍTICO"));
}

/// A device quiet for three hours is unresponsive and shows up as down.
#[tokio::test]
async fn e2e_silent_device_is_down() {
    let h = TestHarness::new();
    h.report("Device: A1\nStatus update\nSongs played: 3").await;
    h.report("Device: A2\nStatus update\nSongs played: 4").await;
    h.with_repo(|repo| {
        repo.upsert("A1").last_report_at = Some(Utc::now() - Duration::hours(3));
    })
    .await;

    let state = h.device("A1").await.unwrap();
    assert_eq!(evaluate(&state, Utc::now()), HealthStatus::Unresponsive);

    let answer = h.ask("¿Se cayó algún equipo?").await;
    assert!(answer.contains("1 de 2 dispositivos"));
    assert!(answer.contains("**A1**"));
    assert!(!answer.contains("**A2**"));
}

/// Explicit unknown ids list what is available.
#[tokio::test]
async fn e2e_unknown_device_question() {
    let h = TestHarness::new();
    h.report("Device: A1\nhola").await;

    let answer = h.ask("device QQ").await;
    assert!(answer.contains("\"QQ\""));
    assert!(answer.contains("Dispositivos disponibles: A1"));
}

/// Pause questions read the stored daily plan.
#[tokio::test]
async fn e2e_pause_questions() {
    let h = TestHarness::new();
    h.report(
        "Plan diario generado\n\
         Pausa #1: 10:15 (12 min)\n\
         Pausa #2: 14:40 (7 min)\n\
         Device: A1",
    )
    .await;

    let last = h.ask("¿Última pausa?").await;
    assert!(last.contains("Pausa #2"));
    assert!(last.contains("14:40"));
    assert!(h.ask("cuántas pausas").await.contains("**2 pausa(s)**"));
    assert!(h.ask("próxima pausa").await.starts_with("🔮"));
}

/// Unrecognized questions get the help text, never an error.
#[tokio::test]
async fn e2e_unknown_question_gets_help() {
    let h = TestHarness::new();
    let answer = h.ask("¿qué hora es?").await;
    assert!(answer.starts_with("🤔 No entendí tu pregunta."));
}
