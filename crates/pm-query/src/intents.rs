//! Ordered intent rules for operator questions.
//!
//! Rules are checked top to bottom and the first match wins, so a broad
//! trigger early in the list shadows narrower ones below it. For example
//! any question containing `device <id>` is a device-info question, even
//! if it also mentions errors.

use regex::Regex;
use serde::Serialize;
use std::sync::LazyLock;

/// What the operator is asking about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    BotStatus,
    FleetOverview,
    DownDevices,
    CriticalDevices,
    ListDevices,
    DeviceInfo,
    LastPause,
    NextPause,
    PauseCount,
    Errors,
    Warnings,
    Buttons,
    DailyPlan,
    DeviceHealth,
    Help,
}

impl Intent {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::BotStatus => "bot_status",
            Self::FleetOverview => "fleet_overview",
            Self::DownDevices => "down_devices",
            Self::CriticalDevices => "critical_devices",
            Self::ListDevices => "list_devices",
            Self::DeviceInfo => "device_info",
            Self::LastPause => "last_pause",
            Self::NextPause => "next_pause",
            Self::PauseCount => "pause_count",
            Self::Errors => "errors",
            Self::Warnings => "warnings",
            Self::Buttons => "buttons",
            Self::DailyPlan => "daily_plan",
            Self::DeviceHealth => "device_health",
            Self::Help => "help",
        }
    }
}

impl std::fmt::Display for Intent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

struct IntentRule {
    intent: Intent,
    patterns: Vec<Regex>,
    phrases: &'static [&'static str],
}

impl IntentRule {
    fn new(intent: Intent, patterns: &[&str], phrases: &'static [&'static str]) -> Self {
        Self {
            intent,
            patterns: patterns.iter().map(|p| Regex::new(p).unwrap()).collect(),
            phrases,
        }
    }

    fn matches(&self, question: &str) -> bool {
        self.patterns.iter().any(|re| re.is_match(question))
            || self.phrases.iter().any(|p| question.contains(p))
    }
}

// Patterns run against the lowercased question.
static INTENT_RULES: LazyLock<Vec<IntentRule>> = LazyLock::new(|| {
    vec![
        IntentRule::new(
            Intent::BotStatus,
            &[
                r"est(á|a)s?\s+(vivo|activo|funcionando|online|disponible)",
                r"(cómo|como)\s+est(á|a)s",
            ],
            &["status", "estado del bot"],
        ),
        IntentRule::new(
            Intent::FleetOverview,
            &[r"c(ó|o)mo\s+(va|anda|est(á|a))\s+todo|todo\s+(bien|ok|okay)|general|overview"],
            &[],
        ),
        IntentRule::new(
            Intent::DownDevices,
            &[r"se\s+ca(y|i)(ó|o)|ca(í|i)dos?|sin\s+reportar|no\s+reportan|inactivos?"],
            &[],
        ),
        IntentRule::new(
            Intent::CriticalDevices,
            &[r"cr(í|i)ticos?|emergencia|alerta"],
            &[],
        ),
        IntentRule::new(
            Intent::ListDevices,
            &[r"(qu(é|e)|cu(á|a)ntos|lista|todos)\s+(dispositivos|devices)"],
            &["qué dispositivos", "lista dispositivos"],
        ),
        IntentRule::new(
            Intent::DeviceInfo,
            &[r"info(rmación)?\s+(de|del)?\s*device", r"\bdevice\s+\S+"],
            &[],
        ),
        IntentRule::new(Intent::LastPause, &[r"(última|ultima|last)\s+pausa"], &[]),
        IntentRule::new(
            Intent::NextPause,
            &[r"(próxima|proxima|next|siguiente)\s+pausa"],
            &[],
        ),
        IntentRule::new(Intent::PauseCount, &[r"(cu(á|a)ntas|total)\s+pausas"], &[]),
        IntentRule::new(Intent::Errors, &[r"errores?|errors?"], &[]),
        IntentRule::new(Intent::Warnings, &[r"warnings?|advertencias?"], &[]),
        IntentRule::new(Intent::Buttons, &[r"botones?"], &[]),
        IntentRule::new(
            Intent::DailyPlan,
            &[r"plan.*diario|cu(á|a)ntas.*canciones|estimado.*canciones"],
            &[],
        ),
        IntentRule::new(
            Intent::DeviceHealth,
            &[r"salud|health|estado general|resumen|overview"],
            &[],
        ),
    ]
});

/// Normalize a question for matching.
pub fn normalize(question: &str) -> String {
    question.trim().to_lowercase()
}

/// Classify a question into exactly one intent.
pub fn classify_intent(question: &str) -> Intent {
    let normalized = normalize(question);
    INTENT_RULES
        .iter()
        .find(|rule| rule.matches(&normalized))
        .map(|rule| rule.intent)
        .unwrap_or(Intent::Help)
}
