//! Device token resolution and ordered category classification.

use regex::Regex;
use std::sync::LazyLock;

use crate::types::ReportCategory;

static RE_DEVICE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"Device:\s*(\S+)").unwrap());

/// How a category rule recognizes a report.
enum Trigger {
    /// Any of the literal phrases appears in the text.
    Phrases(&'static [&'static str]),
    /// The pattern matches somewhere in the text.
    Pattern(Regex),
}

impl Trigger {
    fn matches(&self, text: &str) -> bool {
        match self {
            Self::Phrases(phrases) => phrases.iter().any(|p| text.contains(p)),
            Self::Pattern(re) => re.is_match(text),
        }
    }
}

struct CategoryRule {
    category: ReportCategory,
    trigger: Trigger,
}

// Checked in order, first match wins. A report that contains both a warning
// token and "Status update" is a warning.
static CATEGORY_RULES: LazyLock<Vec<CategoryRule>> = LazyLock::new(|| {
    vec![
        CategoryRule {
            category: ReportCategory::DailyPlanGenerated,
            trigger: Trigger::Phrases(&["Plan diario generado"]),
        },
        CategoryRule {
            category: ReportCategory::Warning,
            trigger: Trigger::Pattern(Regex::new(r"Warning\s+(?-u:\w)+").unwrap()),
        },
        CategoryRule {
            category: ReportCategory::Error,
            trigger: Trigger::Pattern(Regex::new(r"Error\s+(?-u:\w)+").unwrap()),
        },
        CategoryRule {
            category: ReportCategory::StatusUpdate,
            trigger: Trigger::Phrases(&["Status update"]),
        },
        CategoryRule {
            category: ReportCategory::Critical,
            trigger: Trigger::Phrases(&["CRITICAL", "Stopping QA bot"]),
        },
        CategoryRule {
            category: ReportCategory::ButtonDetection,
            trigger: Trigger::Phrases(&[
                "Inicio del script - deteccion de botones",
                "Resultados deteccion botones",
            ]),
        },
    ]
});

/// Extract the device token following `Device:`.
pub fn extract_device_id(text: &str) -> Option<&str> {
    RE_DEVICE
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Classify report text into exactly one category.
pub fn classify_category(text: &str) -> ReportCategory {
    CATEGORY_RULES
        .iter()
        .find(|rule| rule.trigger.matches(text))
        .map(|rule| rule.category)
        .unwrap_or(ReportCategory::Unclassified)
}
