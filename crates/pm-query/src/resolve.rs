//! Target device resolution for device-scoped questions.

use regex::Regex;
use std::sync::LazyLock;

use pm_protocol::DeviceState;
use pm_store::DeviceRepository;

static RE_DEVICE_REF: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bdevice\s+(\S+)").unwrap());

const TRAILING_PUNCTUATION: &[char] = &['?', '!', '.', ',', ';', ':', '"', '\'', ')'];

/// Outcome of resolving the device a question is about.
#[derive(Debug)]
pub enum Resolution<'a> {
    Found { id: &'a str, state: &'a DeviceState },
    /// An explicit id that matches no known device.
    NotFound { requested: String },
    /// No explicit id and no devices registered.
    NoDevices,
}

/// Explicit `device <id>` reference in the question, as typed.
pub fn explicit_device_ref(question: &str) -> Option<&str> {
    RE_DEVICE_REF
        .captures(question)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim_end_matches(TRAILING_PUNCTUATION))
        .filter(|id| !id.is_empty())
}

/// Resolve the target device: an explicit reference if present, otherwise
/// the first registered device.
///
/// Explicit ids match exactly first, then ignoring case.
pub fn resolve_device<'a>(question: &str, repo: &'a DeviceRepository) -> Resolution<'a> {
    match explicit_device_ref(question) {
        Some(requested) => {
            let exact = repo.iter().find(|(id, _)| *id == requested);
            let found = exact.or_else(|| {
                let wanted = requested.to_lowercase();
                repo.iter().find(|(id, _)| id.to_lowercase() == wanted)
            });
            match found {
                Some((id, state)) => Resolution::Found { id, state },
                None => Resolution::NotFound {
                    requested: requested.to_string(),
                },
            }
        }
        None => match repo.iter().next() {
            Some((id, state)) => Resolution::Found { id, state },
            None => Resolution::NoDevices,
        },
    }
}
