use chrono::{DateTime, Utc};

use pm_protocol::DeviceState;
use pm_store::DeviceRepository;

use crate::intents::{Intent, classify_intent};
use crate::render;
use crate::resolve::{Resolution, resolve_device};

/// Ambient facts the answers mention that do not live in the repository.
#[derive(Debug, Clone, Default)]
pub struct QueryContext {
    /// Channel the reports are read from.
    pub channel: String,
}

impl QueryContext {
    pub fn new(channel: impl Into<String>) -> Self {
        Self {
            channel: channel.into(),
        }
    }
}

/// Answer a free-text question. Never fails: unknown questions get help.
pub fn answer(
    question: &str,
    repo: &DeviceRepository,
    now: DateTime<Utc>,
    ctx: &QueryContext,
) -> String {
    let intent = classify_intent(question);
    tracing::debug!(intent = %intent, "question classified");

    match intent {
        Intent::BotStatus => render::bot_status(repo, now, ctx),
        Intent::FleetOverview => render::fleet_overview(repo, now),
        Intent::DownDevices => render::down_devices(repo, now),
        Intent::CriticalDevices => render::critical_devices(repo),
        Intent::ListDevices => render::list_devices(repo),
        Intent::NextPause => render::next_pause(),
        Intent::DeviceInfo => on_device(question, repo, render::device_info),
        Intent::LastPause => on_device(question, repo, render::last_pause),
        Intent::PauseCount => on_device(question, repo, render::pause_count),
        Intent::Errors => on_device(question, repo, render::errors),
        Intent::Warnings => on_device(question, repo, render::warnings),
        Intent::Buttons => on_device(question, repo, render::buttons),
        Intent::DailyPlan => on_device(question, repo, render::daily_plan),
        Intent::DeviceHealth => on_device(question, repo, |id, state| {
            render::device_health(id, state, now)
        }),
        Intent::Help => render::help(),
    }
}

/// Resolve the target device and render with it, or explain why not.
fn on_device(
    question: &str,
    repo: &DeviceRepository,
    answer_for: impl FnOnce(&str, &DeviceState) -> String,
) -> String {
    match resolve_device(question, repo) {
        Resolution::Found { id, state } => answer_for(id, state),
        unresolved => render::unresolved(&unresolved, repo),
    }
}
