//! Answer rendering, one function per intent.

use chrono::{DateTime, Utc};

use pm_protocol::{
    DeviceState, HealthStatus, evaluate, hours_since_report, is_silent, recent_errors,
    recent_warnings,
};
use pm_store::DeviceRepository;

use crate::engine::QueryContext;
use crate::resolve::Resolution;

/// Errors and warnings listed per answer.
pub const LIST_LIMIT: usize = 5;

pub const NO_DEVICES: &str = "📭 No hay dispositivos registrados.";
pub const NO_DEVICES_YET: &str = "📭 No hay dispositivos registrados aún.";
pub const NEXT_PAUSE_UNTRACKED: &str = "🔮 No tengo horarios futuros registrados aún. \
    Solo guardo el plan de pausas más reciente de cada dispositivo.";

// ── Formatting helpers ────────────────────────────────────────

pub fn format_time(at: DateTime<Utc>) -> String {
    at.format("%d/%m/%Y, %H:%M:%S UTC").to_string()
}

fn format_last_report(state: &DeviceState) -> String {
    state
        .last_report_at
        .map(format_time)
        .unwrap_or_else(|| "Nunca".to_string())
}

fn format_hours(state: &DeviceState, now: DateTime<Utc>) -> String {
    hours_since_report(state, now)
        .map(|h| format!("{h:.1}"))
        .unwrap_or_else(|| "∞".to_string())
}

fn yes(value: &str) -> bool {
    matches!(value.to_lowercase().as_str(), "si" | "sí" | "yes" | "true")
}

// ── Fleet-wide intents ────────────────────────────────────────

pub fn bot_status(repo: &DeviceRepository, now: DateTime<Utc>, ctx: &QueryContext) -> String {
    format!(
        "✅ ¡Estoy activo y funcionando perfectamente!\n\n\
         📊 **Estado actual:**\n\
         - {} dispositivo(s) registrado(s)\n\
         - Monitoreando canal: {}\n\
         - Hora actual: {}",
        repo.len(),
        ctx.channel,
        format_time(now)
    )
}

pub fn fleet_overview(repo: &DeviceRepository, now: DateTime<Utc>) -> String {
    if repo.is_empty() {
        return NO_DEVICES_YET.to_string();
    }

    let (mut healthy, mut degraded, mut critical, mut silent) = (0, 0, 0, 0);
    let mut detail = Vec::with_capacity(repo.len());
    for (id, state) in repo.iter() {
        let status = evaluate(state, now);
        match status {
            HealthStatus::Healthy => healthy += 1,
            HealthStatus::Degraded => degraded += 1,
            HealthStatus::Critical => critical += 1,
            HealthStatus::Unresponsive => silent += 1,
        }
        detail.push(format!(
            "{} **{id}**: {} ({}h desde último reporte)",
            status.icon(),
            status.label(),
            format_hours(state, now)
        ));
    }

    format!(
        "📊 **Resumen General - {} dispositivos**\n\n\
         ✅ Saludables: {healthy}\n\
         ⚠️ Con problemas: {degraded}\n\
         🚨 Críticos: {critical}\n\
         💀 Sin reportar (>2h): {silent}\n\n\
         **Detalle:**\n{}",
        repo.len(),
        detail.join("\n")
    )
}

pub fn down_devices(repo: &DeviceRepository, now: DateTime<Utc>) -> String {
    if repo.is_empty() {
        return NO_DEVICES.to_string();
    }

    let down: Vec<String> = repo
        .iter()
        .filter(|(_, state)| state.critical || is_silent(state, now))
        .map(|(id, state)| {
            let reason = if state.critical {
                format!(
                    "🚨 CRÍTICO: {}",
                    state.critical_reason.as_deref().unwrap_or("sin motivo")
                )
            } else {
                format!("💀 Sin reportar ({}h)", format_hours(state, now))
            };
            format!(
                "**{id}**\n   {reason}\n   Último reporte: {}",
                format_last_report(state)
            )
        })
        .collect();

    if down.is_empty() {
        return format!(
            "✅ ¡Todos los {} dispositivos están reportando correctamente!",
            repo.len()
        );
    }
    format!(
        "⚠️ **{} de {} dispositivos tienen problemas:**\n\n{}",
        down.len(),
        repo.len(),
        down.join("\n\n")
    )
}

pub fn critical_devices(repo: &DeviceRepository) -> String {
    if repo.is_empty() {
        return NO_DEVICES.to_string();
    }

    let critical: Vec<String> = repo
        .iter()
        .filter(|(_, state)| state.critical)
        .map(|(id, state)| {
            format!(
                "🚨 **{id}**\n   Motivo: {}\n   Último reporte: {}",
                state.critical_reason.as_deref().unwrap_or("sin motivo"),
                format_last_report(state)
            )
        })
        .collect();

    if critical.is_empty() {
        return "✅ No hay dispositivos en estado crítico.".to_string();
    }
    format!(
        "🚨 **{} dispositivo(s) en estado CRÍTICO:**\n\n{}",
        critical.len(),
        critical.join("\n\n")
    )
}

pub fn list_devices(repo: &DeviceRepository) -> String {
    if repo.is_empty() {
        return format!("{NO_DEVICES_YET} Esperando reportes...");
    }

    let lines: Vec<String> = repo
        .iter()
        .enumerate()
        .map(|(i, (id, state))| {
            format!(
                "{}. **{id}** - Último reporte: {} ({} pausas)",
                i + 1,
                format_last_report(state),
                state.pauses.len()
            )
        })
        .collect();
    format!(
        "📱 **Dispositivos registrados ({}):**\n\n{}",
        repo.len(),
        lines.join("\n")
    )
}

pub fn next_pause() -> String {
    NEXT_PAUSE_UNTRACKED.to_string()
}

// ── Device-scoped intents ─────────────────────────────────────

/// Answer for a resolution that did not find a device.
pub fn unresolved(resolution: &Resolution<'_>, repo: &DeviceRepository) -> String {
    match resolution {
        Resolution::NotFound { requested } => {
            let ids = repo.list_ids();
            let available = if ids.is_empty() {
                "ninguno".to_string()
            } else {
                ids.join(", ")
            };
            format!(
                "❌ No encontré información del device \"{requested}\". Dispositivos disponibles: {available}"
            )
        }
        Resolution::NoDevices | Resolution::Found { .. } => NO_DEVICES.to_string(),
    }
}

pub fn device_info(id: &str, state: &DeviceState) -> String {
    let pauses = if state.pauses.is_empty() {
        "  Sin pausas registradas".to_string()
    } else {
        state
            .pauses
            .iter()
            .enumerate()
            .map(|(i, p)| format!("  {}. {} ({} min)", i + 1, p.scheduled_time, p.duration_minutes))
            .collect::<Vec<_>>()
            .join("\n")
    };
    format!(
        "📱 **Device {id}**\n\n⏰ Último reporte: {}\n📋 Pausas registradas: {}\n\n{pauses}",
        format_last_report(state),
        state.pauses.len()
    )
}

pub fn last_pause(id: &str, state: &DeviceState) -> String {
    match state.last_pause() {
        Some(pause) => format!(
            "🕒 **Última pausa de {id}:**\n\nPausa #{}\nHora: {}\nDuración: {} minutos",
            pause.index, pause.scheduled_time, pause.duration_minutes
        ),
        None => format!("❌ No hay pausas registradas para {id}."),
    }
}

pub fn pause_count(id: &str, state: &DeviceState) -> String {
    format!(
        "📊 **{id}** tiene **{} pausa(s)** registrada(s)",
        state.pauses.len()
    )
}

pub fn errors(id: &str, state: &DeviceState) -> String {
    if state.errors.is_empty() {
        return format!("✅ **{id}** no tiene errores registrados. ¡Todo bien!");
    }
    let latest: Vec<String> = state
        .errors
        .iter()
        .rev()
        .take(LIST_LIMIT)
        .enumerate()
        .map(|(i, e)| {
            format!(
                "{}. **{}** ({})\n   {}\n   Repetición: {}",
                i + 1,
                e.kind,
                format_time(e.timestamp),
                e.exception_text.as_deref().unwrap_or("Sin detalles"),
                e.repetition.as_deref().unwrap_or("N/A")
            )
        })
        .collect();
    format!(
        "❌ **{id}** - Últimos {} errores:\n\n{}\n\n📊 Total: {} errores",
        latest.len(),
        latest.join("\n\n"),
        state.errors.len()
    )
}

pub fn warnings(id: &str, state: &DeviceState) -> String {
    if state.warnings.is_empty() {
        return format!("✅ **{id}** no tiene warnings registrados. ¡Todo bien!");
    }
    let latest: Vec<String> = state
        .warnings
        .iter()
        .rev()
        .take(LIST_LIMIT)
        .enumerate()
        .map(|(i, w)| {
            format!(
                "{}. **{}** ({})\n   {}\n   Repetición: {}",
                i + 1,
                w.kind,
                format_time(w.timestamp),
                w.description,
                w.repetition.as_deref().unwrap_or("N/A")
            )
        })
        .collect();
    format!(
        "⚠️ **{id}** - Últimos {} warnings:\n\n{}\n\n📊 Total: {} warnings",
        latest.len(),
        latest.join("\n\n"),
        state.warnings.len()
    )
}

pub fn buttons(id: &str, state: &DeviceState) -> String {
    let Some(buttons) = &state.button_state else {
        return format!("❌ No hay información de botones para {id}.");
    };

    let probe = |probe: Option<&pm_protocol::ButtonProbe>| match probe {
        Some(p) => format!(
            "{} Encontrado: {}, Clickable: {}",
            if yes(&p.found) { "✅" } else { "❌" },
            p.found,
            p.clickable
        ),
        None => "❌ No detectado".to_string(),
    };
    let tap = match &buttons.double_tap {
        Some(t) => format!(
            "{} Intentado: {}, Resultado: {}",
            if t.result.eq_ignore_ascii_case("ok") { "✅" } else { "❌" },
            t.attempted,
            t.result
        ),
        None => "❌ No detectado".to_string(),
    };

    format!(
        "🔘 **Estado de botones - {id}**\n\n\
         **Play/Pause:** {}\n\
         **Next:** {}\n\
         **Doble Tap:** {tap}\n\n\
         ⏰ Última detección: {}",
        probe(buttons.play_pause.as_ref()),
        probe(buttons.next.as_ref()),
        format_time(buttons.timestamp)
    )
}

pub fn daily_plan(id: &str, state: &DeviceState) -> String {
    if state.daily_plan.is_none() && state.estimated_songs.is_none() {
        return format!("❌ No hay plan diario registrado para {id}.");
    }

    let mut out = String::new();
    if let Some(plan) = &state.daily_plan {
        out.push_str(&format!(
            "📅 **Plan diario de {id}:**\n\
             - Inicio: {}\n\
             - Total pausas: {}\n\
             - Generado: {}\n\n",
            plan.start_time.as_deref().unwrap_or("desconocido"),
            plan.total_pauses,
            format_time(plan.generated_at)
        ));
    }
    match state.estimated_songs {
        Some(songs) => out.push_str(&format!("🎵 **Estimado canciones (24h):** {songs}")),
        None => out.push_str("🎵 Sin estimado de canciones"),
    }
    out
}

pub fn device_health(id: &str, state: &DeviceState, now: DateTime<Utc>) -> String {
    let status = evaluate(state, now);
    let mut out = format!(
        "📊 **Resumen de {id}**\n\n\
         **Estado:** {} {}\n\
         **Último reporte:** {}\n\
         **Pausas:** {}\n\
         **Errores:** {} ({} recientes)\n\
         **Warnings:** {} ({} recientes)\n\
         **Botones:** {}",
        status.icon(),
        status.label(),
        format_last_report(state),
        state.pauses.len(),
        state.errors.len(),
        recent_errors(state),
        state.warnings.len(),
        recent_warnings(state),
        if state.button_state.is_some() {
            "✅ Detectados"
        } else {
            "❌ No detectados"
        }
    );
    if let Some(reason) = state.critical_reason.as_deref().filter(|_| state.critical) {
        out.push_str(&format!("\n**Motivo crítico:** {reason}"));
    }
    out
}

// ── Fallback ──────────────────────────────────────────────────

pub fn help() -> String {
    "🤔 No entendí tu pregunta. Puedo ayudarte con:\n\n\
     • **Resumen general**: \"¿Cómo va todo?\" / \"¿Todo bien?\"\n\
     • **Dispositivos caídos**: \"¿Se cayó algún equipo?\" / \"Dispositivos caídos\"\n\
     • **Críticos**: \"Dispositivos críticos\" / \"Alertas\"\n\
     • **Estado del bot**: \"¿Estás activo?\" / \"status\"\n\
     • **Dispositivos**: \"Lista dispositivos\" / \"Qué dispositivos\"\n\
     • **Info de un equipo**: \"device ABC\" / \"Info del device\"\n\
     • **Salud**: \"Salud\" / \"Resumen\"\n\
     • **Pausas**: \"Última pausa\" / \"Cuántas pausas\"\n\
     • **Errores**: \"Últimos errores\"\n\
     • **Warnings**: \"Warnings\" / \"Advertencias\"\n\
     • **Botones**: \"Estado botones\"\n\
     • **Plan diario**: \"Plan diario\" / \"Cuántas canciones\"\n\n\
     Sin \"device ABC\" respondo sobre el primer dispositivo registrado."
        .to_string()
}
