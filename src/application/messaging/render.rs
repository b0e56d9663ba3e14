//! Plain-text rendering of command outcomes

use chrono::Local;

use crate::application::errors::ResolveError;
use crate::application::services::{CommandOutcome, Subcommand};
use crate::domain::entities::{
    AliasBinding, BindResult, PresenceState, ProfileVisibility, StatusPayload, SteamId,
};

pub fn render(outcome: &CommandOutcome) -> String {
    match outcome {
        CommandOutcome::Help => help_text(),
        CommandOutcome::Status(result) => {
            let mut lines = Vec::new();
            let who = match &result.alias {
                Some(alias) => format!("{} ({})", alias, result.steam_id),
                None => result.steam_id.to_string(),
            };
            lines.push(format!("Player: {}", who));
            if let Some(status) = &result.status {
                push_status(&mut lines, result.steam_id, status);
            }
            lines.join("\n")
        }
        CommandOutcome::Linked(link) => {
            let verb = match link.result {
                BindResult::Created => "Linked",
                BindResult::Rebound => "Re-linked",
            };
            format!("{}: {}", verb, describe(&link.binding))
        }
        CommandOutcome::Unlinked { alias, removed: true } => format!("Unlinked: {}", alias),
        CommandOutcome::Unlinked { alias, removed: false } => format!("Alias not found: {}", alias),
        CommandOutcome::List(rows) if rows.is_empty() => {
            "No aliases in this group yet.\nUse: /steam link <alias> <steamid|vanity>".to_string()
        }
        CommandOutcome::List(rows) => {
            let mut lines = vec!["Aliases in this group:".to_string()];
            for row in rows {
                let state = row
                    .status
                    .as_ref()
                    .map(|s| format!(" [{}]", state_label(s)))
                    .unwrap_or_default();
                lines.push(format!("- {}{}", describe(&row.binding), state));
            }
            lines.join("\n")
        }
        CommandOutcome::Whois(row) => {
            let mut lines = vec![describe(&row.binding)];
            lines.push(format!(
                "Linked {} (updated {})",
                row.binding.created_at.format("%Y-%m-%d"),
                row.binding.updated_at.format("%Y-%m-%d")
            ));
            lines.push(format!(
                "SteamID: {} / {}",
                row.binding.steam_id.to_steam2(),
                row.binding.steam_id.to_steam3()
            ));
            if let Some(status) = &row.status {
                push_status(&mut lines, row.binding.steam_id, status);
            }
            lines.join("\n")
        }
    }
}

pub fn render_error(err: &ResolveError) -> String {
    match err {
        ResolveError::NotBound(alias) => format!("Alias not found: {}", alias),
        ResolveError::NotResolvable(token) => format!("Not a SteamID or vanity name: {}", token),
        ResolveError::NotFound(name) => format!("No Steam profile uses the name: {}", name),
        ResolveError::UnknownAccount(id) => format!("Link failed: Steam has no account {}", id),
        ResolveError::AliasNotBoundAndUnresolvable(token) => {
            format!("Not a known alias or Steam account: {}", token)
        }
        ResolveError::Transient(_) => "Steam is not responding right now, try again later.".to_string(),
        ResolveError::Protocol(_) => "Steam returned something unexpected.".to_string(),
        ResolveError::BadArguments(msg) => format!("Bad usage ({}). Try /steam help.", msg),
        ResolveError::Persistence(_) => "Could not save the alias, nothing was changed.".to_string(),
        ResolveError::CorruptStore(_) => "The alias store is damaged and needs an operator.".to_string(),
    }
}

fn help_text() -> String {
    let mut lines = vec!["Steam alias help".to_string()];
    for sub in Subcommand::ALL {
        lines.push(format!("- /steam {}  {}", sub.usage(), sub.description()));
    }
    lines.join("\n")
}

fn describe(binding: &AliasBinding) -> String {
    match &binding.persona_name {
        Some(name) => format!("{} -> {} ({})", binding.alias, name, binding.steam_id),
        None => format!("{} -> {}", binding.alias, binding.steam_id),
    }
}

fn state_label(status: &StatusPayload) -> String {
    match (status.state, status.persona_state) {
        (PresenceState::Online, Some(persona)) => persona.as_str().to_string(),
        (state, _) => state.as_str().to_string(),
    }
}

fn push_status(lines: &mut Vec<String>, steam_id: SteamId, status: &StatusPayload) {
    if let Some(name) = &status.persona_name {
        lines.push(format!("Name: {}", name));
    }
    lines.push(format!("Status: {}", state_label(status)));
    if let Some(game) = &status.current_activity {
        lines.push(format!("Playing: {}", game));
    }
    if status.state == PresenceState::Offline {
        if let Some(at) = status.last_logoff {
            lines.push(format!("Last online: {}", at.with_timezone(&Local).format("%Y-%m-%d %H:%M:%S %Z")));
        }
    }
    lines.push(format!(
        "Profile: {}",
        status.profile_url.clone().unwrap_or_else(|| steam_id.profile_url())
    ));
    match status.profile_visibility {
        ProfileVisibility::Public => {}
        ProfileVisibility::Partial => lines.push("Profile is friends-only; some details are hidden.".to_string()),
        ProfileVisibility::Private => lines.push("Profile is private; status is limited.".to_string()),
    }
}
