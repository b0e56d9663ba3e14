use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{AliasBinding, SteamId};

/// Coarse presence reported to callers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PresenceState {
    Online,
    Offline,
    InGame,
    Unknown,
}

impl PresenceState {
    pub fn as_str(&self) -> &str {
        match self {
            PresenceState::Online => "online",
            PresenceState::Offline => "offline",
            PresenceState::InGame => "in-game",
            PresenceState::Unknown => "unknown",
        }
    }
}

/// Steam's detailed `personastate` codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PersonaState {
    Offline,
    Online,
    Busy,
    Away,
    Snooze,
    LookingToTrade,
    LookingToPlay,
}

impl PersonaState {
    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            0 => Some(PersonaState::Offline),
            1 => Some(PersonaState::Online),
            2 => Some(PersonaState::Busy),
            3 => Some(PersonaState::Away),
            4 => Some(PersonaState::Snooze),
            5 => Some(PersonaState::LookingToTrade),
            6 => Some(PersonaState::LookingToPlay),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            PersonaState::Offline => "offline",
            PersonaState::Online => "online",
            PersonaState::Busy => "busy",
            PersonaState::Away => "away",
            PersonaState::Snooze => "snooze",
            PersonaState::LookingToTrade => "looking to trade",
            PersonaState::LookingToPlay => "looking to play",
        }
    }
}

/// Community profile visibility
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProfileVisibility {
    Public,
    Private,
    /// Friends-only
    Partial,
}

impl ProfileVisibility {
    /// Map `communityvisibilitystate`.
    pub fn from_code(code: Option<i64>) -> Self {
        match code {
            Some(3) => ProfileVisibility::Public,
            Some(2) => ProfileVisibility::Partial,
            _ => ProfileVisibility::Private,
        }
    }
}

/// Live status of one account. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusPayload {
    pub state: PresenceState,
    pub persona_state: Option<PersonaState>,
    pub current_activity: Option<String>,
    pub profile_visibility: ProfileVisibility,
    pub persona_name: Option<String>,
    pub profile_url: Option<String>,
    pub avatar_url: Option<String>,
    pub last_logoff: Option<DateTime<Utc>>,
    /// False when the service returned no profile at all for the id
    pub found: bool,
}

impl StatusPayload {
    /// Placeholder for an account the service returned nothing about.
    pub fn hidden() -> Self {
        Self {
            state: PresenceState::Unknown,
            persona_state: None,
            current_activity: None,
            profile_visibility: ProfileVisibility::Private,
            persona_name: None,
            profile_url: None,
            avatar_url: None,
            last_logoff: None,
            found: false,
        }
    }

    pub fn is_private(&self) -> bool {
        self.profile_visibility == ProfileVisibility::Private
    }
}

/// What the facade hands back for a single resolution
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolutionResult {
    pub steam_id: SteamId,
    /// Alias the token matched in the group, if any
    pub alias: Option<String>,
    pub status: Option<StatusPayload>,
}

/// One row of a group listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListedBinding {
    pub binding: AliasBinding,
    pub status: Option<StatusPayload>,
}
