//! Steam Web API client
//!
//! Wraps `ISteamUser/ResolveVanityURL` and `ISteamUser/GetPlayerSummaries`.
//! No retries here: transport trouble is reported as `Transient` and the
//! caller decides what to do with it.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::application::errors::{ConfigError, LookupError};
use crate::domain::entities::{
    PersonaState, PresenceState, ProfileVisibility, StatusPayload, SteamId,
};
use crate::domain::traits::SteamApi;
use crate::infrastructure::config::SteamConfig;

/// Steam Web API endpoint
pub const DEFAULT_API_BASE: &str = "https://api.steampowered.com";

/// GetPlayerSummaries accepts at most this many ids per call
const MAX_IDS_PER_REQUEST: usize = 100;

/// ResolveVanityURL `success` codes
const VANITY_OK: i64 = 1;
const VANITY_NO_MATCH: i64 = 42;

/// Every Web API reply is wrapped in `{"response": ...}`
#[derive(Deserialize, Debug)]
struct Envelope<T> {
    response: T,
}

#[derive(Deserialize, Debug)]
struct VanityResponse {
    success: i64,
    steamid: Option<String>,
    message: Option<String>,
}

#[derive(Deserialize, Debug)]
struct SummariesResponse {
    players: Vec<PlayerSummary>,
}

#[derive(Deserialize, Debug)]
struct PlayerSummary {
    steamid: String,
    personaname: Option<String>,
    profileurl: Option<String>,
    avatarfull: Option<String>,
    personastate: Option<i64>,
    communityvisibilitystate: Option<i64>,
    gameextrainfo: Option<String>,
    gameid: Option<String>,
    lastlogoff: Option<i64>,
}

impl PlayerSummary {
    fn into_status(self) -> StatusPayload {
        let visibility = ProfileVisibility::from_code(self.communityvisibilitystate);
        let private = visibility == ProfileVisibility::Private;
        let persona_state = self.personastate.and_then(PersonaState::from_code);
        let in_game = self.gameextrainfo.is_some() || self.gameid.is_some();

        let state = match persona_state {
            _ if in_game && !private => PresenceState::InGame,
            Some(PersonaState::Offline) => PresenceState::Offline,
            Some(_) => PresenceState::Online,
            None => PresenceState::Unknown,
        };

        StatusPayload {
            state,
            persona_state,
            current_activity: if private { None } else { self.gameextrainfo },
            profile_visibility: visibility,
            persona_name: self.personaname,
            profile_url: self.profileurl,
            avatar_url: self.avatarfull,
            last_logoff: self
                .lastlogoff
                .and_then(|ts| Utc.timestamp_opt(ts, 0).single()),
            found: true,
        }
    }
}

/// HTTP implementation of [`SteamApi`]
pub struct SteamWebClient {
    api_key: String,
    base_url: String,
    client: Client,
}

impl SteamWebClient {
    pub fn new(
        api_key: impl Into<String>,
        base_url: Option<&str>,
        timeout: Duration,
    ) -> Result<Self, ConfigError> {
        let client = Client::builder()
            .user_agent(concat!("steam-alias-bot/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()
            .map_err(|e| ConfigError::InvalidValue(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            api_key: api_key.into(),
            base_url: base_url
                .unwrap_or(DEFAULT_API_BASE)
                .trim_end_matches('/')
                .to_string(),
            client,
        })
    }

    pub fn from_config(config: &SteamConfig) -> Result<Self, ConfigError> {
        Self::new(
            config.api_key.clone(),
            config.api_base.as_deref(),
            Duration::from_millis(config.request_timeout_ms),
        )
    }

    /// GET `{base}/{method}` and decode the `response` envelope.
    async fn get<T: DeserializeOwned>(
        &self,
        method: &str,
        params: &[(&str, &str)],
    ) -> Result<T, LookupError> {
        let url = format!("{}/{}", self.base_url, method);
        debug!(method, "calling Steam Web API");

        let response = self
            .client
            .get(&url)
            .query(&[("key", self.api_key.as_str())])
            .query(params)
            .send()
            .await
            .map_err(|e| {
                warn!(method, error = %e, "Steam Web API request failed");
                LookupError::Transient(e.to_string())
            })?;

        let status = response.status();
        if !status.is_success() {
            warn!(method, %status, "Steam Web API returned an error status");
            return Err(LookupError::Transient(format!("status: {}", status)));
        }

        let body = response
            .text()
            .await
            .map_err(|e| LookupError::Transient(e.to_string()))?;

        serde_json::from_str::<Envelope<T>>(&body)
            .map(|envelope| envelope.response)
            .map_err(|e| LookupError::Protocol(format!("{}: {}", method, e)))
    }

    async fn fetch_chunk(
        &self,
        ids: &[SteamId],
        out: &mut HashMap<SteamId, StatusPayload>,
    ) -> Result<(), LookupError> {
        let joined = ids
            .iter()
            .map(SteamId::to_string)
            .collect::<Vec<_>>()
            .join(",");

        let summaries: SummariesResponse = self
            .get("ISteamUser/GetPlayerSummaries/v2/", &[("steamids", joined.as_str())])
            .await?;

        for player in summaries.players {
            let id = SteamId::parse_canonical(&player.steamid).ok_or_else(|| {
                LookupError::Protocol(format!("invalid steamid in summaries: {}", player.steamid))
            })?;
            if ids.contains(&id) {
                out.insert(id, player.into_status());
            }
        }
        Ok(())
    }
}

#[async_trait]
impl SteamApi for SteamWebClient {
    async fn resolve_vanity(&self, name: &str) -> Result<SteamId, LookupError> {
        let resp: VanityResponse = self
            .get("ISteamUser/ResolveVanityURL/v1/", &[("vanityurl", name)])
            .await?;

        match (resp.success, resp.steamid) {
            (VANITY_OK, Some(raw)) => SteamId::parse_canonical(&raw).ok_or_else(|| {
                LookupError::Protocol(format!("invalid steamid for vanity {}: {}", name, raw))
            }),
            (VANITY_NO_MATCH, _) => Err(LookupError::NotFound(name.to_string())),
            (code, _) => Err(LookupError::Protocol(format!(
                "ResolveVanityURL success={} message={}",
                code,
                resp.message.unwrap_or_default()
            ))),
        }
    }

    async fn fetch_status(
        &self,
        ids: &[SteamId],
    ) -> Result<HashMap<SteamId, StatusPayload>, LookupError> {
        let mut unique: Vec<SteamId> = Vec::with_capacity(ids.len());
        for id in ids {
            if !unique.contains(id) {
                unique.push(*id);
            }
        }

        let mut out = HashMap::with_capacity(unique.len());
        for chunk in unique.chunks(MAX_IDS_PER_REQUEST) {
            self.fetch_chunk(chunk, &mut out).await?;
        }

        // Unknown or deleted accounts are simply left out by the service
        for id in unique {
            out.entry(id).or_insert_with(StatusPayload::hidden);
        }
        Ok(out)
    }
}
