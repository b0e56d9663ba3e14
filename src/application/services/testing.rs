//! In-memory fakes shared by the service tests

use std::collections::{BTreeMap, HashMap};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::application::errors::{LookupError, StorageError};
use crate::domain::entities::{
    AliasBinding, AliasPolicy, BindResult, PresenceState, ProfileVisibility, StatusPayload,
    SteamId,
};
use crate::domain::traits::{AliasStore, SteamApi};

#[derive(Default)]
pub struct FakeSteam {
    vanities: HashMap<String, SteamId>,
    statuses: HashMap<SteamId, StatusPayload>,
    failure: Option<LookupError>,
    vanity_calls: AtomicUsize,
    status_calls: AtomicUsize,
}

impl FakeSteam {
    pub fn with_vanity(mut self, name: &str, id: SteamId) -> Self {
        self.vanities.insert(name.to_string(), id);
        self
    }

    pub fn with_status(mut self, id: SteamId, status: StatusPayload) -> Self {
        self.statuses.insert(id, status);
        self
    }

    pub fn failing(mut self, err: LookupError) -> Self {
        self.failure = Some(err);
        self
    }

    pub fn vanity_calls(&self) -> usize {
        self.vanity_calls.load(Ordering::SeqCst)
    }

    pub fn status_calls(&self) -> usize {
        self.status_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SteamApi for FakeSteam {
    async fn resolve_vanity(&self, name: &str) -> Result<SteamId, LookupError> {
        self.vanity_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(err) = &self.failure {
            return Err(err.clone());
        }
        self.vanities
            .get(name)
            .copied()
            .ok_or_else(|| LookupError::NotFound(name.to_string()))
    }

    async fn fetch_status(
        &self,
        ids: &[SteamId],
    ) -> Result<HashMap<SteamId, StatusPayload>, LookupError> {
        self.status_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(err) = &self.failure {
            return Err(err.clone());
        }
        Ok(ids
            .iter()
            .map(|id| {
                let status = self.statuses.get(id).cloned().unwrap_or_else(StatusPayload::hidden);
                (*id, status)
            })
            .collect())
    }
}

/// Public, online, optionally playing something
pub fn online(name: &str, game: Option<&str>) -> StatusPayload {
    StatusPayload {
        state: if game.is_some() { PresenceState::InGame } else { PresenceState::Online },
        persona_state: None,
        current_activity: game.map(str::to_string),
        profile_visibility: ProfileVisibility::Public,
        persona_name: Some(name.to_string()),
        profile_url: None,
        avatar_url: None,
        last_logoff: None,
        found: true,
    }
}

#[derive(Default)]
pub struct MemoryStore {
    policy: AliasPolicy,
    groups: Mutex<BTreeMap<String, Vec<AliasBinding>>>,
    fail_writes: AtomicBool,
}

impl MemoryStore {
    pub fn fail_writes(&self) {
        self.fail_writes.store(true, Ordering::SeqCst);
    }

    fn check_writable(&self) -> Result<(), StorageError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StorageError::Persistence {
                path: PathBuf::from("memory"),
                source: std::io::Error::new(std::io::ErrorKind::Other, "disk full"),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl AliasStore for MemoryStore {
    fn policy(&self) -> AliasPolicy {
        self.policy
    }

    async fn bind(
        &self,
        group: &str,
        alias: &str,
        steam_id: SteamId,
        persona_name: Option<String>,
    ) -> Result<BindResult, StorageError> {
        let key = self
            .policy
            .normalize(alias)
            .ok_or_else(|| StorageError::InvalidAlias(alias.to_string()))?;
        self.check_writable()?;
        let mut groups = self.groups.lock().map_err(|_| StorageError::LockPoisoned)?;
        let bindings = groups.entry(group.to_string()).or_default();
        match bindings.iter_mut().find(|b| b.alias == key) {
            Some(existing) => {
                existing.rebind(steam_id, persona_name);
                Ok(BindResult::Rebound)
            }
            None => {
                bindings.push(AliasBinding::new(key, steam_id).with_persona_name(persona_name));
                Ok(BindResult::Created)
            }
        }
    }

    async fn unbind(&self, group: &str, alias: &str) -> Result<bool, StorageError> {
        let Some(key) = self.policy.normalize(alias) else {
            return Ok(false);
        };
        self.check_writable()?;
        let mut groups = self.groups.lock().map_err(|_| StorageError::LockPoisoned)?;
        let Some(bindings) = groups.get_mut(group) else {
            return Ok(false);
        };
        let before = bindings.len();
        bindings.retain(|b| b.alias != key);
        Ok(bindings.len() != before)
    }

    async fn lookup(&self, group: &str, alias: &str) -> Result<Option<AliasBinding>, StorageError> {
        let Some(key) = self.policy.normalize(alias) else {
            return Ok(None);
        };
        let groups = self.groups.lock().map_err(|_| StorageError::LockPoisoned)?;
        Ok(groups
            .get(group)
            .and_then(|b| b.iter().find(|b| b.alias == key).cloned()))
    }

    async fn list_all(&self, group: &str) -> Result<Vec<AliasBinding>, StorageError> {
        let groups = self.groups.lock().map_err(|_| StorageError::LockPoisoned)?;
        Ok(groups.get(group).cloned().unwrap_or_default())
    }

    async fn count(&self, group: &str) -> Result<usize, StorageError> {
        Ok(self.list_all(group).await?.len())
    }
}
