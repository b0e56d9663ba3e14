//! Resolution facade - the single entry point the command layer talks to

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use crate::application::errors::ResolveError;
use crate::domain::entities::{
    AliasBinding, LinkOutcome, ListedBinding, ResolutionResult, StatusPayload, SteamId,
};
use crate::domain::traits::{AliasResolver, AliasStore, SteamApi};

use super::normalizer::IdentifierNormalizer;

/// Composes the alias store, the normalizer and the remote lookup.
pub struct ResolutionService {
    store: Arc<dyn AliasStore>,
    steam: Arc<dyn SteamApi>,
    normalizer: IdentifierNormalizer,
    verify_on_link: bool,
}

impl ResolutionService {
    pub fn new(store: Arc<dyn AliasStore>, steam: Arc<dyn SteamApi>) -> Self {
        Self {
            store,
            normalizer: IdentifierNormalizer::new(Arc::clone(&steam)),
            steam,
            verify_on_link: true,
        }
    }

    pub fn with_verify_on_link(mut self, verify: bool) -> Self {
        self.verify_on_link = verify;
        self
    }

    async fn status_of(&self, id: SteamId) -> Result<StatusPayload, ResolveError> {
        let mut statuses = self.steam.fetch_status(&[id]).await?;
        Ok(statuses.remove(&id).unwrap_or_else(StatusPayload::hidden))
    }

    fn alias_key(&self, alias: &str) -> Result<String, ResolveError> {
        self.store
            .policy()
            .normalize(alias)
            .ok_or_else(|| ResolveError::BadArguments(format!("invalid alias {:?}", alias)))
    }
}

fn check_group(group: &str) -> Result<(), ResolveError> {
    if group.trim().is_empty() {
        return Err(ResolveError::BadArguments("missing group scope".to_string()));
    }
    Ok(())
}

#[async_trait]
impl AliasResolver for ResolutionService {
    async fn resolve(
        &self,
        group: &str,
        token: &str,
        want_status: bool,
    ) -> Result<ResolutionResult, ResolveError> {
        check_group(group)?;
        if token.trim().is_empty() {
            return Err(ResolveError::BadArguments("missing alias or identifier".to_string()));
        }

        let (steam_id, alias) = match self.store.lookup(group, token).await? {
            Some(binding) => (binding.steam_id, Some(binding.alias)),
            None => match self.normalizer.normalize(token).await {
                Ok(id) => (id, None),
                Err(ResolveError::NotResolvable(_)) | Err(ResolveError::NotFound(_)) => {
                    return Err(ResolveError::AliasNotBoundAndUnresolvable(
                        token.trim().to_string(),
                    ));
                }
                Err(e) => return Err(e),
            },
        };

        let status = if want_status {
            Some(self.status_of(steam_id).await?)
        } else {
            None
        };

        Ok(ResolutionResult {
            steam_id,
            alias,
            status,
        })
    }

    async fn link(&self, group: &str, alias: &str, identifier: &str) -> Result<LinkOutcome, ResolveError> {
        check_group(group)?;
        let key = self.alias_key(alias)?;
        let steam_id = self.normalizer.normalize(identifier).await?;

        // Nothing is bound if the profile lookup fails or finds no account
        let persona_name = if self.verify_on_link {
            let status = self.status_of(steam_id).await?;
            if !status.found {
                return Err(ResolveError::UnknownAccount(steam_id.to_string()));
            }
            status.persona_name
        } else {
            None
        };

        let result = self
            .store
            .bind(group, &key, steam_id, persona_name.clone())
            .await?;
        info!(group, alias = %key, %steam_id, ?result, "linked alias");

        let binding = self
            .store
            .lookup(group, &key)
            .await?
            .unwrap_or_else(|| AliasBinding::new(key, steam_id).with_persona_name(persona_name));
        Ok(LinkOutcome { binding, result })
    }

    async fn unlink(&self, group: &str, alias: &str) -> Result<bool, ResolveError> {
        check_group(group)?;
        let key = self.alias_key(alias)?;
        let removed = self.store.unbind(group, &key).await?;
        if removed {
            info!(group, alias = %key, "unlinked alias");
        }
        Ok(removed)
    }

    async fn list(&self, group: &str, want_status: bool) -> Result<Vec<ListedBinding>, ResolveError> {
        check_group(group)?;
        let bindings = self.store.list_all(group).await?;
        if !want_status || bindings.is_empty() {
            return Ok(bindings
                .into_iter()
                .map(|binding| ListedBinding { binding, status: None })
                .collect());
        }

        // One batched call for the whole group
        let ids: Vec<SteamId> = bindings.iter().map(|b| b.steam_id).collect();
        let statuses = self.steam.fetch_status(&ids).await?;

        Ok(bindings
            .into_iter()
            .map(|binding| {
                let status = statuses
                    .get(&binding.steam_id)
                    .cloned()
                    .unwrap_or_else(StatusPayload::hidden);
                ListedBinding {
                    binding,
                    status: Some(status),
                }
            })
            .collect())
    }

    async fn whois(&self, group: &str, alias: &str) -> Result<ListedBinding, ResolveError> {
        check_group(group)?;
        let key = self.alias_key(alias)?;
        let binding = self
            .store
            .lookup(group, &key)
            .await?
            .ok_or(ResolveError::NotBound(key))?;
        let status = self.status_of(binding.steam_id).await?;
        Ok(ListedBinding {
            binding,
            status: Some(status),
        })
    }
}
