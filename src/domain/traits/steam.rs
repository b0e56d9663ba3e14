use std::collections::HashMap;

use async_trait::async_trait;

use crate::application::errors::LookupError;
use crate::domain::entities::{StatusPayload, SteamId};

/// Remote profile/status service
#[async_trait]
pub trait SteamApi: Send + Sync {
    /// Vanity URL name to account id
    async fn resolve_vanity(&self, name: &str) -> Result<SteamId, LookupError>;

    /// Status for every requested id. Ids the service omits come back as
    /// [`StatusPayload::hidden`], with `found` unset.
    async fn fetch_status(
        &self,
        ids: &[SteamId],
    ) -> Result<HashMap<SteamId, StatusPayload>, LookupError>;
}
