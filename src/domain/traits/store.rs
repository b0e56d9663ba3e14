use async_trait::async_trait;

use crate::application::errors::StorageError;
use crate::domain::entities::{AliasBinding, AliasPolicy, BindResult, SteamId};

/// Group-scoped alias storage. Every call names its group; groups never see
/// each other's aliases.
#[async_trait]
pub trait AliasStore: Send + Sync {
    /// Folding rule applied to aliases on the way in
    fn policy(&self) -> AliasPolicy;

    /// Insert or overwrite. Durable before it returns `Ok`.
    async fn bind(
        &self,
        group: &str,
        alias: &str,
        steam_id: SteamId,
        persona_name: Option<String>,
    ) -> Result<BindResult, StorageError>;

    /// `Ok(false)` when the alias was never bound in this group.
    async fn unbind(&self, group: &str, alias: &str) -> Result<bool, StorageError>;

    async fn lookup(&self, group: &str, alias: &str) -> Result<Option<AliasBinding>, StorageError>;

    /// Bindings in insertion order
    async fn list_all(&self, group: &str) -> Result<Vec<AliasBinding>, StorageError>;

    async fn count(&self, group: &str) -> Result<usize, StorageError>;
}
