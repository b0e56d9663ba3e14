use async_trait::async_trait;

use crate::application::errors::ResolveError;
use crate::domain::entities::{LinkOutcome, ListedBinding, ResolutionResult};

/// The contract subcommand handlers are written against
#[async_trait]
pub trait AliasResolver: Send + Sync {
    /// Alias first, then raw identifier / vanity name.
    async fn resolve(
        &self,
        group: &str,
        token: &str,
        want_status: bool,
    ) -> Result<ResolutionResult, ResolveError>;

    async fn link(&self, group: &str, alias: &str, identifier: &str) -> Result<LinkOutcome, ResolveError>;

    async fn unlink(&self, group: &str, alias: &str) -> Result<bool, ResolveError>;

    async fn list(&self, group: &str, want_status: bool) -> Result<Vec<ListedBinding>, ResolveError>;

    async fn whois(&self, group: &str, alias: &str) -> Result<ListedBinding, ResolveError>;
}
