//! Application layer errors

use std::path::PathBuf;

use thiserror::Error;

/// General bot errors
#[derive(Error, Debug)]
pub enum BotError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Resolve error: {0}")]
    Resolve(#[from] ResolveError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Binding store errors
#[derive(Error, Debug)]
pub enum StorageError {
    /// Durable write failed; the in-memory state was rolled back
    #[error("Failed to persist {}: {source}", .path.display())]
    Persistence {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The persisted document could not be read back. Never auto-repaired.
    #[error("Corrupt alias store {}: {reason}", .path.display())]
    CorruptStore { path: PathBuf, reason: String },

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Invalid alias: {0:?}")]
    InvalidAlias(String),

    #[error("Lock poisoned")]
    LockPoisoned,

    #[error("Storage worker failed: {0}")]
    Worker(String),
}

/// Remote lookup errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LookupError {
    /// Vanity name unknown to the service
    #[error("Vanity name not found: {0}")]
    NotFound(String),

    /// Transport failure, timeout or non-2xx status. Retry is up to the caller.
    #[error("Steam API unreachable: {0}")]
    Transient(String),

    /// The service answered with something we can't read
    #[error("Unexpected Steam API response: {0}")]
    Protocol(String),
}

/// Errors surfaced by the resolution facade and subcommand handler
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResolveError {
    #[error("Alias not bound: {0}")]
    NotBound(String),

    #[error("Not a Steam identifier: {0}")]
    NotResolvable(String),

    #[error("Vanity name not found: {0}")]
    NotFound(String),

    /// A well-formed id the service has no profile for
    #[error("No Steam account: {0}")]
    UnknownAccount(String),

    #[error("Steam API unreachable: {0}")]
    Transient(String),

    #[error("Unexpected Steam API response: {0}")]
    Protocol(String),

    #[error("Bad arguments: {0}")]
    BadArguments(String),

    #[error("Failed to save bindings: {0}")]
    Persistence(String),

    #[error("Alias store is corrupt: {0}")]
    CorruptStore(String),

    /// Neither an alias in the group nor a resolvable identifier
    #[error("Alias not bound and not resolvable: {0}")]
    AliasNotBoundAndUnresolvable(String),
}

impl From<LookupError> for ResolveError {
    fn from(err: LookupError) -> Self {
        match err {
            LookupError::NotFound(name) => ResolveError::NotFound(name),
            LookupError::Transient(msg) => ResolveError::Transient(msg),
            LookupError::Protocol(msg) => ResolveError::Protocol(msg),
        }
    }
}

impl From<StorageError> for ResolveError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::CorruptStore { .. } => ResolveError::CorruptStore(err.to_string()),
            StorageError::InvalidAlias(alias) => {
                ResolveError::BadArguments(format!("invalid alias {:?}", alias))
            }
            other => ResolveError::Persistence(other.to_string()),
        }
    }
}

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Invalid value: {0}")]
    InvalidValue(String),

    #[error("Parse error: {0}")]
    Parse(String),
}
