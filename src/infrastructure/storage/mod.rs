//! File-based alias storage
//!
//! The whole store lives in one JSON document. Reads are served from an
//! in-memory copy guarded by a `tokio::sync::RwLock`; each mutation builds
//! the next document, writes it to `<file>.tmp`, renames it over the real
//! file and only then swaps it into memory. A failed write leaves memory
//! untouched.

use std::collections::{BTreeMap, HashSet};
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::{debug, warn};

use crate::application::errors::StorageError;
use crate::domain::entities::{AliasBinding, AliasPolicy, BindResult, SteamId};
use crate::domain::traits::AliasStore;

const STORE_VERSION: u32 = 1;

/// On-disk document: group -> bindings in insertion order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct StoreFile {
    version: u32,
    #[serde(default)]
    groups: BTreeMap<String, Vec<AliasBinding>>,
}

impl Default for StoreFile {
    fn default() -> Self {
        Self {
            version: STORE_VERSION,
            groups: BTreeMap::new(),
        }
    }
}

impl StoreFile {
    /// Aliases must be unique after folding under `policy`, the same way
    /// lookups compare them.
    fn validate(&self, policy: AliasPolicy) -> Result<(), String> {
        if self.version != STORE_VERSION {
            return Err(format!("unsupported version {}", self.version));
        }
        for (group, bindings) in &self.groups {
            let mut seen = HashSet::new();
            for binding in bindings {
                let Some(key) = policy.normalize(&binding.alias) else {
                    return Err(format!("empty alias in group {:?}", group));
                };
                if !seen.insert(key) {
                    return Err(format!(
                        "duplicate alias {:?} in group {:?}",
                        binding.alias, group
                    ));
                }
            }
        }
        Ok(())
    }

    fn position(&self, policy: AliasPolicy, group: &str, key: &str) -> Option<usize> {
        self.groups.get(group).and_then(|bindings| position(policy, bindings, key))
    }
}

fn position(policy: AliasPolicy, bindings: &[AliasBinding], key: &str) -> Option<usize> {
    bindings
        .iter()
        .position(|b| policy.normalize(&b.alias).as_deref() == Some(key))
}

struct Inner {
    path: PathBuf,
    policy: AliasPolicy,
    state: RwLock<StoreFile>,
}

impl Inner {
    fn key(&self, alias: &str) -> Result<String, StorageError> {
        self.policy
            .normalize(alias)
            .ok_or_else(|| StorageError::InvalidAlias(alias.to_string()))
    }

    // Called from the blocking pool only; holds the write lock across the
    // disk write so mutations are applied one at a time.
    fn bind(
        &self,
        group: &str,
        alias: &str,
        steam_id: SteamId,
        persona_name: Option<String>,
    ) -> Result<BindResult, StorageError> {
        let key = self.key(alias)?;
        let mut state = self.state.blocking_write();

        let mut next = state.clone();
        let bindings = next.groups.entry(group.to_string()).or_default();
        let result = match position(self.policy, bindings, &key) {
            Some(idx) => {
                let existing = &mut bindings[idx];
                existing.alias = key.clone();
                existing.rebind(steam_id, persona_name);
                BindResult::Rebound
            }
            None => {
                bindings.push(AliasBinding::new(key.clone(), steam_id).with_persona_name(persona_name));
                BindResult::Created
            }
        };

        self.persist(&next)?;
        *state = next;
        debug!(group, alias = %key, %steam_id, ?result, "bound alias");
        Ok(result)
    }

    fn unbind(&self, group: &str, alias: &str) -> Result<bool, StorageError> {
        let Some(key) = self.policy.normalize(alias) else {
            return Ok(false);
        };
        let mut state = self.state.blocking_write();

        let Some(idx) = state.position(self.policy, group, &key) else {
            return Ok(false);
        };

        let mut next = state.clone();
        if let Some(bindings) = next.groups.get_mut(group) {
            bindings.remove(idx);
            if bindings.is_empty() {
                next.groups.remove(group);
            }
        }

        self.persist(&next)?;
        *state = next;
        debug!(group, alias = %key, "unbound alias");
        Ok(true)
    }

    /// Write-then-rename so a crash never leaves a truncated file behind.
    fn persist(&self, file: &StoreFile) -> Result<(), StorageError> {
        let content = serde_json::to_vec_pretty(file)
            .map_err(|e| StorageError::Serialization(e.to_string()))?;
        let tmp = tmp_path(&self.path);

        let write = || -> std::io::Result<()> {
            if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent)?;
            }
            let mut out = File::create(&tmp)?;
            out.write_all(&content)?;
            out.sync_all()?;
            fs::rename(&tmp, &self.path)
        };

        write().map_err(|source| {
            let _ = fs::remove_file(&tmp);
            warn!(path = %self.path.display(), error = %source, "failed to persist alias store, rolled back");
            StorageError::Persistence {
                path: self.path.clone(),
                source,
            }
        })?;

        // The new file is already in place, so memory follows it either way.
        if let Err(error) = sync_parent_dir(&self.path) {
            warn!(path = %self.path.display(), %error, "alias store renamed but its directory was not synced");
        }
        Ok(())
    }
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".tmp");
    PathBuf::from(name)
}

/// Flush the directory entry so the rename itself survives a power loss.
#[cfg(unix)]
fn sync_parent_dir(path: &Path) -> std::io::Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    File::open(dir)?.sync_all()
}

#[cfg(not(unix))]
fn sync_parent_dir(_path: &Path) -> std::io::Result<()> {
    Ok(())
}

fn load(path: &Path, policy: AliasPolicy) -> Result<StoreFile, StorageError> {
    if !path.exists() {
        return Ok(StoreFile::default());
    }
    let content = fs::read_to_string(path).map_err(|source| StorageError::Persistence {
        path: path.to_path_buf(),
        source,
    })?;
    let corrupt = |reason: String| StorageError::CorruptStore {
        path: path.to_path_buf(),
        reason,
    };
    let file: StoreFile = serde_json::from_str(&content).map_err(|e| corrupt(e.to_string()))?;
    file.validate(policy).map_err(corrupt)?;
    Ok(file)
}

/// JSON file-backed [`AliasStore`]
#[derive(Clone)]
pub struct JsonAliasStore {
    inner: Arc<Inner>,
}

impl JsonAliasStore {
    /// Load the store at `path`. A missing file is an empty store; a file
    /// that does not parse, or holds aliases that collide under `policy`,
    /// is reported and left exactly as it is.
    pub fn open(path: impl Into<PathBuf>, policy: AliasPolicy) -> Result<Self, StorageError> {
        let path = path.into();
        let file = load(&path, policy)?;
        let groups = file.groups.len();
        debug!(path = %path.display(), groups, "loaded alias store");
        Ok(Self {
            inner: Arc::new(Inner {
                path,
                policy,
                state: RwLock::new(file),
            }),
        })
    }

    pub fn path(&self) -> &Path {
        &self.inner.path
    }
}

#[async_trait]
impl AliasStore for JsonAliasStore {
    fn policy(&self) -> AliasPolicy {
        self.inner.policy
    }

    // Mutations run on a blocking worker that owns its own handle to the
    // store, so a caller dropping the future can't split disk from memory.
    async fn bind(
        &self,
        group: &str,
        alias: &str,
        steam_id: SteamId,
        persona_name: Option<String>,
    ) -> Result<BindResult, StorageError> {
        let inner = Arc::clone(&self.inner);
        let (group, alias) = (group.to_string(), alias.to_string());
        tokio::task::spawn_blocking(move || inner.bind(&group, &alias, steam_id, persona_name))
            .await
            .map_err(|e| StorageError::Worker(e.to_string()))?
    }

    async fn unbind(&self, group: &str, alias: &str) -> Result<bool, StorageError> {
        let inner = Arc::clone(&self.inner);
        let (group, alias) = (group.to_string(), alias.to_string());
        tokio::task::spawn_blocking(move || inner.unbind(&group, &alias))
            .await
            .map_err(|e| StorageError::Worker(e.to_string()))?
    }

    async fn lookup(&self, group: &str, alias: &str) -> Result<Option<AliasBinding>, StorageError> {
        let policy = self.inner.policy;
        let Some(key) = policy.normalize(alias) else {
            return Ok(None);
        };
        let state = self.inner.state.read().await;
        Ok(state
            .position(policy, group, &key)
            .and_then(|idx| state.groups.get(group).map(|b| b[idx].clone())))
    }

    async fn list_all(&self, group: &str) -> Result<Vec<AliasBinding>, StorageError> {
        let state = self.inner.state.read().await;
        Ok(state.groups.get(group).cloned().unwrap_or_default())
    }

    async fn count(&self, group: &str) -> Result<usize, StorageError> {
        let state = self.inner.state.read().await;
        Ok(state.groups.get(group).map(Vec::len).unwrap_or(0))
    }
}
