use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::SteamId;

/// One alias-to-account mapping inside a group
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AliasBinding {
    pub alias: String,
    pub steam_id: SteamId,
    /// Persona name seen when the alias was last linked (display only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub persona_name: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl AliasBinding {
    pub fn new(alias: impl Into<String>, steam_id: SteamId) -> Self {
        let now = Utc::now();
        Self {
            alias: alias.into(),
            steam_id,
            persona_name: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_persona_name(mut self, name: Option<String>) -> Self {
        self.persona_name = name;
        self
    }

    /// Point an existing alias at a (possibly different) account.
    pub fn rebind(&mut self, steam_id: SteamId, persona_name: Option<String>) {
        self.steam_id = steam_id;
        self.persona_name = persona_name;
        self.updated_at = Utc::now();
    }
}

/// Outcome of a bind call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BindResult {
    Created,
    Rebound,
}

/// A bind as seen by the caller of `link`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkOutcome {
    pub binding: AliasBinding,
    pub result: BindResult,
}

/// How aliases are folded before storage and lookup
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AliasPolicy {
    pub case_sensitive: bool,
}

impl AliasPolicy {
    pub fn new(case_sensitive: bool) -> Self {
        Self { case_sensitive }
    }

    /// Trim, drop one leading `@`, and fold case unless case-sensitive.
    /// Returns `None` for an alias that is empty after trimming.
    pub fn normalize(&self, alias: &str) -> Option<String> {
        let trimmed = alias.trim();
        let trimmed = trimmed.strip_prefix('@').unwrap_or(trimmed).trim();
        if trimmed.is_empty() {
            return None;
        }
        if self.case_sensitive {
            Some(trimmed.to_string())
        } else {
            Some(trimmed.to_lowercase())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn policy_folds_case_by_default() {
        let policy = AliasPolicy::default();
        assert_eq!(policy.normalize("  @GabeN "), Some("gaben".to_string()));
        assert_eq!(policy.normalize("麦麦"), Some("麦麦".to_string()));
        assert_eq!(policy.normalize(" @ "), None);
    }

    #[test]
    fn policy_keeps_case_when_sensitive() {
        let policy = AliasPolicy::new(true);
        assert_eq!(policy.normalize("@GabeN"), Some("GabeN".to_string()));
    }

    #[test]
    fn rebind_moves_updated_at_only() {
        let id_a = SteamId::from_account_id(1).unwrap();
        let id_b = SteamId::from_account_id(2).unwrap();
        let mut binding = AliasBinding::new("x", id_a);
        let created = binding.created_at;
        binding.rebind(id_b, Some("B".to_string()));
        assert_eq!(binding.steam_id, id_b);
        assert_eq!(binding.created_at, created);
        assert!(binding.updated_at >= created);
        assert_eq!(binding.persona_name.as_deref(), Some("B"));
    }
}
