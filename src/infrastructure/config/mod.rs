//! Configuration management

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use crate::application::errors::ConfigError;
use crate::domain::entities::AliasPolicy;

/// Bot configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct Config {
    pub bot: BotConfig,
    pub steam: SteamConfig,
    pub storage: StorageConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct BotConfig {
    pub name: String,
    pub prefix: String,
    /// Group scope used by the console adapter
    pub default_group: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct SteamConfig {
    /// Steam Web API key (https://steamcommunity.com/dev/apikey)
    #[serde(default)]
    pub api_key: String,
    /// Override for the Web API host, mostly for tests
    #[serde(default)]
    pub api_base: Option<String>,
    #[serde(default = "default_timeout_ms")]
    pub request_timeout_ms: u64,
    #[serde(default)]
    pub alias_case_sensitive: bool,
    /// Fetch the profile before binding so the persona name can be stored
    #[serde(default = "default_true")]
    pub verify_on_link: bool,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct StorageConfig {
    pub path: PathBuf,
}

fn default_timeout_ms() -> u64 {
    8_000
}

fn default_true() -> bool {
    true
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bot: BotConfig {
                name: "steam-alias-bot".to_string(),
                prefix: "/".to_string(),
                default_group: "console".to_string(),
            },
            steam: SteamConfig {
                api_key: String::new(),
                api_base: None,
                request_timeout_ms: default_timeout_ms(),
                alias_case_sensitive: false,
                verify_on_link: true,
            },
            storage: StorageConfig {
                path: PathBuf::from("data/steam_aliases.json"),
            },
        }
    }
}

impl Config {
    pub fn load(path: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let path = path.into();
        let content = std::fs::read_to_string(&path)
            .map_err(|e| ConfigError::Parse(format!("Failed to read config: {}", e)))?;

        Self::from_yaml(&content)
    }

    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        serde_yaml::from_str(content)
            .map_err(|e| ConfigError::Parse(format!("Failed to parse config: {}", e)))
    }

    pub fn load_env() -> Self {
        // Load from environment variables
        let mut config = Config::default();
        config.apply_env();
        config
    }

    /// Environment variables win over file values
    pub fn apply_env(&mut self) {
        if let Ok(key) = std::env::var("STEAM_API_KEY") {
            self.steam.api_key = key;
        }

        if let Ok(timeout) = std::env::var("STEAM_REQUEST_TIMEOUT_MS") {
            if let Ok(ms) = timeout.parse() {
                self.steam.request_timeout_ms = ms;
            }
        }

        if let Ok(flag) = std::env::var("STEAM_ALIAS_CASE_SENSITIVE") {
            if let Ok(v) = flag.parse() {
                self.steam.alias_case_sensitive = v;
            }
        }

        if let Ok(path) = std::env::var("STEAM_ALIAS_STORE") {
            self.storage.path = PathBuf::from(path);
        }

        if let Ok(prefix) = std::env::var("BOT_PREFIX") {
            self.bot.prefix = prefix;
        }
    }

    /// Reject settings the core can't run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.steam.api_key.trim().is_empty() {
            return Err(ConfigError::MissingField("steam.api-key".to_string()));
        }
        if self.steam.request_timeout_ms == 0 {
            return Err(ConfigError::InvalidValue(
                "steam.request-timeout-ms must be greater than zero".to_string(),
            ));
        }
        if self.bot.default_group.trim().is_empty() {
            return Err(ConfigError::InvalidValue("bot.default-group must not be empty".to_string()));
        }
        Ok(())
    }

    pub fn alias_policy(&self) -> AliasPolicy {
        AliasPolicy::new(self.steam.alias_case_sensitive)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_fill_missing_steam_fields() {
        let yaml = r#"
bot:
  name: test-bot
  prefix: "!"
  default-group: lobby
steam:
  api-key: ABC123
storage:
  path: /tmp/aliases.json
"#;
        let config = Config::from_yaml(yaml).unwrap();
        assert_eq!(config.steam.api_key, "ABC123");
        assert_eq!(config.steam.request_timeout_ms, 8_000);
        assert!(!config.steam.alias_case_sensitive);
        assert!(config.steam.verify_on_link);
        assert_eq!(config.bot.default_group, "lobby");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn missing_api_key_is_rejected() {
        let config = Config::default();
        assert!(matches!(config.validate(), Err(ConfigError::MissingField(_))));
    }

    #[test]
    fn zero_timeout_is_rejected() {
        let mut config = Config::default();
        config.steam.api_key = "key".to_string();
        config.steam.request_timeout_ms = 0;
        assert!(matches!(config.validate(), Err(ConfigError::InvalidValue(_))));
    }

    #[test]
    fn default_config_round_trips_through_yaml() {
        let yaml = serde_yaml::to_string(&Config::default()).unwrap();
        assert!(yaml.contains("request-timeout-ms"));
        let back = Config::from_yaml(&yaml).unwrap();
        assert_eq!(back.storage.path, PathBuf::from("data/steam_aliases.json"));
    }

    #[test]
    fn garbage_yaml_is_a_parse_error() {
        assert!(matches!(Config::from_yaml("bot: [1, 2"), Err(ConfigError::Parse(_))));
    }
}
