//! # Client Configuration
//!
//! Configuration for the Shopkeep client: API endpoint, snapshot storage
//! location, and the default remember-me preference.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     SHOPKEEP_API_URL=https://pos.example.com/api                       │
//! │     SHOPKEEP_SNAPSHOT_PATH=/var/lib/shopkeep/session.json              │
//! │     SHOPKEEP_REMEMBER_ME=false                                         │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     ~/.config/shopkeep/client.toml (Linux)                             │
//! │     ~/Library/Application Support/com.shopkeep.client/client.toml      │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! │     base_url = http://localhost:4000/api, remember_me_default = true   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! # client.toml
//! [api]
//! base_url = "http://localhost:4000/api"
//!
//! [storage]
//! snapshot_path = "/home/clerk/.config/shopkeep/session.json"
//!
//! [session]
//! remember_me_default = true
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::{debug, info, warn};

use crate::error::{SessionError, SessionResult};

// =============================================================================
// API Settings
// =============================================================================

/// Where the backend lives.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiSettings {
    /// Base URL all endpoint paths are joined onto.
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

fn default_base_url() -> String {
    "http://localhost:4000/api".to_string()
}

impl Default for ApiSettings {
    fn default() -> Self {
        ApiSettings {
            base_url: default_base_url(),
        }
    }
}

// =============================================================================
// Storage Settings
// =============================================================================

/// Where the durable session snapshot is written.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StorageSettings {
    /// Explicit file path for the durable snapshot. When unset the
    /// platform config directory is used.
    #[serde(default)]
    pub snapshot_path: Option<PathBuf>,
}

// =============================================================================
// Session Settings
// =============================================================================

/// Session behavior settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionSettings {
    /// Persistence preference used when a login does not state one.
    #[serde(default = "default_true")]
    pub remember_me_default: bool,
}

fn default_true() -> bool {
    true
}

impl Default for SessionSettings {
    fn default() -> Self {
        SessionSettings {
            remember_me_default: true,
        }
    }
}

// =============================================================================
// Main Client Configuration
// =============================================================================

/// Complete client configuration.
///
/// ## Example Config File
/// ```toml
/// [api]
/// base_url = "https://pos.example.com/api"
///
/// [storage]
/// snapshot_path = "/var/lib/shopkeep/session.json"
///
/// [session]
/// remember_me_default = true
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Backend endpoint settings.
    #[serde(default)]
    pub api: ApiSettings,

    /// Snapshot storage settings.
    #[serde(default)]
    pub storage: StorageSettings,

    /// Session behavior settings.
    #[serde(default)]
    pub session: SessionSettings,
}

impl ClientConfig {
    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (client.toml)
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> SessionResult<Self> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading client config from file");
                let contents = std::fs::read_to_string(&path)?;
                config = toml::from_str(&contents)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Loads config or returns default if load fails.
    pub fn load_or_default(config_path: Option<PathBuf>) -> Self {
        Self::load(config_path).unwrap_or_else(|e| {
            warn!("Failed to load client config: {}. Using defaults.", e);
            Self::default()
        })
    }

    /// Saves configuration to file.
    pub fn save(&self, config_path: Option<PathBuf>) -> SessionResult<()> {
        let path = config_path
            .or_else(Self::default_config_path)
            .ok_or_else(|| SessionError::ConfigSaveFailed("No config path available".into()))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| SessionError::ConfigSaveFailed(e.to_string()))?;
        }

        let contents = toml::to_string_pretty(self)?;
        std::fs::write(&path, contents)
            .map_err(|e| SessionError::ConfigSaveFailed(e.to_string()))?;

        info!(?path, "Client config saved");
        Ok(())
    }

    /// Validates the configuration.
    pub fn validate(&self) -> SessionResult<()> {
        let url = &self.api.base_url;
        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(SessionError::InvalidConfig(format!(
                "API base URL must start with http:// or https://, got: {}",
                url
            )));
        }

        Ok(())
    }

    /// Applies environment variable overrides.
    fn apply_env_overrides(&mut self) {
        if let Ok(url) = std::env::var("SHOPKEEP_API_URL") {
            debug!(url = %url, "Overriding API base URL from environment");
            self.api.base_url = url;
        }

        if let Ok(path) = std::env::var("SHOPKEEP_SNAPSHOT_PATH") {
            debug!(path = %path, "Overriding snapshot path from environment");
            self.storage.snapshot_path = Some(PathBuf::from(path));
        }

        if let Ok(remember) = std::env::var("SHOPKEEP_REMEMBER_ME") {
            match remember.to_lowercase().as_str() {
                "true" | "1" | "yes" => self.session.remember_me_default = true,
                "false" | "0" | "no" => self.session.remember_me_default = false,
                other => warn!(value = %other, "Unknown SHOPKEEP_REMEMBER_ME value, ignoring"),
            }
        }
    }

    /// Returns the default config file path.
    fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "shopkeep", "client")
            .map(|dirs| dirs.config_dir().join("client.toml"))
    }

    // =========================================================================
    // Convenience Methods
    // =========================================================================

    /// The API base URL.
    pub fn base_url(&self) -> &str {
        &self.api.base_url
    }

    /// The explicit durable snapshot path, if configured.
    pub fn snapshot_path(&self) -> Option<&PathBuf> {
        self.storage.snapshot_path.as_ref()
    }

    /// The remember-me preference used when a login does not state one.
    pub fn remember_me_default(&self) -> bool {
        self.session.remember_me_default
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ClientConfig::default();
        assert_eq!(config.base_url(), "http://localhost:4000/api");
        assert!(config.remember_me_default());
        assert_eq!(config.snapshot_path(), None);
    }

    #[test]
    fn test_config_validation() {
        let mut config = ClientConfig::default();
        assert!(config.validate().is_ok());

        config.api.base_url = "ftp://nope".to_string();
        assert!(config.validate().is_err());

        config.api.base_url = "https://pos.example.com/api".to_string();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_partial_toml_uses_defaults() {
        let config: ClientConfig = toml::from_str(
            r#"
            [api]
            base_url = "https://pos.example.com/api"
            "#,
        )
        .unwrap();

        assert_eq!(config.base_url(), "https://pos.example.com/api");
        assert!(config.remember_me_default());
    }

    #[test]
    fn test_toml_round_trip() {
        let mut config = ClientConfig::default();
        config.storage.snapshot_path = Some(PathBuf::from("/tmp/session.json"));
        config.session.remember_me_default = false;

        let toml_str = toml::to_string_pretty(&config).unwrap();
        assert!(toml_str.contains("[api]"));
        assert!(toml_str.contains("[session]"));

        let parsed: ClientConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(
            parsed.snapshot_path(),
            Some(&PathBuf::from("/tmp/session.json"))
        );
        assert!(!parsed.remember_me_default());
    }

    #[test]
    fn test_save_and_load_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("client.toml");

        let mut config = ClientConfig::default();
        config.api.base_url = "http://10.0.0.5:4000/api".to_string();
        config.save(Some(path.clone())).unwrap();

        let loaded = ClientConfig::load(Some(path)).unwrap();
        assert_eq!(loaded.base_url(), "http://10.0.0.5:4000/api");
    }
}
