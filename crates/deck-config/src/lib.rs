//! # deck-config
//!
//! Layered configuration loading for taskdeck using figment.
//!
//! Configuration sources (in priority order, highest wins):
//! 1. Environment variables (`TASKDECK_*` prefix, `__` as separator)
//! 2. Project-level `.taskdeck/config.toml`
//! 3. User-level `~/.config/taskdeck/config.toml`
//! 4. Built-in defaults
//!
//! # Environment Variable Mapping
//!
//! Figment maps `TASKDECK_SERVER__BIND_ADDR` -> `server.bind_addr`,
//! `TASKDECK_RATE_LIMIT__WEEKLY_TASK_LIMIT` -> `rate_limit.weekly_task_limit`,
//! etc. The `__` (double underscore) separates nested config sections.

mod api;
mod error;
mod rate_limit;
mod server;

pub use api::ApiConfig;
pub use error::ConfigError;
pub use rate_limit::RateLimitConfig;
pub use server::ServerConfig;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct DeckConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub rate_limit: RateLimitConfig,
}

impl DeckConfig {
    /// Load configuration from all sources (TOML files + environment variables).
    ///
    /// Does NOT call `dotenvy` -- use [`Self::load_with_dotenv`] if you need
    /// `.env` file loading.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Figment`] when extraction fails.
    pub fn load() -> Result<Self, ConfigError> {
        Self::figment().extract().map_err(ConfigError::from)
    }

    /// Load configuration with `.env` file support.
    ///
    /// Calls `dotenvy` to load the `.env` file from the workspace root before
    /// building the figment. This is the typical entry point for the CLI.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Figment`] when extraction fails.
    pub fn load_with_dotenv() -> Result<Self, ConfigError> {
        Self::load_dotenv_from_workspace();
        Self::load()
    }

    /// Build the figment provider chain.
    ///
    /// Public so tests can inspect the figment directly or add additional
    /// providers on top.
    #[must_use]
    pub fn figment() -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Some(global_path) = Self::global_config_path() {
            if global_path.exists() {
                figment = figment.merge(Toml::file(global_path));
            }
        }

        let local_path = PathBuf::from(".taskdeck/config.toml");
        if local_path.exists() {
            figment = figment.merge(Toml::file(local_path));
        }

        figment.merge(Env::prefixed("TASKDECK_").split("__"))
    }

    /// Path to the user-global config file.
    fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("taskdeck").join("config.toml"))
    }

    /// Load `.env` from the workspace root.
    ///
    /// Walks up from `CARGO_MANIFEST_DIR` (if available) or current dir
    /// looking for a `.env` file. Silently does nothing if none is found.
    fn load_dotenv_from_workspace() {
        if let Ok(manifest_dir) = std::env::var("CARGO_MANIFEST_DIR") {
            let mut dir = PathBuf::from(manifest_dir);
            for _ in 0..3 {
                let env_path = dir.join(".env");
                if env_path.exists() {
                    let _ = dotenvy::from_path(&env_path);
                    return;
                }
                if !dir.pop() {
                    break;
                }
            }
        }

        let _ = dotenvy::dotenv();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_loads() {
        let config = DeckConfig::default();
        assert_eq!(config.server.bind_addr, "127.0.0.1:8787");
        assert_eq!(config.api.base_url, "http://127.0.0.1:8787/api");
        assert_eq!(config.rate_limit.weekly_task_limit, 100);
        assert!(config.rate_limit.whitelist.is_empty());
    }

    #[test]
    fn figment_builds_without_files() {
        let figment = DeckConfig::figment();
        let config: DeckConfig = figment.extract().expect("should extract defaults");
        assert_eq!(config.api.timeout_secs, 10);
        assert_eq!(config.server.session_ttl_hours, 24 * 7);
    }
}
