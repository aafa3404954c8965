//! Server configuration.

use serde::{Deserialize, Serialize};

fn default_bind_addr() -> String {
    "127.0.0.1:8787".to_string()
}

fn default_database_path() -> String {
    ".taskdeck/taskdeck.db".to_string()
}

/// Default session lifetime: one week.
const fn default_session_ttl_hours() -> u32 {
    24 * 7
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    /// Address the HTTP server binds to.
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    /// Path to the sqlite database file. `:memory:` is honored for tests.
    #[serde(default = "default_database_path")]
    pub database_path: String,

    /// Session lifetime in hours.
    #[serde(default = "default_session_ttl_hours")]
    pub session_ttl_hours: u32,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            database_path: default_database_path(),
            session_ttl_hours: default_session_ttl_hours(),
        }
    }
}
