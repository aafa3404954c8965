//! API client configuration.

use serde::{Deserialize, Serialize};

fn default_base_url() -> String {
    "http://127.0.0.1:8787/api".to_string()
}

const fn default_timeout_secs() -> u64 {
    10
}

const fn default_page_size() -> u32 {
    5
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ApiConfig {
    /// Base URL of the REST API, including the `/api` prefix.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Default page size for status-list fetches.
    #[serde(default = "default_page_size")]
    pub page_size: u32,

    /// Session token presented on authenticated requests, if any.
    #[serde(default)]
    pub session_token: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
            page_size: default_page_size(),
            session_token: String::new(),
        }
    }
}
