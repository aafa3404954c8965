//! # deck-api
//!
//! REST API client for taskdeck.
//!
//! Wraps the `/api/tasks`, `/api/users`, and `/api/auth` surface with typed
//! calls, decoding the success envelope and translating problem details
//! bodies into [`ApiError`]. The cache layer drives task traffic through
//! this client; it never interprets responses itself.

mod auth;
mod error;
mod http;
mod tasks;

pub use error::ApiError;
pub use tasks::TaskPage;

use deck_config::ApiConfig;

/// Session token request header.
pub const SESSION_HEADER: &str = "X-Session-Token";

/// HTTP client for the taskdeck REST API.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    session_token: Option<String>,
}

impl ApiClient {
    /// Create a client from the `[api]` config section.
    ///
    /// # Panics
    ///
    /// Panics if the underlying `reqwest::Client` fails to build.
    #[must_use]
    pub fn new(config: &ApiConfig) -> Self {
        Self {
            http: reqwest::Client::builder()
                .user_agent("taskdeck/0.1")
                .timeout(std::time::Duration::from_secs(config.timeout_secs))
                .build()
                .expect("reqwest client should build"),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            session_token: (!config.session_token.is_empty())
                .then(|| config.session_token.clone()),
        }
    }

    /// Replace the session token used on subsequent requests.
    pub fn set_session_token(&mut self, token: Option<String>) {
        self.session_token = token;
    }

    pub(crate) fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// Attach the session header when a token is present.
    pub(crate) fn authed(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.session_token {
            Some(token) => req.header(SESSION_HEADER, token),
            None => req,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_joins_without_double_slash() {
        let config = ApiConfig {
            base_url: "http://localhost:8787/api/".to_string(),
            ..ApiConfig::default()
        };
        let client = ApiClient::new(&config);
        assert_eq!(client.url("/tasks"), "http://localhost:8787/api/tasks");
    }

    #[test]
    fn empty_session_token_means_unauthenticated() {
        let client = ApiClient::new(&ApiConfig::default());
        assert!(client.session_token.is_none());
    }
}
