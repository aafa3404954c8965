//! Task-creation rate limit configuration.
//!
//! Values are read from this section at enforcement time, not cached by the
//! limiter, so a reloaded config takes effect without a restart.

use serde::{Deserialize, Serialize};

const fn default_weekly_task_limit() -> u32 {
    100
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RateLimitConfig {
    /// Maximum tasks a user may create per ISO week (Monday 00:00 UTC).
    #[serde(default = "default_weekly_task_limit")]
    pub weekly_task_limit: u32,

    /// Emails exempt from the weekly limit. Compared case-insensitively.
    #[serde(default)]
    pub whitelist: Vec<String>,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            weekly_task_limit: default_weekly_task_limit(),
            whitelist: Vec::new(),
        }
    }
}

impl RateLimitConfig {
    /// Whether `email` bypasses the weekly limit.
    #[must_use]
    pub fn is_whitelisted(&self, email: &str) -> bool {
        let email = email.trim().to_lowercase();
        self.whitelist
            .iter()
            .any(|entry| entry.trim().to_lowercase() == email)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn whitelist_matching_is_case_insensitive() {
        let config = RateLimitConfig {
            weekly_task_limit: 10,
            whitelist: vec!["Admin@Example.com".to_string()],
        };
        assert!(config.is_whitelisted("admin@example.com"));
        assert!(config.is_whitelisted(" ADMIN@EXAMPLE.COM "));
        assert!(!config.is_whitelisted("someone@example.com"));
    }
}
