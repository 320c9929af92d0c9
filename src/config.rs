//! Relay configuration.
//!
//! The translators only need the GitLab base URL to build profile links. It is
//! read from the environment with a default, so a missing setting degrades to
//! links on gitlab.com rather than an error.

/// Environment variable holding the GitLab base URL.
pub const GITLAB_URL_ENV: &str = "GITLAB_RELAY_URL";

/// Base URL used when none is configured.
pub const DEFAULT_GITLAB_URL: &str = "https://gitlab.com";

/// Settings shared by the routing implementations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelayConfig {
    /// GitLab instance base URL, without a trailing slash.
    pub gitlab_url: String,
}

impl RelayConfig {
    /// Creates a config for the given base URL.
    ///
    /// Trailing slashes are stripped. An empty URL falls back to the default.
    pub fn new(gitlab_url: impl Into<String>) -> Self {
        let url = gitlab_url.into();
        let trimmed = url.trim().trim_end_matches('/');
        RelayConfig {
            gitlab_url: if trimmed.is_empty() {
                DEFAULT_GITLAB_URL.to_string()
            } else {
                trimmed.to_string()
            },
        }
    }

    /// Creates a `RelayConfig` from environment variables.
    ///
    /// Reads `GITLAB_RELAY_URL`; falls back to `https://gitlab.com`.
    pub fn from_env() -> Self {
        let url = std::env::var(GITLAB_URL_ENV).unwrap_or_default();
        RelayConfig::new(url)
    }

    /// Returns the profile page URL for a username.
    pub fn user_profile_url(&self, username: &str) -> String {
        format!("{}/{}", self.gitlab_url, username)
    }
}

impl Default for RelayConfig {
    fn default() -> Self {
        RelayConfig::new(DEFAULT_GITLAB_URL)
    }
}
