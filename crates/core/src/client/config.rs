//! Client configuration.

use std::time::Duration;

/// Default backend origin during local development
pub const DEFAULT_BACKEND_URL: &str = "http://localhost:8080";

/// Fixed prefix of the JSON API
pub const DEFAULT_API_PREFIX: &str = "/api/v1";

/// Connection settings for [`SkillsClient`](super::SkillsClient)
///
/// ## Example
/// ```rust,ignore
/// use skillhub_core::client::{ClientConfig, SkillsClient};
///
/// let config = ClientConfig::new("http://localhost:8080")
///     .with_timeout(std::time::Duration::from_secs(5));
/// let client = SkillsClient::new(config)?;
/// ```
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Backend origin, e.g. `http://localhost:8080`
    pub base_url: String,
    /// Path prefix of the JSON API
    pub api_prefix: String,
    /// Per-request timeout. `None` waits for the backend indefinitely.
    pub timeout: Option<Duration>,
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BACKEND_URL.to_string(),
            api_prefix: DEFAULT_API_PREFIX.to_string(),
            timeout: None,
            user_agent: format!("skillhub/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    pub fn with_api_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.api_prefix = prefix.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Origin without a trailing slash
    pub(crate) fn origin(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }

    /// API prefix normalized to `/segment` form, or empty
    pub(crate) fn normalized_prefix(&self) -> String {
        let trimmed = self.api_prefix.trim_matches('/');
        if trimmed.is_empty() {
            String::new()
        } else {
            format!("/{}", trimmed)
        }
    }
}
