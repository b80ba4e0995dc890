//! API client configuration

use std::time::Duration;

/// Default backend URL used when nothing else is configured
pub const DEFAULT_API_URL: &str = "http://localhost:5000/api";

/// Environment variable that overrides the backend URL
pub const API_URL_ENV: &str = "BOARDSYNC_API_URL";

/// Configuration for the remote access layer
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Base URL every request path is resolved against, without a trailing slash
    pub base_url: String,
    /// Request timeout applied by the underlying transport
    pub timeout: Duration,
    /// User agent sent with every request
    pub user_agent: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_string(),
            timeout: Duration::from_secs(30),
            user_agent: format!("boardsync/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl ApiConfig {
    /// Build a config from the environment, falling back to defaults
    ///
    /// Checks BOARDSYNC_API_URL first, then uses [`DEFAULT_API_URL`].
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(url) = std::env::var(API_URL_ENV) {
            config.base_url = url;
        }
        config.normalize();
        config
    }

    /// Build a config pointing at an explicit base URL
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        let mut config = Self {
            base_url: base_url.into(),
            ..Self::default()
        };
        config.normalize();
        config
    }

    fn normalize(&mut self) {
        while self.base_url.ends_with('/') {
            self.base_url.pop();
        }
    }
}
