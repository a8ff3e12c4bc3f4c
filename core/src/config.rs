//! Client configuration.

use std::time::Duration;

use crate::error::ApiError;

/// Production API server.
pub const DEFAULT_BASE_URL: &str = "https://api.smartwaiver.com";

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Environment variable holding the account API key.
pub const API_KEY_ENV: &str = "SMARTWAIVER_API_KEY";

/// Environment variable overriding the base URL.
pub const BASE_URL_ENV: &str = "SMARTWAIVER_BASE_URL";

/// Configuration for a `SmartwaiverClient`.
#[derive(Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Account API key, sent as `sw-api-key`.
    pub api_key: String,

    pub base_url: String,

    /// Only consulted by the bundled `UreqTransport`.
    pub timeout: Duration,

    /// Sent as `user-agent`.
    pub user_agent: String,
}

impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .field("user_agent", &self.user_agent)
            .finish()
    }
}

impl ClientConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            user_agent: default_user_agent(),
        }
    }

    /// Reads `SMARTWAIVER_API_KEY` and, if set, `SMARTWAIVER_BASE_URL`.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::InvalidConfig` when the API key is not set.
    pub fn from_env() -> Result<Self, ApiError> {
        let api_key = std::env::var(API_KEY_ENV)
            .map_err(|_| ApiError::InvalidConfig(format!("{API_KEY_ENV} is not set")))?;
        let mut config = Self::new(api_key);
        if let Ok(base_url) = std::env::var(BASE_URL_ENV) {
            config.base_url = base_url;
        }
        Ok(config)
    }

    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// # Errors
    ///
    /// Returns `ApiError::InvalidConfig` for an empty API key or a base URL
    /// that is not http(s).
    pub fn validate(&self) -> Result<(), ApiError> {
        if self.api_key.trim().is_empty() {
            return Err(ApiError::InvalidConfig("api_key cannot be empty".to_string()));
        }
        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(ApiError::InvalidConfig(format!(
                "base_url must start with http:// or https://, got: {}",
                self.base_url
            )));
        }
        Ok(())
    }
}

fn default_user_agent() -> String {
    format!("SmartwaiverSDK:{}-rust", env!("CARGO_PKG_VERSION"))
}
