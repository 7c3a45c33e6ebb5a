use std::time::Duration;

use reqwest::Url;
use serde::{Deserialize, Serialize};

use crate::error::PatasError;

/// Production backend.
pub const DEFAULT_BASE_URL: &str = "https://patas-unidas-api.onrender.com";

/// The hosted backend sleeps when idle and can take ~50s to answer the first
/// request after waking up.
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Settings for the HTTP client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, uniffi::Record)]
#[serde(default)]
pub struct ClientConfig {
    /// Base URL of the REST backend, without a trailing path.
    pub base_url: String,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
    /// Overrides the default `patas-core/<version>` user agent.
    pub user_agent: Option<String>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            user_agent: None,
        }
    }
}

impl ClientConfig {
    /// Builds a config for `base_url` with default settings otherwise.
    #[must_use]
    pub fn with_base_url(base_url: &str) -> Self {
        Self {
            base_url: base_url.to_string(),
            ..Self::default()
        }
    }

    /// Parses a config from JSON. Missing fields take their defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is invalid or the config does not validate.
    pub fn from_json(json: &str) -> Result<Self, PatasError> {
        let config: Self =
            serde_json::from_str(json).map_err(|_| PatasError::InvalidInput {
                attribute: "config".to_string(),
                reason: "Invalid config".to_string(),
            })?;
        config.validate()?;
        Ok(config)
    }

    /// Checks that the base URL is usable and the timeout is bounded.
    ///
    /// Plain HTTP is only accepted for loopback hosts (local backends and
    /// test servers).
    ///
    /// # Errors
    ///
    /// Returns [`PatasError::InvalidInput`] describing the first problem found.
    pub fn validate(&self) -> Result<(), PatasError> {
        let url = Url::parse(&self.base_url)
            .map_err(|e| PatasError::invalid_input("base_url", &e.to_string()))?;
        let loopback = matches!(url.host_str(), Some("localhost" | "127.0.0.1" | "[::1]"));
        if url.scheme() != "https" && !(url.scheme() == "http" && loopback) {
            return Err(PatasError::invalid_input(
                "base_url",
                "must use https",
            ));
        }
        if self.timeout_secs == 0 {
            return Err(PatasError::invalid_input(
                "timeout_secs",
                "must be greater than zero",
            ));
        }
        Ok(())
    }

    /// Base URL without trailing slashes.
    #[must_use]
    pub fn normalized_base_url(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }

    /// The per-request timeout.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// The `User-Agent` header value.
    #[must_use]
    pub fn user_agent(&self) -> String {
        self.user_agent
            .clone()
            .unwrap_or_else(|| format!("patas-core/{}", env!("CARGO_PKG_VERSION")))
    }
}

/// Returns the default client configuration.
#[uniffi::export]
#[must_use]
pub fn default_client_config() -> ClientConfig {
    ClientConfig::default()
}
