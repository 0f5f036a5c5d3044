//! Configuration for Nodesty clients.
//!
//! [`ApiConfig`] carries the personal access token, the API host, the per-call
//! timeout and the retry ceiling. It can be built in code, deserialized, or read
//! from `NODESTY_*` environment variables.

use crate::client::{DEFAULT_BASE_URL, DEFAULT_MAX_RETRIES, DEFAULT_TIMEOUT_MS};
use crate::Error;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Deserializer};
use std::time::Duration;
use url::Url;
use validator::Validate;

/// Environment variable holding the personal access token.
pub const ENV_API_KEY: &str = "NODESTY_API_KEY";
/// Environment variable overriding the API host.
pub const ENV_BASE_URL: &str = "NODESTY_BASE_URL";
/// Environment variable overriding the per-call timeout in milliseconds.
pub const ENV_TIMEOUT_MS: &str = "NODESTY_TIMEOUT_MS";
/// Environment variable overriding the retry ceiling.
pub const ENV_MAX_RETRIES: &str = "NODESTY_MAX_RETRIES";

/// Configuration for a Nodesty client instance.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ApiConfig {
    /// Personal access token, sent as `Authorization: PAT <token>`
    #[serde(alias = "apiKey", deserialize_with = "deserialize_secret")]
    pub api_key: SecretString,

    /// API base URL
    #[validate(url)]
    #[serde(alias = "baseUrl", default = "default_base_url")]
    pub base_url: String,

    /// Per-call timeout in milliseconds
    #[validate(range(min = 1, max = 600_000))]
    #[serde(alias = "timeout", default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Maximum number of retries for 5xx responses
    #[validate(range(min = 0, max = 10))]
    #[serde(alias = "retries", default = "default_max_retries")]
    pub max_retries: u32,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

const fn default_timeout_ms() -> u64 {
    DEFAULT_TIMEOUT_MS
}

const fn default_max_retries() -> u32 {
    DEFAULT_MAX_RETRIES
}

fn deserialize_secret<'de, D>(deserializer: D) -> Result<SecretString, D::Error>
where
    D: Deserializer<'de>,
{
    String::deserialize(deserializer).map(SecretString::from)
}

impl ApiConfig {
    /// Create a configuration with the given token and default settings.
    ///
    /// # Errors
    ///
    /// Returns an error if the token is empty.
    pub fn new(api_key: impl Into<String>) -> Result<Self, Error> {
        let config = Self {
            api_key: SecretString::from(api_key.into()),
            base_url: default_base_url(),
            timeout_ms: default_timeout_ms(),
            max_retries: default_max_retries(),
        };

        config.check()?;
        Ok(config)
    }

    /// Load configuration from `NODESTY_*` environment variables.
    ///
    /// `NODESTY_API_KEY` is required; the other variables fall back to defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the token is missing, a numeric variable does not
    /// parse, or the resulting configuration fails validation.
    pub fn from_env() -> Result<Self, Error> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Same as [`ApiConfig::from_env`].
    pub fn from_lookup<F>(lookup: F) -> Result<Self, Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = lookup(ENV_API_KEY)
            .ok_or_else(|| Error::ConfigError(format!("{ENV_API_KEY} is not set")))?;

        let mut config = Self {
            api_key: SecretString::from(api_key),
            base_url: lookup(ENV_BASE_URL).unwrap_or_else(default_base_url),
            timeout_ms: default_timeout_ms(),
            max_retries: default_max_retries(),
        };

        if let Some(raw) = lookup(ENV_TIMEOUT_MS) {
            config.timeout_ms = raw.trim().parse().map_err(|e| {
                Error::ConfigError(format!("Invalid {ENV_TIMEOUT_MS} `{raw}`: {e}"))
            })?;
        }
        if let Some(raw) = lookup(ENV_MAX_RETRIES) {
            config.max_retries = raw.trim().parse().map_err(|e| {
                Error::ConfigError(format!("Invalid {ENV_MAX_RETRIES} `{raw}`: {e}"))
            })?;
        }

        config.check()?;
        Ok(config)
    }

    /// Set the API base URL.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Set the per-call timeout in milliseconds.
    #[must_use]
    pub const fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    /// Set the maximum number of retries.
    #[must_use]
    pub const fn with_max_retries(mut self, retries: u32) -> Self {
        self.max_retries = retries;
        self
    }

    /// Get the per-call timeout as a Duration.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Parse the base URL.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL cannot be parsed.
    pub fn parse_base_url(&self) -> Result<Url, Error> {
        Url::parse(&self.base_url)
            .map_err(|e| Error::ConfigError(format!("Invalid base URL: {e}")))
    }

    /// Run field validation plus the non-empty token check.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigError`] describing the first problem found.
    pub fn check(&self) -> Result<(), Error> {
        if self.api_key.expose_secret().trim().is_empty() {
            return Err(Error::ConfigError("API key must not be empty".to_string()));
        }

        self.validate()
            .map_err(|e| Error::ConfigError(format!("Invalid configuration: {e}")))
    }
}
