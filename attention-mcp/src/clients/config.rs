//! Service configuration for the Attention client.
//!
//! Holds the API endpoint, credential and timeout settings. Configuration is
//! loaded from environment variables with defaults pointing at the public
//! Attention API.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;
use thiserror::Error;

/// Default Attention API base URL.
pub const DEFAULT_BASE_URL: &str = "https://api.attention.tech/v2";

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Configuration errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// Missing required environment variable.
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),

    /// Invalid configuration value.
    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue {
        /// Configuration key.
        key: String,
        /// Error message.
        message: String,
    },
}

/// Bearer credential for the Attention API.
///
/// Always non-empty once constructed. The `Debug` output is redacted so the
/// value never ends up in logs.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    /// Create a credential, rejecting empty or whitespace-only values.
    pub fn new(value: impl Into<String>) -> Result<Self, ConfigError> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ConfigError::MissingEnvVar("ATTENTION_API_KEY".to_string()));
        }
        Ok(Self(trimmed.to_string()))
    }

    /// The raw token.
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(***)")
    }
}

/// Attention API configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttentionConfig {
    /// Base URL for the API (e.g., "https://api.attention.tech/v2").
    pub base_url: String,

    /// API key used as the bearer token.
    #[serde(skip_serializing)]
    pub api_key: Option<String>,

    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for AttentionConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl AttentionConfig {
    /// Configuration for the default endpoint with the given key.
    pub fn with_api_key(api_key: impl Into<String>) -> Self {
        Self {
            api_key: Some(api_key.into()),
            ..Self::default()
        }
    }

    /// Override the base URL.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Override the request timeout.
    pub fn with_timeout_secs(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }

    /// Load configuration from environment variables.
    ///
    /// Environment variables:
    /// - `ATTENTION_API_KEY`: API key (required at client construction)
    /// - `ATTENTION_API_URL`: API base URL (default: https://api.attention.tech/v2)
    /// - `ATTENTION_TIMEOUT_SECS`: Request timeout in seconds (default: 30)
    pub fn from_env() -> Self {
        let default = Self::default();

        Self {
            base_url: std::env::var("ATTENTION_API_URL")
                .ok()
                .filter(|s| !s.trim().is_empty())
                .unwrap_or(default.base_url),
            api_key: std::env::var("ATTENTION_API_KEY").ok(),
            timeout_secs: std::env::var("ATTENTION_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(default.timeout_secs),
        }
    }

    /// Get the request timeout as a Duration.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// The validated credential.
    pub fn credential(&self) -> Result<Credential, ConfigError> {
        match self.api_key.as_deref() {
            Some(key) => Credential::new(key),
            None => Err(ConfigError::MissingEnvVar("ATTENTION_API_KEY".to_string())),
        }
    }

    /// Validate that the configuration can be used to build a client.
    pub fn validate(&self) -> Result<Credential, ConfigError> {
        let credential = self.credential()?;

        let parsed = reqwest::Url::parse(&self.base_url).map_err(|e| ConfigError::InvalidValue {
            key: "ATTENTION_API_URL".to_string(),
            message: e.to_string(),
        })?;
        if !matches!(parsed.scheme(), "http" | "https") || parsed.cannot_be_a_base() {
            return Err(ConfigError::InvalidValue {
                key: "ATTENTION_API_URL".to_string(),
                message: format!("unsupported URL: {}", self.base_url),
            });
        }

        if self.timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                key: "ATTENTION_TIMEOUT_SECS".to_string(),
                message: "timeout must be at least one second".to_string(),
            });
        }

        Ok(credential)
    }

    /// Build a full URL by appending a path to the base URL.
    pub fn url(&self, path: &str) -> String {
        let base = self.base_url.trim_end_matches('/');
        let path = path.trim_start_matches('/');
        format!("{}/{}", base, path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AttentionConfig::default();
        assert_eq!(config.base_url, "https://api.attention.tech/v2");
        assert_eq!(config.timeout_secs, 30);
        assert!(config.api_key.is_none());
    }

    #[test]
    fn test_url_joining() {
        let config = AttentionConfig::default().with_base_url("https://api.example.com/v2/");
        assert_eq!(
            config.url("/conversations"),
            "https://api.example.com/v2/conversations"
        );
        assert_eq!(
            config.url("conversations"),
            "https://api.example.com/v2/conversations"
        );
    }

    #[test]
    fn test_missing_key_fails_validation() {
        let config = AttentionConfig::default();
        assert_eq!(
            config.validate().unwrap_err(),
            ConfigError::MissingEnvVar("ATTENTION_API_KEY".to_string())
        );

        let blank = AttentionConfig::with_api_key("   ");
        assert!(blank.validate().is_err());
    }

    #[test]
    fn test_invalid_base_url() {
        let config = AttentionConfig::with_api_key("key").with_base_url("not a url");
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidValue { .. })
        ));

        let config = AttentionConfig::with_api_key("key").with_base_url("ftp://example.com");
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let config = AttentionConfig::with_api_key("key").with_timeout_secs(0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_credential_debug_is_redacted() {
        let credential = Credential::new("secret-token").unwrap();
        assert_eq!(credential.expose(), "secret-token");
        assert!(!format!("{:?}", credential).contains("secret"));
    }
}
