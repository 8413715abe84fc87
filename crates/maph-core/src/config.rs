//! Client configuration.

use crate::consultation::SaveFailurePolicy;
use crate::error::{MaphError, Result};
use crate::support::DEFAULT_SUPPORT_EMAIL;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Environment variable overriding [`ClientConfig::api_base_url`].
pub const ENV_API_URL: &str = "MAPH_API_URL";

/// Environment variable overriding [`ClientConfig::request_timeout_secs`].
pub const ENV_TIMEOUT_SECS: &str = "MAPH_TIMEOUT_SECS";

fn default_api_base_url() -> String {
    "http://192.168.1.98:3001".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_support_email() -> String {
    DEFAULT_SUPPORT_EMAIL.to_string()
}

/// Root of `config.toml`.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Backend base URL, without a trailing slash
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
    #[serde(default = "default_timeout_secs")]
    pub request_timeout_secs: u64,
    /// Recipient of account-creation requests
    #[serde(default = "default_support_email")]
    pub support_email: String,
    #[serde(default)]
    pub consultation_save_failure: SaveFailurePolicy,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            request_timeout_secs: default_timeout_secs(),
            support_email: default_support_email(),
            consultation_save_failure: SaveFailurePolicy::default(),
        }
    }
}

impl ClientConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Base URL with any trailing slash removed.
    pub fn base_url(&self) -> &str {
        self.api_base_url.trim_end_matches('/')
    }

    /// Applies overrides from a variable lookup (normally `std::env::var`).
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(ENV_API_URL).filter(|v| !v.trim().is_empty()) {
            self.api_base_url = url.trim().to_string();
        }
        if let Some(raw) = lookup(ENV_TIMEOUT_SECS) {
            self.request_timeout_secs = raw.trim().parse().map_err(|_| {
                MaphError::config(format!("{} must be a number of seconds, got '{}'", ENV_TIMEOUT_SECS, raw))
            })?;
        }
        self.validate()
    }

    pub fn validate(&self) -> Result<()> {
        let url = self.base_url();
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(MaphError::config(format!(
                "api_base_url must start with http:// or https://, got '{}'",
                self.api_base_url
            )));
        }
        if self.request_timeout_secs == 0 {
            return Err(MaphError::config("request_timeout_secs must be greater than zero"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_file_uses_defaults() {
        let config: ClientConfig = toml::from_str(
            r#"
            api_base_url = "https://maph.example.com/"
            consultation_save_failure = "suppress"
            "#,
        )
        .unwrap();
        assert_eq!(config.base_url(), "https://maph.example.com");
        assert_eq!(config.request_timeout_secs, 30);
        assert_eq!(config.support_email, "SOPORTEMAPH@GMAIL.COM");
        assert_eq!(config.consultation_save_failure, SaveFailurePolicy::Suppress);
    }

    #[test]
    fn test_env_overrides() {
        let mut config = ClientConfig::default();
        config
            .apply_overrides(|key| match key {
                ENV_API_URL => Some("http://localhost:3001".into()),
                ENV_TIMEOUT_SECS => Some("5".into()),
                _ => None,
            })
            .unwrap();
        assert_eq!(config.api_base_url, "http://localhost:3001");
        assert_eq!(config.request_timeout(), Duration::from_secs(5));
    }

    #[test]
    fn test_bad_timeout_override() {
        let mut config = ClientConfig::default();
        let err = config
            .apply_overrides(|key| (key == ENV_TIMEOUT_SECS).then(|| "soon".to_string()))
            .unwrap_err();
        assert!(matches!(err, MaphError::Config(_)));
    }

    #[test]
    fn test_round_trip_default() {
        let text = toml::to_string(&ClientConfig::default()).unwrap();
        assert!(text.contains("consultation_save_failure = \"report\""));
    }
}
