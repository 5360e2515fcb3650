//! # Client configuration: `market.toml`
//!
//! Defines the TOML file the web shell embeds at build time. It tells the
//! client where the REST backend and the auth provider live, and how long
//! query results stay fresh.
//!
//! ## Structure
//!
//! ```toml
//! [api]
//! base_url = "http://localhost:8000/api"
//!
//! [auth]
//! url = "https://project.supabase.co"
//! anon_key = "public-anon-key"
//! callback_path = "/auth/callback"
//! token_storage_key = "access_token"
//!
//! [cache]
//! stale_time_secs = 300
//! gc_time_secs = 600
//! retry = 1
//! ```
//!
//! Every field has a default, so a missing or empty file is equivalent to
//! [`MarketConfig::default`].

use serde::{Deserialize, Serialize};

/// Errors reading or writing `market.toml`.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("cannot serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// Top-level configuration stored in `market.toml`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MarketConfig {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    pub cache: CacheConfig,
}

/// REST backend settings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

/// Hosted auth provider settings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Root url of the provider, without the `/auth/v1` suffix.
    #[serde(default)]
    pub url: String,
    /// Public key sent as the `apikey` header.
    #[serde(default)]
    pub anon_key: String,
    /// Path the provider redirects back to after sign-in.
    #[serde(default = "default_callback_path")]
    pub callback_path: String,
    /// Local storage key holding the access token.
    #[serde(default = "default_token_storage_key")]
    pub token_storage_key: String,
}

/// Query freshness settings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CacheConfig {
    #[serde(default = "default_stale_time")]
    pub stale_time_secs: u64,
    #[serde(default = "default_gc_time")]
    pub gc_time_secs: u64,
    #[serde(default = "default_retry")]
    pub retry: u32,
}

fn default_base_url() -> String {
    "http://localhost:8000/api".to_string()
}

fn default_callback_path() -> String {
    "/auth/callback".to_string()
}

fn default_token_storage_key() -> String {
    crate::token::DEFAULT_TOKEN_KEY.to_string()
}

fn default_stale_time() -> u64 {
    5 * 60
}

fn default_gc_time() -> u64 {
    10 * 60
}

fn default_retry() -> u32 {
    1
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
        }
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            anon_key: String::new(),
            callback_path: default_callback_path(),
            token_storage_key: default_token_storage_key(),
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            stale_time_secs: default_stale_time(),
            gc_time_secs: default_gc_time(),
            retry: default_retry(),
        }
    }
}

impl MarketConfig {
    /// Create a config pointing at the given backend.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            api: ApiConfig {
                base_url: base_url.into(),
            },
            ..Self::default()
        }
    }

    /// Builder method to set the auth provider.
    pub fn with_auth(mut self, url: impl Into<String>, anon_key: impl Into<String>) -> Self {
        self.auth.url = url.into();
        self.auth.anon_key = anon_key.into();
        self
    }

    /// The well-known filename for the config file.
    pub fn filename() -> &'static str {
        "market.toml"
    }

    /// Parse from TOML string.
    pub fn from_toml(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(ConfigError::Parse)
    }

    /// Serialize to TOML string.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(ConfigError::Serialize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::CachePolicy;
    use std::time::Duration;

    #[test]
    fn test_empty_file_is_default() {
        let config = MarketConfig::from_toml("").unwrap();
        assert_eq!(config, MarketConfig::default());
        assert_eq!(config.auth.callback_path, "/auth/callback");
        assert_eq!(config.cache.stale_time_secs, 300);
        assert_eq!(config.cache.gc_time_secs, 600);
        assert_eq!(config.cache.retry, 1);
    }

    #[test]
    fn test_partial_sections_fill_defaults() {
        let config = MarketConfig::from_toml(
            r#"
            [api]
            base_url = "https://market.example.edu/api"

            [cache]
            retry = 0
            "#,
        )
        .unwrap();
        assert_eq!(config.api.base_url, "https://market.example.edu/api");
        assert_eq!(config.cache.retry, 0);
        assert_eq!(config.cache.stale_time_secs, 300);
        assert_eq!(config.auth.token_storage_key, "access_token");
    }

    #[test]
    fn test_roundtrip() {
        let config = MarketConfig::new("https://market.example.edu/api")
            .with_auth("https://abc.supabase.co", "anon");
        let text = config.to_toml().unwrap();
        assert_eq!(MarketConfig::from_toml(&text).unwrap(), config);
    }

    #[test]
    fn test_invalid_toml_is_an_error() {
        assert!(matches!(
            MarketConfig::from_toml("[cache]\nretry = \"twice\""),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_cache_policy_from_config() {
        let policy = CachePolicy::from(&CacheConfig::default());
        assert_eq!(policy, CachePolicy::default());
        assert_eq!(policy.stale_time, Duration::from_secs(300));
    }
}
