//! # Runtime Configuration
//!
//! Configuration for the account service and the clients it constructs.
//!
//! ## Security Requirements
//!
//! - Twitter OAuth credentials MUST be set in production
//! - Everything else has a development default with an environment override

use std::env;
use std::path::PathBuf;

use thiserror::Error;

use shared_bus::DEFAULT_CHANNEL_CAPACITY;
use td_02_user_accounts::DEFAULT_LOGIN_CHALLENGE;

/// Scopes requested from Twitter during OAuth.
pub const TWITTER_SCOPES: &[&str] = &["tweet.read", "users.read"];

/// Complete runtime configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Public base URL of the API, with trailing slash.
    pub base_api_url: String,
    /// Twitter OAuth client settings.
    pub twitter: TwitterConfig,
    /// Message users sign to prove wallet ownership.
    pub login_challenge: String,
    /// Storage configuration.
    pub storage: StorageConfig,
    /// Per-subscriber event bus buffer.
    pub bus_capacity: usize,
    /// Deployment environment (development, staging, production).
    pub environment: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            base_api_url: "http://localhost:8080/".to_string(),
            twitter: TwitterConfig::default(),
            login_challenge: DEFAULT_LOGIN_CHALLENGE.to_string(),
            storage: StorageConfig::default(),
            bus_capacity: DEFAULT_CHANNEL_CAPACITY,
            environment: "development".to_string(),
        }
    }
}

impl AppConfig {
    /// Load configuration from the process environment.
    ///
    /// # Environment Variables
    ///
    /// - `TD_BASE_API_URL`: public API base URL
    /// - `TWITTER_CLIENT_ID` / `TWITTER_CLIENT_SECRET`: OAuth credentials
    /// - `TD_LOGIN_CHALLENGE`: login challenge text
    /// - `TD_DATA_DIR`: RocksDB directory (only with the `rocksdb` feature)
    /// - `TD_BUS_CAPACITY`: event bus buffer per subscriber
    /// - `TD_ENVIRONMENT`: deployment environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let base_api_url = non_empty("TD_BASE_API_URL")
            .map(normalize_base_url)
            .unwrap_or(defaults.base_api_url);

        let bus_capacity = match non_empty("TD_BUS_CAPACITY") {
            Some(raw) => parse_capacity(&raw)?,
            None => defaults.bus_capacity,
        };

        Ok(Self {
            base_api_url,
            twitter: TwitterConfig {
                client_id: non_empty("TWITTER_CLIENT_ID"),
                client_secret: non_empty("TWITTER_CLIENT_SECRET"),
                scopes: defaults.twitter.scopes,
            },
            login_challenge: lookup("TD_LOGIN_CHALLENGE")
                .filter(|v| !v.is_empty())
                .unwrap_or(defaults.login_challenge),
            storage: StorageConfig {
                data_dir: non_empty("TD_DATA_DIR").map(PathBuf::from),
            },
            bus_capacity,
            environment: non_empty("TD_ENVIRONMENT").unwrap_or(defaults.environment),
        })
    }

    /// OAuth callback registered with Twitter.
    pub fn twitter_callback_url(&self) -> String {
        format!("{}callback", self.base_api_url)
    }

    /// Whether this is a production deployment.
    pub fn is_production(&self) -> bool {
        self.environment.eq_ignore_ascii_case("production")
    }

    /// Validate configuration for production readiness.
    ///
    /// # Returns
    ///
    /// Returns `Err` if either Twitter OAuth credential is missing.
    pub fn validate_for_production(&self) -> Result<(), ConfigError> {
        if self.twitter.client_id.is_none() {
            return Err(ConfigError::MissingCredential("TWITTER_CLIENT_ID"));
        }
        if self.twitter.client_secret.is_none() {
            return Err(ConfigError::MissingCredential("TWITTER_CLIENT_SECRET"));
        }
        Ok(())
    }
}

fn normalize_base_url(url: String) -> String {
    if url.ends_with('/') {
        url
    } else {
        format!("{url}/")
    }
}

fn parse_capacity(raw: &str) -> Result<usize, ConfigError> {
    match raw.trim().parse::<usize>() {
        Ok(capacity) if capacity > 0 => Ok(capacity),
        _ => Err(ConfigError::InvalidValue {
            key: "TD_BUS_CAPACITY",
            value: raw.to_string(),
        }),
    }
}

/// Configuration errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// A credential required in production is not set.
    #[error("{0} must be set in production")]
    MissingCredential(&'static str),

    /// A variable is set but cannot be parsed.
    #[error("invalid value for {key}: {value:?}")]
    InvalidValue {
        /// Variable name.
        key: &'static str,
        /// Raw value.
        value: String,
    },
}

/// Twitter OAuth 2.0 client settings.
#[derive(Clone)]
pub struct TwitterConfig {
    /// OAuth client id.
    pub client_id: Option<String>,
    /// OAuth client secret.
    pub client_secret: Option<String>,
    /// Requested scopes.
    pub scopes: Vec<String>,
}

impl Default for TwitterConfig {
    fn default() -> Self {
        Self {
            client_id: None,
            client_secret: None,
            scopes: TWITTER_SCOPES.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl std::fmt::Debug for TwitterConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TwitterConfig")
            .field("client_id", &self.client_id)
            .field(
                "client_secret",
                &self.client_secret.as_ref().map(|_| "<redacted>"),
            )
            .field("scopes", &self.scopes)
            .finish()
    }
}

/// Storage configuration.
#[derive(Debug, Clone, Default)]
pub struct StorageConfig {
    /// RocksDB directory. The in-memory store is used when unset.
    pub data_dir: Option<PathBuf>,
}
