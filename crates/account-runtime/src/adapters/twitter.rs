//! Twitter OAuth 2.0 client settings.

use crate::container::config::AppConfig;

/// OAuth client constructed once at startup and shared by request handlers.
///
/// The secret stays in [`AppConfig`]; only its presence is required here.
#[derive(Debug, Clone)]
pub struct TwitterOAuthClient {
    client_id: String,
    callback_url: String,
    scopes: Vec<String>,
}

impl TwitterOAuthClient {
    /// Build from configuration. `None` when either credential is missing.
    pub fn from_config(config: &AppConfig) -> Option<Self> {
        config.twitter.client_secret.as_ref()?;
        Some(Self {
            client_id: config.twitter.client_id.clone()?,
            callback_url: config.twitter_callback_url(),
            scopes: config.twitter.scopes.clone(),
        })
    }

    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    pub fn callback_url(&self) -> &str {
        &self.callback_url
    }

    /// Scopes in the space-separated form OAuth expects.
    pub fn scope_param(&self) -> String {
        self.scopes.join(" ")
    }
}
