//! Static page configuration.
//!
//! The page has no build-time templating, so values come from a JSON
//! document compiled into the bundle, with optional overrides for the
//! service URL and public key.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::warn;

use crate::error::ConfigError;

/// Which sign-in methods the page offers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SignInMethods {
    pub email_password: bool,
    /// Redirect-based providers, e.g. `["github"]`
    pub oauth_providers: Vec<String>,
}

impl SignInMethods {
    pub fn allows_provider(&self, provider: &str) -> bool {
        self.oauth_providers
            .iter()
            .any(|p| p.eq_ignore_ascii_case(provider))
    }
}

impl Default for SignInMethods {
    fn default() -> Self {
        Self {
            email_password: true,
            oauth_providers: vec!["github".to_string()],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Base URL of the hosted auth service
    pub supabase_url: String,
    /// Public (anon) client key
    pub anon_key: String,
    /// Where OAuth redirects return to; the page origin when unset
    pub redirect_url: Option<String>,
    pub sign_in: SignInMethods,
    pub notification_timeout_ms: u64,
    pub redirect_settle_ms: u64,
    pub focus_delay_ms: u64,
    pub form_close_delay_ms: u64,
    pub log_level: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            supabase_url: "https://your-project.supabase.co".to_string(),
            anon_key: String::new(),
            redirect_url: None,
            sign_in: SignInMethods::default(),
            notification_timeout_ms: 5000,
            redirect_settle_ms: 300,
            focus_delay_ms: 100,
            form_close_delay_ms: 1500,
            log_level: "info".to_string(),
        }
    }
}

impl AppConfig {
    pub fn from_json(document: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(document).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Parse `document`, apply overrides, and fall back to defaults when the
    /// document is unusable
    pub fn load(document: &str, url_override: Option<&str>, key_override: Option<&str>) -> Self {
        let mut config = match Self::from_json(document) {
            Ok(config) => config,
            Err(e) => {
                warn!("Falling back to default configuration: {}", e);
                Self::default()
            }
        };

        if let Some(url) = url_override.filter(|v| !v.trim().is_empty()) {
            config.supabase_url = url.trim().to_string();
        }
        if let Some(key) = key_override.filter(|v| !v.trim().is_empty()) {
            config.anon_key = key.trim().to_string();
        }

        if let Err(e) = config.validate() {
            warn!("Configuration is incomplete: {}", e);
        }
        config
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.supabase_url.trim().is_empty() {
            return Err(ConfigError::Missing("supabase_url"));
        }
        if self.anon_key.trim().is_empty() {
            return Err(ConfigError::Missing("anon_key"));
        }
        Ok(())
    }

    pub fn notification_timeout(&self) -> Duration {
        Duration::from_millis(self.notification_timeout_ms)
    }

    pub fn redirect_settle(&self) -> Duration {
        Duration::from_millis(self.redirect_settle_ms)
    }

    pub fn focus_delay(&self) -> Duration {
        Duration::from_millis(self.focus_delay_ms)
    }

    pub fn form_close_delay(&self) -> Duration {
        Duration::from_millis(self.form_close_delay_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.notification_timeout(), Duration::from_secs(5));
        assert_eq!(config.redirect_settle(), Duration::from_millis(300));
        assert!(config.sign_in.email_password);
        assert!(config.sign_in.allows_provider("GitHub"));
        assert!(!config.sign_in.allows_provider("google"));
    }

    #[test]
    fn test_partial_document_keeps_defaults() {
        let config = AppConfig::from_json(
            r#"{"supabase_url": "https://abc.supabase.co", "anon_key": "k", "sign_in": {"oauth_providers": []}}"#,
        )
        .unwrap();
        assert_eq!(config.supabase_url, "https://abc.supabase.co");
        assert_eq!(config.redirect_settle_ms, 300);
        assert!(config.sign_in.email_password);
        assert!(config.sign_in.oauth_providers.is_empty());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_falls_back_and_applies_overrides() {
        let config = AppConfig::load("not json", Some("https://override.supabase.co"), Some(" key "));
        assert_eq!(config.supabase_url, "https://override.supabase.co");
        assert_eq!(config.anon_key, "key");
        assert_eq!(config.notification_timeout_ms, 5000);
    }

    #[test]
    fn test_validate_requires_key() {
        let config = AppConfig::default();
        assert_eq!(config.validate(), Err(ConfigError::Missing("anon_key")));
    }
}
