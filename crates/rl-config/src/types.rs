use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Default wait for the browser callback, in seconds
const DEFAULT_CALLBACK_TIMEOUT_SECS: u64 = 300;

fn default_callback_timeout_secs() -> u64 {
    DEFAULT_CALLBACK_TIMEOUT_SECS
}

/// Authentication configuration for the launcher's browser login flow
///
/// The launcher opens the provider's authorization page in the user's
/// browser; the provider redirects to `redirect_page_url`, which delivers the
/// result back to the launcher's loopback listener.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AuthConfig {
    /// Identity provider authorization endpoint
    pub auth_url: String,

    /// OAuth client id registered for the launcher
    pub client_id: String,

    /// Static redirect page the provider sends the browser to after login
    pub redirect_page_url: String,

    /// Scopes requested from the provider
    #[serde(default)]
    pub scopes: Vec<String>,

    /// Extra query parameters appended to the authorization URL
    #[serde(default)]
    pub extra_auth_params: HashMap<String, String>,

    /// How long the loopback listener waits for the browser callback
    #[serde(default = "default_callback_timeout_secs")]
    pub callback_timeout_secs: u64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            auth_url: "https://login.live.com/oauth20_authorize.srf".to_string(),
            client_id: String::new(),
            redirect_page_url: "https://relaunch-launcher.github.io/auth/".to_string(),
            scopes: vec!["XboxLive.signin".to_string(), "offline_access".to_string()],
            extra_auth_params: HashMap::new(),
            callback_timeout_secs: DEFAULT_CALLBACK_TIMEOUT_SECS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AuthConfig::default();
        assert!(!config.auth_url.is_empty());
        assert!(!config.redirect_page_url.is_empty());
        assert_eq!(config.callback_timeout_secs, 300);
    }

    #[test]
    fn test_deserialize_minimal() {
        let yaml = r#"
auth_url: "https://example.com/authorize"
client_id: "launcher-client"
redirect_page_url: "https://example.com/redirect"
"#;
        let config: AuthConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.client_id, "launcher-client");
        assert!(config.scopes.is_empty());
        assert_eq!(config.callback_timeout_secs, 300);
    }

    #[test]
    fn test_roundtrip() {
        let mut config = AuthConfig::default();
        config.client_id = "abc".to_string();
        config
            .extra_auth_params
            .insert("prompt".to_string(), "select_account".to_string());

        let yaml = serde_yaml::to_string(&config).unwrap();
        let parsed: AuthConfig = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(parsed, config);
    }
}
