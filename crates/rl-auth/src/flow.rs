//! Login flow orchestration
//!
//! Owns the single pending login: binds the callback listener, builds the
//! authorization URL with the listener's port embedded in `state`, and waits
//! for exactly one callback. The listener is bound before the URL exists,
//! which rules out the race where the provider redirects before the
//! launcher is accepting.

use crate::listener::{CallbackListener, CallbackOutcome};
use crate::result::AuthResult;
use crate::target::ForwardingTarget;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use rl_config::AuthConfig;
use rl_types::{AppError, AppResult};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};
use uuid::Uuid;

/// Options for one login attempt
#[derive(Debug, Clone, Default)]
pub struct LoginOptions {
    /// Account email passed to the provider as `login_hint` so the right
    /// account is preselected in the browser
    pub login_hint: Option<String>,
}

/// Final outcome of one pending login
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginOutcome {
    /// The browser callback arrived and parsed into a result
    Completed(AuthResult),

    /// No callback arrived within the configured window; the launcher
    /// should offer the manual-entry path instead
    TimedOut,
}

/// Starts login attempts and enforces the one-at-a-time rule
pub struct LoginFlow {
    config: AuthConfig,
    active: Arc<Mutex<Option<Uuid>>>,
}

impl LoginFlow {
    pub fn new(config: AuthConfig) -> Self {
        Self {
            config,
            active: Arc::new(Mutex::new(None)),
        }
    }

    /// Start a new login attempt
    ///
    /// Binds the listener first, then builds the authorization URL carrying
    /// `port:<port>` as its `state`. The caller opens the returned
    /// `auth_url` in the user's browser and then awaits `finish()`.
    pub async fn begin(&self, options: LoginOptions) -> AppResult<PendingLogin> {
        let attempt_id = Uuid::new_v4();

        {
            let mut active = self.active.lock();
            if let Some(existing) = *active {
                return Err(AppError::AuthFlow(format!(
                    "Login attempt {} is already in progress",
                    existing
                )));
            }
            *active = Some(attempt_id);
        }
        let guard = ActiveGuard {
            active: Arc::clone(&self.active),
            attempt_id,
        };

        let listener = CallbackListener::bind().await?;
        let target = ForwardingTarget::new(listener.port());
        let auth_url = build_authorization_url(
            &self.config,
            &target.state_value(),
            options.login_hint.as_deref(),
        );

        info!(
            "Login attempt {} listening on port {}",
            attempt_id,
            listener.port()
        );

        Ok(PendingLogin {
            attempt_id,
            auth_url,
            listener,
            timeout: Duration::from_secs(self.config.callback_timeout_secs),
            started_at: Utc::now(),
            _guard: guard,
        })
    }

    /// Parse a result the user pasted from the redirect page's manual
    /// fallback
    ///
    /// Applies the same success/failure rules the listener applies to a
    /// forwarded callback.
    pub fn complete_manually(&self, pasted: &str) -> AppResult<AuthResult> {
        let trimmed = pasted.trim();
        if trimmed.is_empty() {
            return Err(AppError::InvalidParams(
                "Pasted login code is empty".to_string(),
            ));
        }
        Ok(AuthResult::parse(trimmed))
    }
}

/// One in-flight login attempt
///
/// Dropping it closes the listener and releases the flow slot.
#[derive(Debug)]
pub struct PendingLogin {
    attempt_id: Uuid,
    auth_url: String,
    listener: CallbackListener,
    timeout: Duration,
    started_at: DateTime<Utc>,
    _guard: ActiveGuard,
}

impl PendingLogin {
    /// Authorization URL to open in the user's browser
    pub fn auth_url(&self) -> &str {
        &self.auth_url
    }

    /// Loopback port the callback listener is bound to
    pub fn port(&self) -> u16 {
        self.listener.port()
    }

    pub fn attempt_id(&self) -> Uuid {
        self.attempt_id
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    /// Wait for the callback and resolve the attempt
    ///
    /// Resolves to `Completed` with the parsed result (success or provider
    /// failure alike) or `TimedOut` once the configured window elapses; the
    /// listener is closed either way.
    pub async fn finish(self) -> AppResult<LoginOutcome> {
        match self.listener.wait(self.timeout).await? {
            CallbackOutcome::Received { result, .. } => {
                match result.failure_text() {
                    Some(text) => info!(
                        "Login attempt {} completed with provider failure: {}",
                        self.attempt_id, text
                    ),
                    None => info!("Login attempt {} completed", self.attempt_id),
                }
                Ok(LoginOutcome::Completed(result))
            }
            CallbackOutcome::TimedOut => {
                warn!("Login attempt {} timed out", self.attempt_id);
                Ok(LoginOutcome::TimedOut)
            }
        }
    }
}

/// Clears the active-attempt slot when the attempt ends, however it ends
#[derive(Debug)]
struct ActiveGuard {
    active: Arc<Mutex<Option<Uuid>>>,
    attempt_id: Uuid,
}

impl Drop for ActiveGuard {
    fn drop(&mut self) {
        let mut active = self.active.lock();
        if *active == Some(self.attempt_id) {
            *active = None;
        }
    }
}

/// Build the provider authorization URL for one attempt
fn build_authorization_url(config: &AuthConfig, state: &str, login_hint: Option<&str>) -> String {
    let mut url = format!(
        "{}?client_id={}&response_type=code&redirect_uri={}&state={}",
        config.auth_url,
        urlencoding::encode(&config.client_id),
        urlencoding::encode(&config.redirect_page_url),
        urlencoding::encode(state),
    );

    if !config.scopes.is_empty() {
        let scopes = config.scopes.join(" ");
        url.push_str(&format!("&scope={}", urlencoding::encode(&scopes)));
    }

    if let Some(hint) = login_hint {
        url.push_str(&format!("&login_hint={}", urlencoding::encode(hint)));
    }

    for (key, value) in &config.extra_auth_params {
        url.push_str(&format!(
            "&{}={}",
            urlencoding::encode(key),
            urlencoding::encode(value)
        ));
    }

    url
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> AuthConfig {
        AuthConfig {
            auth_url: "https://example.com/oauth/authorize".to_string(),
            client_id: "test client".to_string(),
            redirect_page_url: "https://example.com/redirect".to_string(),
            scopes: vec!["read".to_string(), "write".to_string()],
            extra_auth_params: Default::default(),
            callback_timeout_secs: 300,
        }
    }

    #[test]
    fn test_build_authorization_url() {
        let url = build_authorization_url(&test_config(), "port:51243", None);

        assert!(url.starts_with("https://example.com/oauth/authorize?"));
        assert!(url.contains("client_id=test%20client"));
        assert!(url.contains("response_type=code"));
        assert!(url.contains("redirect_uri=https%3A%2F%2Fexample.com%2Fredirect"));
        assert!(url.contains("state=port%3A51243"));
        assert!(url.contains("scope=read%20write"));
        assert!(!url.contains("login_hint"));
    }

    #[test]
    fn test_build_authorization_url_with_login_hint() {
        let url = build_authorization_url(&test_config(), "port:1", Some("player@example.com"));
        assert!(url.contains("login_hint=player%40example.com"));
    }

    #[test]
    fn test_build_authorization_url_extra_params() {
        let mut config = test_config();
        config
            .extra_auth_params
            .insert("prompt".to_string(), "select_account".to_string());

        let url = build_authorization_url(&config, "port:1", None);
        assert!(url.contains("prompt=select_account"));
    }

    #[test]
    fn test_complete_manually() {
        let flow = LoginFlow::new(test_config());

        let result = flow.complete_manually("  code=ABC123&state=port:1\n").unwrap();
        assert!(!result.is_failure());

        let result = flow
            .complete_manually("error=access_denied&error_description=User%20cancelled")
            .unwrap();
        assert_eq!(
            result.failure_text().unwrap(),
            "User cancelled (access_denied)"
        );

        assert!(flow.complete_manually("   ").is_err());
    }

    #[tokio::test]
    async fn test_begin_embeds_listener_port() {
        let flow = LoginFlow::new(test_config());
        let pending = flow.begin(LoginOptions::default()).await.unwrap();

        let expected_state = format!("port%3A{}", pending.port());
        assert!(pending.auth_url().contains(&expected_state));
    }

    #[tokio::test]
    async fn test_single_attempt_at_a_time() {
        let flow = LoginFlow::new(test_config());

        let pending = flow.begin(LoginOptions::default()).await.unwrap();
        let err = flow.begin(LoginOptions::default()).await.unwrap_err();
        assert!(matches!(err, AppError::AuthFlow(_)));

        // Dropping the attempt releases the slot
        drop(pending);
        flow.begin(LoginOptions::default()).await.unwrap();
    }
}
