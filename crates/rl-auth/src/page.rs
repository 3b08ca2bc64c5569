//! Redirect-page engine: result extraction, forwarding decision, fallback
//!
//! Drives one page load to exactly one terminal state. The forward attempt is
//! a single asynchronous request with two continuations: a completed response
//! of any status means the result reached the launcher, and any transport
//! failure degrades silently to the manual fallback.

use crate::result::AuthResult;
use crate::target::ForwardingTarget;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info};

/// Cap on the loopback forward attempt; a running listener answers
/// immediately, so anything slower is treated as absent.
const FORWARD_TIMEOUT: Duration = Duration::from_secs(10);

/// Terminal state of the redirect page; exactly one is reached per load
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum PageOutcome {
    /// No fragment was present on the page URL
    NoQuery,

    /// The provider reported a failure; never forwarded
    ProviderError {
        error: String,
        description: Option<String>,
    },

    /// The result reached the local listener
    Forwarded,

    /// No listener was reachable; the raw query is shown for manual entry
    ManualFallback { query: String },
}

impl PageOutcome {
    /// User-facing text for the terminal state
    ///
    /// The manual fallback reproduces the query byte-for-byte so it can be
    /// pasted into the launcher's manual-entry field.
    pub fn display_text(&self) -> String {
        match self {
            PageOutcome::NoQuery => "No query string found.".to_string(),
            PageOutcome::ProviderError { error, description } => {
                let text = match description {
                    Some(desc) if !desc.is_empty() => format!("{} ({})", desc, error),
                    _ => error.clone(),
                };
                format!("Login failed: {}", text)
            }
            PageOutcome::Forwarded => {
                "Login complete. You can close this window and return to the launcher.".to_string()
            }
            PageOutcome::ManualFallback { query } => format!(
                "No local launcher was detected. Copy the code below into the launcher to finish signing in:\n\n{}",
                query
            ),
        }
    }
}

/// The client-side half of the forwarding protocol
pub struct RedirectPage {
    client: reqwest::Client,
}

impl RedirectPage {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }

    /// Process the navigation fragment and drive it to a terminal state
    ///
    /// Failures reported by the provider are displayed directly and never
    /// forwarded; the launcher cannot act on a failed login.
    pub async fn handle(&self, fragment: Option<&str>) -> PageOutcome {
        let query = match fragment {
            Some(q) if !q.is_empty() => q,
            _ => return PageOutcome::NoQuery,
        };

        match AuthResult::parse(query) {
            AuthResult::Failure {
                error,
                error_description,
            } => {
                info!("Provider reported failure: {}", error);
                PageOutcome::ProviderError {
                    error,
                    description: error_description,
                }
            }
            AuthResult::Success(params) => {
                match params.state().and_then(ForwardingTarget::from_state) {
                    Some(target) => self.forward(target, query).await,
                    None => {
                        debug!("No forwarding target in state, falling back to manual entry");
                        PageOutcome::ManualFallback {
                            query: query.to_string(),
                        }
                    }
                }
            }
        }
    }

    /// One forward attempt, no retries
    async fn forward(&self, target: ForwardingTarget, query: &str) -> PageOutcome {
        let url = target.forward_url(query);
        debug!("Forwarding result to {}", url);

        match self
            .client
            .get(&url)
            .timeout(FORWARD_TIMEOUT)
            .send()
            .await
        {
            Ok(response) => {
                info!(
                    "Listener on port {} answered with {}",
                    target.port(),
                    response.status()
                );
                PageOutcome::Forwarded
            }
            Err(e) => {
                // Not surfaced to the user; absence of a listener is the
                // expected shape of this failure.
                debug!("Forward to port {} failed: {}", target.port(), e);
                PageOutcome::ManualFallback {
                    query: query.to_string(),
                }
            }
        }
    }
}

impl Default for RedirectPage {
    fn default() -> Self {
        Self::new()
    }
}
