//! Authorization result extraction
//!
//! The identity provider hands its result to the redirect page as URL-encoded
//! key/value pairs in the page URL's fragment. A result is exactly one of
//! success or failure; the "no query at all" case is a distinct state handled
//! by the callers, never encoded here.

use serde::{Deserialize, Serialize};
use url::form_urlencoded;

/// Key marking a result as a provider failure
pub const ERROR_KEY: &str = "error";

/// Key carrying the human-readable failure description
pub const ERROR_DESCRIPTION_KEY: &str = "error_description";

/// Key echoing the launcher's state parameter back unchanged
pub const STATE_KEY: &str = "state";

/// Parsed authorization result
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum AuthResult {
    /// The provider granted the request. Parameters are provider-specific
    /// (code, token, ...) and pass through opaquely, in original order.
    Success(SuccessParams),

    /// The provider reported an authentication failure.
    Failure {
        error: String,
        error_description: Option<String>,
    },
}

/// Decoded parameters of a successful result
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuccessParams {
    params: Vec<(String, String)>,
}

impl SuccessParams {
    /// Value of the first occurrence of `key`, decoded
    pub fn get(&self, key: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// The echoed `state` parameter, if any
    pub fn state(&self) -> Option<&str> {
        self.get(STATE_KEY)
    }

    /// All decoded pairs in original order
    pub fn pairs(&self) -> &[(String, String)] {
        &self.params
    }
}

impl AuthResult {
    /// Parse a URL-encoded query string into a result
    ///
    /// The presence of an `error` key makes this a failure; otherwise every
    /// parameter belongs to a success result.
    pub fn parse(query: &str) -> Self {
        let params: Vec<(String, String)> = form_urlencoded::parse(query.as_bytes())
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();

        let error = params
            .iter()
            .find(|(k, _)| k == ERROR_KEY)
            .map(|(_, v)| v.clone());

        match error {
            Some(error) => {
                let error_description = params
                    .iter()
                    .find(|(k, _)| k == ERROR_DESCRIPTION_KEY)
                    .map(|(_, v)| v.clone());
                AuthResult::Failure {
                    error,
                    error_description,
                }
            }
            None => AuthResult::Success(SuccessParams { params }),
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, AuthResult::Failure { .. })
    }

    /// Human-readable failure text, e.g. `User cancelled (access_denied)`
    ///
    /// Returns `None` for successful results.
    pub fn failure_text(&self) -> Option<String> {
        match self {
            AuthResult::Failure {
                error,
                error_description,
            } => Some(match error_description {
                Some(desc) if !desc.is_empty() => format!("{} ({})", desc, error),
                _ => error.clone(),
            }),
            AuthResult::Success(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_success() {
        let result = AuthResult::parse("code=ABC123&state=port:51243");
        match result {
            AuthResult::Success(params) => {
                assert_eq!(params.get("code"), Some("ABC123"));
                assert_eq!(params.state(), Some("port:51243"));
            }
            AuthResult::Failure { .. } => panic!("expected success"),
        }
    }

    #[test]
    fn test_parse_failure() {
        let result = AuthResult::parse("error=access_denied&error_description=User%20cancelled");
        assert!(result.is_failure());
        assert_eq!(
            result.failure_text().unwrap(),
            "User cancelled (access_denied)"
        );
    }

    #[test]
    fn test_parse_failure_without_description() {
        let result = AuthResult::parse("error=server_error");
        assert_eq!(result.failure_text().unwrap(), "server_error");
    }

    #[test]
    fn test_error_key_wins_over_success_params() {
        // A result is never both; the error key decides.
        let result = AuthResult::parse("code=ABC&error=access_denied");
        assert!(result.is_failure());
    }

    #[test]
    fn test_params_keep_original_order() {
        let result = AuthResult::parse("b=2&a=1&c=3");
        match result {
            AuthResult::Success(params) => {
                let keys: Vec<&str> = params.pairs().iter().map(|(k, _)| k.as_str()).collect();
                assert_eq!(keys, vec!["b", "a", "c"]);
            }
            AuthResult::Failure { .. } => panic!("expected success"),
        }
    }

    #[test]
    fn test_percent_decoding() {
        let result = AuthResult::parse("token=a%2Fb%3Dc&state=port%3A8080");
        match result {
            AuthResult::Success(params) => {
                assert_eq!(params.get("token"), Some("a/b=c"));
                assert_eq!(params.state(), Some("port:8080"));
            }
            AuthResult::Failure { .. } => panic!("expected success"),
        }
    }

    #[test]
    fn test_first_occurrence_wins() {
        let result = AuthResult::parse("code=first&code=second");
        match result {
            AuthResult::Success(params) => assert_eq!(params.get("code"), Some("first")),
            AuthResult::Failure { .. } => panic!("expected success"),
        }
    }
}
