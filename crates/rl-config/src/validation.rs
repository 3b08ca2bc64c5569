//! Configuration validation

use crate::types::AuthConfig;
use rl_types::{AppError, AppResult};

pub(crate) fn validate_config(config: &AuthConfig) -> AppResult<()> {
    if config.auth_url.is_empty() {
        return Err(AppError::Config("auth_url must not be empty".to_string()));
    }
    if !config.auth_url.starts_with("http://") && !config.auth_url.starts_with("https://") {
        return Err(AppError::Config(format!(
            "auth_url must be an http(s) URL: {}",
            config.auth_url
        )));
    }
    if config.redirect_page_url.is_empty() {
        return Err(AppError::Config(
            "redirect_page_url must not be empty".to_string(),
        ));
    }
    if config.callback_timeout_secs == 0 {
        return Err(AppError::Config(
            "callback_timeout_secs must be greater than zero".to_string(),
        ));
    }
    Ok(())
}
