//! Loading and saving the authentication configuration

use crate::types::AuthConfig;
use crate::validation;
use rl_types::{AppError, AppResult};
use std::path::Path;
use tracing::{debug, info};

/// Load the configuration from disk
///
/// A missing file is not an error: the default configuration is returned so
/// a fresh install works before the user has configured anything.
pub async fn load_config(path: &Path) -> AppResult<AuthConfig> {
    if !path.exists() {
        info!("No configuration at {}, using defaults", path.display());
        return Ok(AuthConfig::default());
    }

    let contents = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| AppError::Config(format!("Failed to read {}: {}", path.display(), e)))?;

    let config: AuthConfig = serde_yaml::from_str(&contents)
        .map_err(|e| AppError::Config(format!("Failed to parse {}: {}", path.display(), e)))?;

    validation::validate_config(&config)?;

    debug!("Loaded configuration from {}", path.display());
    Ok(config)
}

/// Save the configuration to disk, creating parent directories as needed
pub async fn save_config(config: &AuthConfig, path: &Path) -> AppResult<()> {
    validation::validate_config(config)?;

    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await.map_err(|e| {
            AppError::Config(format!(
                "Failed to create directory {}: {}",
                parent.display(),
                e
            ))
        })?;
    }

    let contents = serde_yaml::to_string(config)
        .map_err(|e| AppError::Config(format!("Failed to serialize configuration: {}", e)))?;

    tokio::fs::write(path, contents)
        .await
        .map_err(|e| AppError::Config(format!("Failed to write {}: {}", path.display(), e)))?;

    debug!("Saved configuration to {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_config_path(name: &str) -> std::path::PathBuf {
        std::env::temp_dir().join(format!("relaunch-config-test-{}.yaml", name))
    }

    #[tokio::test]
    async fn test_load_missing_returns_default() {
        let path = temp_config_path("missing");
        let _ = std::fs::remove_file(&path);

        let config = load_config(&path).await.unwrap();
        assert_eq!(config, AuthConfig::default());
    }

    #[tokio::test]
    async fn test_save_and_load_roundtrip() {
        let path = temp_config_path("roundtrip");

        let mut config = AuthConfig::default();
        config.client_id = "roundtrip-client".to_string();

        save_config(&config, &path).await.unwrap();
        let loaded = load_config(&path).await.unwrap();
        assert_eq!(loaded, config);

        let _ = std::fs::remove_file(&path);
    }

    #[tokio::test]
    async fn test_load_rejects_garbage() {
        let path = temp_config_path("garbage");
        std::fs::write(&path, ": not yaml at all [").unwrap();

        let err = load_config(&path).await.unwrap_err();
        assert!(matches!(err, AppError::Config(_)));

        let _ = std::fs::remove_file(&path);
    }
}
