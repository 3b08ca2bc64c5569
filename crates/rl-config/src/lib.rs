//! Configuration management module
//!
//! Handles loading, saving, and managing the launcher's authentication
//! configuration.

use parking_lot::RwLock;
use rl_types::AppResult;
use std::path::PathBuf;
use std::sync::Arc;

pub mod paths;
mod storage;
pub mod types;
mod validation;

pub use storage::{load_config, save_config};
pub use types::AuthConfig;

/// Thread-safe configuration manager
#[derive(Debug, Clone)]
pub struct ConfigManager {
    config: Arc<RwLock<AuthConfig>>,
    config_path: PathBuf,
}

impl ConfigManager {
    /// Create a new configuration manager
    pub fn new(config: AuthConfig, config_path: PathBuf) -> Self {
        Self {
            config: Arc::new(RwLock::new(config)),
            config_path,
        }
    }

    /// Load configuration from the default location
    pub async fn load() -> AppResult<Self> {
        let config_path = paths::config_file()?;
        let config = load_config(&config_path).await?;
        Ok(Self::new(config, config_path))
    }

    /// Load configuration from a custom path
    pub async fn load_from_path(path: PathBuf) -> AppResult<Self> {
        let config = load_config(&path).await?;
        Ok(Self::new(config, path))
    }

    /// Get a read-only copy of the configuration
    pub fn get(&self) -> AuthConfig {
        self.config.read().clone()
    }

    /// Update the in-memory configuration with a function
    ///
    /// Validates the result and rolls back if validation fails. To persist
    /// changes, call `save()` afterwards.
    pub fn update<F>(&self, f: F) -> AppResult<()>
    where
        F: FnOnce(&mut AuthConfig),
    {
        let mut config = self.config.write();
        // Clone before mutating so we can roll back if validation fails
        let mut new_config = config.clone();
        f(&mut new_config);
        validation::validate_config(&new_config)?;
        *config = new_config;
        Ok(())
    }

    /// Save the current configuration to disk
    pub async fn save(&self) -> AppResult<()> {
        let config = self.config.read().clone();
        save_config(&config, &self.config_path).await
    }

    /// Get the configuration file path
    pub fn config_path(&self) -> &PathBuf {
        &self.config_path
    }
}
