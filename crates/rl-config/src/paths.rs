//! OS-specific path resolution for configuration files

use rl_types::{AppError, AppResult};
use std::path::PathBuf;

/// Get the configuration directory
///
/// Priority:
/// 1. Runtime override via `RELAUNCH_ENV` environment variable: `~/.relaunch-{env}/`
/// 2. Development mode (debug builds): `~/.relaunch-dev/`
/// 3. Production mode (release builds): `~/.relaunch/`
pub fn config_dir() -> AppResult<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| AppError::Config("Could not determine home directory".to_string()))?;

    // Runtime override via environment variable (for testing)
    if let Ok(env_suffix) = std::env::var("RELAUNCH_ENV") {
        return Ok(home.join(format!(".relaunch-{}", env_suffix)));
    }

    #[cfg(debug_assertions)]
    let dir = home.join(".relaunch-dev");

    #[cfg(not(debug_assertions))]
    let dir = home.join(".relaunch");

    Ok(dir)
}

/// Get the authentication configuration file path
pub fn config_file() -> AppResult<PathBuf> {
    Ok(config_dir()?.join("auth.yaml"))
}

/// Get the logs directory
pub fn logs_dir() -> AppResult<PathBuf> {
    Ok(config_dir()?.join("logs"))
}

/// Ensure a directory exists, creating it if necessary
pub fn ensure_dir_exists(path: &PathBuf) -> AppResult<()> {
    if !path.exists() {
        std::fs::create_dir_all(path).map_err(|e| {
            AppError::Config(format!(
                "Failed to create directory {}: {}",
                path.display(),
                e
            ))
        })?;
    }
    Ok(())
}
