//! Path management for case-coach configuration files.

use std::path::PathBuf;

use thiserror::Error;

const APP_DIR: &str = "case-coach";

/// Errors that can occur during path resolution.
#[derive(Debug, Error)]
pub enum PathError {
    /// The platform config directory could not be determined.
    #[error("Cannot find the user configuration directory")]
    ConfigDirNotFound,
}

/// Resolves where configuration lives.
///
/// # Directory Structure
///
/// ```text
/// ~/.config/case-coach/        # dirs::config_dir() + "case-coach"
/// ├── config.toml              # Interview and model settings
/// └── secret.json              # API keys
/// ```
pub struct CoachPaths;

impl CoachPaths {
    /// Returns the case-coach configuration directory.
    pub fn config_dir() -> Result<PathBuf, PathError> {
        dirs::config_dir()
            .map(|dir| dir.join(APP_DIR))
            .ok_or(PathError::ConfigDirNotFound)
    }

    /// Returns the path to `config.toml`.
    pub fn config_file() -> Result<PathBuf, PathError> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Returns the path to `secret.json`.
    ///
    /// # Security Note
    ///
    /// The file holds API keys and should only be readable by its owner.
    pub fn secret_file() -> Result<PathBuf, PathError> {
        Ok(Self::config_dir()?.join("secret.json"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_files_live_under_config_dir() {
        let Ok(config_dir) = CoachPaths::config_dir() else {
            // no config directory on this platform / environment
            return;
        };
        assert!(config_dir.ends_with(APP_DIR));

        let config_file = CoachPaths::config_file().unwrap();
        assert!(config_file.ends_with("config.toml"));
        assert!(config_file.starts_with(&config_dir));

        let secret_file = CoachPaths::secret_file().unwrap();
        assert!(secret_file.ends_with("secret.json"));
        assert!(secret_file.starts_with(&config_dir));
    }
}
