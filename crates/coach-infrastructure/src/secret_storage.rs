//! Secret configuration file storage.
//!
//! Loads API keys from `~/.config/case-coach/secret.json`.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::paths::CoachPaths;

/// Root structure of `secret.json`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecretConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub openai: Option<OpenAiSecret>,
}

/// OpenAI credentials.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpenAiSecret {
    pub api_key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_name: Option<String>,
}

impl OpenAiSecret {
    /// A blank key counts as not configured.
    pub fn is_configured(&self) -> bool {
        !self.api_key.trim().is_empty()
    }
}

/// Errors that can occur during secret storage operations.
#[derive(Debug, Error)]
pub enum SecretStorageError {
    /// Configuration file not found.
    #[error("Configuration file not found at: {}", .0.display())]
    NotFound(PathBuf),
    /// File I/O error.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
    /// JSON parsing error.
    #[error("JSON parse error: {0}")]
    ParseError(#[from] serde_json::Error),
    /// Config directory not found.
    #[error("Could not determine the configuration directory")]
    ConfigDirNotFound,
}

/// Storage for `secret.json`.
///
/// Read-only apart from [`SecretStorage::ensure_template`], which writes an
/// empty template when no file exists. Secrets are never logged.
pub struct SecretStorage {
    path: PathBuf,
}

impl SecretStorage {
    /// Creates a SecretStorage at the default path.
    pub fn new() -> Result<Self, SecretStorageError> {
        let path = CoachPaths::secret_file().map_err(|_| SecretStorageError::ConfigDirNotFound)?;
        Ok(Self { path })
    }

    /// Creates a SecretStorage with a custom path (for testing).
    pub fn with_path(path: PathBuf) -> Self {
        Self { path }
    }

    /// Loads and parses the secret file.
    ///
    /// # Returns
    ///
    /// - `Ok(SecretConfig)`: Successfully loaded and parsed
    /// - `Err(SecretStorageError::NotFound)`: File doesn't exist
    /// - `Err(SecretStorageError::IoError)`: Failed to read file
    /// - `Err(SecretStorageError::ParseError)`: Invalid JSON format
    pub fn load(&self) -> Result<SecretConfig, SecretStorageError> {
        if !self.path.exists() {
            return Err(SecretStorageError::NotFound(self.path.clone()));
        }

        let content = fs::read_to_string(&self.path)?;
        let config = serde_json::from_str(&content)?;

        Ok(config)
    }

    /// Writes a template with an empty OpenAI key if no file exists yet.
    ///
    /// Returns `true` when a template was written. On Unix the file is
    /// created with mode 600.
    pub fn ensure_template(&self) -> Result<bool, SecretStorageError> {
        if self.path.exists() {
            return Ok(false);
        }

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        let template = SecretConfig {
            openai: Some(OpenAiSecret {
                api_key: String::new(),
                model_name: Some("gpt-3.5-turbo".to_string()),
            }),
        };
        fs::write(&self.path, serde_json::to_string_pretty(&template)?)?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&self.path, fs::Permissions::from_mode(0o600))?;
        }

        Ok(true)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_load_nonexistent_file() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("secret.json");
        let storage = SecretStorage::with_path(file_path.clone());

        match storage.load() {
            Err(SecretStorageError::NotFound(path)) => assert_eq!(path, file_path),
            other => panic!("Expected NotFound error, got {other:?}"),
        }
    }

    #[test]
    fn test_load_valid_json() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("secret.json");
        fs::write(
            &file_path,
            r#"{
                "openai": {
                    "api_key": "sk-test-123",
                    "model_name": "gpt-4o-mini"
                }
            }"#,
        )
        .unwrap();

        let config = SecretStorage::with_path(file_path).load().unwrap();

        let openai = config.openai.unwrap();
        assert_eq!(openai.api_key, "sk-test-123");
        assert_eq!(openai.model_name.as_deref(), Some("gpt-4o-mini"));
        assert!(openai.is_configured());
    }

    #[test]
    fn test_load_empty_config() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("secret.json");
        fs::write(&file_path, "{}").unwrap();

        let config = SecretStorage::with_path(file_path).load().unwrap();
        assert!(config.openai.is_none());
    }

    #[test]
    fn test_load_invalid_json() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("secret.json");
        fs::write(&file_path, "{ invalid json").unwrap();

        let result = SecretStorage::with_path(file_path).load();
        assert!(matches!(result, Err(SecretStorageError::ParseError(_))));
    }

    #[test]
    fn test_ensure_template_writes_once() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("nested").join("secret.json");
        let storage = SecretStorage::with_path(file_path.clone());

        assert!(storage.ensure_template().unwrap());
        assert!(!storage.ensure_template().unwrap());

        let config = storage.load().unwrap();
        let openai = config.openai.unwrap();
        assert!(!openai.is_configured());
        assert_eq!(openai.model_name.as_deref(), Some("gpt-3.5-turbo"));

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mode = fs::metadata(&file_path).unwrap().permissions().mode();
            assert_eq!(mode & 0o777, 0o600);
        }
    }
}
