//! `config.toml` settings.
//!
//! ```toml
//! [interview]
//! default_case_type = "Market Entry"
//! default_style = "bcg"
//! end_token = "end"
//!
//! [model]
//! name = "gpt-3.5-turbo"
//! temperature = 0.7
//! max_tokens = 800
//! timeout_secs = 60
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use coach_core::{CaseType, FeedbackStyle};
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::paths::CoachPaths;

pub const DEFAULT_END_TOKEN: &str = "end";

/// Errors that can occur while loading settings.
#[derive(Debug, Error)]
pub enum ConfigStorageError {
    /// File I/O error.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    TomlParseError(#[from] toml::de::Error),
    /// Config directory not found.
    #[error("Could not determine the configuration directory")]
    ConfigDirNotFound,
}

/// Root of `config.toml`. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CoachSettings {
    #[serde(default)]
    pub interview: InterviewSettings,
    #[serde(default)]
    pub model: ModelSettings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InterviewSettings {
    /// Case type used when none is given on the command line.
    #[serde(default, deserialize_with = "lenient_case_type")]
    pub default_case_type: Option<CaseType>,
    /// Feedback style used when none is given on the command line.
    #[serde(default, deserialize_with = "lenient_style")]
    pub default_style: Option<FeedbackStyle>,
    /// Input that ends the interview in addition to a blank line.
    #[serde(default = "default_end_token")]
    pub end_token: String,
}

impl Default for InterviewSettings {
    fn default() -> Self {
        Self {
            default_case_type: None,
            default_style: None,
            end_token: default_end_token(),
        }
    }
}

/// Overrides for the completion client.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ModelSettings {
    pub name: Option<String>,
    pub temperature: Option<f32>,
    pub max_tokens: Option<u32>,
    pub timeout_secs: Option<u64>,
    pub base_url: Option<String>,
}

fn default_end_token() -> String {
    DEFAULT_END_TOKEN.to_string()
}

fn lenient_case_type<'de, D>(deserializer: D) -> Result<Option<CaseType>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer)?
        .map(|label| CaseType::from_label(&label).map_err(serde::de::Error::custom))
        .transpose()
}

fn lenient_style<'de, D>(deserializer: D) -> Result<Option<FeedbackStyle>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer)?
        .map(|label| FeedbackStyle::from_label(&label).map_err(serde::de::Error::custom))
        .transpose()
}

/// Reads `config.toml`.
pub struct SettingsStorage {
    path: PathBuf,
}

impl SettingsStorage {
    /// Creates a storage handle for the default `config.toml`.
    pub fn new() -> Result<Self, ConfigStorageError> {
        let path = CoachPaths::config_file().map_err(|_| ConfigStorageError::ConfigDirNotFound)?;
        Ok(Self { path })
    }

    pub fn with_path(path: PathBuf) -> Self {
        Self { path }
    }

    /// Loads the settings.
    ///
    /// A missing or empty file yields the defaults.
    pub fn load(&self) -> Result<CoachSettings, ConfigStorageError> {
        if !self.path.exists() {
            debug!(path = %self.path.display(), "No config file, using defaults");
            return Ok(CoachSettings::default());
        }

        let content = fs::read_to_string(&self.path)?;
        if content.trim().is_empty() {
            return Ok(CoachSettings::default());
        }

        Ok(toml::from_str(&content)?)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}
