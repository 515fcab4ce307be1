//! Configuration storage for case-coach: paths, `secret.json`, `config.toml`.

pub mod paths;
pub mod secret_storage;
pub mod settings;

pub use crate::paths::{CoachPaths, PathError};
pub use crate::secret_storage::{OpenAiSecret, SecretConfig, SecretStorage, SecretStorageError};
pub use crate::settings::{
    CoachSettings, ConfigStorageError, InterviewSettings, ModelSettings, SettingsStorage,
};
