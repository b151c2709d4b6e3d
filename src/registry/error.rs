use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StoreError {
    #[error("context '{context}' has no entry named '{entry}'")]
    EntryNotFound { context: String, entry: String },

    #[error("entry '{entry}' already exists for context '{context}'")]
    DuplicateEntry { context: String, entry: String },

    #[error("'{0}' is not a valid context name")]
    InvalidContextName(String),

    #[error("registry directory is locked by another writer: {0}")]
    LockContended(PathBuf),

    #[error("i/o failure at '{path}': {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("required settings file not found: {0}")]
    SettingsNotFound(PathBuf),

    #[error("failed to parse settings file '{path}': {source}")]
    SettingsParse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("invalid settings file '{path}': {reason}")]
    SettingsInvalid { path: PathBuf, reason: String },
}
