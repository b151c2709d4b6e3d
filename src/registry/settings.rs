//! The registry environment: root directory, key delimiter, and the
//! colon-replacement policy.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use super::error::StoreError;

fn default_delimiter() -> String {
    "/".to_string()
}

/// Configuration shared by every registry operation.
///
/// Carries the root directory holding the `.properties` context files, the
/// delimiter joining entry name and field name within a property key, and an
/// optional colon-replacement policy. The colon replacement is kept for
/// compatibility with stores that configure it; nothing in this crate
/// consumes it.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    root: PathBuf,
    #[serde(default = "default_delimiter")]
    delimiter: String,
    colon_replace: Option<String>,
}

impl Settings {
    /// Creates settings with the given root directory and key delimiter.
    ///
    /// # Panics
    ///
    /// Panics if `delimiter` is empty.
    pub fn new(root: impl AsRef<Path>, delimiter: impl Into<String>) -> Self {
        let delimiter = delimiter.into();
        assert!(!delimiter.is_empty(), "delimiter must not be empty");
        Self {
            root: root.as_ref().to_path_buf(),
            delimiter,
            colon_replace: None,
        }
    }

    /// Sets the colon-replacement policy.
    pub fn with_colon_replace(mut self, replacement: impl Into<String>) -> Self {
        self.colon_replace = Some(replacement.into());
        self
    }

    /// Loads settings from a TOML file.
    ///
    /// The file must provide `root` and a non-empty `delimiter`; `delimiter`
    /// defaults to `/` and `colon_replace` stays unset when omitted.
    ///
    /// ```toml
    /// root = "conf/registry"
    /// delimiter = "/"
    /// ```
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref();
        match std::fs::read_to_string(path) {
            Ok(contents) => {
                let settings: Settings =
                    toml::from_str(&contents).map_err(|e| StoreError::SettingsParse {
                        path: path.to_path_buf(),
                        source: e,
                    })?;
                if settings.delimiter.is_empty() {
                    return Err(StoreError::SettingsInvalid {
                        path: path.to_path_buf(),
                        reason: "delimiter must not be empty".to_string(),
                    });
                }
                Ok(settings)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(StoreError::SettingsNotFound(path.to_path_buf()))
            }
            Err(e) => Err(StoreError::Io {
                path: path.to_path_buf(),
                source: e,
            }),
        }
    }

    /// The directory holding the context files.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Separator between entry name and field name in a property key.
    pub fn delimiter(&self) -> &str {
        &self.delimiter
    }

    /// Replacement applied to colons in names by stores that configure it.
    pub fn colon_replace(&self) -> Option<&str> {
        self.colon_replace.as_deref()
    }

    /// Path of the backing file for `context_name`.
    pub(crate) fn context_path(&self, context_name: &str) -> PathBuf {
        self.root.join(format!("{context_name}.properties"))
    }
}
