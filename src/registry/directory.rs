use std::collections::BTreeMap;
use std::path::PathBuf;

use super::context::Context;
use super::error::StoreError;
use super::index;
use super::settings::Settings;
use super::writer;

/// Handle to a directory of named contexts, each backed by one
/// `.properties` file under the configured root.
///
/// Every call re-reads the filesystem; no context is cached between calls,
/// so a resolved [`Context`] can never be stale, only superseded.
///
/// ## Example
///
/// ```no_run
/// use std::collections::BTreeMap;
/// use dsreg::{Directory, Settings};
///
/// let directory = Directory::new(Settings::new("conf/registry", "/"));
///
/// let mut fields = BTreeMap::new();
/// fields.insert("type".to_string(), "datasource".to_string());
/// fields.insert("url".to_string(), "sqlite:data/app.db".to_string());
/// directory.add_entry("default_ds", "app", &fields)?;
///
/// if let Some(context) = directory.resolve("default_ds")? {
///     for (name, value) in context.entries() {
///         println!("{name} = {value}");
///     }
/// }
/// # Ok::<(), dsreg::StoreError>(())
/// ```
#[derive(Debug, Clone)]
pub struct Directory {
    settings: Settings,
}

impl Directory {
    /// Creates a handle over the directory described by `settings`.
    pub fn new(settings: Settings) -> Self {
        Self { settings }
    }

    /// The settings this directory was opened with.
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Resolves a context by name.
    ///
    /// A missing backing file or a malformed name (empty, or containing a
    /// path separator) is treated as "no such context" and returned as
    /// `None`, so callers can probe for existence before writing. Any other
    /// failure to read the backing file is an error.
    pub fn resolve(&self, context_name: &str) -> Result<Option<Context>, StoreError> {
        Context::load(&self.settings, context_name)
    }

    /// Lists the backing file of every context under the root, recursively.
    pub fn list_contexts(&self) -> Result<Vec<PathBuf>, StoreError> {
        index::list_contexts(self.settings.root())
    }

    /// Adds one named entry with the given fields to a context, taking the
    /// directory lock for the duration of the write.
    ///
    /// See the error taxonomy on [`StoreError`]: the call is rejected with
    /// `LockContended` when another writer is active and with
    /// `DuplicateEntry` when the entry name is already bound; either way the
    /// backing file is left exactly as it was.
    pub fn add_entry(
        &self,
        context_name: &str,
        entry_name: &str,
        fields: &BTreeMap<String, String>,
    ) -> Result<(), StoreError> {
        writer::add_entry(&self.settings, context_name, entry_name, fields)
    }
}
