//! Resolution of context entries into data sources and live connections.

use std::collections::BTreeMap;

use log::error;
use rusqlite::Connection;

use crate::registry::{BoundValue, Directory};

use super::error::GatewayError;

/// Field that discriminates the shape of a group entry.
const TYPE_FIELD: &str = "type";
/// `type` value marking a connection-factory entry.
const DATASOURCE_TYPE: &str = "datasource";
/// `type` value marking a raw-mapping entry.
const MAP_TYPE: &str = "map";

/// Url prefix wired to the embedded sqlite client.
const SQLITE_SCHEME: &str = "sqlite:";

/// A reusable connection factory recovered from a context entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataSource {
    url: String,
    driver: Option<String>,
    user: Option<String>,
    password: Option<String>,
}

impl DataSource {
    /// The connection url (`sqlite:<path>` or `sqlite::memory:`).
    pub fn url(&self) -> &str {
        &self.url
    }

    /// The configured driver name, if any.
    pub fn driver(&self) -> Option<&str> {
        self.driver.as_deref()
    }

    /// The configured user, if any.
    pub fn user(&self) -> Option<&str> {
        self.user.as_deref()
    }

    /// The configured password, if any.
    pub fn password(&self) -> Option<&str> {
        self.password.as_deref()
    }

    /// Opens a live connection.
    ///
    /// Only `sqlite:` urls are wired: `sqlite::memory:` opens an in-memory
    /// database, any other `sqlite:<path>` opens the file at `<path>`. Any
    /// other scheme fails with [`GatewayError::UnsupportedDriver`].
    /// Connection failures are logged and re-raised unchanged.
    pub fn connect(&self) -> Result<Connection, GatewayError> {
        let opened = match self.url.strip_prefix(SQLITE_SCHEME) {
            Some(":memory:") => Connection::open_in_memory(),
            Some(path) => Connection::open(path),
            None => return Err(GatewayError::UnsupportedDriver(self.url.clone())),
        };
        opened.map_err(|e| {
            error!("error fetching connection from data source: {e}");
            GatewayError::Sql(e)
        })
    }
}

/// The two shapes a resolved entry may take.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataSourceLookup {
    /// The entry describes a connection factory (`type = datasource`).
    Factory(DataSource),
    /// The entry is a plain mapping (`type = map`, or no `type` field at
    /// all). The `type` discriminator itself is not part of the mapping.
    RawMapping(BTreeMap<String, String>),
}

/// Resolves `entry_name` within `context_name` and classifies the binding.
///
/// A group whose `type` field is `datasource` becomes a
/// [`DataSourceLookup::Factory`] and must carry a `url`; a group typed `map`
/// (or not typed at all) becomes a [`DataSourceLookup::RawMapping`]. Any
/// other shape (a plain text binding, an unknown `type`, a datasource
/// without a url) is a configuration bug and fails with
/// [`GatewayError::UnexpectedBinding`].
///
/// ## Example
///
/// ```no_run
/// use dsreg::{resolve_data_source, DataSourceLookup, Directory, Settings};
///
/// let directory = Directory::new(Settings::new("conf/registry", "/"));
/// match resolve_data_source(&directory, "orders_db", "default_ds")? {
///     DataSourceLookup::Factory(source) => {
///         let conn = source.connect()?;
///         // run queries...
///     }
///     DataSourceLookup::RawMapping(mapping) => {
///         println!("{mapping:?}");
///     }
/// }
/// # Ok::<(), dsreg::Error>(())
/// ```
pub fn resolve_data_source(
    directory: &Directory,
    entry_name: &str,
    context_name: &str,
) -> Result<DataSourceLookup, GatewayError> {
    let context = directory
        .resolve(context_name)?
        .ok_or_else(|| GatewayError::ContextNotFound(context_name.to_string()))?;
    let binding = context
        .get(entry_name)
        .ok_or_else(|| GatewayError::EntryNotFound {
            context: context_name.to_string(),
            entry: entry_name.to_string(),
        })?;

    let unexpected = |found: String| GatewayError::UnexpectedBinding {
        context: context_name.to_string(),
        entry: entry_name.to_string(),
        found,
    };

    let BoundValue::Group(fields) = binding else {
        return Err(unexpected("a plain text binding".to_string()));
    };

    match binding.field(TYPE_FIELD) {
        Some(DATASOURCE_TYPE) => {
            let url = binding
                .field("url")
                .ok_or_else(|| unexpected("a datasource group without a url".to_string()))?;
            Ok(DataSourceLookup::Factory(DataSource {
                url: url.to_string(),
                driver: binding.field("driver").map(str::to_string),
                user: binding.field("user").map(str::to_string),
                password: binding.field("password").map(str::to_string),
            }))
        }
        Some(MAP_TYPE) | None => {
            let mapping = fields
                .iter()
                .filter(|(field, _)| field.as_str() != TYPE_FIELD)
                .map(|(field, value)| (field.clone(), value.clone()))
                .collect();
            Ok(DataSourceLookup::RawMapping(mapping))
        }
        Some(other) => Err(unexpected(format!("type '{other}'"))),
    }
}

/// Resolves an entry and opens a connection from it in one call.
///
/// Fails with [`GatewayError::UnexpectedBinding`] if the entry resolves to a
/// raw mapping rather than a connection factory.
pub fn connect(
    directory: &Directory,
    entry_name: &str,
    context_name: &str,
) -> Result<Connection, GatewayError> {
    match resolve_data_source(directory, entry_name, context_name)? {
        DataSourceLookup::Factory(source) => source.connect(),
        DataSourceLookup::RawMapping(_) => Err(GatewayError::UnexpectedBinding {
            context: context_name.to_string(),
            entry: entry_name.to_string(),
            found: "a raw mapping where a connection factory was required".to_string(),
        }),
    }
}
