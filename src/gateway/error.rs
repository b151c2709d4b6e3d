use thiserror::Error;

use crate::registry::StoreError;

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum GatewayError {
    #[error("no context named '{0}' is registered")]
    ContextNotFound(String),

    #[error("context '{context}' has no entry named '{entry}'")]
    EntryNotFound { context: String, entry: String },

    #[error("entry '{entry}' in context '{context}' is neither a connection factory nor a raw mapping ({found})")]
    UnexpectedBinding {
        context: String,
        entry: String,
        found: String,
    },

    #[error("unsupported driver url '{0}': only sqlite urls are wired")]
    UnsupportedDriver(String),

    #[error("error fetching connection from data source: {0}")]
    Sql(#[from] rusqlite::Error),

    #[error("registry error: {0}")]
    Store(#[from] StoreError),
}
