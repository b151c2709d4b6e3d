//! Resolution of registry entries into data sources and live connections.

mod datasource;
mod error;

pub use datasource::{connect, resolve_data_source, DataSource, DataSourceLookup};
pub use error::GatewayError;
