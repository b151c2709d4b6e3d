pub mod gateway;
pub mod registry;
mod error;

pub use error::Error;
pub use gateway::{connect, resolve_data_source, DataSource, DataSourceLookup, GatewayError};
pub use registry::{BoundValue, Context, Directory, Settings, StoreError};
