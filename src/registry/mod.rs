//! The entry registry: contexts backed by property files, directory
//! enumeration, and the locked append protocol.

mod context;
mod directory;
mod error;
mod index;
mod lock;
mod settings;
mod writer;

pub use context::{BoundValue, Context};
pub use directory::Directory;
pub use error::StoreError;
pub use settings::Settings;
