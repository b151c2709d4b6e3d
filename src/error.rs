use crate::gateway::GatewayError;
use crate::registry::StoreError;
use thiserror::Error;

/// Top-level error type for the dsreg library.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    #[error("registry error: {0}")]
    Store(#[from] StoreError),

    #[error("gateway error: {0}")]
    Gateway(#[from] GatewayError),
}
