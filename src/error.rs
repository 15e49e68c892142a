//! Gateway error types.

use thiserror::Error;

use crate::config::ConfigError;
use crate::upstream::TransportError;

/// Errors that stop a request or the gateway itself.
///
/// Per-candidate failures never appear here; they are folded into
/// outcomes by the router.
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("invalid forward request: {0}")]
    InvalidRequest(String),

    #[error("transport setup failed: {0}")]
    Transport(#[from] TransportError),

    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("gateway pipeline panicked: {0}")]
    Panicked(String),
}
