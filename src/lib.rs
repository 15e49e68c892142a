//! Request-forwarding gateway for the travel journal backend bridge.

pub mod config;
pub mod error;
pub mod gateway;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod resilience;
pub mod routing;
pub mod upstream;

pub use config::GatewayConfig;
pub use error::GatewayError;
pub use gateway::{ForwardRequest, ForwardResult, Gateway};
pub use http::HttpServer;
pub use lifecycle::Shutdown;
