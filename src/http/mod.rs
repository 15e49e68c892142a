//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware, route match on {prefix}/{path})
//!     → request.rs (assign or keep X-Request-ID)
//!     → gateway (forward along the candidate chain)
//!     → response.rs (ForwardResult → status + JSON body)
//!     → Send to client
//! ```

pub mod request;
pub mod response;
pub mod server;

pub use request::{MakeGatewayRequestId, X_REQUEST_ID};
pub use server::HttpServer;
