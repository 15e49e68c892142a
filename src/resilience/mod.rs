//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Call to one candidate:
//!     → retries.rs (on the retry status: fixed pause, one more call)
//!         → timeouts.rs (optional deadline around each call)
//!             → transport + reader
//! ```
//!
//! # Design Decisions
//! - Retry is a wrapper around the raw call, testable without the chain
//! - Exactly one retry, fixed delay, no backoff or jitter
//! - Retry scope is one candidate; falling back is the router's job
//! - The deadline is opt-in; without it the transport's own limits apply

pub mod retries;
pub mod timeouts;

pub use retries::RetryPolicy;
pub use timeouts::with_deadline;
