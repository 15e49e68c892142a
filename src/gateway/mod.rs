//! Gateway entry point.
//!
//! # Data Flow
//! ```text
//! inbound GET  (path, query params)   ─┐
//! inbound POST (path, body read once) ─┴→ types.rs (ForwardRequest)
//!     → entry.rs (Gateway::forward)
//!         → routing (fallback chain)
//!     → ForwardResult { status, payload }
//!     → http layer renders it
//! ```
//!
//! # Design Decisions
//! - The POST body is materialized before any candidate is tried
//! - Every fault below this point becomes a 500 result; nothing escapes

pub mod entry;
pub mod types;

pub use entry::Gateway;
pub use types::{ForwardMethod, ForwardRequest, ForwardResult};
