//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → logging.rs (structured tracing events)
//!     → metrics.rs (counters, histograms)
//!
//! Consumers:
//!     → stdout (fmt subscriber, filtered by RUST_LOG or config)
//!     → Metrics endpoint (Prometheus scrape, opt-in)
//! ```
//!
//! # Design Decisions
//! - Candidate names label every upstream event and metric
//! - Request ID is attached as a span field at the HTTP boundary
//! - Metrics are cheap (no-ops until a recorder is installed)

pub mod logging;
pub mod metrics;
