//! Upstream subsystem: everything that touches one network path.
//!
//! # Data Flow
//! ```text
//! UpstreamConfig[] (startup)
//!     → candidate.rs (drop unconfigured slots, order by priority)
//!     → CandidateSet (immutable)
//!
//! Per attempt:
//!     candidate + ForwardRequest
//!     → url.rs (base + ?|& + path=... + caller params)
//!     → transport.rs (one network call → RawResponse)
//!     → reader.rs (single body read → UpstreamOutcome)
//! ```
//!
//! # Design Decisions
//! - The response body is a one-shot value consumed by the reader; a second
//!   read does not type-check
//! - Transport failures are folded into an outcome (status 502) rather than
//!   bubbling up, so the fallback chain treats them like any other failure

pub mod candidate;
pub mod reader;
pub mod transport;
pub mod url;

#[cfg(test)]
pub(crate) mod testing;

pub use candidate::{CandidateSet, UpstreamCandidate};
pub use reader::{read_response, UpstreamOutcome};
pub use transport::{HttpTransport, OneShotBody, RawResponse, TransportError, UpstreamRequest, UpstreamTransport};
pub use self::url::{compose_url, QueryParams, PATH_PARAM};
