//! Routing subsystem: the fallback chain.
//!
//! # Data Flow
//! ```text
//! ForwardRequest
//!     → router.rs (candidates in priority order, one at a time)
//!         → upstream (compose URL, call under retry + deadline, decode)
//!         → classifier.rs (is a 2xx payload a real answer?)
//!         → policy.rs (accept this outcome, or try the next candidate)
//!     → ForwardResult (from the accepted outcome)
//! ```
//!
//! # Design Decisions
//! - Candidate order is fixed at startup; no adaptive reordering
//! - Strictly sequential attempts; no racing between candidates
//! - The last usable candidate's outcome is always accepted
//! - Success markers are an injected strategy, not inline checks

pub mod classifier;
pub mod policy;
pub mod router;

pub use classifier::{MarkerClassifier, SuccessClassifier};
pub use policy::{FallbackPolicy, Verdict};
pub use router::CandidateRouter;
