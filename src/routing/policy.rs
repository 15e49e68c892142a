//! Fallback decisions.
//!
//! Per outcome, in order:
//! - last usable candidate → accept
//! - 2xx and classified good → accept
//! - 2xx but classified bad → try next
//! - transport failure → try next
//! - status in the try-next set (default 401, 405, 429) → try next
//! - any other error status → accept, unless `fallback_on_other_errors`
//!
//! The same rules apply to every candidate.

use crate::config::FallbackConfig;
use crate::upstream::UpstreamOutcome;

/// What the router does with an outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Accept,
    TryNext,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FallbackPolicy {
    try_next_statuses: Vec<u16>,
    fallback_on_other_errors: bool,
}

impl FallbackPolicy {
    pub fn from_config(config: &FallbackConfig) -> Self {
        Self {
            try_next_statuses: config.try_next_statuses.clone(),
            fallback_on_other_errors: config.fallback_on_other_errors,
        }
    }

    pub fn is_try_next_status(&self, status: u16) -> bool {
        self.try_next_statuses.contains(&status)
    }

    /// Decide on a classified outcome.
    pub fn judge(&self, outcome: &UpstreamOutcome, is_last: bool) -> Verdict {
        if is_last {
            return Verdict::Accept;
        }
        if outcome.http_ok {
            return if outcome.semantic_ok {
                Verdict::Accept
            } else {
                Verdict::TryNext
            };
        }
        if outcome.transport_failed
            || self.is_try_next_status(outcome.http_status)
            || self.fallback_on_other_errors
        {
            return Verdict::TryNext;
        }
        Verdict::Accept
    }
}

impl Default for FallbackPolicy {
    fn default() -> Self {
        Self::from_config(&FallbackConfig::default())
    }
}
