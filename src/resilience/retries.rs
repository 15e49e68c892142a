//! One-shot retry on upstream rate limiting.
//!
//! # Responsibilities
//! - Re-issue a call once when the upstream answers with the retry status
//! - Keep the second answer whatever it is
//!
//! # Design Decisions
//! - Each attempt is a fresh call with a fresh response; nothing is re-read
//! - Transport failures are not retried here; the chain moves on instead

use std::future::Future;
use std::time::Duration;

use crate::config::RetryConfig;
use crate::observability::metrics;
use crate::upstream::UpstreamOutcome;

/// Retry decorator for a single candidate call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    enabled: bool,
    retry_status: u16,
    delay: Duration,
}

impl RetryPolicy {
    /// A policy that always makes exactly one call.
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Self::default()
        }
    }

    pub fn from_config(config: &RetryConfig) -> Self {
        Self {
            enabled: config.enabled,
            retry_status: config.retry_status,
            delay: Duration::from_millis(config.delay_ms),
        }
    }

    /// Whether an outcome earns the single retry.
    pub fn should_retry(&self, outcome: &UpstreamOutcome) -> bool {
        self.enabled && !outcome.transport_failed && outcome.http_status == self.retry_status
    }

    /// Perform `call`, and once more after the fixed delay if it was
    /// rate limited. `candidate` only labels logs and metrics.
    pub async fn call_with_retry<F, Fut>(&self, candidate: &str, mut call: F) -> UpstreamOutcome
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = UpstreamOutcome>,
    {
        let first = call().await;
        if !self.should_retry(&first) {
            return first;
        }

        tracing::info!(
            candidate = %candidate,
            status = first.http_status,
            delay = ?self.delay,
            "Upstream rate limited, retrying once"
        );
        metrics::record_retry(candidate);

        tokio::time::sleep(self.delay).await;
        call().await
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from_config(&RetryConfig::default())
    }
}
