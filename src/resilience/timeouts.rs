//! Per-call deadline.
//!
//! Wraps one upstream call (send and body read) in a Tokio timeout when a
//! deadline is configured. An expired deadline is a transport failure.

use std::future::Future;
use std::time::Duration;

use crate::upstream::TransportError;

/// Run `call` under `deadline`, or unbounded when `deadline` is `None`.
pub async fn with_deadline<F, T>(deadline: Option<Duration>, call: F) -> Result<T, TransportError>
where
    F: Future<Output = Result<T, TransportError>>,
{
    match deadline {
        Some(limit) => tokio::time::timeout(limit, call)
            .await
            .map_err(|_| TransportError::Timeout(limit))?,
        None => call.await,
    }
}
