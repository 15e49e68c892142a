//! The gateway boundary.
//!
//! # Responsibilities
//! - Accept GET and POST operations
//! - Drive the candidate router
//! - Turn any error or panic below into a 500 result
//! - Record per-request metrics

use axum::body::Bytes;
use futures_util::FutureExt;
use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::time::Instant;

use crate::config::GatewayConfig;
use crate::error::GatewayError;
use crate::gateway::types::{ForwardRequest, ForwardResult};
use crate::observability::metrics;
use crate::routing::CandidateRouter;
use crate::upstream::{HttpTransport, QueryParams, UpstreamTransport};

/// Request-forwarding gateway.
pub struct Gateway<T = HttpTransport> {
    router: CandidateRouter<T>,
}

impl Gateway<HttpTransport> {
    /// Build the production gateway from a validated configuration.
    pub fn from_config(config: &GatewayConfig) -> Result<Self, GatewayError> {
        let transport = HttpTransport::from_config(&config.transport)?;
        let router = CandidateRouter::from_config(config, transport);

        tracing::info!(
            usable = router.candidates().len(),
            skipped = router.candidates().skipped(),
            "Upstream candidates resolved"
        );
        for candidate in router.candidates().usable() {
            tracing::info!(
                candidate = %candidate.name,
                priority = candidate.priority,
                "Upstream candidate"
            );
        }

        Ok(Self::new(router))
    }
}

impl<T: UpstreamTransport> Gateway<T> {
    pub fn new(router: CandidateRouter<T>) -> Self {
        Self { router }
    }

    pub fn router(&self) -> &CandidateRouter<T> {
        &self.router
    }

    /// Forward one operation. Always produces a result.
    pub async fn forward(&self, request: ForwardRequest) -> ForwardResult {
        let start = Instant::now();
        let method = request.method();

        let routed = AssertUnwindSafe(self.router.route(&request))
            .catch_unwind()
            .await
            .unwrap_or_else(|panic| Err(GatewayError::Panicked(panic_message(panic.as_ref()))));

        let result = match routed {
            Ok(result) => result,
            Err(e) => {
                tracing::error!(
                    method = %method,
                    path = %request.logical_path(),
                    error = %e,
                    "Forwarding failed"
                );
                ForwardResult::internal_error(e.to_string())
            }
        };

        metrics::record_request(method.as_str(), result.status, start);
        result
    }

    pub async fn forward_get(&self, logical_path: impl Into<String>, query: QueryParams) -> ForwardResult {
        self.forward(ForwardRequest::get(logical_path, query)).await
    }

    pub async fn forward_post(&self, logical_path: impl Into<String>, body: Bytes) -> ForwardResult {
        self.forward(ForwardRequest::post(logical_path, body)).await
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
