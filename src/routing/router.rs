//! Candidate routing.
//!
//! # Responsibilities
//! - Walk the usable candidates in priority order
//! - Run each attempt under the retry policy and optional deadline
//! - Classify successes and apply the fallback policy
//! - Produce exactly one result per request
//!
//! # Design Decisions
//! - Immutable after construction (thread-safe without locks)
//! - One attempt in flight per request; the next candidate starts only
//!   after the previous one (including its retry) is decided
//! - No usable candidate is a configuration error, reported without I/O

use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::config::GatewayConfig;
use crate::error::GatewayError;
use crate::gateway::{ForwardRequest, ForwardResult};
use crate::observability::metrics;
use crate::resilience::{with_deadline, RetryPolicy};
use crate::routing::classifier::{MarkerClassifier, SuccessClassifier};
use crate::routing::policy::{FallbackPolicy, Verdict};
use crate::upstream::{
    compose_url, read_response, CandidateSet, UpstreamCandidate, UpstreamOutcome, UpstreamRequest,
    UpstreamTransport,
};

/// The fallback chain over a fixed candidate set.
pub struct CandidateRouter<T> {
    candidates: CandidateSet,
    transport: T,
    classifier: Arc<dyn SuccessClassifier>,
    policy: FallbackPolicy,
    retry: RetryPolicy,
    deadline: Option<Duration>,
}

impl<T: UpstreamTransport> CandidateRouter<T> {
    /// Router with default marker, fallback and retry settings and no deadline.
    pub fn new(candidates: CandidateSet, transport: T) -> Self {
        Self {
            candidates,
            transport,
            classifier: Arc::new(MarkerClassifier::default()),
            policy: FallbackPolicy::default(),
            retry: RetryPolicy::default(),
            deadline: None,
        }
    }

    pub fn from_config(config: &GatewayConfig, transport: T) -> Self {
        Self::new(CandidateSet::from_config(&config.upstreams), transport)
            .with_classifier(MarkerClassifier::from_config(&config.classifier))
            .with_policy(FallbackPolicy::from_config(&config.fallback))
            .with_retry(RetryPolicy::from_config(&config.retries))
            .with_deadline(config.timeouts.upstream_secs.map(Duration::from_secs))
    }

    pub fn with_classifier(mut self, classifier: impl SuccessClassifier + 'static) -> Self {
        self.classifier = Arc::new(classifier);
        self
    }

    pub fn with_policy(mut self, policy: FallbackPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn with_deadline(mut self, deadline: Option<Duration>) -> Self {
        self.deadline = deadline;
        self
    }

    pub fn candidates(&self) -> &CandidateSet {
        &self.candidates
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Forward `request` along the chain.
    pub async fn route(&self, request: &ForwardRequest) -> Result<ForwardResult, GatewayError> {
        request.validate()?;

        let usable = self.candidates.usable();
        if usable.is_empty() {
            tracing::error!(
                skipped = self.candidates.skipped(),
                "No upstream base address configured"
            );
            return Ok(ForwardResult::config_missing());
        }

        let mut last = None;
        for (index, candidate) in usable.iter().enumerate() {
            let is_last = index + 1 == usable.len();

            let Some(url) = compose_url(
                &candidate.base_address,
                request.logical_path(),
                request.query(),
            ) else {
                continue;
            };
            let upstream_request = UpstreamRequest {
                method: request.method(),
                url,
                body: request.body().cloned(),
            };

            let outcome = self
                .retry
                .call_with_retry(&candidate.name, || self.attempt(candidate, &upstream_request))
                .await;
            let outcome = self.classify(outcome);
            let verdict = self.policy.judge(&outcome, is_last);

            tracing::debug!(
                candidate = %candidate.name,
                status = outcome.http_status,
                http_ok = outcome.http_ok,
                semantic_ok = outcome.semantic_ok,
                verdict = ?verdict,
                "Upstream attempt decided"
            );

            if verdict == Verdict::Accept {
                return Ok(ForwardResult::from_outcome(outcome));
            }

            tracing::warn!(
                candidate = %candidate.name,
                status = outcome.http_status,
                transport_failed = outcome.transport_failed,
                "Falling back to next upstream"
            );
            metrics::record_fallback(&candidate.name, outcome.http_status);
            last = Some(outcome);
        }

        Ok(last
            .map(ForwardResult::from_outcome)
            .unwrap_or_else(ForwardResult::config_missing))
    }

    /// One network call plus its single body read.
    async fn attempt(
        &self,
        candidate: &UpstreamCandidate,
        request: &UpstreamRequest,
    ) -> UpstreamOutcome {
        let start = Instant::now();
        let result = with_deadline(self.deadline, async {
            let raw = self.transport.send(request).await?;
            read_response(raw).await
        })
        .await;

        let outcome = match result {
            Ok(outcome) => outcome,
            Err(e) => {
                tracing::error!(candidate = %candidate.name, error = %e, "Upstream error");
                UpstreamOutcome::transport_failure(&e)
            }
        };
        metrics::record_attempt(&candidate.name, outcome.http_status, start);
        outcome
    }

    fn classify(&self, mut outcome: UpstreamOutcome) -> UpstreamOutcome {
        outcome.semantic_ok = outcome.http_ok && self.classifier.is_semantically_good(&outcome.payload);
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FallbackConfig;
    use crate::gateway::ForwardMethod;
    use crate::upstream::testing::{respond, Scripted, ScriptedTransport};
    use crate::upstream::QueryParams;
    use axum::body::Bytes;
    use serde_json::json;

    const A: &str = "https://a.example/exec";
    const B: &str = "https://b.example/exec";

    fn router(transport: ScriptedTransport) -> CandidateRouter<ScriptedTransport> {
        let candidates = CandidateSet::new([
            UpstreamCandidate::new("public", A, 0),
            UpstreamCandidate::new("server", B, 1),
        ]);
        CandidateRouter::new(candidates, transport)
    }

    fn get(path: &str) -> ForwardRequest {
        ForwardRequest::get(path, QueryParams::new())
    }

    #[tokio::test(start_paused = true)]
    async fn good_first_answer_skips_second() {
        let transport = ScriptedTransport::new()
            .script(A, [respond(200, r#"{"trips":[]}"#)])
            .script(B, [respond(200, r#"{"trips":["b"]}"#)]);
        let router = router(transport);

        let result = router.route(&get("trips")).await.unwrap();

        assert_eq!(result.status, 200);
        assert_eq!(result.payload, json!({"trips": []}));
        assert_eq!(router.transport.calls_to(B), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn try_next_statuses_reach_second() {
        for status in [401, 405] {
            let transport = ScriptedTransport::new()
                .script(A, [respond(status, "denied")])
                .script(B, [respond(200, r#"{"ok":true}"#)]);
            let router = router(transport);

            let result = router.route(&get("trips")).await.unwrap();

            assert_eq!(result.payload, json!({"ok": true}));
            assert_eq!(router.transport.calls_to(A), 1);
            assert_eq!(router.transport.calls_to(B), 1);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn persistent_rate_limit_retries_then_falls_back() {
        let transport = ScriptedTransport::new()
            .script(A, [respond(429, "slow down")])
            .script(B, [respond(200, r#"{"ok":true}"#)]);
        let router = router(transport);

        let result = router.route(&get("trips")).await.unwrap();

        assert_eq!(result.status, 200);
        assert_eq!(router.transport.calls_to(A), 2);
        assert_eq!(router.transport.calls_to(B), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn rate_limit_once_then_success_stays_on_first() {
        let transport = ScriptedTransport::new()
            .script(A, [respond(429, ""), respond(200, r#"{"received":1}"#)])
            .script(B, [respond(200, r#"{"ok":true}"#)]);
        let router = router(transport);

        let result = router.route(&get("trips")).await.unwrap();

        assert_eq!(result.payload, json!({"received": 1}));
        assert_eq!(router.transport.calls_to(A), 2);
        assert_eq!(router.transport.calls_to(B), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn interstitial_page_falls_back() {
        let transport = ScriptedTransport::new()
            .script(A, [respond(200, "<!DOCTYPE html><title>Sign in</title>")])
            .script(B, [respond(200, r#"{"trips":["b"]}"#)]);
        let router = router(transport);

        let result = router.route(&get("trips")).await.unwrap();

        assert_eq!(result.payload, json!({"trips": ["b"]}));
    }

    #[tokio::test(start_paused = true)]
    async fn last_candidate_is_returned_even_if_rejected() {
        let transport = ScriptedTransport::new()
            .script(A, [respond(401, "")])
            .script(B, [respond(200, "<html>login</html>")]);
        let router = router(transport);

        let result = router.route(&get("trips")).await.unwrap();

        assert_eq!(result.status, 200);
        assert_eq!(result.payload, json!({"nonJson": "<html>login</html>"}));
    }

    #[tokio::test(start_paused = true)]
    async fn last_candidate_error_status_is_surfaced() {
        let transport = ScriptedTransport::new()
            .script(A, [respond(405, "")])
            .script(B, [respond(401, r#"{"error":"unauthorized"}"#)]);
        let result = router(transport).route(&get("trips")).await.unwrap();

        assert_eq!(result.status, 401);
        assert_eq!(result.payload, json!({"error": "unauthorized"}));
    }

    #[tokio::test(start_paused = true)]
    async fn other_error_short_circuits() {
        let transport = ScriptedTransport::new()
            .script(A, [respond(500, r#"{"error":"boom"}"#)])
            .script(B, [respond(200, r#"{"ok":true}"#)]);
        let router = router(transport);

        let result = router.route(&get("trips")).await.unwrap();

        assert_eq!(result.status, 500);
        assert_eq!(router.transport.calls_to(B), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn other_error_falls_back_when_configured() {
        let transport = ScriptedTransport::new()
            .script(A, [respond(500, "")])
            .script(B, [respond(200, r#"{"ok":true}"#)]);
        let policy = FallbackPolicy::from_config(&FallbackConfig {
            fallback_on_other_errors: true,
            ..FallbackConfig::default()
        });
        let router = router(transport).with_policy(policy);

        let result = router.route(&get("trips")).await.unwrap();

        assert_eq!(result.status, 200);
    }

    #[tokio::test(start_paused = true)]
    async fn transport_failure_falls_back() {
        let transport = ScriptedTransport::new()
            .script(A, [Scripted::Fail("connection refused".into())])
            .script(B, [respond(200, r#"{"ok":true}"#)]);
        let router = router(transport);

        let result = router.route(&get("trips")).await.unwrap();

        assert_eq!(result.payload, json!({"ok": true}));
        assert_eq!(router.transport.calls_to(A), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn transport_failure_on_last_is_502() {
        let transport = ScriptedTransport::new()
            .script(A, [respond(401, "")])
            .script(B, [Scripted::Fail("dns".into())]);
        let result = router(transport).route(&get("trips")).await.unwrap();

        assert_eq!(result.status, 502);
        assert_eq!(result.payload, json!({"error": "upstream unreachable: dns"}));
    }

    #[tokio::test(start_paused = true)]
    async fn no_usable_candidate_makes_no_call() {
        let candidates = CandidateSet::new([
            UpstreamCandidate::new("public", "", 0),
            UpstreamCandidate::new("server", "", 1),
        ]);
        let router = CandidateRouter::new(candidates, ScriptedTransport::new());

        let result = router.route(&get("trips")).await.unwrap();

        assert_eq!(result.status, 500);
        assert_eq!(result.payload, json!({"error": "upstream configuration missing"}));
        assert!(router.transport.calls().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn single_candidate_is_last() {
        let candidates = CandidateSet::new([UpstreamCandidate::new("server", B, 1)]);
        let transport = ScriptedTransport::new().script(B, [respond(200, "{}")]);
        let result = CandidateRouter::new(candidates, transport)
            .route(&get("trips"))
            .await
            .unwrap();
        assert_eq!(result.status, 200);
        assert_eq!(result.payload, json!({}));
    }

    #[tokio::test(start_paused = true)]
    async fn post_body_is_identical_for_every_attempt() {
        let body = Bytes::from_static(b"  {\"title\": \"Kyoto\"}\n\r\t");
        let transport = ScriptedTransport::new()
            .script(A, [respond(429, ""), respond(405, "")])
            .script(B, [respond(200, r#"{"received":true}"#)]);
        let router = router(transport);

        let result = router
            .route(&ForwardRequest::post("trips/new", body.clone()))
            .await
            .unwrap();

        assert_eq!(result.status, 200);
        let calls = router.transport.calls();
        assert_eq!(calls.len(), 3);
        for call in &calls {
            assert_eq!(call.method, ForwardMethod::Post);
            assert_eq!(call.body.as_ref(), Some(&body));
        }
        assert_eq!(calls[2].url, format!("{B}?path=trips%2Fnew"));
    }

    #[tokio::test(start_paused = true)]
    async fn get_carries_query_parameters() {
        let transport = ScriptedTransport::new().script(A, [respond(200, r#"{"items":[]}"#)]);
        let router = router(transport);
        let params: QueryParams = [("q", "paris"), ("scope", "mine")].into_iter().collect();

        router.route(&ForwardRequest::get("search", params)).await.unwrap();

        let calls = router.transport.calls();
        assert_eq!(calls[0].url, format!("{A}?path=search&q=paris&scope=mine"));
        assert_eq!(calls[0].body, None);
    }

    #[tokio::test(start_paused = true)]
    async fn deadline_expiry_is_a_transport_failure() {
        struct Hanging;
        impl UpstreamTransport for Hanging {
            async fn send(
                &self,
                _request: &UpstreamRequest,
            ) -> Result<crate::upstream::RawResponse, crate::upstream::TransportError> {
                std::future::pending().await
            }
        }

        let candidates = CandidateSet::new([UpstreamCandidate::new("public", A, 0)]);
        let router = CandidateRouter::new(candidates, Hanging)
            .with_deadline(Some(Duration::from_secs(2)));

        let result = router.route(&get("trips")).await.unwrap();

        assert_eq!(result.status, 502);
        assert!(result.payload["error"].as_str().unwrap().contains("deadline"));
    }

    #[tokio::test(start_paused = true)]
    async fn injected_classifier_decides() {
        let transport = ScriptedTransport::new()
            .script(A, [respond(200, r#"{"ok":true}"#)])
            .script(B, [respond(200, r#"{"rows":[]}"#)]);
        let router = router(transport)
            .with_classifier(|payload: &serde_json::Value| payload.get("rows").is_some());

        let result = router.route(&get("sheet")).await.unwrap();

        assert_eq!(result.payload, json!({"rows": []}));
    }
}
