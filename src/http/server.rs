//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with the gateway handlers
//! - Wire up middleware (tracing, body limit, request ID, cache header)
//! - Bind server to listener
//! - Read the POST body once, before the gateway sees it
//! - Hand each operation to the gateway and render its result
//! - Answer rejected and unrouted requests with a JSON `{ "error" }` body

use axum::{
    body::Bytes,
    extract::{
        rejection::{BytesRejection, PathRejection, QueryRejection},
        DefaultBodyLimit, Path, Query, State,
    },
    http::{header::CACHE_CONTROL, HeaderMap, HeaderValue, StatusCode},
    routing::get,
    Json, Router,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    set_header::SetResponseHeaderLayer,
    trace::TraceLayer,
};
use tracing::Instrument;

use crate::config::GatewayConfig;
use crate::error::GatewayError;
use crate::gateway::{ForwardMethod, ForwardRequest, ForwardResult, Gateway};
use crate::http::request::{request_id, MakeGatewayRequestId};
use crate::lifecycle::ShutdownSignal;
use crate::upstream::QueryParams;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub gateway: Arc<Gateway>,
}

/// HTTP server exposing the gateway.
pub struct HttpServer {
    router: Router,
    config: GatewayConfig,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: GatewayConfig) -> Result<Self, GatewayError> {
        let gateway = Arc::new(Gateway::from_config(&config)?);
        Ok(Self::with_gateway(config, gateway))
    }

    /// Create a server around an already-built gateway.
    pub fn with_gateway(config: GatewayConfig, gateway: Arc<Gateway>) -> Self {
        let router = Self::build_router(&config, AppState { gateway });
        Self { router, config }
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(config: &GatewayConfig, state: AppState) -> Router {
        let prefix = config.listener.route_prefix.trim_end_matches('/');

        Router::new()
            .route(
                &format!("{prefix}/{{path}}"),
                get(forward_get).post(forward_post),
            )
            .route("/healthz", get(healthz))
            .fallback(unrouted)
            .method_not_allowed_fallback(method_not_allowed)
            .with_state(state)
            .layer(
                ServiceBuilder::new()
                    .layer(SetRequestIdLayer::x_request_id(MakeGatewayRequestId))
                    .layer(TraceLayer::new_for_http())
                    .layer(PropagateRequestIdLayer::x_request_id())
                    .layer(SetResponseHeaderLayer::overriding(
                        CACHE_CONTROL,
                        HeaderValue::from_static("no-store"),
                    ))
                    .layer(DefaultBodyLimit::max(config.limits.max_body_bytes)),
            )
    }

    /// The router, for serving or in-process testing.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server until the shutdown signal fires.
    pub async fn run(
        self,
        listener: TcpListener,
        shutdown: ShutdownSignal,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            prefix = %self.config.listener.route_prefix,
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                shutdown.wait().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

async fn forward_get(
    State(state): State<AppState>,
    path: Result<Path<String>, PathRejection>,
    query: Result<Query<Vec<(String, String)>>, QueryRejection>,
    headers: HeaderMap,
) -> ForwardResult {
    let (Path(path), Query(params)) = match (path, query) {
        (Ok(path), Ok(query)) => (path, query),
        (Err(e), _) => return rejected(&headers, e.status(), e.body_text()),
        (_, Err(e)) => return rejected(&headers, e.status(), e.body_text()),
    };
    let request = ForwardRequest::get(path, params.into_iter().collect::<QueryParams>());
    forward(&state, &headers, request).await
}

async fn forward_post(
    State(state): State<AppState>,
    path: Result<Path<String>, PathRejection>,
    headers: HeaderMap,
    body: Result<Bytes, BytesRejection>,
) -> ForwardResult {
    let (Path(path), body) = match (path, body) {
        (Ok(path), Ok(body)) => (path, body),
        (Err(e), _) => return rejected(&headers, e.status(), e.body_text()),
        (_, Err(e)) => return rejected(&headers, e.status(), e.body_text()),
    };
    forward(&state, &headers, ForwardRequest::post(path, body)).await
}

/// The request never reached the gateway; report why in the usual shape.
fn rejected(headers: &HeaderMap, status: StatusCode, reason: String) -> ForwardResult {
    tracing::warn!(
        request_id = %request_id(headers),
        status = status.as_u16(),
        reason = %reason,
        "Request rejected"
    );
    ForwardResult::error(status.as_u16(), reason)
}

async fn unrouted() -> ForwardResult {
    ForwardResult::error(StatusCode::NOT_FOUND.as_u16(), "no such route")
}

async fn method_not_allowed() -> ForwardResult {
    ForwardResult::error(
        StatusCode::METHOD_NOT_ALLOWED.as_u16(),
        "only GET and POST are forwarded",
    )
}

async fn forward(state: &AppState, headers: &HeaderMap, request: ForwardRequest) -> ForwardResult {
    let span = tracing::info_span!(
        "forward",
        request_id = %request_id(headers),
        method = %request.method(),
        path = %request.logical_path(),
    );

    async {
        let result = state.gateway.forward(request).await;
        tracing::info!(status = result.status, "Forwarded");
        result
    }
    .instrument(span)
    .await
}

/// Liveness probe; reports how many candidates can be tried.
async fn healthz(State(state): State<AppState>) -> Json<Value> {
    let candidates = state.gateway.router().candidates();
    Json(json!({
        "status": "ok",
        "upstreams": candidates.len(),
        "methods": [ForwardMethod::Get.as_str(), ForwardMethod::Post.as_str()],
    }))
}
