//! Network transport to a single upstream.
//!
//! # Responsibilities
//! - Issue exactly one HTTP call per invocation
//! - Hand back the status and a body that can be read once
//!
//! # Design Decisions
//! - Redirects are followed; nothing is cached locally
//! - POST bodies go out as `text/plain;charset=utf-8`, byte-for-byte
//! - The trait is the seam tests use to script upstream behavior

use axum::body::Bytes;
use reqwest::header::CONTENT_TYPE;
use reqwest::redirect::Policy;
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::time::Duration;
use thiserror::Error;

use crate::config::TransportConfig;
use crate::gateway::ForwardMethod;

const POST_CONTENT_TYPE: &str = "text/plain;charset=utf-8";

/// Failure to obtain a response (or its body) from an upstream.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("upstream request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("upstream call exceeded {0:?} deadline")]
    Timeout(Duration),

    #[error("upstream unreachable: {0}")]
    Unreachable(String),
}

type BodyFuture = Pin<Box<dyn Future<Output = Result<String, TransportError>> + Send>>;

/// A response body that can be read exactly once.
///
/// Reading consumes the value.
pub struct OneShotBody(BodyFuture);

impl OneShotBody {
    pub fn new<F>(read: F) -> Self
    where
        F: Future<Output = Result<String, TransportError>> + Send + 'static,
    {
        Self(Box::pin(read))
    }

    /// A body that is already in memory.
    pub fn from_text(text: impl Into<String>) -> Self {
        let text = text.into();
        Self::new(async move { Ok(text) })
    }

    /// Read the whole body as text.
    pub async fn read_text(self) -> Result<String, TransportError> {
        self.0.await
    }
}

impl fmt::Debug for OneShotBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("OneShotBody(..)")
    }
}

/// Status and unread body of one upstream response.
#[derive(Debug)]
pub struct RawResponse {
    /// `None` when the transport could not report a status.
    pub status: Option<u16>,
    pub body: OneShotBody,
}

/// One outbound call, fully composed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpstreamRequest {
    pub method: ForwardMethod,
    pub url: String,
    /// Present for POST only. Cloning shares the buffer.
    pub body: Option<Bytes>,
}

/// A way to perform one network call against an upstream.
pub trait UpstreamTransport: Send + Sync {
    fn send(
        &self,
        request: &UpstreamRequest,
    ) -> impl Future<Output = Result<RawResponse, TransportError>> + Send;
}

/// `reqwest`-backed transport used in production.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    pub fn from_config(config: &TransportConfig) -> Result<Self, TransportError> {
        let mut builder = reqwest::Client::builder().redirect(Policy::limited(config.max_redirects));
        if !config.use_system_proxy {
            builder = builder.no_proxy();
        }
        Ok(Self {
            client: builder.build()?,
        })
    }
}

impl UpstreamTransport for HttpTransport {
    async fn send(&self, request: &UpstreamRequest) -> Result<RawResponse, TransportError> {
        let builder = match request.method {
            ForwardMethod::Get => self.client.get(&request.url),
            ForwardMethod::Post => self
                .client
                .post(&request.url)
                .header(CONTENT_TYPE, POST_CONTENT_TYPE)
                .body(request.body.clone().unwrap_or_default()),
        };

        let response = builder.send().await?;
        let status = Some(response.status().as_u16());
        let body = OneShotBody::new(async move { response.text().await.map_err(TransportError::from) });

        Ok(RawResponse { status, body })
    }
}
