//! Request and result values exchanged with the gateway.

use axum::body::Bytes;
use serde_json::{json, Value};
use std::fmt;

use crate::error::GatewayError;
use crate::upstream::reader::ERROR_FIELD;
use crate::upstream::{QueryParams, UpstreamOutcome, PATH_PARAM};

/// Verbs the gateway forwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ForwardMethod {
    Get,
    Post,
}

impl ForwardMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            ForwardMethod::Get => "GET",
            ForwardMethod::Post => "POST",
        }
    }
}

impl fmt::Display for ForwardMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An inbound operation to forward.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForwardRequest {
    method: ForwardMethod,
    logical_path: String,
    query: QueryParams,
    body: Option<Bytes>,
}

impl ForwardRequest {
    /// A GET with caller query parameters. A `path` parameter is dropped;
    /// the gateway injects that key itself.
    pub fn get(logical_path: impl Into<String>, mut query: QueryParams) -> Self {
        if let Some(dropped) = query.remove(PATH_PARAM) {
            tracing::debug!(value = %dropped, "Dropping caller-supplied path parameter");
        }
        Self {
            method: ForwardMethod::Get,
            logical_path: logical_path.into(),
            query,
            body: None,
        }
    }

    /// A POST with its already-read body, replayed as-is on every attempt.
    pub fn post(logical_path: impl Into<String>, body: impl Into<Bytes>) -> Self {
        Self {
            method: ForwardMethod::Post,
            logical_path: logical_path.into(),
            query: QueryParams::new(),
            body: Some(body.into()),
        }
    }

    pub fn method(&self) -> ForwardMethod {
        self.method
    }

    pub fn logical_path(&self) -> &str {
        &self.logical_path
    }

    pub fn query(&self) -> &QueryParams {
        &self.query
    }

    pub fn body(&self) -> Option<&Bytes> {
        self.body.as_ref()
    }

    pub(crate) fn validate(&self) -> Result<(), GatewayError> {
        if self.logical_path.trim().is_empty() {
            return Err(GatewayError::InvalidRequest("logical path is empty".into()));
        }
        Ok(())
    }
}

/// What the caller gets back.
#[derive(Debug, Clone, PartialEq)]
pub struct ForwardResult {
    pub status: u16,
    pub payload: Value,
}

impl ForwardResult {
    /// Any 2xx surfaces as 200; errors keep the upstream status.
    pub fn from_outcome(outcome: UpstreamOutcome) -> Self {
        Self {
            status: if outcome.http_ok { 200 } else { outcome.http_status },
            payload: outcome.payload,
        }
    }

    pub fn config_missing() -> Self {
        Self::internal_error("upstream configuration missing")
    }

    pub fn internal_error(description: impl Into<String>) -> Self {
        Self::error(500, description)
    }

    /// A gateway-side failure with the given status and `{ "error": .. }` body.
    pub fn error(status: u16, description: impl Into<String>) -> Self {
        let description: String = description.into();
        Self {
            status,
            payload: json!({ ERROR_FIELD: description }),
        }
    }
}
