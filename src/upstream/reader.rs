//! Response decoding.
//!
//! # Responsibilities
//! - Read a response body exactly once
//! - Decode it as JSON, or wrap a bounded excerpt of the raw text
//! - Derive the success flag from the status
//!
//! No retries and no classification happen here.

use serde_json::{json, Map, Value};

use crate::upstream::transport::{RawResponse, TransportError};

/// Payload key wrapping a body that is not JSON.
pub const NON_JSON_FIELD: &str = "nonJson";
/// Payload key carrying a gateway-side error description.
pub const ERROR_FIELD: &str = "error";
/// Maximum characters of raw text kept in a non-JSON payload.
pub const EXCERPT_LIMIT: usize = 400;
/// Status used when none is obtainable.
pub const FALLBACK_STATUS: u16 = 502;

/// Decoded result of one attempt against one candidate.
#[derive(Debug, Clone, PartialEq)]
pub struct UpstreamOutcome {
    /// Status is in 200..=299.
    pub http_ok: bool,
    pub http_status: u16,
    pub payload: Value,
    /// Classifier verdict; only meaningful when `http_ok`.
    pub semantic_ok: bool,
    /// No response was obtained (connect error, deadline, body read error).
    pub transport_failed: bool,
}

impl UpstreamOutcome {
    /// Outcome for a call that never produced a usable response.
    pub fn transport_failure(error: &TransportError) -> Self {
        Self {
            http_ok: false,
            http_status: FALLBACK_STATUS,
            payload: json!({ ERROR_FIELD: error.to_string() }),
            semantic_ok: false,
            transport_failed: true,
        }
    }
}

/// Read the body once and decode it into an outcome.
pub async fn read_response(raw: RawResponse) -> Result<UpstreamOutcome, TransportError> {
    let http_status = raw.status.filter(|s| *s != 0).unwrap_or(FALLBACK_STATUS);
    let text = raw.body.read_text().await?;

    Ok(UpstreamOutcome {
        http_ok: (200..=299).contains(&http_status),
        http_status,
        payload: decode_payload(&text),
        semantic_ok: false,
        transport_failed: false,
    })
}

/// Empty text decodes to `{}`; unparseable text is wrapped, never dropped.
pub fn decode_payload(text: &str) -> Value {
    if text.is_empty() {
        return Value::Object(Map::new());
    }
    serde_json::from_str(text).unwrap_or_else(|_| {
        let excerpt: String = text.chars().take(EXCERPT_LIMIT).collect();
        json!({ NON_JSON_FIELD: excerpt })
    })
}
