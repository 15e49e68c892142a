//! Response rendering.
//!
//! A `ForwardResult` goes back to the caller as its status plus the payload
//! as the JSON body. Which candidate answered is never exposed.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

use crate::gateway::ForwardResult;

impl IntoResponse for ForwardResult {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(self.payload)).into_response()
    }
}
