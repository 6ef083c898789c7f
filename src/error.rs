//! Client-facing error envelope.
//!
//! Every handler failure leaves the process as
//! `{ "ok": false, "status": <u16>, "where": <code>, "detail": <text>, ... }`
//! with the HTTP status equal to `status`. Extra context fields (`called`,
//! `bookId`, `backendResponse`, ...) are merged in beside the fixed keys.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde_json::{Map, Value};

use crate::backend::{BackendError, BackendResponse};

const UNREACHABLE_DETAIL: &str = "Backend service unavailable";
const NOT_AUTHENTICATED_DETAIL: &str = "Not authenticated";

#[derive(Debug, thiserror::Error)]
#[error("{code} ({status}): {detail}")]
pub struct ApiError {
    pub status: StatusCode,
    pub code: &'static str,
    pub detail: String,
    pub extra: Map<String, Value>,
}

impl ApiError {
    #[must_use]
    pub fn new(status: StatusCode, code: &'static str, detail: impl Into<String>) -> Self {
        Self { status, code, detail: detail.into(), extra: Map::new() }
    }

    /// Attach a context field to the envelope.
    #[must_use]
    pub fn with(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.extra.insert(key.to_owned(), value.into());
        self
    }

    /// No session cookie on a route that needs one.
    #[must_use]
    pub fn unauthenticated(cookie_name: &str) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, "not_authenticated", NOT_AUTHENTICATED_DETAIL)
            .with("cookieName", cookie_name)
    }

    /// Local input rejected before any upstream call.
    #[must_use]
    pub fn invalid_payload(detail: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, "invalid_payload", detail)
    }

    /// Transport failure talking to the backend.
    #[must_use]
    pub fn unreachable(err: &BackendError) -> Self {
        tracing::error!(error = %err, "backend call failed");
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, "backend_unreachable", UNREACHABLE_DETAIL)
    }

    /// Backend answered with a non-2xx status; the status is forwarded.
    #[must_use]
    pub fn upstream(resp: &BackendResponse) -> Self {
        let parsed = resp.json();
        let raw = if parsed.is_some() { Value::Null } else { Value::String(resp.raw.clone()) };
        Self::new(resp.status, "backend_error", resp.detail())
            .with("backendResponse", parsed.unwrap_or(Value::Null))
            .with("backendRaw", raw)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let mut body = self.extra;
        body.insert("ok".into(), Value::Bool(false));
        body.insert("status".into(), Value::from(self.status.as_u16()));
        body.insert("where".into(), Value::String(self.code.to_owned()));
        body.insert("detail".into(), Value::String(self.detail));
        (self.status, Json(Value::Object(body))).into_response()
    }
}

impl From<BackendError> for ApiError {
    fn from(err: BackendError) -> Self {
        Self::unreachable(&err)
    }
}

#[cfg(test)]
#[path = "error_test.rs"]
mod tests;
