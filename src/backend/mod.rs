//! Backend — client seam for the external book/quiz REST service.
//!
//! DESIGN
//! ======
//! Handlers talk to the backend only through the [`Backend`] trait so the
//! router can be exercised against a scripted mock. A response is kept as
//! status plus raw text; callers decide whether they want parsed JSON, an
//! empty-object fallback, or a human-readable `detail`.

pub mod http;

use axum::http::{Method, StatusCode};
use serde_json::Value;

pub use self::http::HttpBackend;

// =============================================================================
// ERROR
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    /// The request never produced an HTTP response (DNS, connect, timeout).
    #[error("backend unreachable: {0}")]
    Unreachable(String),

    /// The underlying HTTP client could not be constructed.
    #[error("HTTP client build failed: {0}")]
    HttpClientBuild(String),
}

// =============================================================================
// REQUEST / RESPONSE
// =============================================================================

#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    Empty,
    Json(Value),
    /// `application/x-www-form-urlencoded` pairs.
    Form(Vec<(String, String)>),
}

/// One outbound call. `path` is relative to the configured base URL.
#[derive(Debug, Clone, PartialEq)]
pub struct BackendRequest {
    pub method: Method,
    pub path: String,
    /// Sent as `Authorization: Bearer <token>` when present.
    pub bearer: Option<String>,
    pub body: RequestBody,
}

impl BackendRequest {
    #[must_use]
    pub fn get(path: impl Into<String>) -> Self {
        Self { method: Method::GET, path: path.into(), bearer: None, body: RequestBody::Empty }
    }

    #[must_use]
    pub fn post_json(path: impl Into<String>, body: Value) -> Self {
        Self { method: Method::POST, path: path.into(), bearer: None, body: RequestBody::Json(body) }
    }

    #[must_use]
    pub fn post_form(path: impl Into<String>, pairs: Vec<(String, String)>) -> Self {
        Self { method: Method::POST, path: path.into(), bearer: None, body: RequestBody::Form(pairs) }
    }

    #[must_use]
    pub fn with_bearer(mut self, token: impl Into<String>) -> Self {
        self.bearer = Some(token.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendResponse {
    pub status: StatusCode,
    pub raw: String,
}

impl BackendResponse {
    #[must_use]
    pub fn new(status: StatusCode, raw: impl Into<String>) -> Self {
        Self { status, raw: raw.into() }
    }

    #[must_use]
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    /// Parsed JSON body, or `None` when the body is empty or not JSON.
    #[must_use]
    pub fn json(&self) -> Option<Value> {
        if self.raw.trim().is_empty() {
            return None;
        }
        serde_json::from_str(&self.raw).ok()
    }

    /// Parsed JSON body with `{}` standing in for anything unparseable.
    #[must_use]
    pub fn json_or_empty(&self) -> Value {
        self.json().unwrap_or_else(|| Value::Object(serde_json::Map::new()))
    }

    /// Best human-readable failure text: `detail`, then `message`, then the
    /// raw body, then the status line.
    #[must_use]
    pub fn detail(&self) -> String {
        if let Some(parsed) = self.json() {
            for key in ["detail", "message"] {
                match parsed.get(key) {
                    Some(Value::String(s)) if !s.is_empty() => return s.clone(),
                    Some(Value::Null | Value::String(_)) | None => {}
                    Some(other) => return other.to_string(),
                }
            }
        }
        if !self.raw.trim().is_empty() {
            return self.raw.clone();
        }
        status_line(self.status)
    }

    /// Like [`Self::detail`] but only trusts a JSON `detail` field, with a
    /// caller-supplied fallback.
    #[must_use]
    pub fn detail_or(&self, fallback: &str) -> String {
        match self.json().as_ref().and_then(|v| v.get("detail")) {
            Some(Value::String(s)) if !s.is_empty() => s.clone(),
            Some(Value::Null | Value::String(_)) | None => fallback.to_string(),
            Some(other) => other.to_string(),
        }
    }
}

fn status_line(status: StatusCode) -> String {
    match status.canonical_reason() {
        Some(reason) => format!("{} {reason}", status.as_u16()),
        None => status.as_u16().to_string(),
    }
}

// =============================================================================
// TRAIT
// =============================================================================

/// Transport to the external backend.
#[async_trait::async_trait]
pub trait Backend: Send + Sync {
    /// Perform one request. Non-2xx statuses are returned as `Ok`; only
    /// transport failures are errors.
    async fn send(&self, request: BackendRequest) -> Result<BackendResponse, BackendError>;
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
