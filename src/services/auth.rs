//! Login and registration against the backend's `/auth/*` endpoints.
//!
//! TRADE-OFFS
//! ==========
//! The backend's request contract for `/auth/login` and `/auth/register` is
//! not pinned down, so each call probes a fixed list of payload shapes in
//! order and stops at the first 2xx. This is a compatibility shim, not a
//! reliability retry: attempts are strictly sequential and a transport
//! failure aborts the chain. It should collapse to a single shape once the
//! backend contract is agreed.

use serde_json::{Value, json};

use crate::backend::{Backend, BackendError, BackendRequest, BackendResponse};

pub const LOGIN_PATH: &str = "/auth/login";
pub const REGISTER_PATH: &str = "/auth/register";
pub const LOGOUT_PATH: &str = "/auth/logout";

/// Token keys accepted in a backend auth response, in priority order.
pub const TOKEN_FIELDS: [&str; 4] = ["access_token", "token", "jwt", "accessToken"];

/// First non-empty string found under one of [`TOKEN_FIELDS`].
#[must_use]
pub fn extract_token(body: &Value) -> Option<String> {
    TOKEN_FIELDS.iter().find_map(|key| match body.get(*key) {
        Some(Value::String(s)) if !s.trim().is_empty() => Some(s.clone()),
        _ => None,
    })
}

/// Loose string read: strings as-is, numbers and bools as text, anything else empty.
pub(crate) fn field_str(body: &Value, key: &str) -> String {
    match body.get(key) {
        Some(Value::String(s)) => s.clone(),
        Some(v @ (Value::Number(_) | Value::Bool(_))) => v.to_string(),
        _ => String::new(),
    }
}

// =============================================================================
// LOGIN
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub email: String,
    pub username: String,
    pub password: String,
}

impl Credentials {
    /// Read `email`, `username`, `password` from a client body. `username`
    /// falls back to `email`; the password is taken verbatim.
    #[must_use]
    pub fn from_body(body: &Value) -> Self {
        let email = field_str(body, "email").trim().to_owned();
        let username = match field_str(body, "username").trim() {
            "" => email.clone(),
            name => name.to_owned(),
        };
        let password = field_str(body, "password");
        Self { email, username, password }
    }
}

/// Login payload shapes, in the order they are tried.
#[must_use]
pub fn login_attempts(creds: &Credentials) -> Vec<BackendRequest> {
    let mut attempts = Vec::with_capacity(3);
    if creds.email.is_empty() {
        attempts.push(BackendRequest::post_json(
            LOGIN_PATH,
            json!({ "username": creds.username, "password": creds.password }),
        ));
    } else {
        attempts.push(BackendRequest::post_json(
            LOGIN_PATH,
            json!({ "email": creds.email, "password": creds.password }),
        ));
        attempts.push(BackendRequest::post_json(
            LOGIN_PATH,
            json!({ "username": creds.email, "password": creds.password }),
        ));
    }
    attempts.push(BackendRequest::post_form(
        LOGIN_PATH,
        vec![("username".to_owned(), creds.username.clone()), ("password".to_owned(), creds.password.clone())],
    ));
    attempts
}

#[derive(Debug, Clone, PartialEq)]
pub enum LoginOutcome {
    Authenticated { token: String },
    /// Backend accepted the credentials but sent no recognizable token.
    MissingToken { body: Value },
    /// Every shape was rejected; holds the last response.
    Rejected(BackendResponse),
}

/// Run the login chain.
///
/// # Errors
///
/// Returns an error if any attempt fails at the transport level.
pub async fn login(backend: &dyn Backend, creds: &Credentials) -> Result<LoginOutcome, BackendError> {
    let resp = first_success(backend, login_attempts(creds)).await?;
    if !resp.is_success() {
        return Ok(LoginOutcome::Rejected(resp));
    }
    let body = resp.json_or_empty();
    Ok(match extract_token(&body) {
        Some(token) => LoginOutcome::Authenticated { token },
        None => LoginOutcome::MissingToken { body },
    })
}

// =============================================================================
// REGISTRATION
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    /// Display name from `fullName`, else `name`, else `username`.
    pub full_name: String,
    pub email: String,
    pub password: String,
}

impl Registration {
    #[must_use]
    pub fn from_body(body: &Value) -> Self {
        let full_name = ["fullName", "name", "username"]
            .iter()
            .map(|key| field_str(body, key).trim().to_owned())
            .find(|v| !v.is_empty())
            .unwrap_or_default();
        Self {
            full_name,
            email: field_str(body, "email").trim().to_owned(),
            password: field_str(body, "password"),
        }
    }
}

/// Registration payload shapes, in the order they are tried.
#[must_use]
pub fn register_attempts(reg: &Registration) -> Vec<BackendRequest> {
    vec![
        BackendRequest::post_json(
            REGISTER_PATH,
            json!({ "fullName": reg.full_name, "email": reg.email, "password": reg.password }),
        ),
        BackendRequest::post_json(
            REGISTER_PATH,
            json!({ "name": reg.full_name, "email": reg.email, "password": reg.password }),
        ),
        BackendRequest::post_json(
            REGISTER_PATH,
            json!({
                "username": reg.email,
                "email": reg.email,
                "password": reg.password,
                "name": reg.full_name,
            }),
        ),
    ]
}

#[derive(Debug, Clone, PartialEq)]
pub enum RegisterOutcome {
    /// Account created; the backend may or may not have logged the user in.
    Registered { token: Option<String> },
    Rejected(BackendResponse),
}

/// Run the registration chain.
///
/// # Errors
///
/// Returns an error if any attempt fails at the transport level.
pub async fn register(backend: &dyn Backend, reg: &Registration) -> Result<RegisterOutcome, BackendError> {
    let resp = first_success(backend, register_attempts(reg)).await?;
    if !resp.is_success() {
        return Ok(RegisterOutcome::Rejected(resp));
    }
    Ok(RegisterOutcome::Registered { token: extract_token(&resp.json_or_empty()) })
}

// =============================================================================
// LOGOUT
// =============================================================================

/// Tell the backend the token is done with. Failures are logged, never returned.
pub async fn logout(backend: &dyn Backend, token: &str) {
    let request = BackendRequest::post_json(LOGOUT_PATH, json!({})).with_bearer(token);
    match backend.send(request).await {
        Ok(resp) if resp.is_success() => tracing::debug!("backend logout acknowledged"),
        Ok(resp) => tracing::debug!(status = resp.status.as_u16(), "backend logout rejected"),
        Err(e) => tracing::warn!(error = %e, "backend logout failed"),
    }
}

/// Send `attempts` one after another; return the first 2xx response, or the
/// last response if none succeed.
async fn first_success(
    backend: &dyn Backend,
    attempts: Vec<BackendRequest>,
) -> Result<BackendResponse, BackendError> {
    let mut last = None;
    for (i, request) in attempts.into_iter().enumerate() {
        let resp = backend.send(request).await?;
        if resp.is_success() {
            return Ok(resp);
        }
        tracing::debug!(attempt = i + 1, status = resp.status.as_u16(), "auth payload shape rejected");
        last = Some(resp);
    }
    Ok(last.unwrap_or_else(|| BackendResponse::new(axum::http::StatusCode::BAD_REQUEST, "")))
}

#[cfg(test)]
#[path = "auth_test.rs"]
mod tests;
