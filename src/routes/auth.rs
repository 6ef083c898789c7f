//! Auth routes — login, registration, logout, session probe.

use axum::body::Bytes;
use axum::extract::{FromRef, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::Json;
use axum_extra::extract::cookie::CookieJar;
use serde_json::{Value, json};

use super::parse_body;
use crate::error::ApiError;
use crate::services::auth::{self as auth_svc, LoginOutcome, RegisterOutcome};
use crate::services::session;
use crate::state::AppState;

const MISSING_TOKEN_DETAIL: &str =
    "Login succeeded but the backend returned no token (access_token/token/jwt/accessToken).";

// =============================================================================
// SESSION EXTRACTOR
// =============================================================================

/// Bearer token taken from the session cookie.
/// Use as a handler parameter to require a session.
pub struct SessionToken(pub String);

impl<S> axum::extract::FromRequestParts<S> for SessionToken
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut axum::http::request::Parts, state: &S) -> Result<Self, Self::Rejection> {
        let app_state = AppState::from_ref(state);
        require_token(&app_state, &parts.headers).map(Self)
    }
}

/// Session token or the 401 envelope.
pub(crate) fn require_token(state: &AppState, headers: &HeaderMap) -> Result<String, ApiError> {
    session::token_from_headers(headers, state.cookie_name()).ok_or_else(|| ApiError::unauthenticated(state.cookie_name()))
}

// =============================================================================
// HANDLERS
// =============================================================================

/// `POST /api/auth/login` — probe login shapes, set the session cookie on success.
pub async fn login(State(state): State<AppState>, body: Bytes) -> Result<(CookieJar, Json<Value>), ApiError> {
    let creds = auth_svc::Credentials::from_body(&parse_body(&body));

    match auth_svc::login(state.backend.as_ref(), &creds).await? {
        LoginOutcome::Authenticated { token } => {
            tracing::info!("login succeeded");
            let jar = CookieJar::new().add(session::session_cookie(&state.config, token));
            Ok((jar, Json(json!({ "ok": true }))))
        }
        LoginOutcome::MissingToken { body } => {
            tracing::error!("backend login succeeded without a token field");
            Err(ApiError::new(StatusCode::INTERNAL_SERVER_ERROR, "missing_token", MISSING_TOKEN_DETAIL).with("backend", body))
        }
        LoginOutcome::Rejected(resp) => {
            tracing::info!(status = resp.status.as_u16(), "login rejected by backend");
            Err(ApiError::new(resp.status, "login_failed", resp.detail_or("Login failed"))
                .with("backend", resp.json_or_empty()))
        }
    }
}

/// `POST /api/auth/register` — probe registration shapes; sign in when the backend returns a token.
pub async fn register(State(state): State<AppState>, body: Bytes) -> Result<(CookieJar, Json<Value>), ApiError> {
    let registration = auth_svc::Registration::from_body(&parse_body(&body));

    match auth_svc::register(state.backend.as_ref(), &registration).await? {
        RegisterOutcome::Registered { token } => {
            let authenticated = token.is_some();
            let mut jar = CookieJar::new();
            if let Some(token) = token {
                jar = jar.add(session::session_cookie(&state.config, token));
            }
            tracing::info!(authenticated, "registration succeeded");
            Ok((jar, Json(json!({ "ok": true, "authenticated": authenticated }))))
        }
        RegisterOutcome::Rejected(resp) => Err(ApiError::new(
            resp.status,
            "register_failed",
            resp.detail_or("Registration failed"),
        )
        .with("backend", resp.json_or_empty())),
    }
}

/// `POST /api/auth/logout` — best-effort backend logout, always clears the cookie.
pub async fn logout(State(state): State<AppState>, headers: HeaderMap) -> (CookieJar, Json<Value>) {
    if let Some(token) = session::token_from_headers(&headers, state.cookie_name()) {
        auth_svc::logout(state.backend.as_ref(), &token).await;
    }

    let jar = CookieJar::new().add(session::cleared_cookie(&state.config));
    (jar, Json(json!({ "ok": true })))
}

/// `GET /api/auth/me` — whether a session cookie is present. No backend call.
pub async fn me(State(state): State<AppState>, headers: HeaderMap) -> Json<Value> {
    let authenticated = session::token_from_headers(&headers, state.cookie_name()).is_some();
    Json(json!({ "authenticated": authenticated, "cookieName": state.cookie_name() }))
}

#[cfg(test)]
#[path = "auth_test.rs"]
mod tests;
