//! Router assembly.
//!
//! SYSTEM CONTEXT
//! ==============
//! One Axum router serves the exported client pages from `STATIC_DIR` and a
//! small `/api` namespace that proxies the external backend. The session
//! gate middleware wraps everything, but only acts on the `/main` area.

pub mod auth;
pub mod books;
pub mod gate;
pub mod quiz;

use axum::Router;
use axum::body::Bytes;
use axum::http::StatusCode;
use axum::middleware;
use axum::response::Json;
use axum::routing::{get, post};
use serde_json::Value;
use tower_http::compression::CompressionLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::backend::BackendResponse;
use crate::error::ApiError;
use crate::state::AppState;

/// Full application router.
pub fn app(state: AppState) -> Router {
    let pages = ServeDir::new(&state.config.static_dir).append_index_html_on_directories(true);

    Router::new()
        .route("/api/auth/login", post(auth::login))
        .route("/api/auth/register", post(auth::register))
        .route("/api/auth/logout", post(auth::logout))
        .route("/api/auth/me", get(auth::me))
        .route("/api/books", get(books::list_books))
        .route("/api/books/{id}/reviews", get(books::list_reviews).post(books::create_review))
        .route("/api/libros", get(books::list_books))
        .route("/api/libros/{id}/resenas", get(books::list_reviews).post(books::create_review))
        .route("/api/quiz/me", get(quiz::quiz_me))
        .route("/api/quiz/save", post(quiz::quiz_save))
        .route("/api/recommend/by-quiz", get(quiz::recommend_by_quiz))
        .route("/healthz", get(healthz))
        .fallback_service(pages)
        .layer(middleware::from_fn_with_state(state.clone(), gate::session_gate))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn healthz() -> StatusCode {
    StatusCode::OK
}

/// Lenient body read: anything that is not JSON becomes `null`.
pub(crate) fn parse_body(body: &Bytes) -> Value {
    serde_json::from_slice(body).unwrap_or(Value::Null)
}

/// Forward a backend answer: 2xx bodies pass through with their status,
/// anything else becomes an error envelope.
pub(crate) fn pass_through(resp: &BackendResponse) -> Result<(StatusCode, Json<Value>), ApiError> {
    if !resp.is_success() {
        return Err(ApiError::upstream(resp));
    }
    Ok((resp.status, Json(resp.json_or_empty())))
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
