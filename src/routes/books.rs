//! Catalog routes — book list and per-book reviews.

use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::Json;
use serde_json::{Value, json};

use super::auth::require_token;
use super::parse_body;
use crate::backend::BackendRequest;
use crate::error::ApiError;
use crate::services::books::{self, Book};
use crate::state::AppState;

/// `GET /api/books` — normalized catalog.
pub async fn list_books(State(state): State<AppState>) -> Result<Json<Vec<Book>>, ApiError> {
    let called = state.config.backend_endpoint(books::BOOKS_PATH);
    let resp = state.backend.send(BackendRequest::get(books::BOOKS_PATH)).await?;

    if !resp.is_success() {
        return Err(ApiError::upstream(&resp).with("called", called));
    }

    let Some(Value::Array(items)) = resp.json() else {
        return Err(ApiError::new(StatusCode::BAD_GATEWAY, "invalid_books_format", "Backend did not return a book list")
            .with("called", called)
            .with("backendResponse", resp.json().unwrap_or(Value::String(resp.raw.clone()))));
    };

    let (normalized, dropped) = books::normalize_books(&items);
    if dropped > 0 {
        tracing::warn!(dropped, kept = normalized.len(), "backend returned books without id");
    }
    Ok(Json(normalized))
}

/// `GET /api/books/:id/reviews` — public review list.
pub async fn list_reviews(State(state): State<AppState>, Path(book_id): Path<String>) -> Result<Json<Value>, ApiError> {
    let book_id = require_book_id(&book_id)?;
    let path = books::reviews_path(&book_id);
    let called = state.config.backend_endpoint(&path);

    let resp = state.backend.send(BackendRequest::get(path)).await?;
    if !resp.is_success() {
        return Err(ApiError::upstream(&resp).with("bookId", book_id).with("called", called));
    }
    Ok(Json(resp.json().unwrap_or_else(|| json!([]))))
}

/// `POST /api/books/:id/reviews` — submit a review as the session's user.
pub async fn create_review(
    State(state): State<AppState>,
    Path(book_id): Path<String>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let book_id = require_book_id(&book_id)?;
    let token = require_token(&state, &headers)?;
    let payload = books::validate_review(&parse_body(&body)).map_err(|e| ApiError::invalid_payload(e.to_string()))?;
    let sent = json!(payload);

    let path = books::reviews_path(&book_id);
    let called = state.config.backend_endpoint(&path);
    let resp = state
        .backend
        .send(BackendRequest::post_json(path, sent.clone()).with_bearer(token))
        .await?;

    if !resp.is_success() {
        return Err(ApiError::upstream(&resp)
            .with("bookId", book_id)
            .with("called", called)
            .with("sentPayload", sent));
    }
    Ok((resp.status, Json(resp.json().unwrap_or_else(|| json!({ "ok": true })))))
}

fn require_book_id(raw: &str) -> Result<String, ApiError> {
    let id = raw.trim();
    if id.is_empty() {
        return Err(ApiError::new(StatusCode::BAD_REQUEST, "missing_book_id_in_url", "Book id missing from URL")
            .with("bookId", id));
    }
    Ok(id.to_owned())
}

#[cfg(test)]
#[path = "books_test.rs"]
mod tests;
