//! Quiz and recommendation routes. All require a session.

use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Json;
use serde_json::{Value, json};

use super::auth::SessionToken;
use super::{parse_body, pass_through};
use crate::backend::BackendRequest;
use crate::error::ApiError;
use crate::services::quiz;
use crate::state::AppState;

/// `GET /api/quiz/me` — the caller's saved quiz, status forwarded.
pub async fn quiz_me(
    State(state): State<AppState>,
    SessionToken(token): SessionToken,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let resp = quiz::fetch_quiz(state.backend.as_ref(), &token).await?;
    pass_through(&resp)
}

/// `POST /api/quiz/save` — validate and store the onboarding answers.
pub async fn quiz_save(
    State(state): State<AppState>,
    SessionToken(token): SessionToken,
    body: Bytes,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let answers = quiz::validate_answers(&parse_body(&body)).map_err(|e| ApiError::invalid_payload(e.to_string()))?;

    let request = BackendRequest::post_json(quiz::QUIZ_SAVE_PATH, json!(answers)).with_bearer(token);
    let resp = state.backend.send(request).await?;
    pass_through(&resp)
}

/// `GET /api/recommend/by-quiz` — recommendations derived from the saved quiz.
pub async fn recommend_by_quiz(
    State(state): State<AppState>,
    SessionToken(token): SessionToken,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let request = BackendRequest::get(quiz::RECOMMEND_BY_QUIZ_PATH).with_bearer(token);
    let resp = state.backend.send(request).await?;
    pass_through(&resp)
}

#[cfg(test)]
#[path = "quiz_test.rs"]
mod tests;
