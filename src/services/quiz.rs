//! Onboarding quiz: status classification and answer validation.

use axum::http::StatusCode;
use serde::Serialize;
use serde_json::Value;

use crate::backend::{Backend, BackendError, BackendRequest, BackendResponse};

pub const QUIZ_ME_PATH: &str = "/quiz/me";
pub const QUIZ_SAVE_PATH: &str = "/quiz/save";
pub const RECOMMEND_BY_QUIZ_PATH: &str = "/recommend/by-quiz";

/// What the backend says about the caller's quiz.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuizStatus {
    /// 200: the quiz exists.
    Taken,
    /// 404 or 400: authenticated, quiz not taken yet.
    NotTaken,
    /// 401: token rejected.
    Unauthenticated,
    /// Any other status, or no response at all.
    Unknown,
}

impl QuizStatus {
    #[must_use]
    pub fn from_status(status: StatusCode) -> Self {
        match status {
            StatusCode::OK => Self::Taken,
            StatusCode::NOT_FOUND | StatusCode::BAD_REQUEST => Self::NotTaken,
            StatusCode::UNAUTHORIZED => Self::Unauthenticated,
            _ => Self::Unknown,
        }
    }
}

/// `GET /quiz/me` as the token's owner.
///
/// # Errors
///
/// Returns an error if the backend cannot be reached.
pub async fn fetch_quiz(backend: &dyn Backend, token: &str) -> Result<BackendResponse, BackendError> {
    backend.send(BackendRequest::get(QUIZ_ME_PATH).with_bearer(token)).await
}

/// Classify the caller's quiz state. Transport failures map to [`QuizStatus::Unknown`].
pub async fn fetch_status(backend: &dyn Backend, token: &str) -> QuizStatus {
    match fetch_quiz(backend, token).await {
        Ok(resp) => QuizStatus::from_status(resp.status),
        Err(e) => {
            tracing::warn!(error = %e, "quiz status check failed");
            QuizStatus::Unknown
        }
    }
}

// =============================================================================
// ANSWERS
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionLevel {
    Low,
    Medium,
    High,
}

impl ActionLevel {
    #[must_use]
    pub fn from_str(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "low" => Some(Self::Low),
            "medium" => Some(Self::Medium),
            "high" => Some(Self::High),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuizAnswers {
    pub favorite_genre: String,
    pub action_level: ActionLevel,
    pub keywords: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum QuizError {
    #[error("'favorite_genre' is required.")]
    MissingGenre,
    #[error("'action_level' must be one of low, medium, high.")]
    InvalidActionLevel,
    #[error("At least one keyword is required.")]
    MissingKeywords,
}

/// Validate a submitted quiz. Keywords are trimmed; non-strings, blanks and
/// repeats are dropped, first occurrence kept.
///
/// # Errors
///
/// Returns an error when the genre is blank, the action level is unknown,
/// or no usable keyword remains.
pub fn validate_answers(body: &Value) -> Result<QuizAnswers, QuizError> {
    let favorite_genre = match body.get("favorite_genre") {
        Some(Value::String(s)) if !s.trim().is_empty() => s.trim().to_owned(),
        _ => return Err(QuizError::MissingGenre),
    };

    let action_level = body
        .get("action_level")
        .and_then(Value::as_str)
        .and_then(ActionLevel::from_str)
        .ok_or(QuizError::InvalidActionLevel)?;

    let mut keywords: Vec<String> = Vec::new();
    for kw in body.get("keywords").and_then(Value::as_array).into_iter().flatten() {
        let Some(kw) = kw.as_str().map(str::trim) else { continue };
        if !kw.is_empty() && !keywords.iter().any(|k| k == kw) {
            keywords.push(kw.to_owned());
        }
    }
    if keywords.is_empty() {
        return Err(QuizError::MissingKeywords);
    }

    Ok(QuizAnswers { favorite_genre, action_level, keywords })
}

#[cfg(test)]
#[path = "quiz_test.rs"]
mod tests;
