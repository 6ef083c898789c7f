//! Session gate for the protected `/main` area.
//!
//! DESIGN
//! ======
//! Three outcomes per navigation: no cookie goes to `/login`, a cookie whose
//! quiz is confirmed passes, and everything else (quiz missing, token
//! rejected, backend down) goes to `/quiz`. Access is only granted on a
//! definite 200 from the backend. The check runs on every request; nothing
//! is cached between navigations.
//!
//! The static file service percent-decodes the path and skips empty and `.`
//! segments, so `//main/`, `/./main/` and `/%6Dain/` all reach the same page
//! as `/main/`. The gate matches against that resolved form, not the raw URI.

use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::{IntoResponse, Redirect, Response};
use percent_encoding::percent_decode_str;

use crate::services::quiz::{self, QuizStatus};
use crate::services::session;
use crate::state::AppState;

pub const PROTECTED_PREFIX: &str = "/main";
pub const LOGIN_PAGE: &str = "/login";
pub const QUIZ_PAGE: &str = "/quiz";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateDecision {
    Unauthenticated,
    AuthenticatedNoQuiz,
    AuthenticatedWithQuiz,
}

/// `/main` itself and anything below it.
#[must_use]
pub fn is_protected(path: &str) -> bool {
    path.strip_prefix(PROTECTED_PREFIX)
        .is_some_and(|rest| rest.is_empty() || rest.starts_with('/'))
}

/// Path as the static file service resolves it: percent-decoded, empty and
/// `.` segments dropped, `..` popping its parent. Always starts with `/`.
#[must_use]
pub fn resolved_path(raw: &str) -> String {
    let decoded = percent_decode_str(raw).decode_utf8_lossy();
    let mut segments: Vec<&str> = Vec::new();
    for segment in decoded.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            s => segments.push(s),
        }
    }
    format!("/{}", segments.join("/"))
}

/// Whether a request path needs the session check, in raw or resolved form.
#[must_use]
pub fn needs_gate(raw: &str) -> bool {
    is_protected(raw) || is_protected(&resolved_path(raw))
}

/// `quiz` is `None` when no check was made (or it could not be made).
#[must_use]
pub fn decide(has_token: bool, quiz: Option<QuizStatus>) -> GateDecision {
    match (has_token, quiz) {
        (false, _) => GateDecision::Unauthenticated,
        (true, Some(QuizStatus::Taken)) => GateDecision::AuthenticatedWithQuiz,
        (true, _) => GateDecision::AuthenticatedNoQuiz,
    }
}

pub async fn session_gate(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let path = request.uri().path().to_owned();
    if !needs_gate(&path) {
        return next.run(request).await;
    }

    let token = session::token_from_headers(request.headers(), state.cookie_name());
    let quiz = match &token {
        Some(token) => Some(quiz::fetch_status(state.backend.as_ref(), token).await),
        None => None,
    };

    let decision = decide(token.is_some(), quiz);
    tracing::debug!(%path, ?decision, ?quiz, "session gate");

    match decision {
        GateDecision::AuthenticatedWithQuiz => next.run(request).await,
        GateDecision::AuthenticatedNoQuiz => Redirect::temporary(QUIZ_PAGE).into_response(),
        GateDecision::Unauthenticated => Redirect::temporary(LOGIN_PAGE).into_response(),
    }
}

#[cfg(test)]
#[path = "gate_test.rs"]
mod tests;
