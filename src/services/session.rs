//! Cookie/Token bridge.
//!
//! ARCHITECTURE
//! ============
//! The browser's cookie store is the only session storage: the backend's
//! bearer token is written into one `HttpOnly` cookie on login and read back
//! on every request that needs to call the backend as the user. Nothing is
//! verified here; a present, non-empty cookie is simply forwarded as
//! `Authorization: Bearer <token>`.

use axum::http::HeaderMap;
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use time::Duration;

use crate::config::AppConfig;

pub const SESSION_MAX_AGE_DAYS: i64 = 7;

/// Session token carried by the named cookie, if any. Empty values count as absent.
#[must_use]
pub fn token_from_headers(headers: &HeaderMap, cookie_name: &str) -> Option<String> {
    let jar = CookieJar::from_headers(headers);
    jar.get(cookie_name)
        .map(|c| c.value().trim())
        .filter(|v| !v.is_empty())
        .map(str::to_owned)
}

/// Cookie issued after a successful login or registration.
#[must_use]
pub fn session_cookie(config: &AppConfig, token: impl Into<String>) -> Cookie<'static> {
    Cookie::build((config.cookie_name.clone(), token.into()))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(config.cookie_secure)
        .max_age(Duration::days(SESSION_MAX_AGE_DAYS))
        .build()
}

/// Same cookie, emptied and expired immediately.
#[must_use]
pub fn cleared_cookie(config: &AppConfig) -> Cookie<'static> {
    Cookie::build((config.cookie_name.clone(), String::new()))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(config.cookie_secure)
        .max_age(Duration::ZERO)
        .build()
}

#[cfg(test)]
#[path = "session_test.rs"]
mod tests;
