use super::*;
use axum::http::{HeaderValue, header};

fn headers_with_cookie(raw: &str) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(header::COOKIE, HeaderValue::from_str(raw).unwrap());
    headers
}

#[test]
fn token_read_from_named_cookie() {
    let headers = headers_with_cookie("theme=dark; access_token=eyJhbGciOi.abc.def; lang=es");
    assert_eq!(token_from_headers(&headers, "access_token").as_deref(), Some("eyJhbGciOi.abc.def"));
}

#[test]
fn token_missing_cookie_is_none() {
    let headers = headers_with_cookie("theme=dark");
    assert_eq!(token_from_headers(&headers, "access_token"), None);
    assert_eq!(token_from_headers(&HeaderMap::new(), "access_token"), None);
}

#[test]
fn token_empty_value_is_none() {
    let headers = headers_with_cookie("access_token=; theme=dark");
    assert_eq!(token_from_headers(&headers, "access_token"), None);
}

#[test]
fn token_respects_configured_name() {
    let headers = headers_with_cookie("access_token=a; rs_session=b");
    assert_eq!(token_from_headers(&headers, "rs_session").as_deref(), Some("b"));
}

#[test]
fn session_cookie_attributes() {
    let config = AppConfig::for_tests("http://backend.test");
    let cookie = session_cookie(&config, "T");

    assert_eq!(cookie.name(), "access_token");
    assert_eq!(cookie.value(), "T");
    assert_eq!(cookie.path(), Some("/"));
    assert_eq!(cookie.http_only(), Some(true));
    assert_eq!(cookie.same_site(), Some(SameSite::Lax));
    assert_eq!(cookie.secure(), Some(false));
    assert_eq!(cookie.max_age(), Some(Duration::days(7)));
}

#[test]
fn session_cookie_secure_in_production_config() {
    let mut config = AppConfig::for_tests("http://backend.test");
    config.cookie_secure = true;
    let rendered = session_cookie(&config, "T").to_string();
    assert!(rendered.contains("Secure"), "{rendered}");
}

#[test]
fn cleared_cookie_expires_immediately() {
    let config = AppConfig::for_tests("http://backend.test");
    let cookie = cleared_cookie(&config);

    assert_eq!(cookie.name(), "access_token");
    assert_eq!(cookie.value(), "");
    assert_eq!(cookie.path(), Some("/"));
    assert_eq!(cookie.max_age(), Some(Duration::ZERO));
    assert!(cookie.to_string().contains("Max-Age=0"));
}
