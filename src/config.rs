//! Gateway configuration parsed from environment variables.
//!
//! DESIGN
//! ======
//! Everything is read once in `main` into an `AppConfig`, which then travels
//! inside `AppState`. Handlers never consult the process environment, so
//! tests build configs directly with [`AppConfig::for_tests`].

pub const DEFAULT_BACKEND_URL: &str = "http://127.0.0.1:8000";
pub const DEFAULT_COOKIE_NAME: &str = "access_token";
pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_STATIC_DIR: &str = "public";
pub const DEFAULT_BACKEND_REQUEST_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_BACKEND_CONNECT_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid PORT: {0}")]
    InvalidPort(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BackendTimeouts {
    pub request_secs: u64,
    pub connect_secs: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Base URL of the external backend, without trailing slash.
    pub backend_url: String,
    /// Name of the cookie carrying the session token.
    pub cookie_name: String,
    /// Whether issued cookies carry the `Secure` attribute.
    pub cookie_secure: bool,
    pub port: u16,
    /// Directory holding the exported client pages.
    pub static_dir: String,
    pub timeouts: BackendTimeouts,
}

impl AppConfig {
    /// Build typed config from environment variables.
    ///
    /// Optional:
    /// - `PYTHON_API_URL`: backend base URL (default `http://127.0.0.1:8000`)
    /// - `JWT_COOKIE_NAME`: session cookie name (default `access_token`)
    /// - `COOKIE_SECURE`: explicit bool; otherwise `APP_ENV=production` enables it
    /// - `PORT`: default 3000
    /// - `STATIC_DIR`: default `public`
    /// - `BACKEND_REQUEST_TIMEOUT_SECS`: default 30
    /// - `BACKEND_CONNECT_TIMEOUT_SECS`: default 10
    ///
    /// # Errors
    ///
    /// Returns an error if `PORT` is set but is not a valid port number.
    pub fn from_env() -> Result<Self, ConfigError> {
        let backend_url = std::env::var("PYTHON_API_URL")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_BACKEND_URL.to_string())
            .trim()
            .trim_end_matches('/')
            .to_string();
        let cookie_name = std::env::var("JWT_COOKIE_NAME")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_COOKIE_NAME.to_string());
        let cookie_secure = resolve_cookie_secure(env_bool("COOKIE_SECURE"), std::env::var("APP_ENV").ok().as_deref());
        let port = match std::env::var("PORT") {
            Ok(raw) => raw.trim().parse::<u16>().map_err(|_| ConfigError::InvalidPort(raw))?,
            Err(_) => DEFAULT_PORT,
        };
        let static_dir = std::env::var("STATIC_DIR").unwrap_or_else(|_| DEFAULT_STATIC_DIR.to_string());
        let timeouts = BackendTimeouts {
            request_secs: env_parse_u64("BACKEND_REQUEST_TIMEOUT_SECS", DEFAULT_BACKEND_REQUEST_TIMEOUT_SECS),
            connect_secs: env_parse_u64("BACKEND_CONNECT_TIMEOUT_SECS", DEFAULT_BACKEND_CONNECT_TIMEOUT_SECS),
        };

        Ok(Self { backend_url, cookie_name, cookie_secure, port, static_dir, timeouts })
    }

    /// Config with defaults and the given backend URL, independent of the environment.
    #[cfg(test)]
    #[must_use]
    pub fn for_tests(backend_url: &str) -> Self {
        Self {
            backend_url: backend_url.trim_end_matches('/').to_string(),
            cookie_name: DEFAULT_COOKIE_NAME.to_string(),
            cookie_secure: false,
            port: DEFAULT_PORT,
            static_dir: "__missing_static_dir__".to_string(),
            timeouts: BackendTimeouts {
                request_secs: DEFAULT_BACKEND_REQUEST_TIMEOUT_SECS,
                connect_secs: DEFAULT_BACKEND_CONNECT_TIMEOUT_SECS,
            },
        }
    }

    /// Absolute backend URL for a path such as `/books`.
    #[must_use]
    pub fn backend_endpoint(&self, path: &str) -> String {
        format!("{}{}", self.backend_url, path)
    }
}

pub(crate) fn env_bool(key: &str) -> Option<bool> {
    std::env::var(key).ok().and_then(|raw| parse_bool(&raw))
}

pub(crate) fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

fn resolve_cookie_secure(explicit: Option<bool>, app_env: Option<&str>) -> bool {
    if let Some(value) = explicit {
        return value;
    }
    app_env.is_some_and(|env| env.trim().eq_ignore_ascii_case("production"))
}

fn env_parse_u64(key: &str, default: u64) -> u64 {
    std::env::var(key)
        .ok()
        .and_then(|v| v.trim().parse::<u64>().ok())
        .unwrap_or(default)
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
