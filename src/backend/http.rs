//! reqwest-backed [`Backend`] implementation.

use std::time::Duration;

use super::{Backend, BackendError, BackendRequest, BackendResponse, RequestBody};
use crate::config::AppConfig;

pub struct HttpBackend {
    http: reqwest::Client,
    base_url: String,
}

impl HttpBackend {
    /// Build a client for the configured backend URL and timeouts.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn new(config: &AppConfig) -> Result<Self, BackendError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeouts.request_secs))
            .connect_timeout(Duration::from_secs(config.timeouts.connect_secs))
            .build()
            .map_err(|e| BackendError::HttpClientBuild(e.to_string()))?;
        Ok(Self { http, base_url: config.backend_url.clone() })
    }
}

#[async_trait::async_trait]
impl Backend for HttpBackend {
    async fn send(&self, request: BackendRequest) -> Result<BackendResponse, BackendError> {
        let url = format!("{}{}", self.base_url, request.path);
        let mut builder = self.http.request(request.method.clone(), &url);

        if let Some(token) = &request.bearer {
            builder = builder.bearer_auth(token);
        }
        builder = match &request.body {
            RequestBody::Empty => builder,
            RequestBody::Json(body) => builder.json(body),
            RequestBody::Form(pairs) => builder.form(pairs),
        };

        let response = builder.send().await.map_err(|e| {
            tracing::warn!(error = %e, method = %request.method, %url, "backend request failed");
            BackendError::Unreachable(e.to_string())
        })?;

        let status = response.status();
        let raw = response
            .text()
            .await
            .map_err(|e| BackendError::Unreachable(e.to_string()))?;
        tracing::debug!(method = %request.method, %url, status = status.as_u16(), "backend responded");

        Ok(BackendResponse { status, raw })
    }
}
