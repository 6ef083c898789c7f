//! Shared application state.
//!
//! DESIGN
//! ======
//! `AppState` is injected into Axum handlers via the `State` extractor. It
//! holds only immutable data: the parsed configuration and the backend
//! transport. No request ever writes to it, so concurrent handlers share
//! nothing mutable.

use std::sync::Arc;

use crate::backend::Backend;
use crate::config::AppConfig;

/// Clone is required by Axum; both fields are Arc-wrapped.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub backend: Arc<dyn Backend>,
}

impl AppState {
    #[must_use]
    pub fn new(config: AppConfig, backend: Arc<dyn Backend>) -> Self {
        Self { config: Arc::new(config), backend }
    }

    /// Name of the session cookie.
    #[must_use]
    pub fn cookie_name(&self) -> &str {
        &self.config.cookie_name
    }
}

// =============================================================================
// TEST HELPERS
// =============================================================================


#[cfg(test)]
#[path = "state_test.rs"]
mod tests;
