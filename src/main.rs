mod backend;
mod config;
mod error;
mod routes;
mod services;
mod state;

use std::sync::Arc;

#[tokio::main]
async fn main() {
    // A missing .env file is fine; real deployments set the environment directly.
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt::init();

    let config = config::AppConfig::from_env().expect("invalid configuration");
    let backend = backend::HttpBackend::new(&config).expect("backend client init failed");
    tracing::info!(
        backend_url = %config.backend_url,
        cookie_name = %config.cookie_name,
        cookie_secure = config.cookie_secure,
        static_dir = %config.static_dir,
        "gateway configured"
    );

    let port = config.port;
    let state = state::AppState::new(config, Arc::new(backend));

    let app = routes::app(state);
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{port}"))
        .await
        .expect("failed to bind");

    tracing::info!(%port, "reviewsense listening");
    axum::serve(listener, app).await.expect("server failed");
}
