use anyhow::Result;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, warn, Level};

use codesense_core::GeminiClient;
use codesense_server::config::Config;
use codesense_server::{app, AppState};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt().with_max_level(Level::INFO).init();

    info!("Starting CodeSense review service");

    let config =
        Config::from_env().expect("Failed to load configuration from environment variables");

    let gemini = match config.gemini_api_key.clone() {
        Some(api_key) => Some(Arc::new(GeminiClient::new(api_key, config.model.clone()))),
        None => {
            warn!("GEMINI_API_KEY is not set; /analyze will return 503 until the service is restarted with a key");
            None
        }
    };

    let app_state = Arc::new(AppState {
        gemini,
        max_snippet_chars: config.max_snippet_chars,
    });

    // The frontend is served from a different origin, so CORS stays open.
    let app = app(app_state).layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(CorsLayer::permissive()),
    );

    let listener = TcpListener::bind(format!("0.0.0.0:{}", config.port)).await?;
    info!("Server listening on port {}", config.port);

    axum::serve(listener, app).await?;

    Ok(())
}
