pub mod analyze;
pub mod config;
pub mod error;

use std::sync::Arc;

use axum::http::StatusCode;
use axum::response::Json;
use axum::routing::get;
use axum::Router;
use serde_json::json;

use codesense_core::GeminiClient;

pub struct AppState {
    /// Left `None` when no API key was configured at startup. Every
    /// /analyze call then returns 503 without attempting network I/O.
    pub gemini: Option<Arc<GeminiClient>>,
    /// Character cap applied to uploaded code before prompting.
    pub max_snippet_chars: usize,
}

pub fn get_service_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

async fn health_check() -> Result<Json<serde_json::Value>, StatusCode> {
    Ok(Json(json!({
        "status": "healthy",
        "service": "codesense",
        "version": get_service_version()
    })))
}

/// Build the application router. Layers (tracing, CORS) are applied in main.
pub fn app(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .merge(analyze::analyze_router(state))
}
