use axum::body::Bytes;
use axum::extract::{Multipart, State};
use axum::response::Json;
use axum::routing::post;
use axum::Router;
use std::sync::Arc;
use tracing::info;

use codesense_core::{
    has_allowed_extension, parse_review, prepare_snippet, system_prompt, user_prompt, CodeReview,
};

use crate::error::ApiError;
use crate::AppState;

pub fn analyze_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/analyze", post(analyze_handler))
        .with_state(state)
}

/// Accept a code file upload and return a structured review of it.
///
/// One stateless transaction per call: validate the upload, build a bounded
/// prompt, make a single Gemini call, validate the returned JSON. Each
/// failure mode maps to an explicit status via `ApiError`.
pub async fn analyze_handler(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<Json<CodeReview>, ApiError> {
    let Some(gemini) = state.gemini.as_ref() else {
        return Err(ApiError::ServiceUnavailable);
    };

    let (filename, bytes) = read_file_field(&mut multipart).await?;

    let snippet = prepare_snippet(&bytes, state.max_snippet_chars);

    info!(
        "Analyzing {} ({} bytes uploaded, {} chars after truncation)",
        filename,
        bytes.len(),
        snippet.chars().count()
    );

    // Detached task: a client disconnect drops this handler's future but
    // must not abort the in-flight upstream call.
    let task = {
        let gemini = Arc::clone(gemini);
        let system = system_prompt();
        let user = user_prompt(&filename, &snippet);
        tokio::spawn(async move { gemini.generate_review(&system, &user).await })
    };

    let raw = task.await.map_err(ApiError::TaskFailed)??;

    let review = parse_review(&raw).map_err(ApiError::InvalidResponse)?;

    Ok(Json(review))
}

/// Pull the `file` field out of the multipart body.
///
/// A missing or misnamed field is a 400; so is a filename outside the
/// allow-list. Both reject before any upstream call is made.
async fn read_file_field(multipart: &mut Multipart) -> Result<(String, Bytes), ApiError> {
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some("file") {
            continue;
        }

        let filename = field.file_name().unwrap_or_default().to_string();
        if !has_allowed_extension(&filename) {
            return Err(ApiError::UnsupportedFile);
        }

        let bytes = field.bytes().await?;
        return Ok((filename, bytes));
    }

    Err(ApiError::MissingFile)
}
