use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde::Serialize;
use thiserror::Error;
use tracing::error;

use codesense_core::{GeminiError, ALLOWED_EXTENSIONS};

/// Request-level failures for the analyze endpoint.
///
/// Every variant maps to an HTTP status plus a `detail` string; nothing here
/// is retried or recovered internally.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("No file field found in the upload.")]
    MissingFile,

    #[error("Unsupported file type. Must be one of: {}", ALLOWED_EXTENSIONS.join(", "))]
    UnsupportedFile,

    #[error("Malformed multipart upload: {0}")]
    Multipart(#[from] axum::extract::multipart::MultipartError),

    #[error("API Service Unavailable: Gemini client failed to initialize.")]
    ServiceUnavailable,

    #[error("Gemini API Error: Authentication or Service Issue. Details: {0}")]
    Upstream(#[from] GeminiError),

    #[error("An unexpected error occurred. Check if the LLM returned valid JSON.")]
    InvalidResponse(#[source] serde_json::Error),

    #[error("An unexpected error occurred during analysis.")]
    TaskFailed(#[source] tokio::task::JoinError),
}

#[derive(Serialize)]
struct ErrorBody {
    detail: String,
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::MissingFile | ApiError::UnsupportedFile | ApiError::Multipart(_) => {
                StatusCode::BAD_REQUEST
            }
            ApiError::ServiceUnavailable => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Upstream(_) | ApiError::InvalidResponse(_) | ApiError::TaskFailed(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        // The two 500s are distinct failures; log them apart so upstream
        // outages and schema drift can be told apart in the server logs.
        match &self {
            ApiError::Upstream(err) => error!("Gemini API Error: {}", err),
            ApiError::InvalidResponse(err) => {
                error!("Unexpected error during analysis: {}", err)
            }
            ApiError::TaskFailed(err) => error!("Analysis task failed: {}", err),
            _ => {}
        }

        let status = self.status_code();
        let body = Json(ErrorBody {
            detail: self.to_string(),
        });

        (status, body).into_response()
    }
}
