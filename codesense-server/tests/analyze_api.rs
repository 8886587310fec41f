use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::response::Json;
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower::ServiceExt;

use codesense_core::GeminiClient;
use codesense_server::{app, AppState};

const BOUNDARY: &str = "----codesense-test-boundary";

fn multipart_body(field_name: &str, filename: &str, content: &[u8]) -> Vec<u8> {
    let mut body = Vec::new();
    body.extend_from_slice(
        format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{field_name}\"; filename=\"{filename}\"\r\nContent-Type: application/octet-stream\r\n\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(content);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());
    body
}

fn analyze_request(field_name: &str, filename: &str, content: &[u8]) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/analyze")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(multipart_body(field_name, filename, content)))
        .unwrap()
}

fn state_without_client() -> Arc<AppState> {
    Arc::new(AppState {
        gemini: None,
        max_snippet_chars: 4000,
    })
}

/// Client pointing at a dead port. Good for paths that must reject before
/// any upstream call: if the handler tried the network the test would still
/// fail fast, not hang.
fn state_with_unreachable_client() -> Arc<AppState> {
    let client = GeminiClient::with_base_url(
        "test-key".to_string(),
        "gemini-2.5-flash".to_string(),
        "http://127.0.0.1:1".to_string(),
    );
    Arc::new(AppState {
        gemini: Some(Arc::new(client)),
        max_snippet_chars: 4000,
    })
}

/// Stand-in for the Gemini API: answers every request with a fixed
/// generateContent envelope wrapping `review_text`.
async fn spawn_stub_gemini(review_text: String) -> String {
    let stub = Router::new().fallback(move || {
        let text = review_text.clone();
        async move {
            Json(json!({
                "candidates": [
                    {
                        "content": { "parts": [ { "text": text } ] },
                        "finishReason": "STOP"
                    }
                ]
            }))
        }
    });

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, stub).await.unwrap();
    });

    format!("http://{}", addr)
}

async fn state_with_stub(review_text: &str) -> Arc<AppState> {
    let base_url = spawn_stub_gemini(review_text.to_string()).await;
    let client = GeminiClient::with_base_url(
        "test-key".to_string(),
        "gemini-2.5-flash".to_string(),
        base_url,
    );
    Arc::new(AppState {
        gemini: Some(Arc::new(client)),
        max_snippet_chars: 4000,
    })
}

async fn response_json(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn health_endpoint_reports_healthy() {
    let response = app(state_without_client())
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = response_json(response).await;
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["service"], "codesense");
}

#[tokio::test]
async fn analyze_without_client_returns_503() {
    let response = app(state_without_client())
        .oneshot(analyze_request("file", "hello.py", b"print(\"hi\")"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    let body = response_json(response).await;
    assert!(body["detail"].as_str().unwrap().contains("Unavailable"));
}

#[tokio::test]
async fn analyze_rejects_unsupported_extension() {
    let response = app(state_with_unreachable_client())
        .oneshot(analyze_request("file", "data.txt", b"just some text"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let detail = response_json(response).await["detail"]
        .as_str()
        .unwrap()
        .to_string();
    assert!(detail.contains(".py"));
    assert!(detail.contains(".c"));
}

#[tokio::test]
async fn analyze_rejects_missing_filename() {
    let response = app(state_with_unreachable_client())
        .oneshot(analyze_request("file", "", b"print(\"hi\")"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn analyze_rejects_missing_file_field() {
    let response = app(state_with_unreachable_client())
        .oneshot(analyze_request("attachment", "hello.py", b"print(\"hi\")"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = response_json(response).await;
    assert!(body["detail"].as_str().unwrap().contains("file"));
}

#[tokio::test]
async fn analyze_returns_review_from_upstream() {
    let review = json!({
        "summary": "Prints a greeting",
        "readability": "Perfectly clear",
        "modularity": "Trivial single statement",
        "bugs": "None found",
        "suggestions": "Consider a main guard",
        "score": 8
    });
    let state = state_with_stub(&review.to_string()).await;

    let response = app(state)
        .oneshot(analyze_request("file", "hello.py", b"print(\"hi\")"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = response_json(response).await;
    assert_eq!(body, review);
}

#[tokio::test]
async fn analyze_maps_malformed_upstream_json_to_500() {
    let state = state_with_stub("this is not json").await;

    let response = app(state)
        .oneshot(analyze_request("file", "hello.py", b"print(\"hi\")"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = response_json(response).await;
    assert!(body["detail"].as_str().unwrap().contains("valid JSON"));
}

#[tokio::test]
async fn analyze_maps_wrong_shape_to_500() {
    // Valid JSON, wrong shape: missing every review field.
    let state = state_with_stub(r#"{"verdict":"looks fine"}"#).await;

    let response = app(state)
        .oneshot(analyze_request("file", "hello.py", b"print(\"hi\")"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn analyze_maps_unreachable_upstream_to_500() {
    let response = app(state_with_unreachable_client())
        .oneshot(analyze_request("file", "hello.py", b"print(\"hi\")"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = response_json(response).await;
    assert!(body["detail"].as_str().unwrap().contains("Gemini"));
}
