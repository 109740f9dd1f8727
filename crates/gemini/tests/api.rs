//! Integration tests for `GeminiApi` against an in-process HTTP server.
//!
//! Each test spins up a small axum router on an ephemeral port that plays
//! the part of the `generateContent` endpoint.

use std::sync::{Arc, Mutex};

use assert_matches::assert_matches;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::routing::post;
use axum::{Json, Router};
use blockdag_gemini::{GeminiApi, GeminiApiError, GeminiConfig, InlineData};

/// One request as observed by the fake server.
#[derive(Debug, Clone)]
struct SeenRequest {
    call: String,
    api_key: Option<String>,
    body: serde_json::Value,
}

type Seen = Arc<Mutex<Vec<SeenRequest>>>;

async fn spawn_server(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{addr}/v1beta")
}

/// Router that records every request and replies with `status` + `reply`.
fn recording_router(seen: Seen, status: StatusCode, reply: &'static str) -> Router {
    Router::new()
        .route(
            "/v1beta/models/{call}",
            post(
                move |State(seen): State<Seen>,
                      Path(call): Path<String>,
                      headers: HeaderMap,
                      Json(body): Json<serde_json::Value>| async move {
                    seen.lock().unwrap().push(SeenRequest {
                        call,
                        api_key: headers
                            .get("x-goog-api-key")
                            .and_then(|v| v.to_str().ok())
                            .map(str::to_string),
                        body,
                    });
                    (status, [("content-type", "application/json")], reply).into_response()
                },
            ),
        )
        .with_state(seen)
}

fn config(base_url: String, api_key: Option<&str>) -> GeminiConfig {
    GeminiConfig {
        api_key: api_key.map(str::to_string),
        model: "gemini-2.5-flash".into(),
        base_url,
    }
}

fn jpeg_part() -> InlineData {
    InlineData {
        mime_type: "image/jpeg".into(),
        data: "/9j/4AAQSkZJRg==".into(),
    }
}

// ---------------------------------------------------------------------------
// Test: successful call returns the text unmodified
// ---------------------------------------------------------------------------

#[tokio::test]
async fn success_returns_text_verbatim() {
    let seen = Seen::default();
    let reply = r#"{"candidates":[{"content":{"role":"model","parts":[{"text":"  Oval face,\nwarm brown eyes.  "}]},"finishReason":"STOP"}]}"#;
    let base = spawn_server(recording_router(seen.clone(), StatusCode::OK, reply)).await;
    let api = GeminiApi::new(config(base, Some("test-key")));

    let text = api
        .generate_content("gemini-2.5-flash", "Describe this face.", &jpeg_part())
        .await
        .unwrap();

    assert_eq!(text, "  Oval face,\nwarm brown eyes.  ");

    let seen = seen.lock().unwrap();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].call, "gemini-2.5-flash:generateContent");
    assert_eq!(seen[0].api_key.as_deref(), Some("test-key"));
    assert_eq!(
        seen[0].body["contents"][0]["parts"][0]["inlineData"]["mimeType"],
        "image/jpeg"
    );
    assert_eq!(
        seen[0].body["contents"][0]["parts"][1]["text"],
        "Describe this face."
    );
}

// ---------------------------------------------------------------------------
// Test: missing credential fails before any request is sent
// ---------------------------------------------------------------------------

#[tokio::test]
async fn missing_key_sends_nothing() {
    let seen = Seen::default();
    let base = spawn_server(recording_router(seen.clone(), StatusCode::OK, "{}")).await;
    let api = GeminiApi::new(config(base, None));

    let err = api
        .generate_content("gemini-2.5-flash", "Describe", &jpeg_part())
        .await
        .unwrap_err();

    assert_matches!(err, GeminiApiError::MissingApiKey);
    assert!(seen.lock().unwrap().is_empty());
}

// ---------------------------------------------------------------------------
// Test: non-2xx status maps to ApiError with the body preserved
// ---------------------------------------------------------------------------

#[tokio::test]
async fn quota_error_maps_to_api_error() {
    let seen = Seen::default();
    let reply = r#"{"error":{"code":429,"status":"RESOURCE_EXHAUSTED"}}"#;
    let base = spawn_server(recording_router(seen, StatusCode::TOO_MANY_REQUESTS, reply)).await;
    let api = GeminiApi::new(config(base, Some("k")));

    let err = api
        .generate_content("gemini-2.5-flash", "Describe", &jpeg_part())
        .await
        .unwrap_err();

    assert_matches!(err, GeminiApiError::ApiError { status: 429, ref body } if body.contains("RESOURCE_EXHAUSTED"));
}

// ---------------------------------------------------------------------------
// Test: a response without text candidates is an EmptyResponse
// ---------------------------------------------------------------------------

#[tokio::test]
async fn blocked_prompt_is_empty_response() {
    let seen = Seen::default();
    let reply = r#"{"promptFeedback":{"blockReason":"SAFETY"}}"#;
    let base = spawn_server(recording_router(seen, StatusCode::OK, reply)).await;
    let api = GeminiApi::new(config(base, Some("k")));

    let err = api
        .generate_content("gemini-2.5-flash", "Describe", &jpeg_part())
        .await
        .unwrap_err();

    assert_matches!(err, GeminiApiError::EmptyResponse);
}

// ---------------------------------------------------------------------------
// Test: malformed JSON surfaces as a request error
// ---------------------------------------------------------------------------

#[tokio::test]
async fn malformed_body_is_request_error() {
    let seen = Seen::default();
    let base = spawn_server(recording_router(seen, StatusCode::OK, "not json")).await;
    let api = GeminiApi::new(config(base, Some("k")));

    let err = api
        .generate_content("gemini-2.5-flash", "Describe", &jpeg_part())
        .await
        .unwrap_err();

    assert_matches!(err, GeminiApiError::Request(_));
}

// ---------------------------------------------------------------------------
// Test: connection refused surfaces as a request error
// ---------------------------------------------------------------------------

#[tokio::test]
async fn unreachable_service_is_request_error() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let api = GeminiApi::new(config(format!("http://{addr}/v1beta"), Some("k")));

    let err = api
        .generate_content("gemini-2.5-flash", "Describe", &jpeg_part())
        .await
        .unwrap_err();

    assert_matches!(err, GeminiApiError::Request(_));
}
