//! Messages calls against a local stand-in for the API.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use anthropic_client::{AnthropicClient, AnthropicError};
use axum::{extract::State, http::StatusCode, response::IntoResponse, routing::post, Json, Router};
use serde_json::json;

#[derive(Clone)]
struct Stub {
    hits: Arc<AtomicUsize>,
    failures_before_success: usize,
    failure_status: StatusCode,
}

async fn messages(State(stub): State<Stub>) -> impl IntoResponse {
    let hit = stub.hits.fetch_add(1, Ordering::SeqCst);
    if hit < stub.failures_before_success {
        return (
            stub.failure_status,
            [("retry-after", "0")],
            Json(json!({"type": "error", "error": {"type": "overloaded_error", "message": "Overloaded"}})),
        )
            .into_response();
    }

    Json(json!({
        "id": "msg_test",
        "model": "claude-haiku-4-5-20251001",
        "content": [{"type": "text", "text": "```json\n{\"vendor\": \"Air Canada\"}\n```"}],
        "stop_reason": "end_turn",
        "usage": {"input_tokens": 12, "output_tokens": 8}
    }))
    .into_response()
}

async fn spawn_stub(failures_before_success: usize, failure_status: StatusCode) -> (String, Arc<AtomicUsize>) {
    let hits = Arc::new(AtomicUsize::new(0));
    let stub = Stub {
        hits: hits.clone(),
        failures_before_success,
        failure_status,
    };

    let app = Router::new().route("/v1/messages", post(messages)).with_state(stub);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (format!("http://{}/v1", addr), hits)
}

#[tokio::test]
async fn retries_overload_then_succeeds() {
    let (base_url, hits) = spawn_stub(2, StatusCode::from_u16(529).unwrap()).await;
    let client = AnthropicClient::new("sk-ant-test").with_base_url(base_url);

    let reply = client
        .complete("claude-haiku-4-5-20251001", "Identify the vendor.", "Invoice text", 512)
        .await
        .unwrap();

    assert!(reply.contains("Air Canada"));
    assert_eq!(hits.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn gives_up_after_retry_limit() {
    let (base_url, hits) = spawn_stub(usize::MAX, StatusCode::TOO_MANY_REQUESTS).await;
    let client = AnthropicClient::new("sk-ant-test")
        .with_base_url(base_url)
        .with_max_retries(2);

    let err = client
        .complete("claude-haiku-4-5-20251001", "system", "user", 64)
        .await
        .unwrap_err();

    assert!(matches!(err, AnthropicError::Api { status: 429, .. }));
    assert_eq!(hits.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn client_errors_are_not_retried() {
    let (base_url, hits) = spawn_stub(usize::MAX, StatusCode::BAD_REQUEST).await;
    let client = AnthropicClient::new("sk-ant-test").with_base_url(base_url);

    let err = client
        .complete("claude-haiku-4-5-20251001", "system", "user", 64)
        .await
        .unwrap_err();

    match err {
        AnthropicError::Api { status, message } => {
            assert_eq!(status, 400);
            assert!(message.contains("overloaded_error"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(hits.load(Ordering::SeqCst), 1);
}
