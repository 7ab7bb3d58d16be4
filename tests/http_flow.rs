//! HTTP Flow Tests
//!
//! Drives the full router in-process:
//! - subscribe opens an SSE stream and registers the token
//! - verify pushes `data: verified` and answers identically on hit or miss
//! - status reflects delivery, never a missed publish
//! - dropping the stream (peer disconnect) frees the token
//! - nothing reachable over HTTP reveals which tokens have a subscriber
//! - shutdown ends open streams and frees their tokens

use std::time::Duration;

use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use axum::Router;
use futures_util::StreamExt;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::oneshot;
use tokio::time::timeout;
use tower::ServiceExt;

use tokenrelay::http_server::{HttpServer, HttpServerConfig, VERIFY_ACK};
use tokenrelay::realtime::SubscriptionRegistry;

// =============================================================================
// Test Utilities
// =============================================================================

fn test_app() -> (Router, SubscriptionRegistry) {
    let registry = SubscriptionRegistry::new();
    let app = HttpServer::with_registry(HttpServerConfig::default(), registry.clone()).router();
    (app, registry)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

async fn body_string(body: Body) -> String {
    let bytes = to_bytes(body, usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

// =============================================================================
// Subscribe + Publish
// =============================================================================

#[tokio::test]
async fn test_stream_receives_verified_event() {
    let (app, registry) = test_app();

    let response = app.clone().oneshot(get("/task/stream/abc123")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let content_type = response.headers()[header::CONTENT_TYPE].to_str().unwrap();
    assert!(content_type.starts_with("text/event-stream"));
    assert!(registry.contains("abc123"));

    let verify = app.clone().oneshot(get("/task/verify/abc123")).await.unwrap();
    assert_eq!(verify.status(), StatusCode::OK);
    assert_eq!(body_string(verify.into_body()).await, VERIFY_ACK);

    let mut frames = response.into_body().into_data_stream();
    let frame = timeout(Duration::from_secs(5), frames.next())
        .await
        .expect("no SSE frame within timeout")
        .expect("stream ended")
        .unwrap();
    assert!(String::from_utf8_lossy(&frame).contains("data: verified"));

    drop(frames);
    assert!(!registry.contains("abc123"));
}

#[tokio::test]
async fn test_verify_response_identical_on_miss() {
    let (app, registry) = test_app();

    let response = app.oneshot(get("/task/verify/nobody")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_string(response.into_body()).await, VERIFY_ACK);
    assert_eq!(registry.metrics().snapshot().publishes_missed, 1);
}

#[tokio::test]
async fn test_missing_token_is_bad_request() {
    let (app, registry) = test_app();

    let response = app.oneshot(get("/task/stream/")).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body: serde_json::Value =
        serde_json::from_str(&body_string(response.into_body()).await).unwrap();
    assert_eq!(body["code"], "TOKENRELAY_INVALID_INPUT");
    assert!(body["error"].as_str().unwrap().contains("Missing token"));
    assert!(registry.is_empty());
}

// =============================================================================
// Status
// =============================================================================

#[tokio::test]
async fn test_status_pending_after_missed_publish() {
    let (app, _registry) = test_app();

    app.clone().oneshot(get("/task/verify/lost")).await.unwrap();

    let response = app.oneshot(get("/task/status/lost")).await.unwrap();
    let body: serde_json::Value =
        serde_json::from_str(&body_string(response.into_body()).await).unwrap();
    assert_eq!(body["status"], "pending");
}

#[tokio::test]
async fn test_status_verified_after_delivery() {
    let (app, _registry) = test_app();

    let stream = app.clone().oneshot(get("/task/stream/tok")).await.unwrap();
    app.clone().oneshot(get("/task/verify/tok")).await.unwrap();
    drop(stream);

    let response = app.oneshot(get("/task/status/tok")).await.unwrap();
    let body: serde_json::Value =
        serde_json::from_str(&body_string(response.into_body()).await).unwrap();
    assert_eq!(body["status"], "verified");
}

// =============================================================================
// Configuration and observability
// =============================================================================

#[tokio::test]
async fn test_custom_route_prefix() {
    let registry = SubscriptionRegistry::new();
    let config = HttpServerConfig {
        route_prefix: "/auth".to_string(),
        ..Default::default()
    };
    let app = HttpServer::with_registry(config, registry).router();

    let response = app.clone().oneshot(get("/auth/verify/x")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app.oneshot(get("/task/verify/x")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_health_and_metrics() {
    let (app, registry) = test_app();

    let response = app.clone().oneshot(get("/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_string(response.into_body()).await.contains("ok"));

    let _handle = registry.open("m").unwrap();
    registry.publish("m");

    let response = app.clone().oneshot(get("/observability/metrics")).await.unwrap();
    let metrics: serde_json::Value =
        serde_json::from_str(&body_string(response.into_body()).await).unwrap();
    assert_eq!(metrics["subscriptions_opened"], 1);
    assert_eq!(metrics["publishes_delivered"], 1);

    let response = app.oneshot(get("/observability/subscriptions")).await.unwrap();
    let count: serde_json::Value =
        serde_json::from_str(&body_string(response.into_body()).await).unwrap();
    assert_eq!(count["total"], 1);
}

// =============================================================================
// Subscriber presence stays hidden
// =============================================================================

#[tokio::test]
async fn test_no_endpoint_lists_live_tokens() {
    let (app, registry) = test_app();
    let _handle = registry.open("private-token-7f3a").unwrap();

    for uri in ["/observability/subscriptions", "/observability/metrics", "/health"] {
        let response = app.clone().oneshot(get(uri)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_string(response.into_body()).await;
        assert!(!body.contains("private-token-7f3a"), "{} leaked a token", uri);
    }
}

#[tokio::test]
async fn test_verify_hit_and_miss_are_indistinguishable() {
    let (app, registry) = test_app();
    let _handle = registry.open("present").unwrap();

    let hit = app.clone().oneshot(get("/task/verify/present")).await.unwrap();
    let miss = app.oneshot(get("/task/verify/absent")).await.unwrap();

    assert_eq!(hit.status(), miss.status());
    assert_eq!(
        hit.headers().get(header::CONTENT_TYPE),
        miss.headers().get(header::CONTENT_TYPE)
    );
    assert_eq!(
        body_string(hit.into_body()).await,
        body_string(miss.into_body()).await
    );
}

// =============================================================================
// Shutdown
// =============================================================================

#[tokio::test]
async fn test_shutdown_ends_open_streams() {
    let registry = SubscriptionRegistry::new();
    let server = HttpServer::with_registry(HttpServerConfig::default(), registry.clone());
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let (stop_tx, stop_rx) = oneshot::channel::<()>();
    let serving = tokio::spawn(server.serve(listener, async move {
        let _ = stop_rx.await;
    }));

    let mut client = TcpStream::connect(addr).await.unwrap();
    client
        .write_all(b"GET /task/stream/abc HTTP/1.1\r\nHost: localhost\r\n\r\n")
        .await
        .unwrap();

    let mut head = Vec::new();
    let mut buf = [0u8; 1024];
    while !head.windows(4).any(|w| w == b"\r\n\r\n") {
        let n = timeout(Duration::from_secs(5), client.read(&mut buf))
            .await
            .expect("no response headers within timeout")
            .unwrap();
        assert!(n > 0, "connection closed before headers");
        head.extend_from_slice(&buf[..n]);
    }
    assert!(String::from_utf8_lossy(&head).starts_with("HTTP/1.1 200"));
    assert!(registry.contains("abc"));

    stop_tx.send(()).unwrap();
    timeout(Duration::from_secs(5), serving)
        .await
        .expect("server still draining after shutdown signal")
        .unwrap()
        .unwrap();

    assert!(!registry.contains("abc"));
    assert_eq!(registry.metrics().snapshot().subscriptions_closed, 1);
}
