//! Integration tests for the fetcher against a local HTTP server.

use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use pgrapher_client::{FetchError, Fetcher, GrapherClient};
use serde_json::{json, Value};
use std::time::Duration;
use tokio::net::TcpListener;

fn machines_body() -> Value {
    json!([
        { "test": "cpu", "threads": 4, "average_result": 1.2, "hostname": "h1" },
        { "test": "io", "threads": 2, "average_result": 3.0, "hostname": "h1" }
    ])
}

/// Serve a fixed set of routes on an ephemeral port and return its base URL.
async fn spawn_server() -> String {
    let router = Router::new()
        .route("/api/machines", get(|| async { Json(machines_body()) }))
        .route(
            "/api/broken",
            get(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "boom") }),
        )
        .route("/api/created", get(|| async { (StatusCode::CREATED, Json(json!([]))) }))
        .route("/api/text", get(|| async { "this is not json" }))
        .route(
            "/api/slow",
            get(|| async {
                tokio::time::sleep(Duration::from_secs(5)).await;
                Json(json!([]))
            }),
        );

    let listener = TcpListener::bind(("127.0.0.1", 0)).await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    tokio::spawn(async move {
        let _ = axum::serve(listener, router).await;
    });
    format!("http://{addr}")
}

#[tokio::test]
async fn test_ok_returns_exact_body() {
    let base = spawn_server().await;
    let body = Fetcher::new()
        .get_json(&format!("{base}/api/machines"))
        .await
        .expect("fetch");
    assert_eq!(body, machines_body());
}

#[tokio::test]
async fn test_error_status_is_reported() {
    let base = spawn_server().await;
    let fetcher = Fetcher::new();

    let err = fetcher
        .get_json(&format!("{base}/api/broken"))
        .await
        .unwrap_err();
    assert!(matches!(err, FetchError::Status(500)));

    let err = fetcher
        .get_json(&format!("{base}/api/missing"))
        .await
        .unwrap_err();
    assert_eq!(err.status(), Some(404));
}

#[tokio::test]
async fn test_only_200_is_success() {
    let base = spawn_server().await;
    let err = Fetcher::new()
        .get_json(&format!("{base}/api/created"))
        .await
        .unwrap_err();
    assert_eq!(err.status(), Some(201));
}

#[tokio::test]
async fn test_non_json_body_is_decode_error() {
    let base = spawn_server().await;
    let err = Fetcher::new()
        .get_json(&format!("{base}/api/text"))
        .await
        .unwrap_err();
    assert!(matches!(err, FetchError::Decode(_)));
}

#[tokio::test]
async fn test_refused_connection_is_transport_error() {
    let listener = TcpListener::bind(("127.0.0.1", 0)).await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    drop(listener);

    let err = Fetcher::new()
        .get_json(&format!("http://{addr}/api/machines"))
        .await
        .unwrap_err();
    assert!(matches!(err, FetchError::Transport(_)));
    assert_eq!(err.status(), None);
}

#[tokio::test]
async fn test_timeout_is_transport_error() {
    let base = spawn_server().await;
    let fetcher = Fetcher::with_timeout(Duration::from_millis(100)).expect("client");
    let err = fetcher
        .get_json(&format!("{base}/api/slow"))
        .await
        .unwrap_err();
    assert!(matches!(err, FetchError::Transport(_)));
}

#[tokio::test]
async fn test_invalid_url() {
    let err = Fetcher::new().get_json("::nope::").await.unwrap_err();
    assert!(matches!(err, FetchError::InvalidUrl(_)));
}

#[tokio::test]
async fn test_spawned_fetch_completes_once() {
    let base = spawn_server().await;
    let handle = Fetcher::new().spawn(format!("{base}/api/machines"));
    let body = handle.await.expect("join").expect("fetch");
    assert_eq!(body, machines_body());
}

#[tokio::test]
async fn test_client_report_body_and_machines() {
    let base = spawn_server().await;
    let client = GrapherClient::new(&base).expect("client");

    let body = client.fetch_report_body("/api/machines").await.expect("body");
    assert_eq!(body, machines_body());

    let hosts = client.machines().await.expect("machines");
    assert_eq!(hosts, ["h1", "h1"]);
}
