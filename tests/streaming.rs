//! Integration tests for the Server-Sent-Events endpoint.

use axum::body::{Body, BodyDataStream};
use axum::http::{Request, StatusCode, header};
use futures::StreamExt;
use live_reload::prelude::*;
use std::fs;
use std::path::Path;
use std::time::Duration;
use tempfile::TempDir;
use tokio::time::{sleep, timeout};
use tokio_test::assert_ok;
use tower::ServiceExt;

fn start(root: &Path) -> LiveReload {
    LiveReload::builder()
        .guard(InstanceGuard::new())
        .endpoint("/live-reload")
        .watch(root)
        .on_change(|_| {})
        .start()
        .unwrap()
}

async fn connect(live: &LiveReload) -> axum::response::Response {
    let request = Request::builder()
        .uri("/live-reload")
        .body(Body::empty())
        .unwrap();
    live.router().oneshot(request).await.unwrap()
}

async fn next_frame(body: &mut BodyDataStream) -> Option<String> {
    let chunk = timeout(Duration::from_secs(3), body.next())
        .await
        .expect("timed out waiting for a frame")?;
    Some(String::from_utf8(assert_ok!(chunk).to_vec()).unwrap())
}

#[tokio::test]
async fn test_stream_headers_and_hello() {
    let temp_dir = TempDir::new().unwrap();
    let live = start(temp_dir.path());

    let response = connect(&live).await;
    assert_eq!(response.status(), StatusCode::OK);

    let headers = response.headers();
    assert_eq!(headers[header::CONTENT_TYPE], "text/event-stream");
    assert_eq!(headers[header::CACHE_CONTROL], "no-cache");
    assert_eq!(headers[header::CONNECTION], "keep-alive");

    let mut body = response.into_body().into_data_stream();
    assert_eq!(
        next_frame(&mut body).await.as_deref(),
        Some("data: live server is running\n\n")
    );
    assert_eq!(live.client_count(), 1);

    drop(body);
    assert_eq!(live.client_count(), 0);

    live.shutdown().await;
}

#[tokio::test]
async fn test_edit_sends_one_reload_frame() {
    let temp_dir = TempDir::new().unwrap();
    let page = temp_dir.path().join("index.html");
    fs::write(&page, "v0").unwrap();
    let live = start(temp_dir.path());

    let mut body = connect(&live).await.into_body().into_data_stream();
    next_frame(&mut body).await;

    for i in 1..=5 {
        fs::write(&page, format!("v{i}")).unwrap();
        sleep(Duration::from_millis(10)).await;
    }

    assert_eq!(next_frame(&mut body).await.as_deref(), Some("data: reload\n\n"));
    assert!(
        timeout(Duration::from_millis(400), body.next()).await.is_err(),
        "burst should produce a single reload"
    );

    live.shutdown().await;
}

#[tokio::test]
async fn test_stalled_client_does_not_block_others() {
    let temp_dir = TempDir::new().unwrap();
    let page = temp_dir.path().join("index.html");
    fs::write(&page, "v0").unwrap();
    let live = start(temp_dir.path());

    // Never read past the hello frame
    let stalled = connect(&live).await;
    let mut fast = connect(&live).await.into_body().into_data_stream();
    assert_eq!(live.client_count(), 2);
    next_frame(&mut fast).await;

    fs::write(&page, "v1").unwrap();
    assert_eq!(next_frame(&mut fast).await.as_deref(), Some("data: reload\n\n"));

    sleep(Duration::from_millis(300)).await;

    fs::write(&page, "v2").unwrap();
    assert_eq!(next_frame(&mut fast).await.as_deref(), Some("data: reload\n\n"));

    drop(stalled);
    live.shutdown().await;
}

#[tokio::test]
async fn test_cancel_ends_every_stream() {
    let temp_dir = TempDir::new().unwrap();
    let live = start(temp_dir.path());

    let mut first = connect(&live).await.into_body().into_data_stream();
    let mut second = connect(&live).await.into_body().into_data_stream();
    next_frame(&mut first).await;
    next_frame(&mut second).await;

    live.cancel();

    assert_eq!(next_frame(&mut first).await, None);
    assert_eq!(next_frame(&mut second).await, None);
    assert_eq!(live.client_count(), 0);

    live.shutdown().await;
}

#[tokio::test]
async fn test_handler_can_be_routed_anywhere() {
    let temp_dir = TempDir::new().unwrap();
    let live = start(temp_dir.path());

    let app: axum::Router = axum::Router::new().route("/__dev/events", live.handler());
    let request = Request::builder()
        .uri("/__dev/events")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    let mut body = response.into_body().into_data_stream();
    assert_eq!(
        next_frame(&mut body).await.as_deref(),
        Some("data: live server is running\n\n")
    );

    live.shutdown().await;
}

#[tokio::test]
async fn test_script_is_stable() {
    let temp_dir = TempDir::new().unwrap();
    let live = start(temp_dir.path());

    let script = live.script().to_vec();
    assert!(!script.is_empty());
    for _ in 0..3 {
        assert_eq!(live.script(), script.as_slice());
    }

    let page = live.inject("<html><body><h1>Home</h1></body></html>");
    let script = String::from_utf8(script).unwrap();
    assert_eq!(
        page,
        format!("<html><body><h1>Home</h1>{script}</body></html>")
    );

    live.shutdown().await;
}
