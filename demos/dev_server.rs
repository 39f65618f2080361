//! Example development server that reloads the browser when pages change.
//!
//! This example shows how to:
//! - Watch a directory of pages
//! - Serve the streaming endpoint next to the application routes
//! - Inject the client script into every rendered page
//! - Tie live reload to the server's graceful shutdown
//!
//! Run with: cargo run --example dev_server
//!
//! Then open http://127.0.0.1:3000 and edit demos/pages/index.html.

use axum::Router;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Html;
use axum::routing::get;
use live_reload::prelude::*;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

const PAGES: &str = "demos/pages";

#[derive(Clone)]
struct AppState {
    live: Arc<LiveReload>,
    pages: PathBuf,
}

async fn index(State(state): State<AppState>) -> std::result::Result<Html<String>, StatusCode> {
    match tokio::fs::read_to_string(state.pages.join("index.html")).await {
        Ok(page) => Ok(Html(state.live.inject(&page))),
        Err(err) => {
            state.live.report(format!("index.html: {err}"));
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

#[tokio::main]
async fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let settings = LiveReloadSettings::load(None, Some("LIVE_RELOAD"))?;
    let live = LiveReload::builder()
        .with_settings(settings)
        .watch(PAGES)
        .on_change(log_change)
        .start()?;
    let shutdown = live.cancellation_token();
    let live = Arc::new(live);

    let app = Router::new()
        .route("/", get(index))
        .route(live.endpoint(), live.handler())
        .with_state(AppState {
            live: Arc::clone(&live),
            pages: PathBuf::from(PAGES),
        });

    let listener = tokio::net::TcpListener::bind("127.0.0.1:3000").await?;
    println!("Serving on http://{}", listener.local_addr()?);
    println!("Press Ctrl+C to stop\n");

    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            let _ = tokio::signal::ctrl_c().await;
            // Ends the open streams so the server can drain
            shutdown.cancel();
        })
        .await?;

    println!("Stopped");
    Ok(())
}
