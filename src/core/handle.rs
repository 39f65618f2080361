//! The handle returned by a successful start.

use crate::broadcast::ClientRegistry;
use crate::core::LiveReloadBuilder;
use crate::error::LiveReloadError;
use crate::inject::inject_script;
use crate::notify::{ChangeEvent, ChangeHandler, WatchEvent, WatchedDirs};
use crate::server::{StreamContext, stream_events};
use axum::Router;
use axum::routing::{MethodRouter, get};
use std::fmt;
use std::path::PathBuf;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// A running live reload instance.
///
/// Owns the streaming endpoint, the client script and the cancellation of
/// the background watch task. The watch task keeps running until
/// [`cancel`](Self::cancel) or [`shutdown`](Self::shutdown) is called;
/// dropping the handle does not stop it.
///
/// # Examples
///
/// ```rust,no_run
/// use live_reload::LiveReload;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let live = LiveReload::builder()
///     .endpoint("/live-reload")
///     .watch("templates")
///     .on_change(live_reload::log_change)
///     .start()?;
///
/// let app: axum::Router = axum::Router::new()
///     .route("/live-reload", live.handler());
///
/// // Splice the client script into rendered pages
/// let page = live.inject("<html><body>Hello</body></html>");
/// assert!(page.contains("EventSource"));
///
/// // Stop watching and end every open stream
/// live.shutdown().await;
/// # Ok(())
/// # }
/// ```
pub struct LiveReload {
    pub(crate) endpoint: String,
    pub(crate) script: String,
    pub(crate) clients: ClientRegistry,
    pub(crate) shutdown: CancellationToken,
    pub(crate) watched: WatchedDirs,
    pub(crate) on_change: ChangeHandler,
    pub(crate) task: JoinHandle<()>,
}

impl LiveReload {
    /// Create a new builder for starting live reload.
    pub fn builder() -> LiveReloadBuilder {
        LiveReloadBuilder::new()
    }

    /// The streaming endpoint handler, to be routed at [`endpoint`](Self::endpoint).
    ///
    /// Every call returns a handler sharing the same clients and cancellation.
    pub fn handler<S>(&self) -> MethodRouter<S>
    where
        S: Clone + Send + Sync + 'static,
    {
        get(stream_events).with_state(StreamContext {
            clients: self.clients.clone(),
            shutdown: self.shutdown.clone(),
        })
    }

    /// A router serving the streaming endpoint at [`endpoint`](Self::endpoint).
    ///
    /// For applications with their own state, route [`handler`](Self::handler)
    /// instead.
    pub fn router(&self) -> Router {
        Router::new().route(&self.endpoint, self.handler())
    }

    /// The URL path the streaming endpoint is meant to be served on.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// The client script, rendered once at start for this endpoint.
    pub fn script(&self) -> &[u8] {
        self.script.as_bytes()
    }

    /// Insert the client script before the closing body tag of `html`.
    ///
    /// See [`inject_script`](crate::inject_script).
    pub fn inject(&self, html: &str) -> String {
        inject_script(html, &self.script)
    }

    /// Report a failure through the change handler.
    ///
    /// For failures outside the watcher, such as a template that no longer
    /// parses when a page is rendered after a reload.
    pub fn report(&self, error: impl fmt::Display) {
        (self.on_change)(ChangeEvent::Failed {
            event: WatchEvent::error(PathBuf::new()),
            error: LiveReloadError::Reported(error.to_string()),
        });
    }

    /// Directories currently registered with the watcher, sorted.
    pub fn watched_dirs(&self) -> Vec<PathBuf> {
        self.watched.lock().iter().cloned().collect()
    }

    /// Number of clients currently streaming.
    pub fn client_count(&self) -> usize {
        self.clients.client_count()
    }

    /// Stop the watch task and end every open stream.
    ///
    /// The guard stays started: a new instance cannot be started against it.
    pub fn cancel(&self) {
        debug!(endpoint = %self.endpoint, "live reload cancelled");
        self.shutdown.cancel();
    }

    /// Whether [`cancel`](Self::cancel) has been called.
    pub fn is_cancelled(&self) -> bool {
        self.shutdown.is_cancelled()
    }

    /// The token cancelling this instance, for tying it to a wider shutdown.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.shutdown.clone()
    }

    /// Cancel and wait for the watch task to exit.
    pub async fn shutdown(self) {
        self.cancel();
        if let Err(err) = self.task.await {
            debug!(%err, "watch task ended abnormally");
        }
    }
}

impl fmt::Debug for LiveReload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LiveReload")
            .field("endpoint", &self.endpoint)
            .field("clients", &self.client_count())
            .field("cancelled", &self.is_cancelled())
            .finish_non_exhaustive()
    }
}
