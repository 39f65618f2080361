//! Builder for starting a live reload instance.

use crate::broadcast::ClientRegistry;
use crate::core::{InstanceGuard, LiveReload, LiveReloadSettings};
use crate::error::{LiveReloadError, Result};
use crate::inject::render_script;
use crate::notify::{ChangeEvent, ChangeHandler, DEFAULT_DEBOUNCE, RecursiveWatcher, WatchLoop};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::Handle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

/// Builder for starting a [`LiveReload`] instance.
///
/// # Examples
///
/// ```rust,no_run
/// use live_reload::LiveReload;
/// use std::time::Duration;
///
/// # async fn example() -> live_reload::Result<()> {
/// let live = LiveReload::builder()
///     .endpoint("/live-reload")
///     .watch("templates")
///     .watch("static")
///     .debounce(Duration::from_millis(200))
///     .on_change(live_reload::log_change)
///     .start()?;
///
/// let app: axum::Router = axum::Router::new().merge(live.router());
/// # Ok(())
/// # }
/// ```
pub struct LiveReloadBuilder {
    endpoint: String,
    paths: Vec<PathBuf>,
    on_change: Option<ChangeHandler>,
    debounce: Duration,
    include_hidden: bool,
    guard: InstanceGuard,
}

impl LiveReloadBuilder {
    /// Create a new builder with default settings.
    ///
    /// No endpoint is set; starting without one fails.
    pub fn new() -> Self {
        Self {
            endpoint: String::new(),
            paths: Vec::new(),
            on_change: None,
            debounce: DEFAULT_DEBOUNCE,
            include_hidden: false,
            guard: InstanceGuard::process(),
        }
    }

    /// Apply loaded settings.
    ///
    /// Overrides the endpoint, debounce and hidden-entry policy, and adds the
    /// settings' paths to any already added.
    pub fn with_settings(mut self, settings: LiveReloadSettings) -> Self {
        self.endpoint = settings.endpoint.clone();
        self.debounce = settings.debounce();
        self.include_hidden = settings.include_hidden;
        self.paths.extend(settings.paths);
        self
    }

    /// Set the URL path the streaming endpoint is served on, e.g. `/live-reload`.
    ///
    /// The caller routes this path to [`LiveReload::handler`], or merges
    /// [`LiveReload::router`] which does it already.
    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Watch a directory tree.
    ///
    /// Roots are watched recursively, including directories created later.
    pub fn watch(mut self, path: impl Into<PathBuf>) -> Self {
        self.paths.push(path.into());
        self
    }

    /// Watch several directory trees.
    pub fn watch_all<I, P>(mut self, paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        self.paths.extend(paths.into_iter().map(Into::into));
        self
    }

    /// Set the handler told about settled changes and failures.
    ///
    /// Required: failures are only ever reported here. Called from the watch
    /// task, so it should not block for long.
    pub fn on_change<F>(mut self, handler: F) -> Self
    where
        F: Fn(ChangeEvent) + Send + Sync + 'static,
    {
        self.on_change = Some(Arc::new(handler));
        self
    }

    /// Set the quiet period before a burst of changes triggers a reload.
    ///
    /// Defaults to 100ms.
    pub fn debounce(mut self, debounce: Duration) -> Self {
        self.debounce = debounce;
        self
    }

    /// Watch directories whose name starts with `.` as well.
    pub fn include_hidden(mut self, include_hidden: bool) -> Self {
        self.include_hidden = include_hidden;
        self
    }

    /// Start against `guard` instead of the process-wide guard.
    pub fn guard(mut self, guard: InstanceGuard) -> Self {
        self.guard = guard;
        self
    }

    /// Validate, register every root and spawn the watch task.
    ///
    /// Must be called from within a Tokio runtime. On error nothing is left
    /// running and the guard is not marked started.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - An instance was already started against the guard
    /// - The endpoint is empty or does not start with `/`
    /// - No change handler was set
    /// - There is no current Tokio runtime
    /// - The file watcher cannot be created or a root cannot be watched
    ///
    /// # Panics
    ///
    /// Panics if the current runtime was built without the time driver
    /// (see [`tokio::runtime::Builder::enable_time`]). The guard is left
    /// unstarted.
    pub fn start(self) -> Result<LiveReload> {
        let guard = self.guard.clone();
        guard.start_with(|| self.launch())
    }

    fn launch(self) -> Result<LiveReload> {
        if self.endpoint.is_empty() {
            return Err(LiveReloadError::EmptyEndpoint);
        }
        if !self.endpoint.starts_with('/') {
            return Err(LiveReloadError::InvalidEndpoint(self.endpoint));
        }
        let on_change = self.on_change.ok_or(LiveReloadError::MissingChangeHandler)?;
        let runtime = Handle::try_current().map_err(|_| LiveReloadError::NoRuntime)?;

        let (mut watcher, events) = RecursiveWatcher::new(self.include_hidden)?;
        let mut directories = 0;
        for path in &self.paths {
            let root = path.canonicalize().map_err(|source| LiveReloadError::InvalidRoot {
                path: path.clone(),
                source,
            })?;
            directories += watcher.add_tree(&root)?;
        }
        if self.paths.is_empty() {
            debug!("no paths to watch, only reports and cancellation will reach clients");
        }

        let clients = ClientRegistry::new();
        let shutdown = CancellationToken::new();
        let watched = watcher.shared_watched();
        let script = render_script(&self.endpoint);

        let watch_loop = WatchLoop::new(
            watcher,
            events,
            self.debounce,
            Arc::clone(&on_change),
            clients.clone(),
            shutdown.clone(),
        );
        let task = runtime.spawn(watch_loop.run());

        info!(endpoint = %self.endpoint, directories, "live reload started");

        Ok(LiveReload {
            endpoint: self.endpoint,
            script,
            clients,
            shutdown,
            watched,
            on_change,
            task,
        })
    }
}

impl Default for LiveReloadBuilder {
    fn default() -> Self {
        Self::new()
    }
}
