//! Watch events and the change handler that receives them.

use crate::error::LiveReloadError;
use notify::EventKind;
use notify::event::ModifyKind;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::mpsc;

/// The kind of filesystem change a [`WatchEvent`] describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WatchEventKind {
    /// A file or directory was created.
    Create,
    /// File contents were written.
    Write,
    /// A file or directory was removed.
    Remove,
    /// A file or directory was renamed or moved.
    Rename,
    /// Only metadata (permissions, timestamps) changed.
    Chmod,
    /// The event stands in for a failure rather than a change.
    Error,
}

/// A single filesystem change, reduced to the path it concerns and its kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WatchEvent {
    /// The affected path. Empty when a failure concerns no particular path.
    pub path: PathBuf,
    /// What happened to the path.
    pub kind: WatchEventKind,
}

impl WatchEvent {
    /// Create a new watch event.
    pub fn new(path: impl Into<PathBuf>, kind: WatchEventKind) -> Self {
        Self {
            path: path.into(),
            kind,
        }
    }

    /// Create an event of kind [`WatchEventKind::Error`] for a failure.
    pub fn error(path: impl Into<PathBuf>) -> Self {
        Self::new(path, WatchEventKind::Error)
    }

    /// Convert a raw `notify` event.
    ///
    /// Returns `None` for access events (open, read, close), which do not
    /// change anything on disk. Renames carry the destination path.
    pub(crate) fn from_notify(event: &notify::Event) -> Option<Self> {
        let kind = match event.kind {
            EventKind::Access(_) => return None,
            EventKind::Create(_) => WatchEventKind::Create,
            EventKind::Remove(_) => WatchEventKind::Remove,
            EventKind::Modify(ModifyKind::Name(_)) => WatchEventKind::Rename,
            EventKind::Modify(ModifyKind::Metadata(_)) => WatchEventKind::Chmod,
            _ => WatchEventKind::Write,
        };
        let path = event.paths.last().cloned().unwrap_or_default();
        Some(Self { path, kind })
    }
}

/// What the change handler is told.
#[derive(Debug)]
pub enum ChangeEvent {
    /// A burst of changes settled. Carries the last event of the burst.
    Changed(WatchEvent),
    /// Something went wrong while watching.
    Failed {
        /// The triggering event, or an [`WatchEventKind::Error`] event when
        /// the failure has no trigger.
        event: WatchEvent,
        /// What went wrong.
        error: LiveReloadError,
    },
}

impl ChangeEvent {
    /// The event this notification concerns.
    pub fn event(&self) -> &WatchEvent {
        match self {
            Self::Changed(event) => event,
            Self::Failed { event, .. } => event,
        }
    }

    /// The error, if this notification reports a failure.
    pub fn error(&self) -> Option<&LiveReloadError> {
        match self {
            Self::Changed(_) => None,
            Self::Failed { error, .. } => Some(error),
        }
    }
}

/// Shared change handler invoked from the watch loop.
pub(crate) type ChangeHandler = Arc<dyn Fn(ChangeEvent) + Send + Sync>;

/// Ready-made change handler that logs every notification through `tracing`.
///
/// # Examples
///
/// ```rust,no_run
/// use live_reload::LiveReload;
///
/// # fn example() -> live_reload::Result<()> {
/// let live = LiveReload::builder()
///     .endpoint("/live-reload")
///     .on_change(live_reload::log_change)
///     .watch("templates")
///     .start()?;
/// # Ok(())
/// # }
/// ```
pub fn log_change(change: ChangeEvent) {
    match change {
        ChangeEvent::Changed(event) => {
            tracing::info!(path = %event.path.display(), kind = ?event.kind, "reloaded");
        }
        ChangeEvent::Failed { event, error } => {
            tracing::error!(path = %event.path.display(), %error, "live reload error");
        }
    }
}

/// Create a change handler that forwards every notification into a channel.
///
/// Use this to consume notifications as a stream instead of a callback.
///
/// # Examples
///
/// ```rust,no_run
/// use live_reload::{ChangeEvent, LiveReload, change_channel};
///
/// # async fn example() -> live_reload::Result<()> {
/// let (handler, mut changes) = change_channel();
/// let live = LiveReload::builder()
///     .endpoint("/live-reload")
///     .on_change(handler)
///     .watch("templates")
///     .start()?;
///
/// while let Some(change) = changes.recv().await {
///     if let ChangeEvent::Changed(event) = change {
///         println!("{} changed", event.path.display());
///     }
/// }
/// # Ok(())
/// # }
/// ```
pub fn change_channel() -> (
    impl Fn(ChangeEvent) + Send + Sync + 'static,
    mpsc::UnboundedReceiver<ChangeEvent>,
) {
    let (tx, rx) = mpsc::unbounded_channel();
    let handler = move |change: ChangeEvent| {
        // Receiver dropped: nobody is listening any more
        let _ = tx.send(change);
    };
    (handler, rx)
}
