//! Error types for live-reload.

use std::path::PathBuf;

/// Result type alias for live-reload operations.
pub type Result<T> = std::result::Result<T, LiveReloadError>;

/// Errors that can occur while starting or running live reload.
#[derive(Debug, thiserror::Error)]
pub enum LiveReloadError {
    /// A live reload instance was already started against the same guard.
    #[error("live reload is already running")]
    AlreadyRunning,

    /// The streaming endpoint was empty.
    #[error("live reload endpoint can not be empty")]
    EmptyEndpoint,

    /// The streaming endpoint is not an absolute URL path.
    #[error("live reload endpoint must start with '/': {0}")]
    InvalidEndpoint(String),

    /// No change handler was supplied.
    #[error(
        "a change handler must be set in order to propagate errors, \
         live_reload::log_change can be used as a default"
    )]
    MissingChangeHandler,

    /// `start` was called outside of a Tokio runtime.
    #[error("live reload must be started from within a Tokio runtime")]
    NoRuntime,

    /// The underlying file watcher failed to initialize or reported an error.
    #[error("{0}")]
    Watch(#[from] notify::Error),

    /// A root passed to watch could not be resolved.
    #[error("failed to resolve watch root {}: {source}", path.display())]
    InvalidRoot {
        /// The root as it was given
        path: PathBuf,
        /// The underlying IO error
        #[source]
        source: std::io::Error,
    },

    /// Walking a directory tree during setup failed.
    #[error("failed to walk {}: {source}", path.display())]
    Walk {
        /// The path being walked when the failure occurred
        path: PathBuf,
        /// The underlying walk error
        #[source]
        source: walkdir::Error,
    },

    /// A directory could not be registered with the file watcher.
    #[error("failed to watch {}: {source}", path.display())]
    Register {
        /// The directory that could not be watched
        path: PathBuf,
        /// The underlying watcher error
        #[source]
        source: notify::Error,
    },

    /// IO error occurred.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to load live reload settings.
    #[error("failed to load live reload settings: {0}")]
    Settings(String),

    /// An error reported by the caller through [`LiveReload::report`](crate::LiveReload::report).
    #[error("{0}")]
    Reported(String),
}

impl From<config::ConfigError> for LiveReloadError {
    fn from(err: config::ConfigError) -> Self {
        LiveReloadError::Settings(err.to_string())
    }
}
