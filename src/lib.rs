//! # live-reload
//!
//! Development-time live reload: watch directory trees, debounce bursts of
//! changes and tell connected browsers to reload over Server-Sent-Events.
//!
//! ## Overview
//!
//! `live-reload` combines:
//! - Recursive watching on top of a non-recursive `notify` watcher, including
//!   directories created after start
//! - Debouncing, so one editor save means one reload
//! - A lossy, non-blocking broadcast to every connected client
//! - An `axum` streaming endpoint and a client script to inject into pages
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use live_reload::prelude::*;
//!
//! # async fn example() -> Result<()> {
//! let live = LiveReload::builder()
//!     .endpoint("/live-reload")
//!     .watch("templates")
//!     .on_change(|change| match change {
//!         ChangeEvent::Changed(event) => println!("reloading after {}", event.path.display()),
//!         ChangeEvent::Failed { error, .. } => eprintln!("live reload: {error}"),
//!     })
//!     .start()?;
//!
//! // Serve the stream next to the rest of the application
//! let app: axum::Router = axum::Router::new().merge(live.router());
//!
//! // Pages rendered in development get the client script
//! let html = live.inject("<html><body>Hello</body></html>");
//! # Ok(())
//! # }
//! ```
//!
//! ## Delivery
//!
//! Each client has a single-slot channel. A client that has not consumed its
//! previous frame misses the next one instead of holding up the others;
//! a missed reload corrects itself with the next change.
//!
//! ## Single instance
//!
//! A live reload instance can only be started once per [`InstanceGuard`],
//! the process-wide guard by default. Cancelling does not reset it, so an
//! instance cannot be restarted within the same guard.
//!
//! ## Feature Flags
//!
//! `yaml`, `toml` and `json` (all on by default) select the settings file
//! formats [`LiveReloadSettings::load`] understands.

#![warn(missing_docs, rust_2024_compatibility)]
#![deny(unsafe_code)]

pub mod broadcast;
pub mod core;
pub mod error;
pub mod notify;

mod inject;
mod server;

pub use crate::core::{
    DEFAULT_ENDPOINT, InstanceGuard, LiveReload, LiveReloadBuilder, LiveReloadSettings,
};
pub use crate::error::{LiveReloadError, Result};
pub use crate::inject::inject_script;
pub use crate::notify::{
    ChangeEvent, DEFAULT_DEBOUNCE, WatchEvent, WatchEventKind, change_channel, log_change,
};

/// Convenient re-exports for common usage patterns.
pub mod prelude {
    pub use crate::core::{InstanceGuard, LiveReload, LiveReloadBuilder, LiveReloadSettings};
    pub use crate::error::{LiveReloadError, Result};
    pub use crate::notify::{ChangeEvent, WatchEvent, WatchEventKind, change_channel, log_change};
}
