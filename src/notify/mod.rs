//! Filesystem change notification.
//!
//! Provides recursive watching over a non-recursive file watcher, debouncing
//! of event bursts and the change handler contract.

mod debouncer;
mod event;
mod event_loop;
mod watcher;

pub use debouncer::DEFAULT_DEBOUNCE;
pub use event::{ChangeEvent, WatchEvent, WatchEventKind, change_channel, log_change};

pub(crate) use event::ChangeHandler;
pub(crate) use event_loop::WatchLoop;
pub(crate) use watcher::{RecursiveWatcher, WatchedDirs};
