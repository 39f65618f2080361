//! The background task that turns filesystem events into reloads.

use super::debouncer::Debouncer;
use super::event::{ChangeEvent, ChangeHandler, WatchEvent, WatchEventKind};
use super::watcher::{RawEvents, RecursiveWatcher};
use crate::broadcast::{ClientRegistry, Frame};
use crate::error::LiveReloadError;
use std::io;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace};

/// Runs until cancelled, owning the watcher and the debounce timer.
///
/// Dropping the loop drops the `notify` watcher, which releases its OS
/// resources.
pub(crate) struct WatchLoop {
    watcher: RecursiveWatcher,
    events: RawEvents,
    debouncer: Debouncer,
    on_change: ChangeHandler,
    clients: ClientRegistry,
    shutdown: CancellationToken,
}

impl WatchLoop {
    pub(crate) fn new(
        watcher: RecursiveWatcher,
        events: RawEvents,
        debounce: Duration,
        on_change: ChangeHandler,
        clients: ClientRegistry,
        shutdown: CancellationToken,
    ) -> Self {
        Self {
            watcher,
            events,
            debouncer: Debouncer::new(debounce),
            on_change,
            clients,
            shutdown,
        }
    }

    pub(crate) async fn run(mut self) {
        debug!(debounce = ?self.debouncer.delay(), "watch loop started");

        loop {
            tokio::select! {
                biased;

                _ = self.shutdown.cancelled() => break,

                raw = self.events.recv() => match raw {
                    Some(Ok(event)) => self.on_event(&event),
                    Some(Err(error)) => self.on_watch_error(error),
                    None => break,
                },

                settled = self.debouncer.settled(), if self.debouncer.is_pending() => {
                    if let Some(event) = settled {
                        self.settle(event);
                    }
                }
            }
        }

        debug!("watch loop stopped");
    }

    fn on_event(&mut self, raw: &notify::Event) {
        let Some(event) = WatchEvent::from_notify(raw) else {
            return;
        };
        trace!(path = %event.path.display(), kind = ?event.kind, "filesystem event");

        // New directories are registered straight away, whatever the timer.
        // Links are not followed, so a link to a directory is only a change.
        if matches!(event.kind, WatchEventKind::Create | WatchEventKind::Rename) {
            match std::fs::symlink_metadata(&event.path) {
                Ok(metadata) if metadata.is_dir() => self.register_dir(&event),
                Ok(_) => {}
                // Already gone again, typically an editor's temporary file
                Err(err) if err.kind() == io::ErrorKind::NotFound => {}
                Err(err) => {
                    self.fail(event, LiveReloadError::Io(err));
                    return;
                }
            }
        }

        self.debouncer.push(event);
    }

    fn register_dir(&mut self, event: &WatchEvent) {
        if !self.watcher.accepts(&event.path) {
            trace!(path = %event.path.display(), "skipping hidden directory");
            return;
        }

        match self.watcher.add_tree(&event.path) {
            Ok(added) => debug!(path = %event.path.display(), added, "watching new directory"),
            Err(error) => self.fail(event.clone(), error),
        }
    }

    /// Watch-primitive errors skip the debouncer and reach clients at once.
    fn on_watch_error(&mut self, error: notify::Error) {
        let event = WatchEvent::error(error.paths.first().cloned().unwrap_or_default());
        let frame = Frame::Error(error.to_string());

        self.fail(event, LiveReloadError::Watch(error));
        self.clients.broadcast(&frame);
    }

    fn settle(&mut self, event: WatchEvent) {
        (self.on_change)(ChangeEvent::Changed(event));
        let delivered = self.clients.broadcast(&Frame::Reload);
        trace!(delivered, "reload broadcast");
    }

    fn fail(&self, event: WatchEvent, error: LiveReloadError) {
        (self.on_change)(ChangeEvent::Failed { event, error });
    }
}
