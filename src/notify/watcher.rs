//! Recursive directory registration over a non-recursive file watcher.

use crate::error::{LiveReloadError, Result};
use notify::{RecommendedWatcher, RecursiveMode, Watcher as NotifyWatcher};
use parking_lot::Mutex;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::trace;
use walkdir::{DirEntry, WalkDir};

/// Raw results forwarded from the `notify` callback thread.
pub(crate) type RawEvents = mpsc::UnboundedReceiver<notify::Result<notify::Event>>;

/// Registered directories, readable outside the watch loop.
pub(crate) type WatchedDirs = Arc<Mutex<BTreeSet<PathBuf>>>;

/// Watches whole directory trees with a non-recursive `notify` watcher.
///
/// Every directory below each root is registered on its own, and the watch
/// loop calls [`add_tree`](Self::add_tree) again for directories that show up
/// later. The set of registered directories only ever grows.
///
/// Directories whose name starts with `.` are skipped along with everything
/// beneath them, unless hidden entries were explicitly included. A root is
/// always watched, whatever its name.
pub(crate) struct RecursiveWatcher {
    inner: RecommendedWatcher,
    watched: WatchedDirs,
    include_hidden: bool,
}

impl RecursiveWatcher {
    /// Create the underlying watcher and the channel its events arrive on.
    ///
    /// # Errors
    ///
    /// Returns an error if the platform watcher cannot be created.
    pub(crate) fn new(include_hidden: bool) -> Result<(Self, RawEvents)> {
        let (tx, rx) = mpsc::unbounded_channel();

        let inner = notify::recommended_watcher(move |res: notify::Result<notify::Event>| {
            // Receiver dropped once the watch loop has stopped
            let _ = tx.send(res);
        })?;

        Ok((
            Self {
                inner,
                watched: WatchedDirs::default(),
                include_hidden,
            },
            rx,
        ))
    }

    /// Register `root` and every directory beneath it.
    ///
    /// Symbolic links are never followed, `root` included: a link to a
    /// directory registers nothing. Returns the number of directories registered. Stops at the first
    /// failure; directories registered before it stay registered.
    ///
    /// # Errors
    ///
    /// Returns an error if the tree cannot be walked or a directory cannot be
    /// watched.
    pub(crate) fn add_tree(&mut self, root: &Path) -> Result<usize> {
        let include_hidden = self.include_hidden;
        let walker = WalkDir::new(root)
            .follow_links(false)
            .follow_root_links(false)
            .into_iter()
            .filter_entry(|entry| entry.depth() == 0 || include_hidden || !is_hidden(entry));

        let mut added = 0;
        for entry in walker {
            let entry = entry.map_err(|source| LiveReloadError::Walk {
                path: root.to_path_buf(),
                source,
            })?;

            if !entry.file_type().is_dir() {
                continue;
            }

            let path = entry.into_path();
            self.inner
                .watch(&path, RecursiveMode::NonRecursive)
                .map_err(|source| LiveReloadError::Register {
                    path: path.clone(),
                    source,
                })?;
            trace!(path = %path.display(), "watching directory");

            self.watched.lock().insert(path);
            added += 1;
        }

        Ok(added)
    }

    /// Whether a newly created directory at `path` should be registered.
    pub(crate) fn accepts(&self, path: &Path) -> bool {
        self.include_hidden || !has_hidden_name(path)
    }

    /// Directories registered so far, sorted.
    #[cfg(test)]
    pub(crate) fn watched(&self) -> Vec<PathBuf> {
        self.watched.lock().iter().cloned().collect()
    }

    /// Shared view of the registered directories.
    pub(crate) fn shared_watched(&self) -> WatchedDirs {
        Arc::clone(&self.watched)
    }
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry.file_type().is_dir() && has_hidden_name(entry.path())
}

fn has_hidden_name(path: &Path) -> bool {
    path.file_name()
        .is_some_and(|name| name.as_encoded_bytes().starts_with(b"."))
}
