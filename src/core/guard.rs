//! Single-instance guard for live reload.

use crate::error::{LiveReloadError, Result};
use parking_lot::Mutex;
use std::sync::{Arc, LazyLock};

static PROCESS_GUARD: LazyLock<InstanceGuard> = LazyLock::new(InstanceGuard::new);

/// Ensures at most one live reload instance is started against it.
///
/// Once an instance has started the guard stays started, even after that
/// instance is cancelled: restarting within the same guard is not supported.
/// Builders use [`InstanceGuard::process`] unless another guard is injected,
/// which makes live reload a per-process singleton by default.
///
/// # Examples
///
/// ```rust
/// use live_reload::InstanceGuard;
///
/// let guard = InstanceGuard::new();
/// assert!(!guard.is_started());
///
/// let shared = guard.clone();
/// assert!(!shared.is_started());
/// ```
#[derive(Clone, Default)]
pub struct InstanceGuard {
    started: Arc<Mutex<bool>>,
}

impl InstanceGuard {
    /// Create a fresh guard, independent of the process-wide one.
    pub fn new() -> Self {
        Self::default()
    }

    /// The process-wide guard.
    pub fn process() -> Self {
        PROCESS_GUARD.clone()
    }

    /// Whether an instance has been started against this guard.
    pub fn is_started(&self) -> bool {
        *self.started.lock()
    }

    /// Run `start` and mark the guard started if it succeeds.
    ///
    /// The lock is held for the whole call so concurrent starts cannot both
    /// pass the check. That includes the initial directory walk: a second
    /// start waits for the first to finish registering before it is
    /// rejected. A failing `start` leaves the guard untouched.
    pub(crate) fn start_with<T>(&self, start: impl FnOnce() -> Result<T>) -> Result<T> {
        let mut started = self.started.lock();
        if *started {
            return Err(LiveReloadError::AlreadyRunning);
        }

        let value = start()?;
        *started = true;
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_start_is_rejected() {
        let guard = InstanceGuard::new();
        assert_eq!(guard.start_with(|| Ok(1)).unwrap(), 1);
        assert!(guard.is_started());

        let mut ran = false;
        let second = guard.start_with(|| {
            ran = true;
            Ok(2)
        });
        assert!(matches!(second, Err(LiveReloadError::AlreadyRunning)));
        assert!(!ran);
    }

    #[test]
    fn test_failed_start_leaves_guard_unstarted() {
        let guard = InstanceGuard::new();
        let result: Result<()> = guard.start_with(|| Err(LiveReloadError::EmptyEndpoint));
        assert!(result.is_err());
        assert!(!guard.is_started());

        assert!(guard.start_with(|| Ok(())).is_ok());
    }

    #[test]
    fn test_clones_share_state() {
        let guard = InstanceGuard::new();
        let clone = guard.clone();
        guard.start_with(|| Ok(())).unwrap();
        assert!(clone.is_started());
        assert!(!InstanceGuard::new().is_started());
    }

    #[test]
    fn test_concurrent_starts_admit_one() {
        let guard = InstanceGuard::new();
        let started = std::sync::atomic::AtomicUsize::new(0);

        let results: Vec<bool> = std::thread::scope(|scope| {
            let handles: Vec<_> = (0..8)
                .map(|_| {
                    scope.spawn(|| {
                        guard
                            .start_with(|| {
                                started.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
                                std::thread::sleep(std::time::Duration::from_millis(5));
                                Ok(())
                            })
                            .is_ok()
                    })
                })
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });

        assert_eq!(results.iter().filter(|ok| **ok).count(), 1);
        assert_eq!(started.load(std::sync::atomic::Ordering::SeqCst), 1);
    }

    #[test]
    fn test_process_guard_is_shared() {
        let first = InstanceGuard::process();
        let second = InstanceGuard::process();
        assert!(Arc::ptr_eq(&first.started, &second.started));
    }
}
