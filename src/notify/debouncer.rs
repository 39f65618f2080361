//! Single-timer debouncing of watch events.

use super::event::WatchEvent;
use std::pin::Pin;
use std::time::Duration;
use tokio::time::{Instant, Sleep, sleep};

/// Default delay before a burst of events is considered settled.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(100);

/// Deadline used when the delay does not fit in an `Instant`.
const FAR_FUTURE: Duration = Duration::from_secs(86400 * 365 * 30);

/// Coalesces bursts of events into one settle signal.
///
/// Holds at most one pending timer. Every [`push`](Self::push) reschedules
/// it, so the debouncer only settles once no event has arrived for the full
/// delay. Owned by the watch loop; it is not shared between tasks.
pub(crate) struct Debouncer {
    delay: Duration,
    pending: Option<WatchEvent>,
    timer: Pin<Box<Sleep>>,
}

impl Debouncer {
    /// Panics outside a Tokio runtime with the time driver enabled.
    pub(crate) fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
            timer: Box::pin(sleep(delay)),
        }
    }

    /// Record an event and restart the timer.
    pub(crate) fn push(&mut self, event: WatchEvent) {
        self.pending = Some(event);
        self.timer.as_mut().reset(deadline(self.delay));
    }

    pub(crate) fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Wait for the pending timer to fire and take the last event pushed.
    ///
    /// Cancel safe: dropping the future leaves the timer and the pending
    /// event in place. Only poll this while [`is_pending`](Self::is_pending)
    /// holds; without a pending event it resolves to `None`.
    pub(crate) async fn settled(&mut self) -> Option<WatchEvent> {
        self.timer.as_mut().await;
        self.pending.take()
    }

    pub(crate) fn delay(&self) -> Duration {
        self.delay
    }
}

fn deadline(delay: Duration) -> Instant {
    let now = Instant::now();
    now.checked_add(delay).unwrap_or(now + FAR_FUTURE)
}
