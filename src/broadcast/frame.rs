//! Messages streamed to connected clients.

use axum::response::sse::Event;
use std::fmt;

/// Body of the frame sent when a client connects.
pub const HELLO: &str = "live server is running";

/// Body of the frame that tells clients to reload.
pub const RELOAD: &str = "reload";

/// A message for connected clients.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Frame {
    /// Sent once per connection, right after it opens.
    Hello,
    /// The watched files changed.
    Reload,
    /// Watching failed; carries the error text.
    Error(String),
}

impl Frame {
    /// The frame's data payload.
    pub fn data(&self) -> String {
        match self {
            Self::Hello => HELLO.to_string(),
            Self::Reload => RELOAD.to_string(),
            Self::Error(message) => format!("live reload error: {message}"),
        }
    }

    /// The frame as a Server-Sent-Events data event.
    pub fn to_event(&self) -> Event {
        Event::default().data(self.data())
    }
}

impl fmt::Display for Frame {
    /// Wire representation, e.g. `data: reload\n\n`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for line in self.data().lines() {
            writeln!(f, "data: {line}")?;
        }
        writeln!(f)
    }
}
