//! Registry of connected clients and lossy fan-out.

use super::frame::Frame;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;
use tracing::trace;

/// Internal registry state.
struct RegistryInner {
    clients: Mutex<HashMap<u64, mpsc::Sender<Frame>>>,
    next_id: AtomicU64,
}

/// Set of connected clients, each with a single-slot channel.
///
/// Broadcasting never blocks: a client whose slot still holds an undelivered
/// frame misses the new one. A missed reload corrects itself on the next
/// change, and a stalled client can never hold up the others.
///
/// # Examples
///
/// ```rust
/// use live_reload::broadcast::{ClientRegistry, Frame};
///
/// # async fn example() {
/// let registry = ClientRegistry::new();
/// let mut client = registry.register();
///
/// assert_eq!(registry.broadcast(&Frame::Reload), 1);
/// assert_eq!(client.recv().await, Some(Frame::Reload));
///
/// // Unregister by dropping the channel
/// drop(client);
/// assert_eq!(registry.client_count(), 0);
/// # }
/// ```
#[derive(Clone)]
pub struct ClientRegistry {
    inner: Arc<RegistryInner>,
}

impl ClientRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RegistryInner {
                clients: Mutex::new(HashMap::new()),
                next_id: AtomicU64::new(0),
            }),
        }
    }

    /// Register a new client and return its channel.
    ///
    /// The client stays registered until the channel is dropped.
    pub fn register(&self) -> ClientChannel {
        let (tx, rx) = mpsc::channel(1);
        let id = self.inner.next_id.fetch_add(1, Ordering::Relaxed);
        self.inner.clients.lock().insert(id, tx);
        trace!(client = id, "client registered");

        ClientChannel {
            id,
            rx,
            registry: Arc::clone(&self.inner),
        }
    }

    /// Remove a client. Equivalent to dropping its channel.
    pub fn unregister(&self, channel: ClientChannel) {
        drop(channel);
    }

    /// Offer `frame` to every registered client without waiting.
    ///
    /// Returns the number of clients that accepted it. Clients whose slot is
    /// still full are skipped for this frame.
    pub fn broadcast(&self, frame: &Frame) -> usize {
        let clients = self.inner.clients.lock();
        let mut delivered = 0;

        for (id, tx) in clients.iter() {
            match tx.try_send(frame.clone()) {
                Ok(()) => delivered += 1,
                Err(TrySendError::Full(_)) => trace!(client = id, "client busy, frame dropped"),
                Err(TrySendError::Closed(_)) => {}
            }
        }

        delivered
    }

    /// Get the number of connected clients.
    pub fn client_count(&self) -> usize {
        self.inner.clients.lock().len()
    }
}

impl Default for ClientRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// The receiving end of one client's registration.
///
/// Dropping it unregisters the client.
pub struct ClientChannel {
    id: u64,
    rx: mpsc::Receiver<Frame>,
    registry: Arc<RegistryInner>,
}

impl ClientChannel {
    /// Identifier of this client within its registry.
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Wait for the next broadcast frame.
    ///
    /// Cancel safe, so it can be used as a `tokio::select!` branch.
    pub async fn recv(&mut self) -> Option<Frame> {
        self.rx.recv().await
    }
}

impl Drop for ClientChannel {
    fn drop(&mut self) {
        self.registry.clients.lock().remove(&self.id);
        trace!(client = self.id, "client unregistered");
    }
}
