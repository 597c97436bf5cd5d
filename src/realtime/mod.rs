//! Realtime change notifications
//!
//! The hosted backend pushes row-change events to connected clients. This
//! module models those pushes as cancellable subscriptions: dropping a
//! [`Subscription`] closes its channel, which the publishing side observes
//! as the signal to unregister. A subscription that outlives its consumer
//! would otherwise keep writing into state that no longer exists.

use tokio::sync::mpsc;
use uuid::Uuid;

/// Kind of row change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    Insert,
    Update,
    Delete,
}

/// A single row-change notification.
///
/// Delivery is at-least-once. Consumers must treat redundant deliveries as
/// idempotent: re-fetch and replace, never increment or accumulate.
#[derive(Debug, Clone)]
pub struct ChangeEvent {
    pub kind: ChangeKind,
    pub row_id: Uuid,
}

/// Receiving half of a realtime subscription.
pub struct Subscription<T> {
    rx: mpsc::Receiver<T>,
}

impl<T> Subscription<T> {
    /// Create a subscription and its publishing handle.
    pub fn channel(capacity: usize) -> (mpsc::Sender<T>, Subscription<T>) {
        let (tx, rx) = mpsc::channel(capacity);
        (tx, Subscription { rx })
    }

    /// Receive the next event; `None` once the publisher is gone.
    pub async fn recv(&mut self) -> Option<T> {
        self.rx.recv().await
    }
}

impl<T> std::fmt::Debug for Subscription<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription").finish_non_exhaustive()
    }
}
