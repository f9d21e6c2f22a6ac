//! Snapshot subscriptions for the chat and notification services.
//!
//! Services publish their full state through a `tokio::sync::watch` channel.
//! A [`Subscription`] sees the latest snapshot immediately and can wait for
//! the next one. Dropping it unsubscribes; publishers never wait on
//! subscribers.

use tokio::sync::watch;

/// Handle to a stream of state snapshots.
#[derive(Debug)]
pub struct Subscription<T> {
    receiver: watch::Receiver<T>,
}

impl<T: Clone> Subscription<T> {
    pub(crate) fn new(receiver: watch::Receiver<T>) -> Self {
        Self { receiver }
    }

    /// The most recently published snapshot.
    pub fn current(&self) -> T {
        self.receiver.borrow().clone()
    }

    /// Whether a snapshot newer than the last one seen is available.
    pub fn has_changed(&self) -> bool {
        self.receiver.has_changed().unwrap_or(false)
    }

    /// Waits for the next snapshot and returns it.
    ///
    /// Returns `None` once the publishing service has been dropped.
    pub async fn changed(&mut self) -> Option<T> {
        self.receiver.changed().await.ok()?;
        Some(self.receiver.borrow_and_update().clone())
    }
}

/// Creates a publisher holding `initial` as its first snapshot.
pub(crate) fn channel<T>(initial: T) -> watch::Sender<T> {
    let (sender, _) = watch::channel(initial);
    sender
}
