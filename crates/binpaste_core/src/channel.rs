//! Ordered, synchronous publish/subscribe without replay.

use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Handle returned by [`EventChannel::subscribe`], used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Subscriber<T> = Arc<dyn Fn(&T) + Send + Sync>;

/// Fans a value out to every registered subscriber, in registration order.
///
/// Subscribers run on the publishing thread before [`EventChannel::publish`]
/// returns. A subscriber registered after a publish never sees that value.
pub struct EventChannel<T> {
    next_id: AtomicU64,
    subscribers: Mutex<Vec<(SubscriptionId, Subscriber<T>)>>,
}

impl<T> Default for EventChannel<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for EventChannel<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventChannel")
            .field("subscribers", &self.subscriber_count())
            .finish()
    }
}

impl<T> EventChannel<T> {
    /// Create a channel with no subscribers.
    pub const fn new() -> Self {
        Self {
            next_id: AtomicU64::new(0),
            subscribers: Mutex::new(Vec::new()),
        }
    }

    // Callbacks never run while the lock is held, so poisoning cannot leave
    // the list half-edited.
    fn subscribers(&self) -> MutexGuard<'_, Vec<(SubscriptionId, Subscriber<T>)>> {
        self.subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Register `callback` for every later publish.
    ///
    /// Registrations are not deduplicated; subscribing the same logic twice
    /// delivers each value twice.
    pub fn subscribe<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&T) + Send + Sync + 'static,
    {
        let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.subscribers().push((id, Arc::new(callback)));
        id
    }

    /// Remove a subscriber.
    ///
    /// # Returns
    /// `true` if `id` was still registered.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut subscribers = self.subscribers();
        let before = subscribers.len();
        subscribers.retain(|(existing, _)| *existing != id);
        subscribers.len() != before
    }

    /// Number of currently registered subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.subscribers().len()
    }

    /// Deliver `value` to all current subscribers.
    ///
    /// A panicking subscriber is logged and skipped; delivery continues with
    /// the next one and the panic does not reach the publisher.
    ///
    /// # Returns
    /// The number of subscribers that completed without panicking.
    pub fn publish(&self, value: &T) -> usize {
        // Snapshot so subscribers may (un)subscribe from inside a callback.
        let snapshot: Vec<(SubscriptionId, Subscriber<T>)> = self
            .subscribers()
            .iter()
            .map(|(id, subscriber)| (*id, Arc::clone(subscriber)))
            .collect();

        let mut delivered = 0;
        for (id, subscriber) in snapshot {
            match panic::catch_unwind(AssertUnwindSafe(|| subscriber(value))) {
                Ok(()) => delivered += 1,
                Err(_) => {
                    tracing::error!(subscription = id.0, "event subscriber panicked");
                }
            }
        }
        delivered
    }
}
