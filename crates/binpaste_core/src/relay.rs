//! Single-slot hand-off between views that do not share any other state.

use std::fmt;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Holds zero or one value. `push` overwrites, `pop` always empties the slot.
pub struct PendingRelay<T> {
    slot: Mutex<Option<T>>,
}

impl<T> Default for PendingRelay<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for PendingRelay<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PendingRelay")
            .field("pending", &self.is_pending())
            .finish()
    }
}

impl<T> PendingRelay<T> {
    /// Create an empty relay.
    pub const fn new() -> Self {
        Self {
            slot: Mutex::new(None),
        }
    }

    // The slot is only touched by `Option::replace`/`take`, which cannot panic
    // midway, so a poisoned lock still guards a coherent value.
    fn slot(&self) -> MutexGuard<'_, Option<T>> {
        self.slot.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Store `value`, discarding any value nobody popped yet.
    pub fn push(&self, value: T) {
        if self.slot().replace(value).is_some() {
            tracing::debug!("relay value overwritten before it was consumed");
        }
    }

    /// Take the stored value, leaving the relay empty.
    ///
    /// # Returns
    /// `None` when nothing was pushed since the last `pop`; callers fall back
    /// to fetching the data themselves.
    pub fn pop(&self) -> Option<T> {
        self.slot().take()
    }

    /// Whether a value is waiting to be popped.
    pub fn is_pending(&self) -> bool {
        self.slot().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::PendingRelay;

    #[test]
    fn pop_returns_pushed_value_once() {
        let relay = PendingRelay::new();
        relay.push("v".to_string());

        assert!(relay.is_pending());
        assert_eq!(relay.pop().as_deref(), Some("v"));
        assert_eq!(relay.pop(), None);
        assert!(!relay.is_pending());
    }

    #[test]
    fn last_push_wins() {
        let relay = PendingRelay::new();
        relay.push(1);
        relay.push(2);

        assert_eq!(relay.pop(), Some(2));
        assert_eq!(relay.pop(), None);
    }

    #[test]
    fn pop_on_empty_relay_is_none() {
        let relay: PendingRelay<u32> = PendingRelay::default();
        assert_eq!(relay.pop(), None);
    }

    #[test]
    fn relay_is_reusable_after_pop() {
        let relay = PendingRelay::new();
        relay.push('a');
        assert_eq!(relay.pop(), Some('a'));
        relay.push('b');
        assert_eq!(relay.pop(), Some('b'));
    }
}
