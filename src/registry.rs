//! # Subscription registry.
//!
//! Holds the `(handler, filter)` pairs of one [`EventSourcing`](crate::EventSourcing)
//! instance.
//!
//! ## Rules
//! - Grow-only: there is no unsubscribe; a subscription lives as long as the service.
//! - Subscription `(h, f)` matches event `e` iff `f == e`.
//! - [`Registry::matching`] returns a **snapshot** in registration order. The
//!   submitter counts the snapshot and hands it to the dispatch worker, so a
//!   subscription added after submission never receives that event.
//! - Reads and writes are safe from any thread; the lock is never held while a
//!   handler runs.

use std::sync::Arc;

use parking_lot::RwLock;

use crate::event::Event;
use crate::handlers::HandlerRef;

/// One registered `(handler, filter)` pair.
pub struct Subscription<E: Event> {
    handler: HandlerRef<E>,
    filter: E,
}

impl<E: Event> Subscription<E> {
    /// Creates a subscription firing for events equal to `filter`.
    pub fn new(handler: HandlerRef<E>, filter: E) -> Self {
        Self { handler, filter }
    }

    /// Returns true if this subscription fires for `event`.
    #[inline]
    pub fn matches(&self, event: &E) -> bool {
        self.filter == *event
    }

    /// Handler invoked on delivery.
    pub fn handler(&self) -> &HandlerRef<E> {
        &self.handler
    }

    /// Equality template this subscription was registered with.
    pub fn filter(&self) -> &E {
        &self.filter
    }
}

/// Grow-only, concurrently readable set of subscriptions.
pub struct Registry<E: Event> {
    subs: RwLock<Vec<Arc<Subscription<E>>>>,
}

impl<E: Event> Default for Registry<E> {
    fn default() -> Self {
        Self {
            subs: RwLock::new(Vec::new()),
        }
    }
}

impl<E: Event> Registry<E> {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a subscription.
    pub fn add(&self, sub: Subscription<E>) {
        self.subs.write().push(Arc::new(sub));
    }

    /// Returns the subscriptions matching `event`, in registration order.
    pub fn matching(&self, event: &E) -> Vec<Arc<Subscription<E>>> {
        self.subs
            .read()
            .iter()
            .filter(|s| s.matches(event))
            .cloned()
            .collect()
    }

    /// Number of registered subscriptions.
    pub fn len(&self) -> usize {
        self.subs.read().len()
    }
}
