//! # Synchronous event source.
//!
//! [`EventSource`] is the in-line sibling of [`EventSourcing`](crate::EventSourcing):
//! no persistence, no worker, no outstanding count. Submitting an event calls every
//! matching callback on the caller's thread before returning.
//!
//! ## Rules
//! - Subscription `(f, filter)` fires for `e` iff `filter == e`, as in the async engine.
//! - Callbacks run in registration order.
//! - The subscription list is snapshotted per submission, so callbacks may subscribe
//!   or submit re-entrantly; a callback added during a submission only sees later ones.
//! - A panicking callback unwinds into the caller.
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use std::sync::atomic::{AtomicUsize, Ordering};
//! use eventsourcing::EventSource;
//!
//! let src = EventSource::<String>::new();
//! let hits = Arc::new(AtomicUsize::new(0));
//! let probe = Arc::clone(&hits);
//! src.subscribe_to(move |_src, _ev| { probe.fetch_add(1, Ordering::SeqCst); }, "ping".to_string());
//!
//! assert_eq!(src.add_event("ping".to_string()), 1);
//! assert_eq!(src.add_event("pong".to_string()), 0);
//! assert_eq!(hits.load(Ordering::SeqCst), 1);
//! ```

use std::sync::Arc;

use parking_lot::RwLock;

use crate::event::Event;

type Callback<E> = Arc<dyn Fn(&EventSource<E>, &E) + Send + Sync>;

struct Entry<E: Event> {
    callback: Callback<E>,
    filter: E,
}

/// Synchronous, in-process event source.
///
/// Clones share the same subscription list.
pub struct EventSource<E: Event> {
    subs: Arc<RwLock<Vec<Arc<Entry<E>>>>>,
}

impl<E: Event> Clone for EventSource<E> {
    fn clone(&self) -> Self {
        Self {
            subs: Arc::clone(&self.subs),
        }
    }
}

impl<E: Event> Default for EventSource<E> {
    fn default() -> Self {
        Self {
            subs: Arc::new(RwLock::new(Vec::new())),
        }
    }
}

impl<E: Event> EventSource<E> {
    /// Creates a source with no subscriptions.
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribes `callback` to the generic event.
    pub fn subscribe<F>(&self, callback: F)
    where
        F: Fn(&EventSource<E>, &E) + Send + Sync + 'static,
    {
        self.subscribe_to(callback, E::default());
    }

    /// Subscribes `callback` to every event equal to `filter`.
    pub fn subscribe_to<F>(&self, callback: F, filter: E)
    where
        F: Fn(&EventSource<E>, &E) + Send + Sync + 'static,
    {
        self.subs.write().push(Arc::new(Entry {
            callback: Arc::new(callback),
            filter,
        }));
    }

    /// Submits the generic event.
    pub fn add_default(&self) -> usize {
        self.add_event(E::default())
    }

    /// Invokes every matching callback inline; returns how many ran.
    pub fn add_event(&self, event: E) -> usize {
        let matched: Vec<Arc<Entry<E>>> = self
            .subs
            .read()
            .iter()
            .filter(|entry| entry.filter == event)
            .cloned()
            .collect();

        for entry in &matched {
            (entry.callback)(self, &event);
        }
        tracing::trace!(invoked = matched.len(), "event raised");
        matched.len()
    }

    /// Number of registered callbacks.
    pub fn len(&self) -> usize {
        self.subs.read().len()
    }

    /// Returns true if nothing is subscribed.
    pub fn is_empty(&self) -> bool {
        self.subs.read().is_empty()
    }
}
