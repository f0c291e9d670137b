//! # Diagnostic notices emitted by the event sourcing runtime.
//!
//! The [`NoticeKind`] enum classifies what the runtime reports about itself:
//! - **Submission**: an event was persisted and queued
//! - **Dispatch**: the worker fanned an event out, a delivery failed or panicked
//! - **Drain / lifecycle**: the outstanding count reached zero, shutdown, worker exit
//!
//! The [`Notice`] struct carries the metadata: timestamps, the submission sequence
//! of the event concerned, handler name, reason, outstanding count.
//!
//! ## Ordering guarantees
//! Each notice has a globally unique sequence number (`seq`) that increases
//! monotonically. Delivery tasks run concurrently, so notices may be observed out
//! of order; use `seq` to restore it.
//!
//! ## Example
//! ```rust
//! use eventsourcing::{Notice, NoticeKind};
//!
//! let n = Notice::new(NoticeKind::HandlerFailed)
//!     .with_handler("audit")
//!     .with_reason("boom")
//!     .with_event_seq(7);
//!
//! assert_eq!(n.kind, NoticeKind::HandlerFailed);
//! assert_eq!(n.handler.as_deref(), Some("audit"));
//! assert_eq!(n.event_seq, Some(7));
//! ```

use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::sync::Arc;
use std::time::SystemTime;

/// Global sequence counter for notice ordering.
static NOTICE_SEQ: AtomicU64 = AtomicU64::new(0);

/// Classification of runtime notices.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    // === Submission ===
    /// Event committed by its unit of work and queued for dispatch.
    ///
    /// Sets:
    /// - `event_seq`: submission sequence of the event
    /// - `outstanding`: count right after the submission was accounted
    EventPersisted,

    // === Dispatch ===
    /// Worker picked the event up and launched its deliveries.
    ///
    /// Sets:
    /// - `event_seq`: submission sequence of the event
    /// - `deliveries`: number of delivery tasks launched
    EventDispatched,

    /// A handler returned an error. The delivery still counts as complete.
    ///
    /// Sets:
    /// - `handler`: handler name
    /// - `reason`: error message (with causes)
    /// - `event_seq`: submission sequence of the event
    HandlerFailed,

    /// A handler panicked. The delivery still counts as complete.
    ///
    /// Sets:
    /// - `handler`: handler name
    /// - `reason`: panic payload message
    /// - `event_seq`: submission sequence of the event
    HandlerPanicked,

    // === Drain / lifecycle ===
    /// Outstanding count dropped to zero.
    Drained,

    /// `shutdown()` was called.
    ///
    /// Sets:
    /// - `outstanding`: deliveries still in flight at that moment
    ShutdownRequested,

    /// Dispatch worker left its loop.
    ///
    /// Sets:
    /// - `deliveries`: events dropped from the queue without dispatch
    WorkerStopped,
}

/// Runtime notice with optional metadata.
///
/// - `seq`: monotonic global sequence for ordering
/// - `at`: wall-clock timestamp (for logs)
/// - other optional fields are set depending on the [`NoticeKind`]
#[derive(Clone, Debug)]
pub struct Notice {
    /// Globally unique, monotonically increasing sequence number.
    pub seq: u64,
    /// Wall-clock timestamp.
    pub at: SystemTime,
    /// Notice classification.
    pub kind: NoticeKind,

    /// Submission sequence of the event this notice is about.
    pub event_seq: Option<u64>,
    /// Name of the handler, if applicable.
    pub handler: Option<Arc<str>>,
    /// Human-readable reason (errors, panic payloads).
    pub reason: Option<Arc<str>>,
    /// Outstanding delivery count observed when the notice was built.
    pub outstanding: Option<usize>,
    /// Number of deliveries (or dropped events for `WorkerStopped`).
    pub deliveries: Option<usize>,
}

impl Notice {
    /// Creates a notice of the given kind with current timestamp and next sequence number.
    pub fn new(kind: NoticeKind) -> Self {
        Self {
            seq: NOTICE_SEQ.fetch_add(1, AtomicOrdering::Relaxed),
            at: SystemTime::now(),
            kind,
            event_seq: None,
            handler: None,
            reason: None,
            outstanding: None,
            deliveries: None,
        }
    }

    /// Attaches the submission sequence of the event.
    #[inline]
    pub fn with_event_seq(mut self, seq: u64) -> Self {
        self.event_seq = Some(seq);
        self
    }

    /// Attaches a handler name.
    #[inline]
    pub fn with_handler(mut self, handler: impl Into<Arc<str>>) -> Self {
        self.handler = Some(handler.into());
        self
    }

    /// Attaches a human-readable reason.
    #[inline]
    pub fn with_reason(mut self, reason: impl Into<Arc<str>>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    /// Attaches the observed outstanding count.
    #[inline]
    pub fn with_outstanding(mut self, n: usize) -> Self {
        self.outstanding = Some(n);
        self
    }

    /// Attaches a delivery count.
    #[inline]
    pub fn with_deliveries(mut self, n: usize) -> Self {
        self.deliveries = Some(n);
        self
    }

    /// Creates a handler failure notice.
    #[inline]
    pub fn handler_failed(handler: &str, event_seq: u64, reason: String) -> Self {
        Notice::new(NoticeKind::HandlerFailed)
            .with_handler(handler)
            .with_event_seq(event_seq)
            .with_reason(reason)
    }

    /// Creates a handler panic notice.
    #[inline]
    pub fn handler_panicked(handler: &str, event_seq: u64, info: String) -> Self {
        Notice::new(NoticeKind::HandlerPanicked)
            .with_handler(handler)
            .with_event_seq(event_seq)
            .with_reason(info)
    }

    /// Returns true for `HandlerFailed` and `HandlerPanicked`.
    #[inline]
    pub fn is_delivery_failure(&self) -> bool {
        matches!(
            self.kind,
            NoticeKind::HandlerFailed | NoticeKind::HandlerPanicked
        )
    }
}
