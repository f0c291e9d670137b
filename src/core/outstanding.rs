//! # Outstanding delivery tracker (wait group).
//!
//! Counts (event, subscription) deliveries that were accounted at submission and
//! have not finished yet. It replaces a bare atomic counter plus a manual reset
//! gate: the count and its drain signal live under one mutex, so a waiter can never
//! observe "zero" between a submission's increment and its enqueue.
//!
//! ## Architecture
//! ```text
//! add_event ──► reserve(n) ──► [DeliveryGuard; n] ──► Dispatch ──► delivery task
//!                  │                                                   │
//!                  ▼                                                   ▼ (drop)
//!            count += n                                           count -= 1
//!                                                                      │
//!                                         count == 0 ──► Condvar::notify_all (blocking waiters)
//!                                                    ──► Notify::notify_waiters (async waiters)
//!                                                    ──► Notice::Drained
//! ```
//!
//! ## Rules
//! - Decrements only happen through [`DeliveryGuard`] drops, one per reserved unit,
//!   so the count cannot underflow.
//! - A guard is released whether the delivery succeeded, failed, panicked, was never
//!   dispatched (submission failure, shutdown) or its task was aborted.
//! - Waiters re-check the count every `poll` period in addition to being woken.

use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::{Condvar, Mutex};
use tokio::sync::Notify;

use crate::notices::{Bus, Notice, NoticeKind};

/// Result of a wait on the outstanding count.
///
/// A timeout is not an error; re-query the count when a hard guarantee is needed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitOutcome {
    /// The count was observed at zero.
    Drained,
    /// The timeout elapsed first.
    TimedOut,
}

impl WaitOutcome {
    /// Returns true if the wait ended because the count reached zero.
    #[inline]
    pub fn is_drained(self) -> bool {
        matches!(self, WaitOutcome::Drained)
    }
}

/// Wait-group over in-flight deliveries.
pub(crate) struct Outstanding {
    count: Mutex<usize>,
    drained: Condvar,
    notify: Notify,
    bus: Bus,
}

impl Outstanding {
    pub(crate) fn new(bus: Bus) -> Self {
        Self {
            count: Mutex::new(0),
            drained: Condvar::new(),
            notify: Notify::new(),
            bus,
        }
    }

    /// Current count (snapshot).
    pub(crate) fn get(&self) -> usize {
        *self.count.lock()
    }

    /// Increments the count by `n` in one step and returns one guard per unit.
    pub(crate) fn reserve(self: &Arc<Self>, n: usize) -> Vec<DeliveryGuard> {
        if n == 0 {
            return Vec::new();
        }
        *self.count.lock() += n;
        (0..n)
            .map(|_| DeliveryGuard {
                outstanding: Arc::clone(self),
            })
            .collect()
    }

    fn release_one(&self) {
        let mut count = self.count.lock();
        debug_assert!(*count > 0, "outstanding count underflow");
        *count = count.saturating_sub(1);
        if *count > 0 {
            return;
        }
        self.drained.notify_all();
        drop(count);

        self.notify.notify_waiters();
        tracing::trace!("outstanding deliveries drained");
        self.bus
            .publish(Notice::new(NoticeKind::Drained).with_outstanding(0));
    }

    /// Blocks the calling thread until the count is zero or `timeout` elapses.
    ///
    /// `None` waits forever. Must not be called from an async runtime worker thread.
    pub(crate) fn wait_blocking(&self, timeout: Option<Duration>, poll: Duration) -> WaitOutcome {
        let deadline = timeout.and_then(|t| Instant::now().checked_add(t));
        let mut count = self.count.lock();

        loop {
            if *count == 0 {
                return WaitOutcome::Drained;
            }
            let slice = match deadline {
                Some(deadline) => {
                    let now = Instant::now();
                    if now >= deadline {
                        return WaitOutcome::TimedOut;
                    }
                    (deadline - now).min(poll)
                }
                None => poll,
            };
            self.drained.wait_for(&mut count, slice);
        }
    }

    /// Async counterpart of [`wait_blocking`](Self::wait_blocking).
    pub(crate) async fn wait(&self, timeout: Option<Duration>, poll: Duration) -> WaitOutcome {
        let until_zero = async {
            loop {
                let notified = self.notify.notified();
                tokio::pin!(notified);
                notified.as_mut().enable();

                if self.get() == 0 {
                    return;
                }
                let _ = tokio::time::timeout(poll, notified).await;
            }
        };

        match timeout {
            None => {
                until_zero.await;
                WaitOutcome::Drained
            }
            Some(t) => match tokio::time::timeout(t, until_zero).await {
                Ok(()) => WaitOutcome::Drained,
                Err(_elapsed) if self.get() == 0 => WaitOutcome::Drained,
                Err(_elapsed) => WaitOutcome::TimedOut,
            },
        }
    }
}

/// One reserved unit of outstanding count; releases it on drop.
pub(crate) struct DeliveryGuard {
    outstanding: Arc<Outstanding>,
}

impl Drop for DeliveryGuard {
    fn drop(&mut self) {
        self.outstanding.release_one();
    }
}
