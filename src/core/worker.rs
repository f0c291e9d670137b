//! # Dispatch worker: drains the pending queue and fans out deliveries.
//!
//! One worker runs per [`EventSourcing`] instance. It owns the receiving side of the
//! pending queue and spawns one delivery task per matched subscription.
//!
//! ## Architecture
//! ```text
//! add_event ──► mpsc (unbounded, FIFO) ──► DispatchWorker::run()
//!                                              │
//! loop {                                       │
//!   ├─► select! {                              │
//!   │     token.cancelled() ─► exit            │
//!   │     rx.recv() ─► Dispatch { event, deliveries }
//!   │   }                                      ▼
//!   └─► fan_out(dispatch) ──► tokio::spawn(deliver) ×N
//! }                                 │
//!                                   ├─► handler.handle(&source, Arc<E>)
//!                                   ├─► catch_unwind ─► Err   → HandlerFailed  (warn)
//!                                   │                 └ panic → HandlerPanicked (error)
//!                                   └─► drop(DeliveryGuard) ─► count -= 1
//! ```
//!
//! ## Rules
//! - **Draining / idle**: the worker never spins; it parks in `recv()` while the queue is empty.
//! - **No cross-delivery ordering**: deliveries of one event, and of different events,
//!   run concurrently; a stalled handler only holds back itself.
//! - **Isolation**: handler errors and panics stop at the delivery boundary.
//! - **Exit**: on cancellation the queue is closed and whatever is left in it is dropped;
//!   the guards inside release their counts so waiters are not stranded.
//!
//! **Warning**: `AssertUnwindSafe` is used, which can leave shared state inconsistent
//! if a handler panics while holding a lock.

use std::panic::AssertUnwindSafe;
use std::sync::{Arc, Weak};

use futures::FutureExt;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::core::outstanding::DeliveryGuard;
use crate::core::sourcing::{EventSourcing, Inner};
use crate::event::Event;
use crate::notices::{Bus, Notice, NoticeKind};
use crate::registry::Subscription;

/// One pending queue entry.
///
/// Carries the subscriptions matched (and counted) at submission, each paired with
/// the guard for its unit of outstanding count.
pub(crate) struct Dispatch<E: Event> {
    pub(crate) seq: u64,
    pub(crate) event: Arc<E>,
    pub(crate) deliveries: Vec<(Arc<Subscription<E>>, DeliveryGuard)>,
}

/// Background loop owning the pending queue.
pub(crate) struct DispatchWorker<E: Event> {
    rx: mpsc::UnboundedReceiver<Dispatch<E>>,
    source: Weak<Inner<E>>,
    bus: Bus,
}

impl<E: Event> DispatchWorker<E> {
    pub(crate) fn new(
        rx: mpsc::UnboundedReceiver<Dispatch<E>>,
        source: Weak<Inner<E>>,
        bus: Bus,
    ) -> Self {
        Self { rx, source, bus }
    }

    /// Runs until `token` is cancelled or every submitter handle is gone.
    pub(crate) async fn run(mut self, token: CancellationToken) {
        tracing::info!("dispatch worker started");

        loop {
            tokio::select! {
                biased;
                _ = token.cancelled() => break,
                msg = self.rx.recv() => match msg {
                    Some(dispatch) => self.fan_out(dispatch),
                    None => break,
                },
            }
        }

        self.rx.close();
        let mut dropped = 0usize;
        while let Ok(dispatch) = self.rx.try_recv() {
            dropped += 1;
            tracing::debug!(seq = dispatch.seq, "dropping undispatched event on shutdown");
        }

        tracing::info!(dropped, "dispatch worker stopped");
        self.bus
            .publish(Notice::new(NoticeKind::WorkerStopped).with_deliveries(dropped));
    }

    /// Launches one delivery task per matched subscription.
    fn fan_out(&self, dispatch: Dispatch<E>) {
        let Dispatch {
            seq,
            event,
            deliveries,
        } = dispatch;

        let Some(inner) = self.source.upgrade() else {
            tracing::debug!(seq, "service gone; dropping event");
            return;
        };
        let source = EventSourcing::from_inner(inner);

        let count = deliveries.len();
        tracing::debug!(seq, deliveries = count, event = ?event, "dispatching event");
        self.bus.publish(
            Notice::new(NoticeKind::EventDispatched)
                .with_event_seq(seq)
                .with_deliveries(count),
        );

        for (sub, guard) in deliveries {
            tokio::spawn(deliver(
                source.clone(),
                sub,
                Arc::clone(&event),
                seq,
                self.bus.clone(),
                guard,
            ));
        }
    }
}

/// Runs one handler invocation and contains its failure.
async fn deliver<E: Event>(
    source: EventSourcing<E>,
    sub: Arc<Subscription<E>>,
    event: Arc<E>,
    seq: u64,
    bus: Bus,
    guard: DeliveryGuard,
) {
    let handler = sub.handler();
    let fut = handler.handle(&source, event);

    match AssertUnwindSafe(fut).catch_unwind().await {
        Ok(Ok(())) => {
            tracing::trace!(
                seq,
                handler = handler.name(),
                filter = ?sub.filter(),
                "delivery completed"
            );
        }
        Ok(Err(err)) => {
            let reason = format!("{err:#}");
            tracing::warn!(seq, handler = handler.name(), error = %reason, "handler failed");
            bus.publish(Notice::handler_failed(handler.name(), seq, reason));
        }
        Err(panic_err) => {
            let info = {
                let any = &*panic_err;
                if let Some(msg) = any.downcast_ref::<&'static str>() {
                    (*msg).to_string()
                } else if let Some(msg) = any.downcast_ref::<String>() {
                    msg.clone()
                } else {
                    "unknown panic".to_string()
                }
            };
            tracing::error!(seq, handler = handler.name(), panic = %info, "handler panicked");
            bus.publish(Notice::handler_panicked(handler.name(), seq, info));
        }
    }

    drop(guard);
}
