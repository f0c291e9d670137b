//! # EventSourcing: persists, queues and fans out submitted events.
//!
//! [`EventSourcing`] is a cheap-to-clone handle over one engine instance. The
//! instance owns the subscription registry, the pending queue (sending side), the
//! outstanding tracker and the notice bus; the dispatch worker owns the receiving
//! side of the queue.
//!
//! ## Key responsibilities
//! - register `(handler, filter)` subscriptions
//! - persist each submitted event through a fresh unit of work, **then** enqueue it
//! - let callers wait (blocking or async) until every accounted delivery completed
//! - stop the dispatch worker within [`Config::grace`]
//!
//! ## Submission path
//! ```text
//! add_event(e)
//!   ├─► closed?                         ─► Err(Closed)
//!   ├─► registry.matching(&e)           (snapshot, n subscriptions)
//!   ├─► outstanding.reserve(n)          (count += n, before anything is queued)
//!   ├─► persist(factory, &e)            ─► Err: guards dropped (count -= n), Err(Persist)
//!   ├─► tx.send(Dispatch)               ─► Err: guards dropped, Err(Closed)
//!   └─► Ok(Submitted { seq, deliveries: n })
//! ```
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use std::sync::atomic::{AtomicUsize, Ordering};
//! use eventsourcing::{EventSourcing, HandlerFn, MemoryJournal};
//!
//! #[tokio::main(flavor = "multi_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let journal = MemoryJournal::<String>::new();
//!     let es = EventSourcing::new(journal.clone());
//!
//!     let seen = Arc::new(AtomicUsize::new(0));
//!     let probe = Arc::clone(&seen);
//!     es.subscribe_to(
//!         HandlerFn::arc("count", move |_src: EventSourcing<String>, _ev: Arc<String>| {
//!             let probe = Arc::clone(&probe);
//!             async move {
//!                 probe.fetch_add(1, Ordering::SeqCst);
//!                 Ok(())
//!             }
//!         }),
//!         "hello".to_string(),
//!     );
//!
//!     es.add_event("hello".to_string())?;
//!     es.wait_events_processed_async(None).await;
//!
//!     assert_eq!(seen.load(Ordering::SeqCst), 1);
//!     assert_eq!(journal.len(), 1);
//!     es.shutdown().await?;
//!     Ok(())
//! }
//! ```

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::config::Config;
use crate::core::builder::EventSourcingBuilder;
use crate::core::outstanding::{Outstanding, WaitOutcome};
use crate::core::worker::{Dispatch, DispatchWorker};
use crate::error::{RuntimeError, SubmitError};
use crate::event::Event;
use crate::handlers::HandlerRef;
use crate::notices::{Bus, Notice, NoticeKind};
use crate::registry::{Registry, Subscription};
use crate::store::{self, UnitOfWorkFactory};

/// Receipt of an accepted submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Submitted {
    /// Submission sequence number (per instance, starting at 0).
    pub seq: u64,
    /// Number of deliveries accounted for this event.
    pub deliveries: usize,
}

/// Shared state of one engine instance.
pub(crate) struct Inner<E: Event> {
    cfg: Config,
    factory: Box<dyn UnitOfWorkFactory<E>>,
    registry: Registry<E>,
    outstanding: Arc<Outstanding>,
    bus: Bus,
    tx: mpsc::UnboundedSender<Dispatch<E>>,
    token: CancellationToken,
    worker: Mutex<Option<JoinHandle<()>>>,
    next_seq: AtomicU64,
}

impl<E: Event> Drop for Inner<E> {
    fn drop(&mut self) {
        self.token.cancel();
    }
}

/// Handle to an asynchronous event dispatch engine.
///
/// Clones share the same instance. The dispatch worker stops on [`shutdown`](Self::shutdown)
/// or when the last handle is dropped.
///
/// Subscribed handlers are owned by the instance. A handler that captures a clone of
/// its own `EventSourcing` keeps the instance alive until `shutdown()`; use the
/// `source` argument passed on delivery instead.
pub struct EventSourcing<E: Event> {
    inner: Arc<Inner<E>>,
}

impl<E: Event> Clone for EventSourcing<E> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<E: Event> EventSourcing<E> {
    /// Creates an instance with default [`Config`] and starts its dispatch worker.
    ///
    /// # Panics
    /// Panics if called outside of a tokio runtime context.
    pub fn new(factory: impl UnitOfWorkFactory<E>) -> Self {
        Self::builder(factory).build()
    }

    /// Returns a builder for custom configuration and initial subscriptions.
    pub fn builder(factory: impl UnitOfWorkFactory<E>) -> EventSourcingBuilder<E> {
        EventSourcingBuilder::new(Box::new(factory))
    }

    pub(crate) fn start(
        cfg: Config,
        factory: Box<dyn UnitOfWorkFactory<E>>,
        subscriptions: Vec<Subscription<E>>,
    ) -> Self {
        let bus = Bus::new(cfg.bus_capacity_clamped());
        let registry = Registry::new();
        for sub in subscriptions {
            registry.add(sub);
        }

        let (tx, rx) = mpsc::unbounded_channel();
        let token = CancellationToken::new();
        let inner = Arc::new(Inner {
            cfg,
            factory,
            registry,
            outstanding: Arc::new(Outstanding::new(bus.clone())),
            bus: bus.clone(),
            tx,
            token: token.clone(),
            worker: Mutex::new(None),
            next_seq: AtomicU64::new(0),
        });

        let worker = DispatchWorker::new(rx, Arc::downgrade(&inner), bus);
        let handle = tokio::spawn(worker.run(token));
        *inner.worker.lock() = Some(handle);

        Self { inner }
    }

    pub(crate) fn from_inner(inner: Arc<Inner<E>>) -> Self {
        Self { inner }
    }

    /// Subscribes `handler` to the generic event (`E::default()`).
    pub fn subscribe(&self, handler: HandlerRef<E>) {
        self.subscribe_to(handler, E::default());
    }

    /// Subscribes `handler` to every event equal to `filter`.
    ///
    /// Takes effect for events submitted after this call returns.
    pub fn subscribe_to(&self, handler: HandlerRef<E>, filter: E) {
        tracing::debug!(handler = handler.name(), filter = ?filter, "subscribed");
        self.inner.registry.add(Subscription::new(handler, filter));
    }

    /// Submits the generic event (`E::default()`).
    pub fn add_default(&self) -> Result<Submitted, SubmitError> {
        self.add_event(E::default())
    }

    /// Persists `event` and queues it for delivery to every matching subscription.
    ///
    /// Runs synchronously up to the enqueue; never waits for delivery. The outstanding
    /// count already includes this event's deliveries when the call returns `Ok`.
    ///
    /// # Errors
    /// - [`SubmitError::Persist`] if the unit of work failed; nothing was queued.
    /// - [`SubmitError::Closed`] after [`shutdown`](Self::shutdown).
    pub fn add_event(&self, event: E) -> Result<Submitted, SubmitError> {
        let inner = &self.inner;
        if inner.token.is_cancelled() {
            return Err(SubmitError::Closed);
        }

        let targets = inner.registry.matching(&event);
        let count = targets.len();
        let guards = inner.outstanding.reserve(count);

        if let Err(err) = store::persist(inner.factory.as_ref(), &event) {
            tracing::warn!(
                label = err.as_label(),
                error = %err,
                event = ?event,
                "event not persisted; submission rejected"
            );
            return Err(err.into());
        }

        let seq = inner.next_seq.fetch_add(1, Ordering::Relaxed);
        let dispatch = Dispatch {
            seq,
            event: Arc::new(event),
            deliveries: targets.into_iter().zip(guards).collect(),
        };
        if inner.tx.send(dispatch).is_err() {
            return Err(SubmitError::Closed);
        }

        tracing::debug!(seq, deliveries = count, "event persisted and queued");
        if inner.bus.has_receivers() {
            inner.bus.publish(
                Notice::new(NoticeKind::EventPersisted)
                    .with_event_seq(seq)
                    .with_deliveries(count)
                    .with_outstanding(inner.outstanding.get()),
            );
        }
        Ok(Submitted {
            seq,
            deliveries: count,
        })
    }

    /// Number of accounted deliveries that have not completed yet (snapshot).
    pub fn processing_events(&self) -> usize {
        self.inner.outstanding.get()
    }

    /// Blocks the calling thread until no delivery is outstanding or `timeout` elapses.
    ///
    /// `None` waits forever; a handler that never returns makes such a wait never return.
    ///
    /// Do not call this from a thread driving the async runtime: use
    /// [`wait_events_processed_async`](Self::wait_events_processed_async) there.
    pub fn wait_events_processed(&self, timeout: Option<Duration>) -> WaitOutcome {
        self.inner
            .outstanding
            .wait_blocking(timeout, self.inner.cfg.poll_interval_clamped())
    }

    /// Async variant of [`wait_events_processed`](Self::wait_events_processed).
    pub async fn wait_events_processed_async(&self, timeout: Option<Duration>) -> WaitOutcome {
        self.inner
            .outstanding
            .wait(timeout, self.inner.cfg.poll_interval_clamped())
            .await
    }

    /// Subscribes to runtime notices published after this call.
    pub fn notices(&self) -> broadcast::Receiver<Notice> {
        self.inner.bus.subscribe()
    }

    /// Number of registered subscriptions.
    pub fn subscriptions(&self) -> usize {
        self.inner.registry.len()
    }

    /// Active configuration.
    pub fn config(&self) -> &Config {
        &self.inner.cfg
    }

    /// Returns true once shutdown started; further submissions are rejected.
    pub fn is_closed(&self) -> bool {
        self.inner.token.is_cancelled()
    }

    /// Stops the dispatch worker.
    ///
    /// In-flight deliveries are not cancelled and keep their outstanding count until they
    /// finish. Events still queued are dropped and their counts released.
    /// The worker is joined for at most [`Config::grace`]; with a zero grace it is
    /// only signalled. Calling this more than once is a no-op.
    ///
    /// # Errors
    /// [`RuntimeError::GraceExceeded`] if the worker did not stop in time.
    pub async fn shutdown(&self) -> Result<(), RuntimeError> {
        let worker = self.inner.worker.lock().take();
        let Some(handle) = worker else {
            return Ok(());
        };

        let outstanding = self.inner.outstanding.get();
        tracing::info!(outstanding, "shutdown requested");
        self.inner
            .bus
            .publish(Notice::new(NoticeKind::ShutdownRequested).with_outstanding(outstanding));
        self.inner.token.cancel();

        let Some(grace) = self.inner.cfg.shutdown_grace() else {
            return Ok(());
        };
        match tokio::time::timeout(grace, handle).await {
            Ok(Ok(())) => Ok(()),
            Ok(Err(join_err)) => {
                tracing::error!(error = %join_err, "dispatch worker terminated abnormally");
                Ok(())
            }
            Err(_elapsed) => Err(RuntimeError::GraceExceeded { grace }),
        }
    }
}
