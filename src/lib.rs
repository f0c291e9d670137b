//! # eventsourcing
//!
//! **eventsourcing** is an in-process asynchronous event dispatch engine.
//!
//! Submitted events are persisted through a pluggable unit of work, then delivered
//! concurrently to every subscription whose filter equals the event. Callers can
//! block (or `.await`) until every accounted delivery has finished.
//!
//! ## Architecture
//! ### Overview
//! ```text
//!   caller                caller               handler (re-entrant)
//!     │ add_event(e)        │ subscribe_to(h, f)     │ add_event(e')
//!     ▼                     ▼                        ▼
//! ┌───────────────────────────────────────────────────────────────────┐
//! │  EventSourcing (service handle)                                   │
//! │  - Registry      (grow-only (handler, filter) pairs)              │
//! │  - Outstanding   (wait group over in-flight deliveries)           │
//! │  - UnitOfWorkFactory (durability gateway)                         │
//! │  - Bus           (broadcast notices)                              │
//! └──────┬────────────────────────────────────────────────────────────┘
//!        │ persist ─► commit ─► enqueue Dispatch { event, matched subs + guards }
//!        ▼
//! ┌───────────────────────────┐
//! │  mpsc (unbounded, FIFO)   │
//! └──────┬────────────────────┘
//!        ▼
//! ┌───────────────────────────┐
//! │  DispatchWorker::run()    │  (one per instance)
//! └──┬──────────┬──────────┬──┘
//!    ▼          ▼          ▼
//! deliver    deliver    deliver      (tokio::spawn, one per matched subscription)
//!    │          │          │
//!    └── handler.handle(&source, Arc<E>) ── Ok / Err / panic ──► count -= 1
//!                                                                   │
//!                                         count == 0 ──► waiters released
//! ```
//!
//! ## Features
//! | Area              | Description                                                  | Key types / traits                         |
//! |-------------------|--------------------------------------------------------------|--------------------------------------------|
//! | **Engine**        | Persist, queue, fan out, wait for completion.                | [`EventSourcing`], [`WaitOutcome`]         |
//! | **Handlers**      | React to delivered events; async or sync closures.           | [`Handle`], [`HandlerFn`], [`SyncFn`]      |
//! | **Durability**    | Transactional hook invoked once per submitted event.         | [`UnitOfWork`], [`UnitOfWorkFactory`]      |
//! | **Notices**       | Typed runtime diagnostics next to `tracing` output.          | [`Notice`], [`NoticeKind`]                 |
//! | **Errors**        | Typed submission and lifecycle errors.                       | [`SubmitError`], [`RuntimeError`]          |
//! | **Configuration** | Shutdown grace, bus capacity, waiter poll period.            | [`Config`]                                 |
//! | **Sync source**   | Inline, non-persistent variant.                              | [`EventSource`]                            |
//!
//! ## Optional features
//! - `logging`: exports a simple built-in `LogWriter` handler _(demo/reference only)_.
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use std::time::Duration;
//! use eventsourcing::{EventSourcing, MemoryJournal, SyncFn};
//!
//! #[derive(Debug, Default, Clone, PartialEq)]
//! enum Ev {
//!     #[default]
//!     Tick,
//!     Named(String),
//! }
//!
//! #[tokio::main(flavor = "multi_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let journal = MemoryJournal::<Ev>::new();
//!     let es = EventSourcing::new(journal.clone());
//!
//!     es.subscribe(SyncFn::arc("on-tick", |_src: &EventSourcing<Ev>, ev: &Ev| {
//!         println!("got {ev:?}");
//!         Ok(())
//!     }));
//!
//!     let receipt = es.add_default()?;
//!     assert_eq!(receipt.deliveries, 1);
//!     es.add_event(Ev::Named("nobody listens".into()))?;
//!
//!     assert!(es.wait_events_processed_async(Some(Duration::from_secs(5))).await.is_drained());
//!     assert_eq!(journal.len(), 2);
//!     es.shutdown().await?;
//!     Ok(())
//! }
//! ```

mod config;
mod core;
mod error;
mod event;
mod handlers;
mod notices;
mod registry;
mod source;
mod store;

// ---- Public re-exports ----

pub use crate::core::{EventSourcing, EventSourcingBuilder, Submitted, WaitOutcome};
pub use config::Config;
pub use error::{RuntimeError, SubmitError, UnitOfWorkError};
pub use event::Event;
pub use handlers::{Handle, HandlerFn, HandlerRef, SyncFn};
pub use notices::{Notice, NoticeKind};
pub use source::EventSource;
pub use store::{MemoryJournal, Op, Record, UnitOfWork, UnitOfWorkFactory};

// Optional: expose a simple built-in logger handler (demo/reference).
#[cfg(feature = "logging")]
pub use handlers::LogWriter;
