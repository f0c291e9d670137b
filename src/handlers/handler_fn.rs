//! # Function-backed handlers
//!
//! [`HandlerFn`] wraps a closure `F: Fn(EventSourcing<E>, Arc<E>) -> Fut`, producing a
//! fresh future per delivery. [`SyncFn`] wraps a plain synchronous callback
//! `F: Fn(&EventSourcing<E>, &E) -> anyhow::Result<()>`.
//!
//! ## Concurrency semantics
//! - Each delivery calls the closure again; deliveries of the same handler may run
//!   in parallel. Shared state must be synchronized explicitly (`Arc<Atomic*>`, locks).
//! - A [`SyncFn`] runs on the blocking thread pool (`tokio::task::spawn_blocking`), so
//!   it may sleep or do blocking I/O without starving other deliveries. A panic inside
//!   it is resumed in the delivery task and reported like any other handler panic.
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use eventsourcing::{EventSourcing, HandlerFn, HandlerRef, SyncFn};
//!
//! let greet: HandlerRef<String> = HandlerFn::arc(
//!     "greet",
//!     |_src: EventSourcing<String>, ev: Arc<String>| async move {
//!         println!("hello {ev}");
//!         Ok(())
//!     },
//! );
//! assert_eq!(greet.name(), "greet");
//!
//! let count: HandlerRef<String> = SyncFn::arc("count", |_src: &EventSourcing<String>, _ev: &String| Ok(()));
//! assert_eq!(count.name(), "count");
//! ```

use std::borrow::Cow;
use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;

use crate::core::EventSourcing;
use crate::event::Event;
use crate::handlers::Handle;

/// Async-closure-backed handler.
#[derive(Debug)]
pub struct HandlerFn<F> {
    name: Cow<'static, str>,
    f: F,
}

impl<F> HandlerFn<F> {
    /// Creates a new function-backed handler.
    ///
    /// Prefer [`HandlerFn::arc`] when you immediately need a [`HandlerRef`](crate::HandlerRef).
    pub fn new(name: impl Into<Cow<'static, str>>, f: F) -> Self {
        Self {
            name: name.into(),
            f,
        }
    }

    /// Creates the handler and returns it as a shared handle.
    pub fn arc(name: impl Into<Cow<'static, str>>, f: F) -> Arc<Self> {
        Arc::new(Self::new(name, f))
    }
}

#[async_trait]
impl<E, F, Fut> Handle<E> for HandlerFn<F>
where
    E: Event,
    F: Fn(EventSourcing<E>, Arc<E>) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
{
    async fn handle(&self, source: &EventSourcing<E>, event: Arc<E>) -> anyhow::Result<()> {
        (self.f)(source.clone(), event).await
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Synchronous-callback-backed handler.
#[derive(Debug)]
pub struct SyncFn<F> {
    name: Cow<'static, str>,
    f: Arc<F>,
}

impl<F> SyncFn<F> {
    /// Creates a new callback-backed handler.
    pub fn new(name: impl Into<Cow<'static, str>>, f: F) -> Self {
        Self {
            name: name.into(),
            f: Arc::new(f),
        }
    }

    /// Creates the handler and returns it as a shared handle.
    pub fn arc(name: impl Into<Cow<'static, str>>, f: F) -> Arc<Self> {
        Arc::new(Self::new(name, f))
    }
}

#[async_trait]
impl<E, F> Handle<E> for SyncFn<F>
where
    E: Event,
    F: Fn(&EventSourcing<E>, &E) -> anyhow::Result<()> + Send + Sync + 'static,
{
    async fn handle(&self, source: &EventSourcing<E>, event: Arc<E>) -> anyhow::Result<()> {
        let f = Arc::clone(&self.f);
        let source = source.clone();
        let joined = tokio::task::spawn_blocking(move || f(&source, event.as_ref())).await;

        match joined {
            Ok(res) => res,
            Err(err) if err.is_panic() => std::panic::resume_unwind(err.into_panic()),
            Err(err) => Err(anyhow::anyhow!("blocking handler cancelled: {err}")),
        }
    }

    fn name(&self) -> &str {
        &self.name
    }
}
