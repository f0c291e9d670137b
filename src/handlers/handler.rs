//! # Core handler trait
//!
//! `Handle` is the extension point for reacting to submitted events. Every
//! matching subscription gets its own delivery task, so a handler never blocks
//! the submitter, the dispatch worker or other handlers.
//!
//! ## Contract
//! - Implementations may be slow (I/O, retries); they only hold back their own
//!   delivery and keep one unit of outstanding count open until they return.
//! - The count is released only after the returned future **completes**, whether
//!   with `Ok`, `Err` or a panic.
//! - `source` is the service that dispatched the event; handlers may subscribe or
//!   submit follow-up events through it.
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use async_trait::async_trait;
//! use eventsourcing::{EventSourcing, Handle};
//!
//! struct Audit;
//!
//! #[async_trait]
//! impl Handle<String> for Audit {
//!     async fn handle(&self, _source: &EventSourcing<String>, event: Arc<String>) -> anyhow::Result<()> {
//!         anyhow::ensure!(!event.is_empty(), "empty audit line");
//!         Ok(())
//!     }
//!
//!     fn name(&self) -> &str { "audit" }
//! }
//! ```

use std::sync::Arc;

use async_trait::async_trait;

use crate::core::EventSourcing;
use crate::event::Event;

/// Contract for event handlers.
///
/// Called from a delivery task spawned per (subscription, event) pair.
/// Implementations should avoid blocking the async runtime.
#[async_trait]
pub trait Handle<E: Event>: Send + Sync + 'static {
    /// Handles one delivered event.
    ///
    /// # Parameters
    /// - `source`: the dispatching service
    /// - `event`: the submitted event; every matching handler receives the same `Arc`
    async fn handle(&self, source: &EventSourcing<E>, event: Arc<E>) -> anyhow::Result<()>;

    /// Human-readable name (for logs and notices).
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }
}

/// Shared handle to a handler.
pub type HandlerRef<E> = Arc<dyn Handle<E>>;
