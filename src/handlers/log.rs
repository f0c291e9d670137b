//! # LogWriter: delivered event logger
//!
//! A minimal handler that writes every delivered event to `tracing` at `info`.
//! Subscribe it with the generic filter to trace generic events, or once per kind
//! filter you want to see. Useful for demos and debugging.
//!
//! ## Example output
//! ```text
//! INFO eventsourcing::handlers::log: event delivered handler="LogWriter" event=OrderCreated(..)
//! ```

use std::sync::Arc;

use async_trait::async_trait;

use crate::core::EventSourcing;
use crate::event::Event;
use crate::handlers::Handle;

/// Event writer handler.
#[derive(Default)]
pub struct LogWriter;

impl LogWriter {
    /// Construct a new [`LogWriter`].
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl<E: Event> Handle<E> for LogWriter {
    async fn handle(&self, source: &EventSourcing<E>, event: Arc<E>) -> anyhow::Result<()> {
        tracing::info!(
            handler = "LogWriter",
            event = ?event,
            outstanding = source.processing_events(),
            "event delivered"
        );
        Ok(())
    }

    fn name(&self) -> &str {
        "LogWriter"
    }
}
