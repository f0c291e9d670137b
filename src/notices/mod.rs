//! Runtime notices: types and broadcast bus.
//!
//! This module groups the notice **data model** and the **bus** the runtime uses to
//! report what happens to submitted events, next to its `tracing` output.
//!
//! ## Contents
//! - [`NoticeKind`], [`Notice`] classification and metadata
//! - [`Bus`] thin wrapper over `tokio::sync::broadcast`
//!
//! ## Quick reference
//! - **Publishers**: `EventSourcing::add_event`, the dispatch worker, delivery tasks,
//!   the outstanding tracker (on drain) and `shutdown()`.
//! - **Consumers**: whoever calls [`EventSourcing::notices`](crate::EventSourcing::notices).

mod bus;
mod notice;

pub use bus::Bus;
pub use notice::{Notice, NoticeKind};
