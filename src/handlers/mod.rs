//! # Event handlers.
//!
//! This module provides the [`Handle`] trait and its function-backed adapters.
//!
//! ## Architecture
//! ```text
//! Dispatch worker ── per matching subscription ──► tokio::spawn(delivery)
//!                                                     │
//!                                                     ├──► Handle::handle(&source, Arc<E>)
//!                                                     │         │
//!                                                     │    ┌────┴─────┬──────────┬─────────┐
//!                                                     │    ▼          ▼          ▼         ▼
//!                                                     │  HandlerFn   SyncFn   LogWriter  custom
//!                                                     │
//!                                                     └──► Ok / Err / panic ──► count released
//! ```
//!
//! ## Handler types
//! - [`HandlerFn`] async closure, one future per delivery
//! - [`SyncFn`] plain callback, runs on the blocking thread pool
//! - `LogWriter` (feature `logging`) traces every delivered event

mod handler;
mod handler_fn;
#[cfg(feature = "logging")]
mod log;

pub use handler::{Handle, HandlerRef};
pub use handler_fn::{HandlerFn, SyncFn};
#[cfg(feature = "logging")]
pub use log::LogWriter;
