//! Error types used by the event sourcing runtime and its durability hook.
//!
//! This module defines three error enums:
//!
//! - [`UnitOfWorkError`]: errors raised by a unit of work or its factory.
//! - [`SubmitError`]: errors returned to the caller of `add_event`.
//! - [`RuntimeError`]: errors raised by the runtime itself (shutdown).
//!
//! All of them provide helper methods (`as_label`, `as_message`) for logging.
//! Handler failures are **not** represented here: handlers return `anyhow::Result`
//! and their errors are contained at the delivery boundary.

use std::time::Duration;
use thiserror::Error;

/// # Errors produced by the durability hook.
///
/// Returned by [`UnitOfWorkFactory::create`](crate::UnitOfWorkFactory::create) and
/// by the [`UnitOfWork`](crate::UnitOfWork) operations.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UnitOfWorkError {
    /// The factory could not produce a unit of work (backend down, pool exhausted).
    #[error("unit of work unavailable: {reason}")]
    Unavailable {
        /// Backend-specific detail.
        reason: String,
    },

    /// The record was refused by the unit of work (validation, conflict).
    #[error("record rejected: {reason}")]
    Rejected {
        /// Backend-specific detail.
        reason: String,
    },

    /// The transaction could not be committed.
    #[error("commit failed: {reason}")]
    Commit {
        /// Backend-specific detail.
        reason: String,
    },

    /// The transaction could not be rolled back.
    #[error("rollback failed: {reason}")]
    Rollback {
        /// Backend-specific detail.
        reason: String,
    },
}

impl UnitOfWorkError {
    /// Returns a short stable label (snake_case) for use in logs.
    ///
    /// # Example
    /// ```
    /// use eventsourcing::UnitOfWorkError;
    ///
    /// let err = UnitOfWorkError::Commit { reason: "disk full".into() };
    /// assert_eq!(err.as_label(), "uow_commit");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            UnitOfWorkError::Unavailable { .. } => "uow_unavailable",
            UnitOfWorkError::Rejected { .. } => "uow_rejected",
            UnitOfWorkError::Commit { .. } => "uow_commit",
            UnitOfWorkError::Rollback { .. } => "uow_rollback",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            UnitOfWorkError::Unavailable { reason } => format!("unavailable: {reason}"),
            UnitOfWorkError::Rejected { reason } => format!("rejected: {reason}"),
            UnitOfWorkError::Commit { reason } => format!("commit: {reason}"),
            UnitOfWorkError::Rollback { reason } => format!("rollback: {reason}"),
        }
    }
}

/// # Errors returned by event submission.
///
/// A failed submission leaves no trace in the engine: the event is not queued,
/// the outstanding count is restored and no handler is invoked.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum SubmitError {
    /// The durability hook failed; the event was not enqueued.
    #[error("persist failed: {0}")]
    Persist(#[from] UnitOfWorkError),

    /// The service has been shut down and no longer accepts events.
    #[error("event sourcing service closed")]
    Closed,
}

impl SubmitError {
    /// Returns a short stable label (snake_case) for use in logs.
    ///
    /// # Example
    /// ```
    /// use eventsourcing::SubmitError;
    ///
    /// assert_eq!(SubmitError::Closed.as_label(), "submit_closed");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            SubmitError::Persist(_) => "submit_persist",
            SubmitError::Closed => "submit_closed",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            SubmitError::Persist(e) => format!("persist: {}", e.as_message()),
            SubmitError::Closed => "service closed".to_string(),
        }
    }

    /// Indicates whether submitting the same event again may succeed.
    ///
    /// The engine never retries by itself. Only a factory that could not hand out a
    /// unit of work is considered transient.
    ///
    /// # Example
    /// ```
    /// use eventsourcing::{SubmitError, UnitOfWorkError};
    ///
    /// let transient = SubmitError::from(UnitOfWorkError::Unavailable { reason: "pool".into() });
    /// assert!(transient.is_retryable());
    /// assert!(!SubmitError::Closed.is_retryable());
    /// ```
    pub fn is_retryable(&self) -> bool {
        matches!(self, SubmitError::Persist(UnitOfWorkError::Unavailable { .. }))
    }
}

/// # Errors produced by the runtime.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum RuntimeError {
    /// The dispatch worker did not stop within the shutdown grace period.
    #[error("shutdown timeout {grace:?} exceeded; dispatch worker still running")]
    GraceExceeded {
        /// The configured grace duration.
        grace: Duration,
    },
}

impl RuntimeError {
    /// Returns a short stable label (snake_case) for use in logs.
    pub fn as_label(&self) -> &'static str {
        match self {
            RuntimeError::GraceExceeded { .. } => "runtime_grace_exceeded",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            RuntimeError::GraceExceeded { grace } => {
                format!("grace exceeded after {grace:?}")
            }
        }
    }
}
