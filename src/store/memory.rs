//! # In-memory journal
//!
//! [`MemoryJournal`] is a reference durability hook: a shared, append-only log of
//! committed [`Record`]s. It is a factory; every unit it hands out stages its own
//! operations and applies them to the log on `commit()`.
//!
//! ## Rules
//! - Staged operations become visible **only** on commit, all at once.
//! - `rollback()` or dropping an uncommitted unit discards staged operations.
//! - Record sequence numbers are assigned at commit time, in log order.
//!
//! ## Example
//! ```rust
//! use eventsourcing::{MemoryJournal, Op, UnitOfWork, UnitOfWorkFactory};
//!
//! let journal = MemoryJournal::<String>::new();
//! let mut unit = journal.create().unwrap();
//! unit.insert(&"created".to_string()).unwrap();
//! unit.delete(&"stale".to_string()).unwrap();
//! unit.commit().unwrap();
//! drop(unit);
//!
//! let records = journal.records();
//! assert_eq!(records.len(), 2);
//! assert_eq!(records[1].op, Op::Delete);
//! assert_eq!(journal.released(), 1);
//! ```

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;

use crate::error::UnitOfWorkError;
use crate::store::{UnitOfWork, UnitOfWorkFactory};

/// Kind of a journal operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    New,
    Update,
    Delete,
}

/// One committed journal entry.
#[derive(Debug, Clone)]
pub struct Record<E> {
    /// Position in the journal (0-based, assigned at commit).
    pub seq: u64,
    /// Operation applied.
    pub op: Op,
    /// Event payload as given to the unit of work.
    pub event: E,
}

struct JournalInner<E> {
    log: Mutex<Vec<Record<E>>>,
    fail_commit: Option<String>,
    opened: AtomicU64,
    released: AtomicU64,
}

/// Shared in-memory log acting as a [`UnitOfWorkFactory`].
///
/// Cheap to clone: clones share the same log.
pub struct MemoryJournal<E> {
    inner: Arc<JournalInner<E>>,
}

impl<E> Clone for MemoryJournal<E> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<E> Default for MemoryJournal<E> {
    fn default() -> Self {
        Self::build(None)
    }
}

impl<E> MemoryJournal<E> {
    /// Creates an empty journal.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a journal whose units always fail to commit with `reason`.
    #[must_use]
    pub fn failing(reason: impl Into<String>) -> Self {
        Self::build(Some(reason.into()))
    }

    fn build(fail_commit: Option<String>) -> Self {
        Self {
            inner: Arc::new(JournalInner {
                log: Mutex::new(Vec::new()),
                fail_commit,
                opened: AtomicU64::new(0),
                released: AtomicU64::new(0),
            }),
        }
    }

    /// Number of committed records.
    pub fn len(&self) -> usize {
        self.inner.log.lock().len()
    }

    /// Returns true if nothing was committed yet.
    pub fn is_empty(&self) -> bool {
        self.inner.log.lock().is_empty()
    }

    /// Number of units handed out so far.
    pub fn opened(&self) -> u64 {
        self.inner.opened.load(Ordering::Acquire)
    }

    /// Number of units released (dropped) so far.
    pub fn released(&self) -> u64 {
        self.inner.released.load(Ordering::Acquire)
    }
}

impl<E: Clone> MemoryJournal<E> {
    /// Returns a snapshot of the committed records in log order.
    pub fn records(&self) -> Vec<Record<E>> {
        self.inner.log.lock().clone()
    }
}

impl<E> UnitOfWorkFactory<E> for MemoryJournal<E>
where
    E: Clone + Send + 'static,
{
    fn create(&self) -> Result<Box<dyn UnitOfWork<E>>, UnitOfWorkError> {
        self.inner.opened.fetch_add(1, Ordering::AcqRel);
        Ok(Box::new(MemoryUnit {
            journal: Arc::clone(&self.inner),
            staged: Vec::new(),
        }))
    }
}

/// Unit of work handed out by [`MemoryJournal`].
struct MemoryUnit<E> {
    journal: Arc<JournalInner<E>>,
    staged: Vec<(Op, E)>,
}

impl<E: Clone + Send> UnitOfWork<E> for MemoryUnit<E> {
    fn insert(&mut self, event: &E) -> Result<(), UnitOfWorkError> {
        self.staged.push((Op::New, event.clone()));
        Ok(())
    }

    fn update(&mut self, event: &E) -> Result<(), UnitOfWorkError> {
        self.staged.push((Op::Update, event.clone()));
        Ok(())
    }

    fn delete(&mut self, event: &E) -> Result<(), UnitOfWorkError> {
        self.staged.push((Op::Delete, event.clone()));
        Ok(())
    }

    fn commit(&mut self) -> Result<(), UnitOfWorkError> {
        if let Some(reason) = &self.journal.fail_commit {
            self.staged.clear();
            return Err(UnitOfWorkError::Commit {
                reason: reason.clone(),
            });
        }

        let mut log = self.journal.log.lock();
        for (op, event) in self.staged.drain(..) {
            let seq = log.len() as u64;
            log.push(Record { seq, op, event });
        }
        Ok(())
    }

    fn rollback(&mut self) -> Result<(), UnitOfWorkError> {
        self.staged.clear();
        Ok(())
    }
}

impl<E> Drop for MemoryUnit<E> {
    fn drop(&mut self) {
        self.journal.released.fetch_add(1, Ordering::AcqRel);
    }
}
