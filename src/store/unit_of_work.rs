//! # Durability hook contracts
//!
//! The engine persists every submitted event through a **unit of work** obtained
//! from a **factory**. Both are external collaborators: the engine does not care
//! where records go, only that `commit()` succeeded before the event is queued.
//!
//! ## Contract
//! - [`UnitOfWorkFactory::create`] may be called concurrently from many submitters;
//!   each call yields an independent unit.
//! - A unit is **released by dropping it** (scoped acquisition). Implementations
//!   should discard staged, uncommitted work in `Drop`.
//! - The engine only ever calls `insert` → `commit` → drop, once per submitted event.
//!   `update`, `delete` and `rollback` exist for other users of the same hook.
//!
//! ## Example
//! ```rust
//! use eventsourcing::{UnitOfWork, UnitOfWorkError, UnitOfWorkFactory};
//!
//! #[derive(Default)]
//! struct Discard;
//!
//! impl UnitOfWork<String> for Discard {
//!     fn insert(&mut self, _event: &String) -> Result<(), UnitOfWorkError> { Ok(()) }
//!     fn update(&mut self, _event: &String) -> Result<(), UnitOfWorkError> { Ok(()) }
//!     fn delete(&mut self, _event: &String) -> Result<(), UnitOfWorkError> { Ok(()) }
//!     fn commit(&mut self) -> Result<(), UnitOfWorkError> { Ok(()) }
//!     fn rollback(&mut self) -> Result<(), UnitOfWorkError> { Ok(()) }
//! }
//!
//! // Any closure returning a boxed unit is a factory.
//! let factory = || Ok::<Box<dyn UnitOfWork<String>>, UnitOfWorkError>(Box::new(Discard));
//! assert!(factory.create().is_ok());
//! ```

use crate::error::UnitOfWorkError;

/// Transactional persistence scope for one batch of record operations.
pub trait UnitOfWork<E>: Send {
    /// Stages creation of a new record for `event`.
    fn insert(&mut self, event: &E) -> Result<(), UnitOfWorkError>;

    /// Stages an update of the record matching `event`.
    fn update(&mut self, event: &E) -> Result<(), UnitOfWorkError>;

    /// Stages deletion of the record matching `event`.
    fn delete(&mut self, event: &E) -> Result<(), UnitOfWorkError>;

    /// Applies every staged operation atomically.
    fn commit(&mut self) -> Result<(), UnitOfWorkError>;

    /// Discards every staged operation.
    fn rollback(&mut self) -> Result<(), UnitOfWorkError>;
}

/// Produces a fresh [`UnitOfWork`] per submitted event.
pub trait UnitOfWorkFactory<E>: Send + Sync + 'static {
    /// Opens a new unit of work.
    fn create(&self) -> Result<Box<dyn UnitOfWork<E>>, UnitOfWorkError>;
}

impl<E, F> UnitOfWorkFactory<E> for F
where
    F: Fn() -> Result<Box<dyn UnitOfWork<E>>, UnitOfWorkError> + Send + Sync + 'static,
{
    fn create(&self) -> Result<Box<dyn UnitOfWork<E>>, UnitOfWorkError> {
        (self)()
    }
}

/// Persists `event` through a fresh unit of work: create → insert → commit → release.
///
/// Fails fast: the first error is returned and the unit is released without retry.
pub(crate) fn persist<E: 'static>(
    factory: &dyn UnitOfWorkFactory<E>,
    event: &E,
) -> Result<(), UnitOfWorkError> {
    let mut unit = factory.create()?;
    unit.insert(event)?;
    unit.commit()
}
